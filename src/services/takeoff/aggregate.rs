//! Totals by trade and unit, plus the project surface summary

use std::collections::BTreeMap;

use crate::domain::{QtyUnit, RoomSurfaces, SurfaceSummary, TradeCode, TradeQuantityLine, TradeTotal};

use super::round2;

/// Sum lines by `(trade_code, unit)`, ordered by trade code then unit
pub fn trade_totals(lines: &[TradeQuantityLine]) -> Vec<TradeTotal> {
    let mut sums: BTreeMap<(TradeCode, QtyUnit), (f64, usize)> = BTreeMap::new();
    for line in lines {
        let entry = sums.entry((line.trade_code, line.unit)).or_insert((0.0, 0));
        entry.0 += line.quantity;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|((trade_code, unit), (quantity, line_count))| TradeTotal {
            trade_code,
            trade_name: trade_code.display_name().to_string(),
            unit,
            quantity: round2(quantity),
            line_count,
        })
        .collect()
}

pub fn surface_summary(surfaces: &[RoomSurfaces], declared_total_area: f64) -> SurfaceSummary {
    let total_floor_area: f64 = surfaces.iter().map(|s| s.floor_net_area).sum();
    let total_gross: f64 = surfaces.iter().map(|s| s.floor_gross_area).sum();

    SurfaceSummary {
        room_count: surfaces.len(),
        wet_room_count: surfaces.iter().filter(|s| s.is_wet_area).count(),
        total_floor_area: round2(total_floor_area),
        total_ceiling_area: round2(
            surfaces
                .iter()
                .map(|s| s.ceiling_flat_area + s.ceiling_recess_side_area)
                .sum(),
        ),
        total_wall_area: round2(surfaces.iter().map(|s| s.wall_net_area).sum()),
        total_baseboard_length: round2(surfaces.iter().map(|s| s.baseboard_net_length).sum()),
        declared_total_area,
        declared_area_delta: round2(total_gross - declared_total_area),
    }
}
