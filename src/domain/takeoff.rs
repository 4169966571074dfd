//! Takeoff domain types
//!
//! Output of the quantity takeoff: itemized lines, per-trade totals and the
//! measured surfaces they were derived from.

use serde::{Deserialize, Serialize};

use super::floor_plan::EntityId;
use super::trades::TradeCode;
use crate::error::TakeoffError;

/// Quantity unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QtyUnit {
    /// m²
    Sqm,
    /// linear metre
    Lm,
    /// each
    Ea,
    Set,
    /// lump sum
    Lot,
    /// m³
    M3,
    Kg,
}

impl std::fmt::Display for QtyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QtyUnit::Sqm => write!(f, "m²"),
            QtyUnit::Lm => write!(f, "m"),
            QtyUnit::Ea => write!(f, "ea"),
            QtyUnit::Set => write!(f, "set"),
            QtyUnit::Lot => write!(f, "lot"),
            QtyUnit::M3 => write!(f, "m³"),
            QtyUnit::Kg => write!(f, "kg"),
        }
    }
}

/// One itemized takeoff line. Derived each run, never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeQuantityLine {
    pub trade_code: TradeCode,
    pub item_code: String,
    pub description: String,
    pub unit: QtyUnit,
    pub raw_quantity: f64,
    /// Waste allowance in percent
    pub surcharge_rate: f64,
    /// Raw quantity plus surcharge
    pub quantity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<EntityId>,
    pub basis: String,
}

/// Lines summed by `(trade_code, unit)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeTotal {
    pub trade_code: TradeCode,
    pub trade_name: String,
    pub unit: QtyUnit,
    pub quantity: f64,
    pub line_count: usize,
}

// ============================================================================
// Surfaces
// ============================================================================

/// Finish surface of a single wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSurface {
    pub wall_id: EntityId,
    /// m
    pub length: f64,
    /// m²
    pub gross_area: f64,
    /// m²
    pub opening_area: f64,
    /// m²; `None` when openings exceed the wall
    pub net_area: Option<f64>,
    /// m, widths of openings reaching the floor
    pub door_width: f64,
    /// m², reveal faces of the openings kept in the wall: two sides and a head
    #[serde(default)]
    pub jamb_area: f64,
}

/// Wet-area extras for bathrooms, balconies and utility rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WetAreaSurfaces {
    pub floor_waterproof_area: f64,
    pub wall_waterproof_area: f64,
    pub curb_area: f64,
}

/// Everything measured for one room (m / m²)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSurfaces {
    pub room_id: EntityId,
    pub room_name: String,
    pub is_wet_area: bool,
    pub floor_gross_area: f64,
    pub floor_net_area: f64,
    pub floor_perimeter: f64,
    pub ceiling_flat_area: f64,
    pub ceiling_recess_area: f64,
    pub ceiling_recess_side_area: f64,
    pub wall_net_area: f64,
    /// Reveal faces around openings on measured walls
    #[serde(default)]
    pub opening_jamb_area: f64,
    pub walls: Vec<WallSurface>,
    pub baseboard_gross_length: f64,
    pub baseboard_net_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wet_area: Option<WetAreaSurfaces>,
}

/// Project-level surface totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceSummary {
    pub room_count: usize,
    pub wet_room_count: usize,
    pub total_floor_area: f64,
    pub total_ceiling_area: f64,
    pub total_wall_area: f64,
    pub total_baseboard_length: f64,
    pub declared_total_area: f64,
    /// Measured minus declared floor area
    pub declared_area_delta: f64,
}

/// Full takeoff output: partial results plus every data problem found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeoffResult {
    pub project_id: String,
    pub lines: Vec<TradeQuantityLine>,
    pub totals: Vec<TradeTotal>,
    pub surfaces: Vec<RoomSurfaces>,
    pub summary: SurfaceSummary,
    pub errors: Vec<TakeoffError>,
}

impl TakeoffResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Lines for one trade, in generation order
    pub fn lines_for(&self, trade: TradeCode) -> impl Iterator<Item = &TradeQuantityLine> {
        self.lines.iter().filter(move |l| l.trade_code == trade)
    }

    pub fn total_for(&self, trade: TradeCode, unit: QtyUnit) -> Option<&TradeTotal> {
        self.totals
            .iter()
            .find(|t| t.trade_code == trade && t.unit == unit)
    }
}
