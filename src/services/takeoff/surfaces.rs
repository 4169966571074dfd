//! Surface measurement
//!
//! Converts plan geometry (mm) into the finish surfaces every line is derived
//! from (m, m²). Walls are measured once per project so that a wall shared by
//! two rooms reports its problems only once.

use std::collections::HashMap;

use crate::config::TakeoffConfig;
use crate::domain::{
    ConstructionStatus, Opening, Room, RoomSurfaces, Wall, WallSurface, WetAreaSurfaces,
};
use crate::error::{EntityKind, TakeoffError};
use crate::geometry::{
    is_simple_polygon, point_on_segment, polygon_area, polygon_perimeter, wall_centerline,
    MM2_PER_M2, MM_PER_M,
};

use super::index::ProjectIndex;

/// Measure every wall of the project, keyed by wall id.
///
/// Degenerate walls get no entry. A wall whose openings do not fit keeps an
/// entry with `net_area: None` so its gross size stays visible.
pub fn measure_walls(
    index: &ProjectIndex<'_>,
    config: &TakeoffConfig,
    errors: &mut Vec<TakeoffError>,
) -> HashMap<String, WallSurface> {
    index
        .walls()
        .filter_map(|wall| {
            let surface = measure_wall(wall, index.openings_on(&wall.id), config, errors)?;
            Some((wall.id.clone(), surface))
        })
        .collect()
}

pub fn measure_wall(
    wall: &Wall,
    openings: &[&Opening],
    config: &TakeoffConfig,
    errors: &mut Vec<TakeoffError>,
) -> Option<WallSurface> {
    let centerline = wall_centerline(wall);
    let length_mm = centerline.length();

    if length_mm <= f64::EPSILON {
        errors.push(TakeoffError::degenerate(
            EntityKind::Wall,
            &wall.id,
            "start and end points coincide",
        ));
        return None;
    }
    if wall.height <= 0.0 || wall.thickness <= 0.0 {
        errors.push(TakeoffError::degenerate(
            EntityKind::Wall,
            &wall.id,
            format!(
                "non-positive size (height {}, thickness {})",
                wall.height, wall.thickness
            ),
        ));
        return None;
    }

    let tolerance = config.opening_position_tolerance_mm;
    let mut exceeding: Vec<(String, String)> = Vec::new();
    let mut opening_area_mm2 = 0.0;
    let mut door_width_mm = 0.0;
    let mut jamb_mm2 = 0.0;
    let mut counted: Vec<&str> = Vec::new();

    for opening in openings {
        if opening.width <= 0.0 || opening.height <= 0.0 {
            errors.push(TakeoffError::degenerate(
                EntityKind::Opening,
                &opening.id,
                format!(
                    "non-positive size ({} x {})",
                    opening.width, opening.height
                ),
            ));
            continue;
        }

        if opening.width > length_mm {
            exceeding.push((
                opening.id.clone(),
                format!(
                    "opening {} is {:.0} mm wide on a {:.0} mm wall",
                    opening.id, opening.width, length_mm
                ),
            ));
            continue;
        }
        if opening.height > wall.height {
            exceeding.push((
                opening.id.clone(),
                format!(
                    "opening {} is {:.0} mm tall on a {:.0} mm wall",
                    opening.id, opening.height, wall.height
                ),
            ));
            continue;
        }

        if let Some(position) = opening.position {
            if !point_on_segment(position, wall.start, wall.end, tolerance) {
                exceeding.push((
                    opening.id.clone(),
                    format!("opening {} is not positioned on the wall", opening.id),
                ));
                continue;
            }
            let along = centerline.distance_along(position);
            let half = opening.width / 2.0;
            if along - half < -tolerance || along + half > length_mm + tolerance {
                exceeding.push((
                    opening.id.clone(),
                    format!("opening {} extends past the wall end", opening.id),
                ));
                continue;
            }
        }

        opening_area_mm2 += opening.area();
        if opening.reaches_floor() {
            door_width_mm += opening.width;
        }
        if opening.construction_status != ConstructionStatus::Demolish {
            jamb_mm2 += wall.thickness * (2.0 * opening.height + opening.width);
        }
        counted.push(&opening.id);
    }

    let gross_mm2 = length_mm * wall.height;
    let overflow = if !exceeding.is_empty() {
        let (ids, reasons): (Vec<String>, Vec<String>) = exceeding.into_iter().unzip();
        Some((ids, reasons.join("; ")))
    } else if opening_area_mm2 > gross_mm2 {
        let reason = format!(
            "openings cover {:.2} m² of a {:.2} m² wall",
            opening_area_mm2 / MM2_PER_M2,
            gross_mm2 / MM2_PER_M2
        );
        Some((counted.iter().map(|id| id.to_string()).collect(), reason))
    } else {
        None
    };

    let net_area = match overflow {
        None => Some((gross_mm2 - opening_area_mm2) / MM2_PER_M2),
        Some((opening_ids, reason)) => {
            tracing::warn!(
                wall_id = %wall.id,
                openings = ?opening_ids,
                "Openings do not fit their wall"
            );
            errors.push(TakeoffError::OpeningExceedsWall {
                wall_id: wall.id.clone(),
                opening_ids,
                reason,
            });
            None
        }
    };

    Some(WallSurface {
        wall_id: wall.id.clone(),
        length: length_mm / MM_PER_M,
        gross_area: gross_mm2 / MM2_PER_M2,
        opening_area: opening_area_mm2 / MM2_PER_M2,
        net_area,
        door_width: door_width_mm / MM_PER_M,
        jamb_area: jamb_mm2 / MM2_PER_M2,
    })
}

/// Measure one room; `None` when its outline is unusable
pub fn measure_room(
    room: &Room,
    index: &ProjectIndex<'_>,
    walls: &HashMap<String, WallSurface>,
    config: &TakeoffConfig,
    errors: &mut Vec<TakeoffError>,
) -> Option<RoomSurfaces> {
    if !is_simple_polygon(&room.polygon) {
        errors.push(TakeoffError::degenerate(
            EntityKind::Room,
            &room.id,
            format!(
                "outline with {} vertices is not a simple polygon",
                room.polygon.len()
            ),
        ));
        return None;
    }

    let floor_gross_mm2 = match polygon_area(&room.polygon) {
        Ok(area) => area.abs(),
        Err(err) => {
            errors.push(TakeoffError::degenerate(
                EntityKind::Room,
                &room.id,
                err.to_string(),
            ));
            return None;
        }
    };
    if room.ceiling_height <= 0.0 {
        errors.push(TakeoffError::degenerate(
            EntityKind::Room,
            &room.id,
            format!("non-positive ceiling height {}", room.ceiling_height),
        ));
        return None;
    }

    let column_mm2: f64 = index
        .columns_in(&room.id)
        .map(|c| c.section_width.max(0.0) * c.section_depth.max(0.0))
        .sum();

    let floor_gross_area = floor_gross_mm2 / MM2_PER_M2;
    let floor_net_area = ((floor_gross_mm2 - column_mm2) / MM2_PER_M2).max(0.0);
    let floor_perimeter = polygon_perimeter(&room.polygon) / MM_PER_M;

    let (ceiling_recess_area, ceiling_recess_side_area) = match &room.ceiling_recess {
        Some(recess) if is_simple_polygon(&recess.polygon) && recess.depth > 0.0 => {
            let area = polygon_area(&recess.polygon)
                .map(|a| a.abs() / MM2_PER_M2)
                .unwrap_or(0.0);
            let side = polygon_perimeter(&recess.polygon) / MM_PER_M * recess.depth / MM_PER_M;
            (area.min(floor_gross_area), side)
        }
        Some(_) => {
            errors.push(TakeoffError::degenerate(
                EntityKind::CeilingRecess,
                &room.id,
                "recess outline is not a simple polygon or has no depth",
            ));
            (0.0, 0.0)
        }
        None => (0.0, 0.0),
    };

    // Demolished walls no longer bound a finished room
    let boundary: Vec<(&Wall, &WallSurface)> = index
        .boundary_walls(room)
        .into_iter()
        .filter(|w| w.construction_status != ConstructionStatus::Demolish)
        .filter_map(|w| walls.get(&w.id).map(|s| (w, s)))
        .collect();

    let wall_net_area: f64 = boundary.iter().filter_map(|(_, s)| s.net_area).sum();
    let opening_jamb_area: f64 = boundary
        .iter()
        .filter(|(_, s)| s.net_area.is_some())
        .map(|(_, s)| s.jamb_area)
        .sum();
    let baseboard_gross_length: f64 = boundary.iter().map(|(_, s)| s.length).sum();
    let door_width: f64 = boundary.iter().map(|(_, s)| s.door_width).sum();
    let baseboard_net_length = (baseboard_gross_length - door_width).max(0.0);

    let wet_area = room.is_wet_area.then(|| WetAreaSurfaces {
        floor_waterproof_area: floor_net_area,
        wall_waterproof_area: baseboard_gross_length * config.waterproof_band_height_mm
            / MM_PER_M,
        curb_area: room.floor_level_offset.abs() / MM_PER_M * door_width,
    });

    Some(RoomSurfaces {
        room_id: room.id.clone(),
        room_name: room.label().to_string(),
        is_wet_area: room.is_wet_area,
        floor_gross_area,
        floor_net_area,
        floor_perimeter,
        ceiling_flat_area: floor_net_area,
        ceiling_recess_area,
        ceiling_recess_side_area,
        wall_net_area,
        opening_jamb_area,
        walls: boundary.into_iter().map(|(_, s)| s.clone()).collect(),
        baseboard_gross_length,
        baseboard_net_length,
        wet_area,
    })
}
