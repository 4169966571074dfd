//! Line generation
//!
//! Turns measured surfaces and counted elements into trade quantity lines.
//! Every line is routed through the classification table; a category the
//! table does not know yields an `UnclassifiedElement` warning and no line.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::config::TakeoffConfig;
use crate::domain::{
    ConstructionStatus, ElementCategory, FinishCategory, FinishSpec, Fixture, FixtureType,
    HeatingType, OpeningKind, OpeningType, QtyUnit, Room, RoomSurfaces, SurfaceKind,
    TradeQuantityLine, UtilityKind, WallMaterial, WallSurface,
};
use crate::error::{EntityKind, TakeoffError};
use crate::geometry::{MM2_PER_M2, MM_PER_M};

use super::index::ProjectIndex;
use super::round2;

// ============================================================================
// Sink
// ============================================================================

/// A line before classification
pub struct LineItem {
    item_code: &'static str,
    description: String,
    unit: QtyUnit,
    raw_quantity: f64,
    surcharge_rate: f64,
    room_id: Option<String>,
    basis: String,
}

impl LineItem {
    pub fn new(
        item_code: &'static str,
        description: impl Into<String>,
        unit: QtyUnit,
        raw_quantity: f64,
    ) -> Self {
        Self {
            item_code,
            description: description.into(),
            unit,
            raw_quantity,
            surcharge_rate: 0.0,
            room_id: None,
            basis: String::new(),
        }
    }

    pub fn surcharge(mut self, rate: f64) -> Self {
        self.surcharge_rate = rate;
        self
    }

    pub fn room(mut self, room_id: &str) -> Self {
        self.room_id = Some(room_id.to_string());
        self
    }

    pub fn basis(mut self, basis: impl Into<String>) -> Self {
        self.basis = basis.into();
        self
    }
}

/// Collects classified lines in generation order
pub struct LineSink<'a> {
    config: &'a TakeoffConfig,
    errors: &'a mut Vec<TakeoffError>,
    lines: Vec<TradeQuantityLine>,
}

impl<'a> LineSink<'a> {
    pub fn new(config: &'a TakeoffConfig, errors: &'a mut Vec<TakeoffError>) -> Self {
        Self {
            config,
            errors,
            lines: Vec::new(),
        }
    }

    pub fn config(&self) -> &TakeoffConfig {
        self.config
    }

    /// Classify and record a line; empty quantities are dropped
    pub fn emit(
        &mut self,
        category: ElementCategory,
        entity: EntityKind,
        entity_id: &str,
        item: LineItem,
    ) {
        if item.raw_quantity.is_nan() || item.raw_quantity <= 0.0 {
            return;
        }

        let Some(trade_code) = self.config.classification.classify(category) else {
            self.unclassified(entity, entity_id, category);
            return;
        };

        let surcharge_rate = if self.config.apply_surcharge {
            item.surcharge_rate
        } else {
            0.0
        };
        let quantity = round2(item.raw_quantity * (1.0 + surcharge_rate / 100.0));

        self.lines.push(TradeQuantityLine {
            trade_code,
            item_code: item.item_code.to_string(),
            description: item.description,
            unit: item.unit,
            raw_quantity: round2(item.raw_quantity),
            surcharge_rate,
            quantity,
            room_id: item.room_id,
            basis: item.basis,
        });
    }

    pub fn unclassified(&mut self, entity: EntityKind, id: &str, category: ElementCategory) {
        tracing::warn!(
            entity = %entity,
            id = id,
            category = %category,
            "No trade mapping for element"
        );
        self.errors.push(TakeoffError::UnclassifiedElement {
            entity,
            id: id.to_string(),
            category: category.to_string(),
        });
    }

    pub fn finish(self) -> Vec<TradeQuantityLine> {
        self.lines
    }
}

// ============================================================================
// Room lines
// ============================================================================

/// Every line owned by one measured room: finishes, trim, insulation,
/// waterproofing, tile setting, fixtures and utilities
pub fn room_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    room: &Room,
    surfaces: &RoomSurfaces,
) {
    floor_lines(sink, index, room, surfaces);
    wall_finish_lines(sink, index, room, surfaces);
    ceiling_lines(sink, index, room, surfaces);

    baseboard_lines(sink, room, surfaces);
    insulation_lines(sink, index, room, surfaces);

    if let Some(wet) = &surfaces.wet_area {
        let rate = sink.config().surcharge.waterproof;
        let band_mm = sink.config().waterproof_band_height_mm;
        let waterproofing = ElementCategory::Surface(SurfaceKind::Waterproofing);

        sink.emit(
            waterproofing,
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "WP-FLOOR",
                "Floor waterproofing",
                QtyUnit::Sqm,
                wet.floor_waterproof_area,
            )
            .surcharge(rate)
            .room(&room.id)
            .basis(format!("{}: net floor area", room.label())),
        );
        sink.emit(
            waterproofing,
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "WP-WALL",
                "Wall waterproofing band",
                QtyUnit::Sqm,
                wet.wall_waterproof_area,
            )
            .surcharge(rate)
            .room(&room.id)
            .basis(format!(
                "{}: {:.2} m of wall x {:.0} mm band",
                room.label(),
                surfaces.baseboard_gross_length,
                band_mm
            )),
        );
        sink.emit(
            waterproofing,
            EntityKind::Room,
            &room.id,
            LineItem::new("WP-CURB", "Threshold curb waterproofing", QtyUnit::Sqm, wet.curb_area)
                .surcharge(rate)
                .room(&room.id)
                .basis(format!(
                    "{}: {:.0} mm step at door openings",
                    room.label(),
                    room.floor_level_offset.abs()
                )),
        );
    }

    if room.is_wet_area {
        tile_setting_lines(sink, room, surfaces);
    }

    fixture_lines(sink, index.fixtures_in(&room.id), room);
    utility_lines(sink, index.fixtures_in(&room.id), room);
}

/// Dry rooms get a baseboard, wet rooms a tile skirting; every room a crown
fn baseboard_lines(sink: &mut LineSink<'_>, room: &Room, surfaces: &RoomSurfaces) {
    let rates = sink.config().surcharge.clone();
    let basis = format!(
        "{}: wall runs {:.2} m less door openings",
        room.label(),
        surfaces.baseboard_gross_length
    );

    if room.is_wet_area {
        sink.emit(
            ElementCategory::Surface(SurfaceKind::TileBaseboard),
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "TILE-BASEBOARD",
                "Tile baseboard",
                QtyUnit::Lm,
                surfaces.baseboard_net_length,
            )
            .surcharge(rates.baseboard)
            .room(&room.id)
            .basis(basis),
        );
    } else {
        let material = room
            .baseboard
            .as_ref()
            .map(|b| b.material.as_str())
            .unwrap_or("standard");
        sink.emit(
            ElementCategory::Surface(SurfaceKind::Baseboard),
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "BASEBOARD",
                format!("Baseboard ({})", material),
                QtyUnit::Lm,
                surfaces.baseboard_net_length,
            )
            .surcharge(rates.baseboard)
            .room(&room.id)
            .basis(basis),
        );
    }

    sink.emit(
        ElementCategory::Surface(SurfaceKind::CrownMolding),
        EntityKind::Room,
        &room.id,
        LineItem::new(
            "CROWN-MOLDING",
            "Crown molding",
            QtyUnit::Lm,
            surfaces.floor_perimeter,
        )
        .surcharge(rates.molding)
        .room(&room.id)
        .basis(format!("{}: floor perimeter", room.label())),
    );
}

/// Adhesive and grout for the tiled floor and walls of a wet room, plus the
/// mortar bed under its floor
fn tile_setting_lines(sink: &mut LineSink<'_>, room: &Room, surfaces: &RoomSurfaces) {
    let config = sink.config();
    let rates = config.surcharge.clone();
    let adhesive_per_sqm = config.tile_adhesive_kg_per_sqm;
    let grout_per_sqm = config.tile_grout_kg_per_sqm;
    let tiled = surfaces.floor_net_area + surfaces.wall_net_area;
    let setting = ElementCategory::Surface(SurfaceKind::TileSetting);

    sink.emit(
        setting,
        EntityKind::Room,
        &room.id,
        LineItem::new("TILE-ADHESIVE", "Tile adhesive", QtyUnit::Kg, tiled * adhesive_per_sqm)
            .surcharge(rates.tile_adhesive)
            .room(&room.id)
            .basis(format!(
                "{}: {:.2} m² tiled x {} kg/m²",
                room.label(),
                tiled,
                adhesive_per_sqm
            )),
    );
    sink.emit(
        setting,
        EntityKind::Room,
        &room.id,
        LineItem::new("TILE-GROUT", "Tile grout", QtyUnit::Kg, tiled * grout_per_sqm)
            .surcharge(rates.tile_grout)
            .room(&room.id)
            .basis(format!(
                "{}: {:.2} m² tiled x {} kg/m²",
                room.label(),
                tiled,
                grout_per_sqm
            )),
    );
    sink.emit(
        ElementCategory::Surface(SurfaceKind::Plaster),
        EntityKind::Room,
        &room.id,
        LineItem::new(
            "PLASTER-FLOOR",
            "Floor mortar bed",
            QtyUnit::Sqm,
            surfaces.floor_net_area,
        )
        .surcharge(rates.plaster)
        .room(&room.id)
        .basis(format!("{}: net floor area", room.label())),
    );
}

/// Lining for the measured exterior walls around a room
fn insulation_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    room: &Room,
    surfaces: &RoomSurfaces,
) {
    let exterior: Vec<&WallSurface> = surfaces
        .walls
        .iter()
        .filter(|s| index.wall(&s.wall_id).is_some_and(|w| w.is_exterior))
        .filter(|s| s.net_area.is_some())
        .collect();
    if exterior.is_empty() {
        return;
    }
    let area: f64 = exterior.iter().filter_map(|s| s.net_area).sum();
    let ids: Vec<&str> = exterior.iter().map(|s| s.wall_id.as_str()).collect();
    let rate = sink.config().surcharge.insulation;

    sink.emit(
        ElementCategory::Surface(SurfaceKind::Insulation),
        EntityKind::Room,
        &room.id,
        LineItem::new("INSULATION", "Exterior wall insulation", QtyUnit::Sqm, area)
            .surcharge(rate)
            .room(&room.id)
            .basis(format!("{}: {}, openings deducted", room.label(), ids.join(", "))),
    );
}

fn floor_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    room: &Room,
    surfaces: &RoomSurfaces,
) {
    let finish = resolve_finish(sink, index, room.floor_finish_id.as_deref());
    let rates = sink.config().surcharge.clone();
    let basis = format!(
        "{}: floor {:.2} m² less columns",
        room.label(),
        surfaces.floor_gross_area
    );

    if room.is_wet_area {
        sink.emit(
            ElementCategory::Surface(SurfaceKind::WetFloor),
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "FLOOR-WET",
                describe("Wet-area floor tile", finish),
                QtyUnit::Sqm,
                surfaces.floor_net_area,
            )
            .surcharge(rates.tile)
            .room(&room.id)
            .basis(basis),
        );
        return;
    }

    let (category, rate) = match finish.map(|f| f.category) {
        Some(c @ FinishCategory::WoodFlooring) => (ElementCategory::Finish(c), rates.flooring_wood),
        Some(c @ FinishCategory::LaminateFlooring) => {
            (ElementCategory::Finish(c), rates.flooring_laminate)
        }
        Some(c @ FinishCategory::VinylFlooring) => {
            (ElementCategory::Finish(c), rates.flooring_vinyl)
        }
        Some(c @ FinishCategory::TileFlooring) => (ElementCategory::Finish(c), rates.flooring_tile),
        _ => (
            ElementCategory::Surface(SurfaceKind::DryFloor),
            rates.flooring_laminate,
        ),
    };
    let tiled = matches!(category, ElementCategory::Finish(FinishCategory::TileFlooring));

    sink.emit(
        category,
        EntityKind::Room,
        &room.id,
        LineItem::new(
            "FLOOR-FINISH",
            describe("Floor finish", finish),
            QtyUnit::Sqm,
            surfaces.floor_net_area,
        )
        .surcharge(rate)
        .room(&room.id)
        .basis(basis.clone()),
    );

    if !tiled {
        sink.emit(
            ElementCategory::Surface(SurfaceKind::FloorUnderlay),
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "FLOOR-UNDERLAY",
                "Floor underlay",
                QtyUnit::Sqm,
                surfaces.floor_net_area,
            )
            .surcharge(rates.floor_underlay)
            .room(&room.id)
            .basis(basis),
        );
    }
}

fn wall_finish_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    room: &Room,
    surfaces: &RoomSurfaces,
) {
    let finish = resolve_finish(sink, index, room.wall_finish_id.as_deref());
    let rates = sink.config().surcharge.clone();

    let (category, rate) = match finish.map(|f| f.category) {
        Some(c @ FinishCategory::WallTile) => (ElementCategory::Finish(c), rates.tile),
        Some(c @ FinishCategory::Wallpaper) => (ElementCategory::Finish(c), rates.wallpaper),
        Some(c @ FinishCategory::Paint) => (ElementCategory::Finish(c), rates.paint),
        _ if room.is_wet_area => (ElementCategory::Surface(SurfaceKind::WetWall), rates.tile),
        _ => (
            ElementCategory::Surface(SurfaceKind::DryWall),
            rates.wallpaper,
        ),
    };

    let measured: Vec<&WallSurface> = surfaces
        .walls
        .iter()
        .filter(|w| w.net_area.is_some())
        .collect();
    let default_name = if room.is_wet_area {
        "Wall tile"
    } else {
        "Wall finish"
    };

    sink.emit(
        category,
        EntityKind::Room,
        &room.id,
        LineItem::new(
            "WALL-FINISH",
            describe(default_name, finish),
            QtyUnit::Sqm,
            surfaces.wall_net_area,
        )
        .surcharge(rate)
        .room(&room.id)
        .basis(format!(
            "{}: {} walls, openings deducted",
            room.label(),
            measured.len()
        )),
    );

    // Reveals are finished like the dry walls they cut through
    if !room.is_wet_area {
        sink.emit(
            category,
            EntityKind::Room,
            &room.id,
            LineItem::new(
                "WALL-JAMB",
                describe("Opening reveals", finish),
                QtyUnit::Sqm,
                surfaces.opening_jamb_area,
            )
            .surcharge(rate)
            .room(&room.id)
            .basis(format!("{}: jambs and heads of wall openings", room.label())),
        );
    }
}

fn ceiling_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    room: &Room,
    surfaces: &RoomSurfaces,
) {
    let finish = resolve_finish(sink, index, room.ceiling_finish_id.as_deref());
    let rate = sink.config().surcharge.ceiling_board;

    sink.emit(
        ElementCategory::Surface(SurfaceKind::Ceiling),
        EntityKind::Room,
        &room.id,
        LineItem::new(
            "CEILING",
            describe("Ceiling board", finish),
            QtyUnit::Sqm,
            surfaces.ceiling_flat_area,
        )
        .surcharge(rate)
        .room(&room.id)
        .basis(format!("{}: net floor area", room.label())),
    );

    let Some(recess) = &room.ceiling_recess else {
        return;
    };

    sink.emit(
        ElementCategory::Surface(SurfaceKind::CeilingRecessSide),
        EntityKind::CeilingRecess,
        &room.id,
        LineItem::new(
            "CEILING-RECESS-SIDE",
            "Ceiling recess sides",
            QtyUnit::Sqm,
            surfaces.ceiling_recess_side_area,
        )
        .surcharge(rate)
        .room(&room.id)
        .basis(format!(
            "{}: recess perimeter x {:.0} mm depth",
            room.label(),
            recess.depth
        )),
    );

    let (kind, description) = if recess.has_indirect_lighting {
        (SurfaceKind::CeilingRecessTrim, "Recessed ceiling with indirect lighting")
    } else {
        (SurfaceKind::Ceiling, "Recessed ceiling")
    };
    sink.emit(
        ElementCategory::Surface(kind),
        EntityKind::CeilingRecess,
        &room.id,
        LineItem::new(
            "CEILING-RECESS",
            description,
            QtyUnit::Sqm,
            surfaces.ceiling_recess_area,
        )
        .room(&room.id)
        .basis(format!("{}: recess outline area", room.label())),
    );
}

fn fixture_lines(sink: &mut LineSink<'_>, fixtures: &[&Fixture], room: &Room) {
    let mut by_type: BTreeMap<FixtureType, Vec<&Fixture>> = BTreeMap::new();
    for fixture in fixtures
        .iter()
        .copied()
        .filter(|f| f.construction_status != ConstructionStatus::Demolish)
    {
        if fixture.fixture_type == FixtureType::Unknown {
            sink.unclassified(
                EntityKind::Fixture,
                &fixture.id,
                ElementCategory::Fixture(FixtureType::Unknown),
            );
            continue;
        }
        by_type.entry(fixture.fixture_type).or_default().push(fixture);
    }

    for (fixture_type, group) in by_type {
        let category = ElementCategory::Fixture(fixture_type);
        let first_id = group[0].id.as_str();
        let ids: Vec<&str> = group.iter().map(|f| f.id.as_str()).collect();

        sink.emit(
            category,
            EntityKind::Fixture,
            first_id,
            LineItem::new("FIXTURE", fixture_type.display_name(), QtyUnit::Ea, group.len() as f64)
                .room(&room.id)
                .basis(format!("{}: {}", room.label(), ids.join(", "))),
        );

        if fixture_type.is_linear() {
            let run_mm: f64 = group
                .iter()
                .map(|f| f.bounding_box.width.max(f.bounding_box.height))
                .sum();
            sink.emit(
                category,
                EntityKind::Fixture,
                first_id,
                LineItem::new(
                    "FIXTURE-RUN",
                    format!("{} run length", fixture_type.display_name()),
                    QtyUnit::Lm,
                    run_mm / MM_PER_M,
                )
                .room(&room.id)
                .basis(format!("{}: longest side of each unit", room.label())),
            );
        }
    }
}

fn utility_lines(sink: &mut LineSink<'_>, fixtures: &[&Fixture], room: &Room) {
    let mut required: BTreeSet<UtilityKind> = BTreeSet::new();
    for fixture in fixtures
        .iter()
        .copied()
        .filter(|f| f.construction_status != ConstructionStatus::Demolish)
    {
        if fixture.requires_water_supply {
            required.insert(UtilityKind::WaterSupply);
        }
        if fixture.requires_drain {
            required.insert(UtilityKind::Drain);
        }
        if fixture.requires_gas {
            required.insert(UtilityKind::Gas);
        }
        if fixture.requires_electrical {
            required.insert(UtilityKind::Electrical);
        }
    }

    for utility in required {
        sink.emit(
            ElementCategory::Utility(utility),
            EntityKind::Room,
            &room.id,
            LineItem::new("UTILITY", utility.display_name(), QtyUnit::Ea, 1.0)
                .room(&room.id)
                .basis(format!("{}: required by fixtures", room.label())),
        );
    }
}

/// Look up a room's finish; unknown categories warn and fall back to the
/// surface's default routing
fn resolve_finish<'p>(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'p>,
    finish_id: Option<&str>,
) -> Option<&'p FinishSpec> {
    let finish = index.finish(finish_id)?;
    if finish.category == FinishCategory::Unknown {
        sink.unclassified(
            EntityKind::FinishSpec,
            &finish.id,
            ElementCategory::Finish(FinishCategory::Unknown),
        );
        return None;
    }
    Some(finish)
}

fn describe(default: &str, finish: Option<&FinishSpec>) -> String {
    match finish {
        Some(f) => format!("{} ({})", default, f.name),
        None => default.to_string(),
    }
}

// ============================================================================
// Project lines
// ============================================================================

/// Removal of demolished walls, openings and fixtures plus debris disposal
pub fn demolition_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    walls: &HashMap<String, WallSurface>,
) {
    let project = index.project;
    let mut demolished_sqm = 0.0;

    for wall in index
        .walls()
        .filter(|w| w.construction_status == ConstructionStatus::Demolish)
    {
        let Some(surface) = walls.get(&wall.id) else {
            continue;
        };
        // Demolished openings get their own line; the wall line covers the rest
        let removed_openings: f64 = index
            .openings_on(&wall.id)
            .iter()
            .filter(|o| o.construction_status == ConstructionStatus::Demolish)
            .map(|o| (o.area() / MM2_PER_M2).max(0.0))
            .sum();
        let area = (surface.gross_area - removed_openings).max(0.0);
        demolished_sqm += area;
        sink.emit(
            ElementCategory::Demolition,
            EntityKind::Wall,
            &wall.id,
            LineItem::new(
                "DEMO-WALL",
                format!("Remove {} wall", wall.material),
                QtyUnit::Sqm,
                area,
            )
            .basis(format!(
                "{}: {:.2} m x {:.0} mm less {:.2} m² of openings",
                wall.id, surface.length, wall.height, removed_openings
            )),
        );
    }

    for opening in project
        .openings
        .iter()
        .filter(|o| o.construction_status == ConstructionStatus::Demolish)
    {
        let area = opening.area() / MM2_PER_M2;
        demolished_sqm += area.max(0.0);
        sink.emit(
            ElementCategory::Demolition,
            EntityKind::Opening,
            &opening.id,
            LineItem::new(
                "DEMO-OPENING",
                format!("Remove {}", opening.opening_type.display_name().to_lowercase()),
                QtyUnit::Sqm,
                area,
            )
            .basis(format!(
                "{}: {:.0} x {:.0} mm",
                opening.id, opening.width, opening.height
            )),
        );
    }

    for fixture in project
        .fixtures
        .iter()
        .filter(|f| f.construction_status == ConstructionStatus::Demolish)
    {
        let area = fixture.bounding_box.area() / MM2_PER_M2;
        demolished_sqm += area.max(0.0);
        let mut item = LineItem::new(
            "DEMO-FIXTURE",
            format!("Remove {}", fixture.fixture_type.display_name().to_lowercase()),
            QtyUnit::Sqm,
            area,
        )
        .basis(format!("{}: footprint", fixture.id));
        if index.room(&fixture.room_id).is_some() {
            item = item.room(&fixture.room_id);
        }
        sink.emit(ElementCategory::Demolition, EntityKind::Fixture, &fixture.id, item);
    }

    let factor = sink.config().demolition_waste_m3_per_sqm;
    sink.emit(
        ElementCategory::Demolition,
        EntityKind::Wall,
        &project.id,
        LineItem::new(
            "DEMO-WASTE",
            "Demolition waste disposal",
            QtyUnit::M3,
            demolished_sqm * factor,
        )
        .basis(format!(
            "{:.2} m² demolished x {} m³/m²",
            demolished_sqm, factor
        )),
    );
}

/// New partition and masonry walls
pub fn construction_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    walls: &HashMap<String, WallSurface>,
) {
    let rates = sink.config().surcharge.clone();

    for wall in index
        .walls()
        .filter(|w| w.construction_status == ConstructionStatus::New)
    {
        let Some(surface) = walls.get(&wall.id) else {
            continue;
        };
        let rate = match wall.material {
            WallMaterial::Concrete | WallMaterial::Block => rates.masonry,
            WallMaterial::Drywall | WallMaterial::Wood => rates.drywall,
        };
        sink.emit(
            ElementCategory::WallConstruction(wall.material),
            EntityKind::Wall,
            &wall.id,
            LineItem::new(
                "WALL-NEW",
                format!("New {} wall", wall.material),
                QtyUnit::Sqm,
                surface.gross_area,
            )
            .surcharge(rate)
            .basis(format!(
                "{}: {:.2} m x {:.0} mm, {:.0} mm thick",
                wall.id, surface.length, wall.height, wall.thickness
            )),
        );

        if wall.material == WallMaterial::Block {
            sink.emit(
                ElementCategory::Surface(SurfaceKind::Plaster),
                EntityKind::Wall,
                &wall.id,
                LineItem::new(
                    "PLASTER-WALL",
                    "Block wall plastering, both faces",
                    QtyUnit::Sqm,
                    2.0 * surface.gross_area,
                )
                .surcharge(rates.plaster)
                .basis(format!("{}: 2 x {:.2} m²", wall.id, surface.gross_area)),
            );
        }
    }
}

/// New doors and windows, one SET line per type and size
pub fn opening_lines(sink: &mut LineSink<'_>, index: &ProjectIndex<'_>) {
    type Key = (OpeningKind, OpeningType, i64, i64);
    let mut groups: BTreeMap<Key, Vec<&str>> = BTreeMap::new();

    for opening in index
        .project
        .openings
        .iter()
        .filter(|o| o.construction_status == ConstructionStatus::New)
        .filter(|o| index.wall(&o.wall_id).is_some())
    {
        let key = (
            opening.kind(),
            opening.opening_type,
            opening.width.round() as i64,
            opening.height.round() as i64,
        );
        groups.entry(key).or_default().push(&opening.id);
    }

    for ((kind, opening_type, width, height), ids) in groups {
        sink.emit(
            ElementCategory::Opening(kind),
            EntityKind::Opening,
            ids[0],
            LineItem::new(
                "OPENING-NEW",
                format!("{} {} x {}", opening_type.display_name(), width, height),
                QtyUnit::Set,
                ids.len() as f64,
            )
            .basis(ids.join(", ")),
        );
    }
}

/// Base electrical points: lights, outlets, switches and the panel
pub fn electrical_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    surfaces: &[RoomSurfaces],
) {
    if surfaces.is_empty() {
        return;
    }
    let rooms: Vec<&Room> = surfaces
        .iter()
        .filter_map(|s| index.room(&s.room_id))
        .collect();
    let room_count = rooms.len();

    let lights: usize = rooms
        .iter()
        .map(|r| if r.room_type.is_gathering_space() { 2 } else { 1 })
        .sum();
    let powered_fixtures = rooms
        .iter()
        .flat_map(|r| index.fixtures_in(&r.id))
        .filter(|f| f.construction_status != ConstructionStatus::Demolish)
        .filter(|f| f.requires_electrical)
        .count();
    let outlets = powered_fixtures.max(2 * room_count);

    let project_id = index.project.id.as_str();
    let points = [
        ("ELEC-LIGHT", "Light points", lights, "1 per room, 2 in living/kitchen/dining"),
        ("ELEC-OUTLET", "Power outlets", outlets, "max(powered fixtures, 2 per room)"),
        ("ELEC-SWITCH", "Light switches", room_count, "1 per room"),
        ("ELEC-PANEL", "Distribution panel", 1, "1 per project"),
    ];
    for (item_code, description, count, rule) in points {
        sink.emit(
            ElementCategory::ElectricalPoint,
            EntityKind::Room,
            project_id,
            LineItem::new(item_code, description, QtyUnit::Ea, count as f64)
                .basis(format!("{} rooms: {}", room_count, rule)),
        );
    }
}

/// Bath accessory sets, caulking and curtain boxes
pub fn hardware_lines(
    sink: &mut LineSink<'_>,
    index: &ProjectIndex<'_>,
    surfaces: &[RoomSurfaces],
) {
    if surfaces.is_empty() {
        return;
    }
    let project_id = index.project.id.as_str();

    let wet_rooms = surfaces.iter().filter(|s| s.is_wet_area).count();
    sink.emit(
        ElementCategory::Surface(SurfaceKind::BathAccessory),
        EntityKind::Room,
        project_id,
        LineItem::new("BATH-ACC", "Bathroom accessory set", QtyUnit::Set, wet_rooms as f64)
            .basis(format!("{} wet rooms, 1 set each", wet_rooms)),
    );

    let perimeter: f64 = surfaces.iter().map(|s| s.floor_perimeter).sum();
    let rate = sink.config().surcharge.caulking;
    sink.emit(
        ElementCategory::Surface(SurfaceKind::Caulking),
        EntityKind::Room,
        project_id,
        LineItem::new("CAULKING", "Silicone caulking", QtyUnit::Lm, perimeter)
            .surcharge(rate)
            .basis(format!("{} rooms, floor perimeters", surfaces.len())),
    );

    let curtained = surfaces
        .iter()
        .filter_map(|s| index.room(&s.room_id))
        .filter(|r| r.room_type.takes_curtain_box())
        .count();
    let per_room = sink.config().curtain_box_m_per_room;
    sink.emit(
        ElementCategory::Surface(SurfaceKind::CurtainBox),
        EntityKind::Room,
        project_id,
        LineItem::new(
            "CURTAIN-BOX",
            "Curtain box",
            QtyUnit::Lm,
            curtained as f64 * per_room,
        )
        .basis(format!("{} rooms x {} m", curtained, per_room)),
    );
}

/// Floor heating, final cleaning and site protection
pub fn site_lines(sink: &mut LineSink<'_>, index: &ProjectIndex<'_>, surfaces: &[RoomSurfaces]) {
    if surfaces.is_empty() {
        return;
    }
    let project_id = index.project.id.as_str();

    let heated: Vec<&str> = surfaces
        .iter()
        .filter_map(|s| index.room(&s.room_id))
        .filter(|r| r.heating_type == Some(HeatingType::Ondol))
        .map(|r| r.label())
        .collect();
    if !heated.is_empty() {
        sink.emit(
            ElementCategory::Utility(UtilityKind::FloorHeating),
            EntityKind::Room,
            project_id,
            LineItem::new("HEATING", "Floor heating pipework", QtyUnit::Lot, 1.0)
                .basis(heated.join(", ")),
        );
    }

    let floor: f64 = surfaces.iter().map(|s| s.floor_net_area).sum();
    sink.emit(
        ElementCategory::Surface(SurfaceKind::Cleanup),
        EntityKind::Room,
        project_id,
        LineItem::new("CLEANUP", "Final cleaning", QtyUnit::Sqm, floor)
            .basis(format!("{} rooms, net floor area", surfaces.len())),
    );
    sink.emit(
        ElementCategory::Surface(SurfaceKind::SiteProtection),
        EntityKind::Room,
        project_id,
        LineItem::new("PROTECTION", "Site protection and curing", QtyUnit::Lot, 1.0)
            .basis("whole site"),
    );
}
