mod common;

use blueprintx_takeoff::domain::{
    CeilingRecess, ConstructionStatus, FinishCategory, FinishSpec, FixtureType, HeatingType,
    Point2D, QtyUnit, Structure, StructureKind, TakeoffResult, TradeCode, WallMaterial,
};
use blueprintx_takeoff::{compute_takeoff, Severity, TakeoffConfig, TakeoffEngine, TakeoffError};

use common::{apartment_project, approx, bedroom_project, fixture, wall};

fn total(result: &TakeoffResult, trade: TradeCode, unit: QtyUnit) -> f64 {
    result.total_for(trade, unit).map(|t| t.quantity).unwrap_or(0.0)
}

#[test]
fn bedroom_floor_and_wall_areas() {
    let result = compute_takeoff(&bedroom_project());
    assert!(!result.has_errors(), "{:?}", result.errors);

    let room = &result.surfaces[0];
    assert!(approx(room.floor_gross_area, 12.0));
    assert!(approx(room.floor_net_area, 12.0));
    assert!(approx(room.floor_perimeter, 14.0));

    let south = room.walls.iter().find(|w| w.wall_id == "bed-s").unwrap();
    assert!(approx(south.gross_area, 9.6));
    assert!(approx(south.net_area.unwrap(), 7.71));

    assert!(approx(room.wall_net_area, 31.71));
    assert!(approx(room.baseboard_gross_length, 14.0));
    assert!(approx(room.baseboard_net_length, 13.1));
    assert!(approx(result.summary.declared_area_delta, 0.0));
}

#[test]
fn bedroom_lines_route_to_expected_trades() {
    let result = compute_takeoff(&bedroom_project());

    // Laminate default (5 %) plus underlay (3 %)
    assert!(approx(total(&result, TradeCode::Flooring, QtyUnit::Sqm), 24.96));

    let walls: Vec<_> = result.lines_for(TradeCode::WallpaperPaint).collect();
    assert_eq!(walls.len(), 2);
    assert_eq!(walls[0].item_code, "WALL-FINISH");
    assert!(approx(walls[0].raw_quantity, 31.71));
    assert!(approx(walls[0].quantity, 34.88));
    assert_eq!(walls[0].room_id.as_deref(), Some("bed"));
    // Door reveal: 150 mm x (2 x 2100 + 900) mm
    assert_eq!(walls[1].item_code, "WALL-JAMB");
    assert!((walls[1].raw_quantity - 0.765).abs() < 0.006);
    assert_eq!(walls[1].surcharge_rate, 10.0);

    assert!(approx(total(&result, TradeCode::Ceiling, QtyUnit::Sqm), 12.6));
    let trim: Vec<_> = result
        .lines_for(TradeCode::BaseboardMolding)
        .map(|l| (l.item_code.as_str(), l.raw_quantity))
        .collect();
    assert_eq!(trim, vec![("BASEBOARD", 13.1), ("CROWN-MOLDING", 14.0)]);

    // Caulking 14.0 m + 10 % and one 2 m curtain box
    assert!(approx(total(&result, TradeCode::Hardware, QtyUnit::Lm), 17.4));
    assert_eq!(result.total_for(TradeCode::Hardware, QtyUnit::Set), None);
    assert_eq!(result.lines_for(TradeCode::Plaster).count(), 0);
    assert_eq!(result.lines_for(TradeCode::Insulation).count(), 0);

    // 1 light, 2 outlets, 1 switch, 1 panel
    assert!(approx(total(&result, TradeCode::Electrical, QtyUnit::Ea), 5.0));
    assert!(approx(total(&result, TradeCode::Cleanup, QtyUnit::Sqm), 12.0));
    assert!(approx(total(&result, TradeCode::Protection, QtyUnit::Lot), 1.0));

    // Existing door: nothing to install, nothing to remove
    assert_eq!(result.lines_for(TradeCode::DoorWindow).count(), 0);
    assert_eq!(result.lines_for(TradeCode::Demolition).count(), 0);
}

#[test]
fn totals_match_their_lines() {
    let result = compute_takeoff(&apartment_project());
    for t in &result.totals {
        let sum: f64 = result
            .lines
            .iter()
            .filter(|l| l.trade_code == t.trade_code && l.unit == t.unit)
            .map(|l| l.quantity)
            .sum();
        assert!((sum - t.quantity).abs() < 0.005, "{} {}", t.trade_code, t.unit);
    }
    let mut keys: Vec<_> = result.totals.iter().map(|t| (t.trade_code, t.unit)).collect();
    let sorted = {
        let mut k = keys.clone();
        k.sort();
        k
    };
    assert_eq!(keys, sorted);
    keys.dedup();
    assert_eq!(keys.len(), result.totals.len());
}

#[test]
fn repeated_runs_are_identical() {
    let project = apartment_project();
    let first = serde_json::to_string(&compute_takeoff(&project)).unwrap();
    let second = serde_json::to_string(&compute_takeoff(&project)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn wet_bathroom_gets_tile_and_waterproofing() {
    let result = compute_takeoff(&apartment_project());
    assert!(!result.has_errors(), "{:?}", result.errors);

    let bath = result.surfaces.iter().find(|s| s.room_id == "bath").unwrap();
    let wet = bath.wet_area.as_ref().unwrap();
    assert!(approx(wet.floor_waterproof_area, 4.0));
    assert!(approx(wet.wall_waterproof_area, 14.4));
    assert!(approx(wet.curb_area, 0.035));
    assert!(approx(bath.wall_net_area, 17.73));

    // Floor 4.0 and walls 17.73, both + 5 %, rounded per line
    assert!((total(&result, TradeCode::Tile, QtyUnit::Sqm) - 22.82).abs() < 0.011);

    let waterproofing: Vec<_> = result
        .lines_for(TradeCode::Waterproof)
        .filter(|l| l.room_id.as_deref() == Some("bath"))
        .collect();
    assert_eq!(waterproofing.len(), 3);
    assert!(waterproofing.iter().all(|l| l.surcharge_rate == 15.0));

    // Tiled wet rooms get a tile baseboard instead of the dry one
    let baseboards: Vec<(&str, Option<&str>)> = result
        .lines_for(TradeCode::BaseboardMolding)
        .filter(|l| l.item_code != "CROWN-MOLDING")
        .map(|l| (l.item_code.as_str(), l.room_id.as_deref()))
        .collect();
    assert_eq!(
        baseboards,
        vec![("BASEBOARD", Some("bed")), ("TILE-BASEBOARD", Some("bath"))]
    );
}

#[test]
fn wet_room_gets_setting_materials_and_accessories() {
    let result = compute_takeoff(&apartment_project());
    assert!(!result.has_errors(), "{:?}", result.errors);

    let setting: Vec<_> = result
        .lines_for(TradeCode::Tile)
        .filter(|l| l.unit == QtyUnit::Kg)
        .collect();
    assert_eq!(setting.len(), 2);
    // 4.0 m² floor + 17.73 m² wall, tiled
    assert_eq!(setting[0].item_code, "TILE-ADHESIVE");
    assert!(approx(setting[0].raw_quantity, 108.65));
    assert_eq!(setting[0].surcharge_rate, 10.0);
    assert_eq!(setting[1].item_code, "TILE-GROUT");
    assert!((setting[1].raw_quantity - 10.865).abs() < 0.006);
    assert_eq!(setting[1].surcharge_rate, 15.0);
    assert!(setting.iter().all(|l| l.room_id.as_deref() == Some("bath")));

    // Mortar bed under the bathroom floor only
    let plaster: Vec<_> = result.lines_for(TradeCode::Plaster).collect();
    assert_eq!(plaster.len(), 1);
    assert_eq!(plaster[0].item_code, "PLASTER-FLOOR");
    assert!(approx(plaster[0].quantity, 4.4));

    assert!(approx(total(&result, TradeCode::Hardware, QtyUnit::Set), 1.0));
    // Perimeters 14.0 + 8.0 m + 10 %, plus the bedroom curtain box
    assert!(approx(total(&result, TradeCode::Hardware, QtyUnit::Lm), 26.2));

    // The wet room's door reveal is left to the tiler
    assert!(result
        .lines
        .iter()
        .filter(|l| l.item_code == "WALL-JAMB")
        .all(|l| l.room_id.as_deref() == Some("bed")));
}

#[test]
fn new_block_wall_is_plastered_on_both_faces() {
    let mut project = bedroom_project();
    let mut partition = wall("partition", (0.0, 5000.0), (3000.0, 5000.0));
    partition.construction_status = ConstructionStatus::New;
    partition.material = WallMaterial::Block;
    project.walls.push(partition);

    let result = compute_takeoff(&project);
    assert!(!result.has_errors(), "{:?}", result.errors);

    let plaster: Vec<_> = result.lines_for(TradeCode::Plaster).collect();
    assert_eq!(plaster.len(), 1);
    assert_eq!(plaster[0].item_code, "PLASTER-WALL");
    // 2 x 3.0 m x 2.4 m + 10 %
    assert!(approx(plaster[0].raw_quantity, 14.4));
    assert!(approx(plaster[0].quantity, 15.84));
    assert!(plaster[0].room_id.is_none());
}

#[test]
fn exterior_walls_are_insulated() {
    let mut project = bedroom_project();
    for wall in project
        .walls
        .iter_mut()
        .filter(|w| w.id == "bed-s" || w.id == "bed-n")
    {
        wall.is_exterior = true;
    }

    let result = compute_takeoff(&project);
    let insulation: Vec<_> = result.lines_for(TradeCode::Insulation).collect();
    assert_eq!(insulation.len(), 1);
    // South 7.71 m² net of the door, north 9.6 m²
    assert!(approx(insulation[0].raw_quantity, 17.31));
    assert_eq!(insulation[0].surcharge_rate, 5.0);
    assert!(insulation[0].basis.contains("bed-s, bed-n"));
}

#[test]
fn fixtures_and_utilities_are_counted_per_room() {
    let result = compute_takeoff(&apartment_project());

    let sanitary: Vec<_> = result.lines_for(TradeCode::Sanitary).collect();
    assert_eq!(sanitary.len(), 2);
    assert!(sanitary.iter().all(|l| l.unit == QtyUnit::Ea && l.quantity == 1.0));

    // Water supply and drain, once each despite two fixtures
    let utilities: Vec<_> = result
        .lines_for(TradeCode::Plumbing)
        .filter(|l| l.item_code == "UTILITY")
        .collect();
    assert_eq!(utilities.len(), 2);

    // 2 lights, 4 outlets, 2 switches, 1 panel
    assert!(approx(total(&result, TradeCode::Electrical, QtyUnit::Ea), 9.0));
}

#[test]
fn linear_cabinetry_also_reports_run_length() {
    let mut project = bedroom_project();
    project
        .fixtures
        .push(fixture("fx-wardrobe", FixtureType::Wardrobe, "bed"));
    let result = compute_takeoff(&project);

    assert!(approx(total(&result, TradeCode::Woodwork, QtyUnit::Ea), 1.0));
    assert!(approx(total(&result, TradeCode::Woodwork, QtyUnit::Lm), 0.6));
}

#[test]
fn opening_wider_than_wall_is_reported_and_excluded() {
    let mut project = bedroom_project();
    project.openings[0].width = 4500.0;
    let result = compute_takeoff(&project);

    let exceeds: Vec<_> = result
        .errors
        .iter()
        .filter(|e| {
            matches!(e, TakeoffError::OpeningExceedsWall { wall_id, .. } if wall_id == "bed-s")
        })
        .collect();
    assert_eq!(exceeds.len(), 1);

    let room = &result.surfaces[0];
    assert!(approx(room.wall_net_area, 24.0));
    assert!(result.lines.iter().all(|l| l.quantity >= 0.0));
}

#[test]
fn openings_that_fit_alone_but_not_together_exclude_the_wall() {
    let mut project = bedroom_project();
    project.openings[0].width = 3900.0;
    project.openings[0].height = 2000.0;
    project.openings.push(common::door("door-2", "bed-s", 3900.0, 2000.0));
    let result = compute_takeoff(&project);

    let exceeds: Vec<_> = result
        .errors
        .iter()
        .filter_map(|e| match e {
            TakeoffError::OpeningExceedsWall {
                wall_id,
                opening_ids,
                ..
            } => Some((wall_id.as_str(), opening_ids.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        exceeds,
        vec![("bed-s", vec!["door-1".to_string(), "door-2".to_string()])]
    );

    let room = &result.surfaces[0];
    let south = room.walls.iter().find(|w| w.wall_id == "bed-s").unwrap();
    assert!(south.net_area.is_none());
    assert!(approx(south.opening_area, 15.6));
    // Only the three untouched walls remain: 7.2 + 9.6 + 7.2
    assert!(approx(room.wall_net_area, 24.0));
}

#[test]
fn opening_positioned_off_its_wall_is_reported() {
    let mut project = bedroom_project();
    project.openings[0].position = Some(Point2D::new(2000.0, 500.0));
    let result = compute_takeoff(&project);

    assert!(result
        .errors
        .iter()
        .any(|e| e.error_code() == "OPENING_EXCEEDS_WALL"));
}

#[test]
fn dangling_references_are_reported_and_skipped() {
    let mut project = bedroom_project();
    project.openings[0].wall_id = "ghost".into();
    project
        .fixtures
        .push(fixture("fx-lost", FixtureType::Toilet, "nowhere"));
    let result = compute_takeoff(&project);

    let dangling: Vec<_> = result
        .errors
        .iter()
        .filter_map(|e| match e {
            TakeoffError::DanglingReference { id, target_id, .. } => {
                Some((id.as_str(), target_id.as_str()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(dangling, vec![("door-1", "ghost"), ("fx-lost", "nowhere")]);

    // The door no longer deducts from the wall
    assert!(approx(result.surfaces[0].wall_net_area, 33.6));
    assert_eq!(result.lines_for(TradeCode::Sanitary).count(), 0);
}

#[test]
fn unknown_fixture_is_a_warning_without_a_line() {
    let mut project = bedroom_project();
    project
        .fixtures
        .push(fixture("fx-odd", FixtureType::Unknown, "bed"));
    let result = compute_takeoff(&project);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].error_code(), "UNCLASSIFIED_ELEMENT");
    assert_eq!(result.errors[0].severity(), Severity::Warning);
    assert!(result.lines.iter().all(|l| l.item_code != "FIXTURE"));
}

#[test]
fn finish_specs_choose_the_trade_and_allowance() {
    let mut project = bedroom_project();
    project.finish_specs = vec![
        FinishSpec {
            id: "oak".into(),
            name: "Oak engineered".into(),
            category: FinishCategory::WoodFlooring,
        },
        FinishSpec {
            id: "tile".into(),
            name: "Porcelain".into(),
            category: FinishCategory::WallTile,
        },
    ];
    project.rooms[0].floor_finish_id = Some("oak".into());
    project.rooms[0].wall_finish_id = Some("tile".into());
    let result = compute_takeoff(&project);

    let floor = result
        .lines
        .iter()
        .find(|l| l.item_code == "FLOOR-FINISH")
        .unwrap();
    assert_eq!(floor.trade_code, TradeCode::Flooring);
    assert!(floor.description.contains("Oak engineered"));
    assert_eq!(floor.surcharge_rate, 5.0);

    let wall_line = result
        .lines
        .iter()
        .find(|l| l.item_code == "WALL-FINISH")
        .unwrap();
    assert_eq!(wall_line.trade_code, TradeCode::Tile);
}

#[test]
fn unknown_finish_warns_and_falls_back() {
    let mut project = bedroom_project();
    project.finish_specs = vec![FinishSpec {
        id: "mystery".into(),
        name: "Mystery".into(),
        category: FinishCategory::Unknown,
    }];
    project.rooms[0].floor_finish_id = Some("mystery".into());
    let result = compute_takeoff(&project);

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].severity(), Severity::Warning);
    let floor = result
        .lines
        .iter()
        .find(|l| l.item_code == "FLOOR-FINISH")
        .unwrap();
    assert_eq!(floor.trade_code, TradeCode::Flooring);
}

#[test]
fn self_intersecting_room_is_skipped() {
    let mut project = bedroom_project();
    project.rooms[0].polygon = vec![
        Point2D::new(0.0, 0.0),
        Point2D::new(4000.0, 3000.0),
        Point2D::new(4000.0, 0.0),
        Point2D::new(0.0, 3000.0),
    ];
    let result = compute_takeoff(&project);

    assert!(matches!(
        &result.errors[..],
        [TakeoffError::DegenerateGeometry { id, .. }] if id == "bed"
    ));
    assert!(result.surfaces.is_empty());
    assert!(result.lines.is_empty());
}

#[test]
fn demolition_and_new_work() {
    let mut project = bedroom_project();
    let mut old = wall("old", (10_000.0, 0.0), (12_000.0, 0.0));
    old.construction_status = ConstructionStatus::Demolish;
    let mut partition = wall("partition", (0.0, 5000.0), (3000.0, 5000.0));
    partition.construction_status = ConstructionStatus::New;
    partition.material = WallMaterial::Drywall;
    project.walls.extend([old, partition]);
    project.openings[0].construction_status = ConstructionStatus::New;

    let result = compute_takeoff(&project);
    assert!(!result.has_errors(), "{:?}", result.errors);

    assert!(approx(total(&result, TradeCode::Demolition, QtyUnit::Sqm), 4.8));
    // 4.8 m² x 0.03 m³/m²
    assert!(approx(total(&result, TradeCode::Demolition, QtyUnit::M3), 0.14));

    // 3.0 m x 2.4 m drywall + 5 %
    assert!(approx(total(&result, TradeCode::Woodwork, QtyUnit::Sqm), 7.56));

    let doors: Vec<_> = result.lines_for(TradeCode::DoorWindow).collect();
    assert_eq!(doors.len(), 1);
    assert_eq!(doors[0].unit, QtyUnit::Set);
    assert_eq!(doors[0].description, "Single swing door 900 x 2100");
}

#[test]
fn demolished_door_in_demolished_wall_is_billed_once() {
    let mut project = bedroom_project();
    let mut old = wall("old", (10_000.0, 0.0), (14_000.0, 0.0));
    old.construction_status = ConstructionStatus::Demolish;
    project.walls.push(old);
    let mut old_door = common::door("old-door", "old", 900.0, 2100.0);
    old_door.construction_status = ConstructionStatus::Demolish;
    project.openings.push(old_door);

    let result = compute_takeoff(&project);
    assert!(!result.has_errors(), "{:?}", result.errors);

    let demo: Vec<(&str, f64)> = result
        .lines_for(TradeCode::Demolition)
        .map(|l| (l.item_code.as_str(), l.quantity))
        .collect();
    assert_eq!(demo.len(), 3);
    assert_eq!(demo[0].0, "DEMO-WALL");
    assert!(approx(demo[0].1, 7.71));
    assert_eq!(demo[1].0, "DEMO-OPENING");
    assert!(approx(demo[1].1, 1.89));
    assert_eq!(demo[2].0, "DEMO-WASTE");

    // Wall and door together cover the 4.0 m x 2.4 m wall exactly once
    assert!(approx(total(&result, TradeCode::Demolition, QtyUnit::Sqm), 9.6));
    // 9.6 m² x 0.03 m³/m²
    assert!(approx(total(&result, TradeCode::Demolition, QtyUnit::M3), 0.29));
}

#[test]
fn duplicate_wall_ids_resolve_to_the_first_wall() {
    let mut project = bedroom_project();
    let mut twin = wall("bed-s", (0.0, 0.0), (8000.0, 0.0));
    twin.construction_status = ConstructionStatus::Demolish;
    project.walls.push(twin);

    let result = compute_takeoff(&project);

    let south = result.surfaces[0]
        .walls
        .iter()
        .find(|w| w.wall_id == "bed-s")
        .unwrap();
    assert!(approx(south.length, 4.0));
    assert!(approx(result.surfaces[0].wall_net_area, 31.71));
    // The shadowed twin is neither measured nor demolished
    assert_eq!(result.lines_for(TradeCode::Demolition).count(), 0);
}

#[test]
fn columns_recess_and_floor_heating() {
    let mut project = bedroom_project();
    project.structures.push(Structure {
        id: "col-1".into(),
        kind: StructureKind::Column,
        section_width: 400.0,
        section_depth: 400.0,
        affected_room_ids: vec!["bed".into()],
    });
    project.rooms[0].heating_type = Some(HeatingType::Ondol);
    project.rooms[0].ceiling_recess = Some(CeilingRecess {
        polygon: vec![
            Point2D::new(1000.0, 1000.0),
            Point2D::new(3000.0, 1000.0),
            Point2D::new(3000.0, 2000.0),
            Point2D::new(1000.0, 2000.0),
        ],
        depth: 150.0,
        has_indirect_lighting: true,
    });
    let result = compute_takeoff(&project);
    assert!(!result.has_errors(), "{:?}", result.errors);

    let room = &result.surfaces[0];
    assert!(approx(room.floor_net_area, 11.84));
    assert!(approx(room.ceiling_recess_area, 2.0));
    assert!(approx(room.ceiling_recess_side_area, 0.9));

    assert!(approx(total(&result, TradeCode::Lighting, QtyUnit::Sqm), 2.0));
    assert!(approx(total(&result, TradeCode::Plumbing, QtyUnit::Lot), 1.0));
}

#[test]
fn surcharge_can_be_switched_off() {
    let engine = TakeoffEngine::new(TakeoffConfig {
        apply_surcharge: false,
        ..TakeoffConfig::default()
    });
    let result = engine.compute(&apartment_project());

    assert!(!result.lines.is_empty());
    assert!(result
        .lines
        .iter()
        .all(|l| l.quantity == l.raw_quantity && l.surcharge_rate == 0.0));
}
