//! Shared floor plan fixtures
#![allow(dead_code)]

use blueprintx_takeoff::domain::{
    BoundingBox, ConstructionStatus, Fixture, FixtureType, FloorPlanProject, Opening, OpeningKind,
    OpeningSpec, OpeningType, Point2D, Room, RoomType, Wall, WallMaterial,
};

pub const TOLERANCE: f64 = 1e-6;

pub fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < TOLERANCE
}

pub fn wall(id: &str, from: (f64, f64), to: (f64, f64)) -> Wall {
    Wall {
        id: id.into(),
        start: Point2D::new(from.0, from.1),
        end: Point2D::new(to.0, to.1),
        thickness: 150.0,
        height: 2400.0,
        material: WallMaterial::Concrete,
        is_exterior: false,
        construction_status: ConstructionStatus::Existing,
    }
}

pub fn door(id: &str, wall_id: &str, width: f64, height: f64) -> Opening {
    Opening {
        id: id.into(),
        wall_id: wall_id.into(),
        opening_type: OpeningType::SingleDoor,
        width,
        height,
        sill_height: 0.0,
        spec: OpeningSpec {
            kind: OpeningKind::Door,
        },
        construction_status: ConstructionStatus::Existing,
        position: None,
    }
}

pub fn fixture(id: &str, fixture_type: FixtureType, room_id: &str) -> Fixture {
    Fixture {
        id: id.into(),
        fixture_type,
        room_id: room_id.into(),
        bounding_box: BoundingBox {
            x: 100.0,
            y: 100.0,
            width: 600.0,
            height: 400.0,
        },
        construction_status: ConstructionStatus::New,
        requires_water_supply: false,
        requires_drain: false,
        requires_gas: false,
        requires_electrical: false,
    }
}

/// Axis-aligned room with its four bounding walls `{prefix}-s/e/n/w`
pub fn rect_room(
    id: &str,
    room_type: RoomType,
    origin: (f64, f64),
    w: f64,
    h: f64,
) -> (Room, Vec<Wall>) {
    let (x, y) = origin;
    let walls = vec![
        wall(&format!("{}-s", id), (x, y), (x + w, y)),
        wall(&format!("{}-e", id), (x + w, y), (x + w, y + h)),
        wall(&format!("{}-n", id), (x + w, y + h), (x, y + h)),
        wall(&format!("{}-w", id), (x, y + h), (x, y)),
    ];
    let room = Room {
        id: id.into(),
        name: id.to_uppercase(),
        room_type,
        polygon: vec![
            Point2D::new(x, y),
            Point2D::new(x + w, y),
            Point2D::new(x + w, y + h),
            Point2D::new(x, y + h),
        ],
        ceiling_height: 2400.0,
        is_wet_area: false,
        floor_level_offset: 0.0,
        boundary_wall_ids: walls.iter().map(|w| w.id.clone()).collect(),
        heating_type: None,
        floor_finish_id: None,
        wall_finish_id: None,
        ceiling_finish_id: None,
        baseboard: None,
        ceiling_recess: None,
    };
    (room, walls)
}

/// One 4000 x 3000 mm bedroom with a 900 x 2100 mm door on its 4000 mm
/// south wall
pub fn bedroom_project() -> FloorPlanProject {
    let (room, walls) = rect_room("bed", RoomType::Bedroom, (0.0, 0.0), 4000.0, 3000.0);
    FloorPlanProject {
        id: "proj-1".into(),
        name: "Bedroom refresh".into(),
        total_area: 12.0,
        rooms: vec![room],
        walls,
        openings: vec![door("door-1", "bed-s", 900.0, 2100.0)],
        fixtures: vec![],
        finish_specs: vec![],
        structures: vec![],
    }
}

/// Bedroom plus a 2000 x 2000 mm wet bathroom stepped down 50 mm
pub fn apartment_project() -> FloorPlanProject {
    let mut project = bedroom_project();

    let (mut bath, bath_walls) =
        rect_room("bath", RoomType::Bathroom, (4000.0, 0.0), 2000.0, 2000.0);
    bath.is_wet_area = true;
    bath.floor_level_offset = -50.0;
    project.rooms.push(bath);
    project.walls.extend(bath_walls);
    project.openings.push(door("door-2", "bath-w", 700.0, 2100.0));

    let mut toilet = fixture("fx-toilet", FixtureType::Toilet, "bath");
    toilet.requires_water_supply = true;
    toilet.requires_drain = true;
    let mut basin = fixture("fx-basin", FixtureType::Basin, "bath");
    basin.requires_water_supply = true;
    basin.requires_drain = true;
    project.fixtures.extend([toilet, basin]);
    project.total_area = 16.0;

    project
}
