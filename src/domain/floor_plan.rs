//! Floor plan domain types
//!
//! The BIM model consumed by the takeoff engine: rooms, walls, openings,
//! fixtures, finish specs and structural elements. Coordinates and sizes are
//! millimetres in a shared plan space; entities reference each other by id.

use serde::{Deserialize, Serialize};

/// Identifier of an entity inside one project.
pub type EntityId = String;

// ============================================================================
// Geometry primitives
// ============================================================================

/// A coordinate in plan space (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Closed polygon; vertex order defines winding and must be preserved.
pub type Polygon2D = Vec<Point2D>;

/// Axis-aligned bounding box (mm).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Footprint in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

// ============================================================================
// Shared enums
// ============================================================================

/// What happens to an element during the renovation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstructionStatus {
    Existing,
    Demolish,
    New,
}

impl Default for ConstructionStatus {
    fn default() -> Self {
        Self::New
    }
}

impl std::fmt::Display for ConstructionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstructionStatus::Existing => write!(f, "existing"),
            ConstructionStatus::Demolish => write!(f, "demolish"),
            ConstructionStatus::New => write!(f, "new"),
        }
    }
}

// ============================================================================
// Rooms
// ============================================================================

/// Semantic room type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    LivingRoom,
    Bedroom,
    MasterBedroom,
    Kitchen,
    Bathroom,
    Entrance,
    Balcony,
    Utility,
    Corridor,
    #[serde(rename = "DRESSROOM", alias = "DRESS_ROOM")]
    DressRoom,
    Study,
    Dining,
    #[serde(other)]
    Unknown,
}

impl RoomType {
    /// Rooms that get a second ceiling light point.
    pub fn is_gathering_space(&self) -> bool {
        matches!(self, Self::LivingRoom | Self::Kitchen | Self::Dining)
    }

    /// Rooms expected to have a window dressed with a curtain box
    pub fn takes_curtain_box(&self) -> bool {
        matches!(
            self,
            Self::LivingRoom | Self::Bedroom | Self::MasterBedroom | Self::Study
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatingType {
    Ondol,
    Radiator,
    None,
}

/// Baseboard specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseboardSpec {
    /// mm
    pub height: f64,
    pub material: String,
}

/// Recessed ceiling (tray) inside a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeilingRecess {
    pub polygon: Polygon2D,
    /// mm
    pub depth: f64,
    #[serde(default)]
    pub has_indirect_lighting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub polygon: Polygon2D,
    pub ceiling_height: f64,
    #[serde(default)]
    pub is_wet_area: bool,
    /// Step-down of wet areas (mm, usually negative)
    #[serde(default)]
    pub floor_level_offset: f64,
    /// Back-references to bounding walls, not ownership
    #[serde(default)]
    pub boundary_wall_ids: Vec<EntityId>,
    #[serde(default)]
    pub heating_type: Option<HeatingType>,
    #[serde(default)]
    pub floor_finish_id: Option<EntityId>,
    #[serde(default)]
    pub wall_finish_id: Option<EntityId>,
    #[serde(default)]
    pub ceiling_finish_id: Option<EntityId>,
    #[serde(default)]
    pub baseboard: Option<BaseboardSpec>,
    #[serde(default)]
    pub ceiling_recess: Option<CeilingRecess>,
}

impl Room {
    /// Display label used in calculation bases
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

// ============================================================================
// Walls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WallMaterial {
    Concrete,
    Block,
    Drywall,
    Wood,
}

impl std::fmt::Display for WallMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WallMaterial::Concrete => write!(f, "concrete"),
            WallMaterial::Block => write!(f, "block"),
            WallMaterial::Drywall => write!(f, "drywall"),
            WallMaterial::Wood => write!(f, "wood"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: EntityId,
    pub start: Point2D,
    pub end: Point2D,
    pub thickness: f64,
    pub height: f64,
    pub material: WallMaterial,
    #[serde(default)]
    pub is_exterior: bool,
    #[serde(default)]
    pub construction_status: ConstructionStatus,
}

// ============================================================================
// Openings
// ============================================================================

/// Door and window subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpeningType {
    SingleDoor,
    DoubleDoor,
    SlidingDoor,
    PocketDoor,
    FoldingDoor,
    EntranceDoor,
    FireDoor,
    Window,
    SlidingWindow,
    FixedWindow,
    BalconyWindow,
    BalconyDoor,
    #[serde(other)]
    Unknown,
}

impl OpeningType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SingleDoor => "Single swing door",
            Self::DoubleDoor => "Double swing door",
            Self::SlidingDoor => "Sliding door",
            Self::PocketDoor => "Pocket door",
            Self::FoldingDoor => "Folding door",
            Self::EntranceDoor => "Entrance door",
            Self::FireDoor => "Fire door",
            Self::Window => "Window",
            Self::SlidingWindow => "Sliding window",
            Self::FixedWindow => "Fixed window",
            Self::BalconyWindow => "Balcony window",
            Self::BalconyDoor => "Balcony door",
            Self::Unknown => "Opening",
        }
    }
}

/// Coarse opening kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpeningKind {
    Door,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSpec {
    pub kind: OpeningKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opening {
    pub id: EntityId,
    pub wall_id: EntityId,
    #[serde(rename = "type")]
    pub opening_type: OpeningType,
    pub width: f64,
    pub height: f64,
    /// 0 for doors
    #[serde(default)]
    pub sill_height: f64,
    pub spec: OpeningSpec,
    #[serde(default)]
    pub construction_status: ConstructionStatus,
    /// Centre of the opening on its wall, when the recognizer provides it
    #[serde(default)]
    pub position: Option<Point2D>,
}

impl Opening {
    pub fn kind(&self) -> OpeningKind {
        self.spec.kind
    }

    /// Openings that interrupt a baseboard run
    pub fn reaches_floor(&self) -> bool {
        self.sill_height <= 0.0
    }

    /// mm²
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FixtureType {
    Toilet,
    Bidet,
    Basin,
    BasinCabinet,
    Bathtub,
    ShowerBooth,
    ShowerHead,
    KitchenSink,
    KitchenUpperCabinet,
    KitchenLowerCabinet,
    KitchenCounter,
    GasRange,
    Induction,
    RangeHood,
    ShoeCabinet,
    Wardrobe,
    AcIndoor,
    Boiler,
    #[serde(other)]
    Unknown,
}

impl FixtureType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Toilet => "Toilet",
            Self::Bidet => "Bidet",
            Self::Basin => "Wash basin",
            Self::BasinCabinet => "Vanity cabinet",
            Self::Bathtub => "Bathtub",
            Self::ShowerBooth => "Shower booth",
            Self::ShowerHead => "Shower head",
            Self::KitchenSink => "Kitchen sink",
            Self::KitchenUpperCabinet => "Kitchen upper cabinet",
            Self::KitchenLowerCabinet => "Kitchen lower cabinet",
            Self::KitchenCounter => "Kitchen countertop",
            Self::GasRange => "Gas range",
            Self::Induction => "Induction cooktop",
            Self::RangeHood => "Range hood",
            Self::ShoeCabinet => "Built-in shoe cabinet",
            Self::Wardrobe => "Built-in wardrobe",
            Self::AcIndoor => "Air conditioner indoor unit",
            Self::Boiler => "Boiler",
            Self::Unknown => "Unknown fixture",
        }
    }

    /// Fixtures ordered and priced by run length as well as by count
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            Self::KitchenUpperCabinet
                | Self::KitchenLowerCabinet
                | Self::KitchenCounter
                | Self::ShoeCabinet
                | Self::Wardrobe
        )
    }
}

impl std::fmt::Display for FixtureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub fixture_type: FixtureType,
    pub room_id: EntityId,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub construction_status: ConstructionStatus,
    #[serde(default)]
    pub requires_water_supply: bool,
    #[serde(default)]
    pub requires_drain: bool,
    #[serde(default)]
    pub requires_gas: bool,
    #[serde(default)]
    pub requires_electrical: bool,
}

// ============================================================================
// Finishes and structures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishCategory {
    WoodFlooring,
    LaminateFlooring,
    VinylFlooring,
    TileFlooring,
    WallTile,
    Wallpaper,
    Paint,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishSpec {
    pub id: EntityId,
    pub name: String,
    pub category: FinishCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureKind {
    Column,
    Beam,
}

/// Column or beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Structure {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: StructureKind,
    pub section_width: f64,
    pub section_depth: f64,
    #[serde(default)]
    pub affected_room_ids: Vec<EntityId>,
}

// ============================================================================
// Project
// ============================================================================

/// Aggregate root of the BIM model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPlanProject {
    pub id: String,
    pub name: String,
    /// Declared total area (m²)
    #[serde(default)]
    pub total_area: f64,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub openings: Vec<Opening>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub finish_specs: Vec<FinishSpec>,
    #[serde(default)]
    pub structures: Vec<Structure>,
}
