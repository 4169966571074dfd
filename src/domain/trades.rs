//! Trade codes and the classification table
//!
//! Every takeoff line is routed to exactly one trade through a static,
//! versioned lookup. Categories missing from the table are reported as
//! unclassified instead of being dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::floor_plan::{FinishCategory, FixtureType, OpeningKind, WallMaterial};

/// Construction trade codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeCode {
    #[serde(rename = "01_DEMOLITION")]
    Demolition,
    #[serde(rename = "02_MASONRY")]
    Masonry,
    #[serde(rename = "03_PLASTER")]
    Plaster,
    #[serde(rename = "04_WATERPROOF")]
    Waterproof,
    #[serde(rename = "05_TILE")]
    Tile,
    #[serde(rename = "06_WOODWORK")]
    Woodwork,
    #[serde(rename = "07_FLOORING")]
    Flooring,
    #[serde(rename = "08_WALLPAPER_PAINT")]
    WallpaperPaint,
    #[serde(rename = "09_CEILING")]
    Ceiling,
    #[serde(rename = "10_DOOR_WINDOW")]
    DoorWindow,
    #[serde(rename = "11_HARDWARE")]
    Hardware,
    #[serde(rename = "12_PLUMBING")]
    Plumbing,
    #[serde(rename = "13_SANITARY")]
    Sanitary,
    #[serde(rename = "14_ELECTRICAL")]
    Electrical,
    #[serde(rename = "15_FIXTURE")]
    Fixture,
    #[serde(rename = "16_BASEBOARD_MOLDING")]
    BaseboardMolding,
    #[serde(rename = "17_CLEANUP")]
    Cleanup,
    #[serde(rename = "18_PROTECTION")]
    Protection,
    #[serde(rename = "19_INSULATION")]
    Insulation,
    #[serde(rename = "20_HVAC")]
    Hvac,
    #[serde(rename = "21_LIGHTING")]
    Lighting,
    #[serde(rename = "22_KITCHEN_CABINETRY")]
    KitchenCabinetry,
}

impl TradeCode {
    pub const ALL: [TradeCode; 22] = [
        TradeCode::Demolition,
        TradeCode::Masonry,
        TradeCode::Plaster,
        TradeCode::Waterproof,
        TradeCode::Tile,
        TradeCode::Woodwork,
        TradeCode::Flooring,
        TradeCode::WallpaperPaint,
        TradeCode::Ceiling,
        TradeCode::DoorWindow,
        TradeCode::Hardware,
        TradeCode::Plumbing,
        TradeCode::Sanitary,
        TradeCode::Electrical,
        TradeCode::Fixture,
        TradeCode::BaseboardMolding,
        TradeCode::Cleanup,
        TradeCode::Protection,
        TradeCode::Insulation,
        TradeCode::Hvac,
        TradeCode::Lighting,
        TradeCode::KitchenCabinetry,
    ];

    /// Wire code, e.g. `05_TILE`
    pub fn code(&self) -> &'static str {
        match self {
            Self::Demolition => "01_DEMOLITION",
            Self::Masonry => "02_MASONRY",
            Self::Plaster => "03_PLASTER",
            Self::Waterproof => "04_WATERPROOF",
            Self::Tile => "05_TILE",
            Self::Woodwork => "06_WOODWORK",
            Self::Flooring => "07_FLOORING",
            Self::WallpaperPaint => "08_WALLPAPER_PAINT",
            Self::Ceiling => "09_CEILING",
            Self::DoorWindow => "10_DOOR_WINDOW",
            Self::Hardware => "11_HARDWARE",
            Self::Plumbing => "12_PLUMBING",
            Self::Sanitary => "13_SANITARY",
            Self::Electrical => "14_ELECTRICAL",
            Self::Fixture => "15_FIXTURE",
            Self::BaseboardMolding => "16_BASEBOARD_MOLDING",
            Self::Cleanup => "17_CLEANUP",
            Self::Protection => "18_PROTECTION",
            Self::Insulation => "19_INSULATION",
            Self::Hvac => "20_HVAC",
            Self::Lighting => "21_LIGHTING",
            Self::KitchenCabinetry => "22_KITCHEN_CABINETRY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Demolition => "Demolition",
            Self::Masonry => "Masonry",
            Self::Plaster => "Plastering",
            Self::Waterproof => "Waterproofing",
            Self::Tile => "Tiling",
            Self::Woodwork => "Carpentry",
            Self::Flooring => "Flooring",
            Self::WallpaperPaint => "Wallpaper & paint",
            Self::Ceiling => "Ceiling",
            Self::DoorWindow => "Doors & windows",
            Self::Hardware => "Metalwork & hardware",
            Self::Plumbing => "Plumbing & piping",
            Self::Sanitary => "Sanitary ware",
            Self::Electrical => "Electrical wiring",
            Self::Fixture => "Fixed equipment",
            Self::BaseboardMolding => "Baseboard & molding",
            Self::Cleanup => "Cleanup",
            Self::Protection => "Protection & covering",
            Self::Insulation => "Insulation",
            Self::Hvac => "HVAC",
            Self::Lighting => "Lighting",
            Self::KitchenCabinetry => "Kitchen cabinetry",
        }
    }
}

impl std::fmt::Display for TradeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Element categories
// ============================================================================

/// Surfaces and derived quantities produced by the geometry pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceKind {
    DryFloor,
    FloorUnderlay,
    WetFloor,
    DryWall,
    WetWall,
    Plaster,
    TileSetting,
    Ceiling,
    CeilingRecessSide,
    CeilingRecessTrim,
    Baseboard,
    TileBaseboard,
    CrownMolding,
    Waterproofing,
    BathAccessory,
    Caulking,
    CurtainBox,
    Insulation,
    Cleanup,
    SiteProtection,
}

/// Utility rough-ins requested by fixtures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UtilityKind {
    WaterSupply,
    Drain,
    Gas,
    Electrical,
    FloorHeating,
}

impl UtilityKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WaterSupply => "Water supply rough-in",
            Self::Drain => "Drain rough-in",
            Self::Gas => "Gas connection",
            Self::Electrical => "Dedicated electrical circuit",
            Self::FloorHeating => "Floor heating piping",
        }
    }
}

/// Anything the takeoff needs to route to a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementCategory {
    Surface(SurfaceKind),
    Finish(FinishCategory),
    Fixture(FixtureType),
    Utility(UtilityKind),
    WallConstruction(WallMaterial),
    Opening(OpeningKind),
    ElectricalPoint,
    Demolition,
}

impl std::fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Surface(kind) => write!(f, "surface:{:?}", kind),
            Self::Finish(category) => write!(f, "finish:{:?}", category),
            Self::Fixture(fixture) => write!(f, "fixture:{:?}", fixture),
            Self::Utility(utility) => write!(f, "utility:{:?}", utility),
            Self::WallConstruction(material) => write!(f, "wall:{}", material),
            Self::Opening(kind) => write!(f, "opening:{:?}", kind),
            Self::ElectricalPoint => write!(f, "electrical-point"),
            Self::Demolition => write!(f, "demolition"),
        }
    }
}

// ============================================================================
// Classification table
// ============================================================================

/// Static category → trade lookup
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTable {
    pub version: u32,
    entries: BTreeMap<ElementCategory, TradeCode>,
}

impl ClassificationTable {
    pub const STANDARD_VERSION: u32 = 1;

    /// Empty table; every lookup fails closed
    pub fn empty(version: u32) -> Self {
        Self {
            version,
            entries: BTreeMap::new(),
        }
    }

    /// The standard residential renovation mapping
    pub fn standard() -> Self {
        use ElementCategory as E;

        let entries: [(ElementCategory, TradeCode); 54] = [
            (E::Surface(SurfaceKind::DryFloor), TradeCode::Flooring),
            (E::Surface(SurfaceKind::FloorUnderlay), TradeCode::Flooring),
            (E::Surface(SurfaceKind::WetFloor), TradeCode::Tile),
            (E::Surface(SurfaceKind::DryWall), TradeCode::WallpaperPaint),
            (E::Surface(SurfaceKind::WetWall), TradeCode::Tile),
            (E::Surface(SurfaceKind::Plaster), TradeCode::Plaster),
            (E::Surface(SurfaceKind::TileSetting), TradeCode::Tile),
            (E::Surface(SurfaceKind::Ceiling), TradeCode::Ceiling),
            (E::Surface(SurfaceKind::CeilingRecessSide), TradeCode::Ceiling),
            (E::Surface(SurfaceKind::CeilingRecessTrim), TradeCode::Lighting),
            (E::Surface(SurfaceKind::Baseboard), TradeCode::BaseboardMolding),
            (E::Surface(SurfaceKind::TileBaseboard), TradeCode::BaseboardMolding),
            (E::Surface(SurfaceKind::CrownMolding), TradeCode::BaseboardMolding),
            (E::Surface(SurfaceKind::Waterproofing), TradeCode::Waterproof),
            (E::Surface(SurfaceKind::BathAccessory), TradeCode::Hardware),
            (E::Surface(SurfaceKind::Caulking), TradeCode::Hardware),
            (E::Surface(SurfaceKind::CurtainBox), TradeCode::Hardware),
            (E::Surface(SurfaceKind::Insulation), TradeCode::Insulation),
            (E::Surface(SurfaceKind::Cleanup), TradeCode::Cleanup),
            (E::Surface(SurfaceKind::SiteProtection), TradeCode::Protection),
            (E::Finish(FinishCategory::WoodFlooring), TradeCode::Flooring),
            (E::Finish(FinishCategory::LaminateFlooring), TradeCode::Flooring),
            (E::Finish(FinishCategory::VinylFlooring), TradeCode::Flooring),
            (E::Finish(FinishCategory::TileFlooring), TradeCode::Tile),
            (E::Finish(FinishCategory::WallTile), TradeCode::Tile),
            (E::Finish(FinishCategory::Wallpaper), TradeCode::WallpaperPaint),
            (E::Finish(FinishCategory::Paint), TradeCode::WallpaperPaint),
            (E::Fixture(FixtureType::Toilet), TradeCode::Sanitary),
            (E::Fixture(FixtureType::Bidet), TradeCode::Sanitary),
            (E::Fixture(FixtureType::Basin), TradeCode::Sanitary),
            (E::Fixture(FixtureType::BasinCabinet), TradeCode::Sanitary),
            (E::Fixture(FixtureType::Bathtub), TradeCode::Sanitary),
            (E::Fixture(FixtureType::ShowerBooth), TradeCode::Sanitary),
            (E::Fixture(FixtureType::ShowerHead), TradeCode::Sanitary),
            (E::Fixture(FixtureType::KitchenSink), TradeCode::KitchenCabinetry),
            (E::Fixture(FixtureType::KitchenUpperCabinet), TradeCode::KitchenCabinetry),
            (E::Fixture(FixtureType::KitchenLowerCabinet), TradeCode::KitchenCabinetry),
            (E::Fixture(FixtureType::KitchenCounter), TradeCode::KitchenCabinetry),
            (E::Fixture(FixtureType::GasRange), TradeCode::Fixture),
            (E::Fixture(FixtureType::Induction), TradeCode::Fixture),
            (E::Fixture(FixtureType::RangeHood), TradeCode::Fixture),
            (E::Fixture(FixtureType::ShoeCabinet), TradeCode::Woodwork),
            (E::Fixture(FixtureType::Wardrobe), TradeCode::Woodwork),
            (E::Fixture(FixtureType::AcIndoor), TradeCode::Hvac),
            (E::Fixture(FixtureType::Boiler), TradeCode::Plumbing),
            (E::Utility(UtilityKind::WaterSupply), TradeCode::Plumbing),
            (E::Utility(UtilityKind::Drain), TradeCode::Plumbing),
            (E::Utility(UtilityKind::Gas), TradeCode::Plumbing),
            (E::Utility(UtilityKind::Electrical), TradeCode::Electrical),
            (E::Utility(UtilityKind::FloorHeating), TradeCode::Plumbing),
            (E::WallConstruction(WallMaterial::Concrete), TradeCode::Masonry),
            (E::WallConstruction(WallMaterial::Block), TradeCode::Masonry),
            (E::WallConstruction(WallMaterial::Drywall), TradeCode::Woodwork),
            (E::WallConstruction(WallMaterial::Wood), TradeCode::Woodwork),
        ];

        let mut table = Self {
            version: Self::STANDARD_VERSION,
            entries: entries.into_iter().collect(),
        };
        table.insert(E::Opening(OpeningKind::Door), TradeCode::DoorWindow);
        table.insert(E::Opening(OpeningKind::Window), TradeCode::DoorWindow);
        table.insert(E::ElectricalPoint, TradeCode::Electrical);
        table.insert(E::Demolition, TradeCode::Demolition);
        table
    }

    /// Add or replace a mapping
    pub fn insert(&mut self, category: ElementCategory, trade: TradeCode) {
        self.entries.insert(category, trade);
    }

    /// Look up the trade for a category; `None` means unclassified
    pub fn classify(&self, category: ElementCategory) -> Option<TradeCode> {
        self.entries.get(&category).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::standard()
    }
}
