use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::domain::{ClassificationTable, QtyUnit, TradeCode};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

/// Process settings for the command-line runner
#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,

    // Reference data
    pub reference_data_path: Option<PathBuf>,

    // Exit non-zero when a takeoff reports errors
    pub strict: bool,

    pub default_project_name: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));

        let reference_data_path = env::var("TAKEOFF_REFERENCE_DATA")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let strict = match env::var("TAKEOFF_STRICT") {
            Ok(value) => parse_bool(&value)
                .with_context(|| format!("TAKEOFF_STRICT must be a boolean, got {:?}", value))?,
            Err(_) => false,
        };

        let default_project_name = env::var("TAKEOFF_PROJECT_NAME")
            .unwrap_or_else(|_| ScheduleConfig::DEFAULT_PROJECT_NAME.to_string());

        Ok(Settings {
            env,
            reference_data_path,
            strict,
            default_project_name,
        })
    }

    /// Standard reference data, overridden by the configured file if any
    pub fn engine_config(&self) -> Result<EngineConfig> {
        match &self.reference_data_path {
            Some(path) => EngineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load reference data from {}", path.display())),
            None => Ok(EngineConfig::default()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Reference data
// ============================================================================

/// All reference data the engines need, passed in explicitly
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub takeoff: TakeoffConfig,
    pub schedule: ScheduleConfig,
}

impl EngineConfig {
    /// Load a (possibly partial) override file; missing sections keep defaults
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.validate()?;

        tracing::debug!(
            path = %path.display(),
            phases = config.schedule.phases.len(),
            duration_rates = config.schedule.duration_rates.len(),
            "Loaded reference data"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.takeoff.validate()?;
        self.schedule.validate()
    }
}

/// Waste allowances in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurchargeRates {
    pub flooring_wood: f64,
    pub flooring_laminate: f64,
    pub flooring_vinyl: f64,
    pub flooring_tile: f64,
    pub floor_underlay: f64,
    pub tile: f64,
    pub waterproof: f64,
    pub wallpaper: f64,
    pub paint: f64,
    pub ceiling_board: f64,
    pub baseboard: f64,
    pub masonry: f64,
    pub drywall: f64,
    pub plaster: f64,
    pub tile_adhesive: f64,
    pub tile_grout: f64,
    pub molding: f64,
    pub caulking: f64,
    pub insulation: f64,
}

impl Default for SurchargeRates {
    fn default() -> Self {
        Self {
            flooring_wood: 5.0,
            flooring_laminate: 5.0,
            flooring_vinyl: 10.0,
            flooring_tile: 5.0,
            floor_underlay: 3.0,
            tile: 5.0,
            waterproof: 15.0,
            wallpaper: 10.0,
            paint: 10.0,
            ceiling_board: 5.0,
            baseboard: 5.0,
            masonry: 5.0,
            drywall: 5.0,
            plaster: 10.0,
            tile_adhesive: 10.0,
            tile_grout: 15.0,
            molding: 5.0,
            caulking: 10.0,
            insulation: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TakeoffConfig {
    pub apply_surcharge: bool,
    pub surcharge: SurchargeRates,
    /// Height of the waterproofing band on wet-area walls (mm)
    pub waterproof_band_height_mm: f64,
    /// Debris volume per m² of demolished surface
    pub demolition_waste_m3_per_sqm: f64,
    /// How far a positioned opening may sit off its wall centreline (mm)
    pub opening_position_tolerance_mm: f64,
    /// Tile adhesive per m² of tiled surface (kg)
    pub tile_adhesive_kg_per_sqm: f64,
    /// Tile grout per m² of tiled surface (kg)
    pub tile_grout_kg_per_sqm: f64,
    /// Curtain box run allowed per living room, bedroom or study (m)
    pub curtain_box_m_per_room: f64,
    #[serde(skip)]
    pub classification: ClassificationTable,
}

impl Default for TakeoffConfig {
    fn default() -> Self {
        Self {
            apply_surcharge: true,
            surcharge: SurchargeRates::default(),
            waterproof_band_height_mm: 1800.0,
            demolition_waste_m3_per_sqm: 0.03,
            opening_position_tolerance_mm: 50.0,
            tile_adhesive_kg_per_sqm: 5.0,
            tile_grout_kg_per_sqm: 0.5,
            curtain_box_m_per_room: 2.0,
            classification: ClassificationTable::standard(),
        }
    }
}

impl TakeoffConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.waterproof_band_height_mm < 0.0 {
            return Err(ConfigError::Invalid(
                "waterproofBandHeightMm must not be negative".to_string(),
            ));
        }
        if self.demolition_waste_m3_per_sqm < 0.0 {
            return Err(ConfigError::Invalid(
                "demolitionWasteM3PerSqm must not be negative".to_string(),
            ));
        }
        let per_unit = [
            ("tileAdhesiveKgPerSqm", self.tile_adhesive_kg_per_sqm),
            ("tileGroutKgPerSqm", self.tile_grout_kg_per_sqm),
            ("curtainBoxMPerRoom", self.curtain_box_m_per_room),
        ];
        if let Some((name, _)) = per_unit.iter().find(|(_, value)| *value < 0.0) {
            return Err(ConfigError::Invalid(format!("{} must not be negative", name)));
        }
        Ok(())
    }
}

/// One phase of the default construction sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTemplate {
    pub name: String,
    pub trade_codes: Vec<TradeCode>,
    /// Used when no quantity data exists for the phase
    pub default_duration_days: u32,
    /// Share of the window in fit-to-window scheduling
    pub base_weight: f64,
}

/// Days of work per unit of quantity for one trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationRate {
    pub trade_code: TradeCode,
    pub unit: QtyUnit,
    pub days_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScheduleConfig {
    /// Ordered; each phase depends on the one before it
    pub phases: Vec<PhaseTemplate>,
    pub duration_rates: Vec<DurationRate>,
    /// Indexed by phase order - 1
    pub palette: Vec<String>,
    pub fallback_color: String,
    /// Template share when blending with quantity-derived weights
    pub base_weight_ratio: f64,
}

impl ScheduleConfig {
    pub const DEFAULT_PROJECT_NAME: &'static str = "Interior renovation";
    pub const MIN_PHASE_DAYS: u32 = 1;
    /// Ceiling for a quantity-derived phase length
    pub const MAX_PHASE_DAYS: u32 = 3650;

    pub fn duration_rate(&self, trade: TradeCode, unit: QtyUnit) -> Option<f64> {
        self.duration_rates
            .iter()
            .find(|r| r.trade_code == trade && r.unit == unit)
            .map(|r| r.days_per_unit)
    }

    /// Display colour for a 1-based phase order
    pub fn phase_color(&self, phase_order: u32) -> &str {
        (phase_order as usize)
            .checked_sub(1)
            .and_then(|idx| self.palette.get(idx))
            .map(String::as_str)
            .unwrap_or(self.fallback_color.as_str())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.phases.is_empty() {
            return Err(ConfigError::Invalid(
                "schedule.phases must not be empty".to_string(),
            ));
        }
        if let Some(phase) = self.phases.iter().find(|p| p.default_duration_days == 0) {
            return Err(ConfigError::Invalid(format!(
                "phase {:?} has a zero default duration",
                phase.name
            )));
        }
        if let Some(rate) = self.duration_rates.iter().find(|r| r.days_per_unit < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "negative duration rate for {} ({})",
                rate.trade_code, rate.unit
            )));
        }
        if !(0.0..=1.0).contains(&self.base_weight_ratio) {
            return Err(ConfigError::Invalid(
                "baseWeightRatio must be between 0 and 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        use TradeCode::*;

        let phase = |name: &str, trade_codes: Vec<TradeCode>, days: u32, weight: f64| {
            PhaseTemplate {
                name: name.to_string(),
                trade_codes,
                default_duration_days: days,
                base_weight: weight,
            }
        };

        let phases = vec![
            phase("Demolition", vec![Demolition, Protection], 3, 0.10),
            phase(
                "Plumbing rough-in",
                vec![Masonry, Plaster, Plumbing, Sanitary, Hvac],
                5,
                0.15,
            ),
            phase("Electrical wiring", vec![Electrical], 4, 0.10),
            phase(
                "Carpentry",
                vec![Woodwork, Ceiling, DoorWindow, Insulation],
                10,
                0.25,
            ),
            phase("Tile & waterproofing", vec![Waterproof, Tile, Flooring], 6, 0.15),
            phase(
                "Wallpaper & painting",
                vec![WallpaperPaint, BaseboardMolding],
                5,
                0.15,
            ),
            phase(
                "Final inspection & handover",
                vec![Hardware, Fixture, Lighting, KitchenCabinetry, Cleanup],
                2,
                0.10,
            ),
        ];

        let rate = |trade_code: TradeCode, unit: QtyUnit, days_per_unit: f64| DurationRate {
            trade_code,
            unit,
            days_per_unit,
        };

        let duration_rates = vec![
            rate(Demolition, QtyUnit::Sqm, 0.02),
            rate(Demolition, QtyUnit::M3, 0.1),
            rate(Protection, QtyUnit::Lot, 0.5),
            rate(Masonry, QtyUnit::Sqm, 0.1),
            rate(Plaster, QtyUnit::Sqm, 0.05),
            rate(Plumbing, QtyUnit::Ea, 0.25),
            rate(Plumbing, QtyUnit::Lot, 1.0),
            rate(Sanitary, QtyUnit::Ea, 0.25),
            rate(Hvac, QtyUnit::Ea, 0.5),
            rate(Electrical, QtyUnit::Ea, 0.05),
            rate(Woodwork, QtyUnit::Sqm, 0.05),
            rate(Woodwork, QtyUnit::Ea, 0.5),
            rate(Woodwork, QtyUnit::Lm, 0.2),
            rate(Ceiling, QtyUnit::Sqm, 0.04),
            rate(DoorWindow, QtyUnit::Set, 0.5),
            rate(Insulation, QtyUnit::Sqm, 0.05),
            rate(Waterproof, QtyUnit::Sqm, 0.05),
            rate(Tile, QtyUnit::Sqm, 0.12),
            rate(Flooring, QtyUnit::Sqm, 0.03),
            rate(WallpaperPaint, QtyUnit::Sqm, 0.015),
            rate(BaseboardMolding, QtyUnit::Lm, 0.01),
            rate(Hardware, QtyUnit::Set, 0.25),
            rate(Hardware, QtyUnit::Lm, 0.02),
            rate(Fixture, QtyUnit::Ea, 0.25),
            rate(Lighting, QtyUnit::Sqm, 0.1),
            rate(Lighting, QtyUnit::Ea, 0.1),
            rate(KitchenCabinetry, QtyUnit::Ea, 0.5),
            rate(KitchenCabinetry, QtyUnit::Lm, 0.3),
            rate(Cleanup, QtyUnit::Sqm, 0.01),
        ];

        let palette = [
            "#EF4444", "#F59E0B", "#3B82F6", "#8B5CF6", "#06B6D4", "#10B981", "#6B7280",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        Self {
            phases,
            duration_rates,
            palette,
            fallback_color: "#6B7280".to_string(),
            base_weight_ratio: 0.6,
        }
    }
}
