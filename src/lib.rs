//! BlueprintX quantity takeoff and construction scheduling.
//!
//! Turns a recognized floor plan into per-trade quantities, lays the trades
//! out on a phased construction schedule and checks calendar items for
//! double bookings.

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod services;

pub use config::{EngineConfig, ScheduleConfig, TakeoffConfig};
pub use error::{ConfigError, ScheduleError, Severity, TakeoffError};
pub use services::{
    compute_takeoff, detect_conflicts, schedule_items, synthesize_schedule, ScheduleEngine,
    TakeoffEngine,
};
