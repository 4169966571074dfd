//! Domain types
//!
//! These types define the BIM input model and the takeoff and schedule
//! outputs exchanged with the persistence and presentation layers.

pub mod floor_plan;
pub mod schedule;
pub mod takeoff;
pub mod trades;

// Re-export commonly used types
pub use floor_plan::*;
pub use schedule::*;
pub use takeoff::*;
pub use trades::{ClassificationTable, ElementCategory, SurfaceKind, TradeCode, UtilityKind};
