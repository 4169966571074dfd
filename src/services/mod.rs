//! Engines of the takeoff pipeline.
//!
//! Quantity takeoff, schedule synthesis and conflict detection. All of them
//! are synchronous and pure over their inputs.

pub mod conflicts;
pub mod schedule;
pub mod takeoff;

pub use conflicts::{detect_conflicts, schedule_items};
pub use schedule::{synthesize_schedule, ScheduleEngine};
pub use takeoff::{compute_takeoff, TakeoffEngine};
