//! Quantity takeoff engine.
//!
//! Runs in four stages over an immutable project:
//! - index: resolve every id reference once
//! - surfaces: measure walls and rooms
//! - lines: classify measured quantities into trade lines
//! - aggregation: sum lines by trade and unit
//!
//! Data problems are collected in [`TakeoffResult::errors`]; the engine never
//! fails outright.

mod aggregate;
mod index;
mod lines;
mod surfaces;

use tracing::{debug, info, instrument};

use crate::config::TakeoffConfig;
use crate::domain::{FloorPlanProject, RoomSurfaces, TakeoffResult};
use crate::error::Severity;

pub use aggregate::{surface_summary, trade_totals};
pub use index::ProjectIndex;
pub use surfaces::{measure_room, measure_wall, measure_walls};

use lines::LineSink;

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Takeoff engine holding immutable reference data.
#[derive(Debug, Clone, Default)]
pub struct TakeoffEngine {
    config: TakeoffConfig,
}

impl TakeoffEngine {
    pub fn new(config: TakeoffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TakeoffConfig {
        &self.config
    }

    /// Compute the full takeoff for a project.
    #[instrument(skip(self, project), fields(project_id = %project.id))]
    pub fn compute(&self, project: &FloorPlanProject) -> TakeoffResult {
        let mut errors = Vec::new();

        let index = ProjectIndex::build(project, &mut errors);
        let walls = measure_walls(&index, &self.config, &mut errors);

        let surfaces: Vec<RoomSurfaces> = project
            .rooms
            .iter()
            .filter_map(|room| measure_room(room, &index, &walls, &self.config, &mut errors))
            .collect();

        debug!(
            rooms = surfaces.len(),
            walls = walls.len(),
            "Measured surfaces"
        );

        let mut sink = LineSink::new(&self.config, &mut errors);
        lines::demolition_lines(&mut sink, &index, &walls);
        lines::construction_lines(&mut sink, &index, &walls);
        lines::opening_lines(&mut sink, &index);
        for room_surfaces in &surfaces {
            if let Some(room) = index.room(&room_surfaces.room_id) {
                lines::room_lines(&mut sink, &index, room, room_surfaces);
            }
        }
        lines::electrical_lines(&mut sink, &index, &surfaces);
        lines::hardware_lines(&mut sink, &index, &surfaces);
        lines::site_lines(&mut sink, &index, &surfaces);
        let lines = sink.finish();

        let totals = trade_totals(&lines);
        let summary = surface_summary(&surfaces, project.total_area);

        let error_count = errors
            .iter()
            .filter(|e| e.severity() == Severity::Error)
            .count();
        info!(
            lines = lines.len(),
            trades = totals.len(),
            errors = error_count,
            warnings = errors.len() - error_count,
            "Takeoff computed"
        );

        TakeoffResult {
            project_id: project.id.clone(),
            lines,
            totals,
            surfaces,
            summary,
            errors,
        }
    }
}

/// Takeoff with the standard reference data
pub fn compute_takeoff(project: &FloorPlanProject) -> TakeoffResult {
    TakeoffEngine::default().compute(project)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(7.714), 7.71);
        assert_eq!(round2(3.456), 3.46);
        assert_eq!(round2(12.0), 12.0);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn empty_project_yields_no_lines() {
        let project = FloorPlanProject {
            id: "p0".into(),
            name: "Empty".into(),
            total_area: 0.0,
            rooms: vec![],
            walls: vec![],
            openings: vec![],
            fixtures: vec![],
            finish_specs: vec![],
            structures: vec![],
        };
        let result = compute_takeoff(&project);
        assert!(result.lines.is_empty());
        assert!(result.totals.is_empty());
        assert!(!result.has_errors());
    }
}
