//! Engine error kinds
//!
//! Takeoff and schedule problems are data, not panics: they are collected and
//! returned next to the partial result so a caller can reject the project or
//! show warnings and continue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EntityId;

/// Entity kinds referenced in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Room,
    Wall,
    Opening,
    Fixture,
    FinishSpec,
    Structure,
    CeilingRecess,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Room => write!(f, "room"),
            EntityKind::Wall => write!(f, "wall"),
            EntityKind::Opening => write!(f, "opening"),
            EntityKind::Fixture => write!(f, "fixture"),
            EntityKind::FinishSpec => write!(f, "finish spec"),
            EntityKind::Structure => write!(f, "structure"),
            EntityKind::CeilingRecess => write!(f, "ceiling recess"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TakeoffError {
    #[serde(rename_all = "camelCase")]
    #[error("Degenerate geometry on {entity} {id}: {reason}")]
    DegenerateGeometry {
        entity: EntityKind,
        id: EntityId,
        reason: String,
    },

    #[serde(rename_all = "camelCase")]
    #[error("Opening exceeds wall {wall_id}: {reason}")]
    OpeningExceedsWall {
        wall_id: EntityId,
        opening_ids: Vec<EntityId>,
        reason: String,
    },

    #[serde(rename_all = "camelCase")]
    #[error("Dangling reference: {entity} {id} points to missing {target} {target_id}")]
    DanglingReference {
        entity: EntityKind,
        id: EntityId,
        target: EntityKind,
        target_id: EntityId,
    },

    #[serde(rename_all = "camelCase")]
    #[error("Unclassified element: {entity} {id} has no trade mapping for {category}")]
    UnclassifiedElement {
        entity: EntityKind,
        id: EntityId,
        category: String,
    },
}

impl TakeoffError {
    pub fn severity(&self) -> Severity {
        match self {
            Self::UnclassifiedElement { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DegenerateGeometry { .. } => "DEGENERATE_GEOMETRY",
            Self::OpeningExceedsWall { .. } => "OPENING_EXCEEDS_WALL",
            Self::DanglingReference { .. } => "DANGLING_REFERENCE",
            Self::UnclassifiedElement { .. } => "UNCLASSIFIED_ELEMENT",
        }
    }

    pub(crate) fn degenerate(entity: EntityKind, id: &str, reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn dangling(
        entity: EntityKind,
        id: &str,
        target: EntityKind,
        target_id: &str,
    ) -> Self {
        Self::DanglingReference {
            entity,
            id: id.to_string(),
            target,
            target_id: target_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleError {
    #[error("Invalid schedule window for {subject}: {start} .. {end} ({reason})")]
    InvalidScheduleWindow {
        subject: String,
        start: String,
        end: String,
        reason: String,
    },
}

impl ScheduleError {
    pub(crate) fn window(subject: &str, start: NaiveDate, end: NaiveDate, reason: &str) -> Self {
        Self::InvalidScheduleWindow {
            subject: subject.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Reference-data loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read reference data {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid reference data {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid reference data: {0}")]
    Invalid(String),
}
