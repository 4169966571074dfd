//! Schedule domain types
//!
//! Phases, tasks, calendar items and conflicts, plus the adapters that map
//! persisted status strings onto closed enums.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::trades::TradeCode;

// ============================================================================
// Status
// ============================================================================

/// Phase and task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
    Cancelled,
}

impl Default for PhaseStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhaseStatus::Pending => write!(f, "pending"),
            PhaseStatus::InProgress => write!(f, "in_progress"),
            PhaseStatus::Completed => write!(f, "completed"),
            PhaseStatus::Skipped => write!(f, "skipped"),
            PhaseStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A status mapped from storage, keeping the original string for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedStatus {
    pub status: PhaseStatus,
    pub raw: String,
    /// False when `raw` was not a known spelling and fell back to pending
    pub recognized: bool,
}

/// Lowercase and fold `-`/space into `_` so `In-Progress` matches `in_progress`
fn fold_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

impl PhaseStatus {
    /// Total mapping from a persisted string; unknown values become pending
    pub fn normalize(raw: &str) -> NormalizedStatus {
        let known = match fold_key(raw).as_str() {
            "pending" | "scheduled" => Some(Self::Pending),
            "in_progress" | "inprogress" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            "skipped" => Some(Self::Skipped),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        };

        NormalizedStatus {
            status: known.unwrap_or_default(),
            raw: raw.to_string(),
            recognized: known.is_some(),
        }
    }
}

// ============================================================================
// Construction schedule
// ============================================================================

/// Trade-level task inside a phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTask {
    pub id: String,
    pub phase_id: String,
    pub project_id: String,
    pub trade_code: TradeCode,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    pub sort_order: u32,
    pub status: PhaseStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSchedule {
    pub id: String,
    pub name: String,
    pub phase_order: u32,
    pub status: PhaseStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: u32,
    /// Share of the total project duration
    pub weight: f64,
    pub trade_codes: Vec<TradeCode>,
    /// Ids of phases that must finish first
    pub dependencies: Vec<String>,
    pub color: String,
    pub tasks: Vec<ScheduleTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructionSchedule {
    pub project_id: String,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub phases: Vec<PhaseSchedule>,
    pub generated_at: DateTime<Utc>,
}

/// Phase state carried over from a previously persisted schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorPhase {
    pub id: String,
    pub status: String,
}

/// Input of schedule synthesis. The clock is never read; `generated_at` is
/// supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub project_id: String,
    pub project_name: String,
    pub start_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    /// Indexed by phase position
    #[serde(default)]
    pub prior_phases: Vec<PriorPhase>,
}

// ============================================================================
// Calendar items and conflicts
// ============================================================================

/// Calendar item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleType {
    Project,
    Meeting,
    Inspection,
    Delivery,
    Personal,
    Other,
}

impl Default for ScheduleType {
    fn default() -> Self {
        Self::Other
    }
}

impl ScheduleType {
    /// Total mapping from a persisted string
    pub fn normalize(raw: &str) -> Self {
        match fold_key(raw).as_str() {
            "project" | "construction" | "site_visit" => Self::Project,
            "meeting" => Self::Meeting,
            "inspection" => Self::Inspection,
            "delivery" => Self::Delivery,
            "personal" => Self::Personal,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
}

/// A calendar entry checked by the conflict detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ScheduleItemRecord")]
pub struct ScheduleItem {
    pub id: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub date: NaiveDate,
    /// Last day for multi-day items; `None` means single day
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub status: PhaseStatus,
    /// Status string as it was stored, before normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<String>,
    #[serde(default)]
    pub workers: Vec<Worker>,
}

/// Calendar item as persisted: status and type are free-form strings
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleItemRecord {
    id: String,
    #[serde(default)]
    project_id: Option<String>,
    date: NaiveDate,
    #[serde(default)]
    end_date: Option<NaiveDate>,
    #[serde(default)]
    start_time: Option<NaiveTime>,
    #[serde(default)]
    end_time: Option<NaiveTime>,
    #[serde(default)]
    is_all_day: bool,
    #[serde(default)]
    title: String,
    #[serde(default)]
    schedule_type: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    workers: Vec<Worker>,
}

impl From<ScheduleItemRecord> for ScheduleItem {
    fn from(record: ScheduleItemRecord) -> Self {
        let status = record
            .status
            .as_deref()
            .map(|raw| PhaseStatus::normalize(raw).status)
            .unwrap_or_default();

        Self {
            id: record.id,
            project_id: record.project_id,
            date: record.date,
            end_date: record.end_date,
            start_time: record.start_time,
            end_time: record.end_time,
            is_all_day: record.is_all_day,
            title: record.title,
            schedule_type: record
                .schedule_type
                .as_deref()
                .map(ScheduleType::normalize)
                .unwrap_or_default(),
            status,
            raw_status: record.status,
            workers: record.workers,
        }
    }
}

impl ScheduleItem {
    /// Normalized status together with the stored spelling
    pub fn normalized_status(&self) -> NormalizedStatus {
        match &self.raw_status {
            Some(raw) => PhaseStatus::normalize(raw),
            None => NormalizedStatus {
                status: self.status,
                raw: self.status.to_string(),
                recognized: true,
            },
        }
    }

    pub fn last_date(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.date)
    }

    /// Time-of-day window, when the item is timed
    pub fn time_window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_all_day {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSeverity {
    Warning,
    Error,
}

/// Overlap between two schedule items. Produced, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConflict {
    pub date: NaiveDate,
    pub item_a: String,
    pub item_b: String,
    pub severity: ConflictSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}
