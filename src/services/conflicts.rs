//! Schedule conflict detection
//!
//! Pairwise comparison of calendar items: two items conflict when their date
//! ranges intersect and they either share a worker or are both all-day items
//! of the same project.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use tracing::{debug, warn};

use crate::domain::{
    ConflictSeverity, ConstructionSchedule, PhaseStatus, ScheduleConflict, ScheduleItem,
    ScheduleType, TradeCode, Worker,
};
use crate::error::ScheduleError;

/// Find every conflicting pair, each reported once.
///
/// Items with an inverted date or time window are logged and left out, as
/// are cancelled items. Results are ordered by conflict date, then by input
/// order.
pub fn detect_conflicts(items: &[ScheduleItem]) -> Vec<ScheduleConflict> {
    let valid: Vec<&ScheduleItem> = items
        .iter()
        .filter(|item| {
            let normalized = item.normalized_status();
            if !normalized.recognized {
                warn!(
                    item_id = %item.id,
                    raw_status = %normalized.raw,
                    "Unrecognized calendar status, treating as pending"
                );
            }
            normalized.status != PhaseStatus::Cancelled
        })
        .filter(|item| match validate_window(item) {
            Ok(()) => true,
            Err(err) => {
                warn!(item_id = %item.id, error = %err, "Skipping schedule item");
                false
            }
        })
        .collect();

    let mut conflicts = Vec::new();
    for (i, a) in valid.iter().enumerate() {
        for b in &valid[i + 1..] {
            if let Some(conflict) = compare(a, b) {
                conflicts.push(conflict);
            }
        }
    }

    // Stable sort keeps pair generation order within a day
    conflicts.sort_by_key(|c| c.date);

    debug!(
        items = items.len(),
        conflicts = conflicts.len(),
        "Checked schedule conflicts"
    );
    conflicts
}

fn validate_window(item: &ScheduleItem) -> Result<(), ScheduleError> {
    if let Some(end) = item.end_date {
        if end < item.date {
            return Err(ScheduleError::window(
                &item.id,
                item.date,
                end,
                "end date is before start date",
            ));
        }
    }
    if let Some((start, end)) = item.time_window() {
        if end <= start {
            return Err(ScheduleError::InvalidScheduleWindow {
                subject: item.id.clone(),
                start: start.to_string(),
                end: end.to_string(),
                reason: "end time is not after start time".to_string(),
            });
        }
    }
    Ok(())
}

fn compare(a: &ScheduleItem, b: &ScheduleItem) -> Option<ScheduleConflict> {
    if !(a.date <= b.last_date() && b.date <= a.last_date()) {
        return None;
    }
    let date = a.date.max(b.date);

    let shared: Vec<&Worker> = a
        .workers
        .iter()
        .filter(|w| !w.id.is_empty() && b.workers.iter().any(|o| o.id == w.id))
        .collect();

    if !shared.is_empty() {
        let names = worker_names(&shared);
        return match (a.time_window(), b.time_window()) {
            (Some(wa), Some(wb)) if times_overlap(wa, wb) => Some(ScheduleConflict {
                date,
                item_a: a.id.clone(),
                item_b: b.id.clone(),
                severity: ConflictSeverity::Error,
                suggestion: Some(format!(
                    "{} double-booked; move \"{}\" or \"{}\" to another time",
                    names, a.title, b.title
                )),
            }),
            (Some(_), Some(_)) => None,
            _ => Some(ScheduleConflict {
                date,
                item_a: a.id.clone(),
                item_b: b.id.clone(),
                severity: ConflictSeverity::Warning,
                suggestion: Some(format!(
                    "{} assigned to both items on overlapping days; confirm availability",
                    names
                )),
            }),
        };
    }

    let same_project = matches!(
        (&a.project_id, &b.project_id),
        (Some(pa), Some(pb)) if pa == pb
    );
    if a.is_all_day && b.is_all_day && same_project {
        return Some(ScheduleConflict {
            date,
            item_a: a.id.clone(),
            item_b: b.id.clone(),
            severity: ConflictSeverity::Warning,
            suggestion: Some(
                "Two all-day items of the same project overlap; consider merging them".to_string(),
            ),
        });
    }

    None
}

fn times_overlap(a: (NaiveTime, NaiveTime), b: (NaiveTime, NaiveTime)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

fn worker_names(workers: &[&Worker]) -> String {
    workers
        .iter()
        .map(|w| if w.name.is_empty() { w.id.as_str() } else { w.name.as_str() })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Calendar items for every task of a synthesized schedule.
///
/// Tasks become all-day items spanning their dates, staffed by the crew
/// registered for the task's trade.
pub fn schedule_items(
    schedule: &ConstructionSchedule,
    crews: &BTreeMap<TradeCode, Vec<Worker>>,
) -> Vec<ScheduleItem> {
    schedule
        .phases
        .iter()
        .flat_map(|phase| phase.tasks.iter().map(move |task| (phase, task)))
        .map(|(phase, task)| ScheduleItem {
            id: task.id.clone(),
            project_id: Some(schedule.project_id.clone()),
            date: task.start_date,
            end_date: (task.end_date != task.start_date).then_some(task.end_date),
            start_time: None,
            end_time: None,
            is_all_day: true,
            title: format!("{}: {}", phase.name, task.name),
            schedule_type: ScheduleType::Project,
            status: task.status,
            raw_status: None,
            workers: crews.get(&task.trade_code).cloned().unwrap_or_default(),
        })
        .collect()
}
