//! Gantt timeline metadata

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// One calendar month of a project timeline, clamped to the project range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthColumn {
    /// `YYYY-MM`
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    /// Days from the project start to `start_date`
    pub offset: i64,
}

/// Signed day distance from `start` to `date`
pub fn day_offset(start: NaiveDate, date: NaiveDate) -> i64 {
    (date - start).num_days()
}

/// Saturates at the last representable date
pub(crate) fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Calendar months covered by the inclusive range `start..=end`
pub fn month_columns(start: NaiveDate, end: NaiveDate) -> Vec<MonthColumn> {
    let mut columns = Vec::new();
    let mut cursor = start;

    while cursor <= end {
        let Some(month_end) = last_day_of_month(cursor) else {
            break;
        };
        let column_end = month_end.min(end);
        columns.push(MonthColumn {
            label: format!("{:04}-{:02}", cursor.year(), cursor.month()),
            year: cursor.year(),
            month: cursor.month(),
            start_date: cursor,
            end_date: column_end,
            days: (day_offset(cursor, column_end) + 1) as u32,
            offset: day_offset(start, cursor),
        });
        match column_end.succ_opt() {
            Some(next) => cursor = next,
            None => break,
        }
    }

    columns
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
