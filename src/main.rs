use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde::{de::DeserializeOwned, Serialize};

use blueprintx_takeoff::config::Settings;
use blueprintx_takeoff::domain::{
    ConstructionSchedule, FloorPlanProject, ScheduleConflict, ScheduleItem, ScheduleRequest,
    TakeoffResult,
};
use blueprintx_takeoff::error::Severity;
use blueprintx_takeoff::logging;
use blueprintx_takeoff::services::schedule::{month_columns, MonthColumn};
use blueprintx_takeoff::{detect_conflicts, ScheduleEngine, TakeoffEngine};

/// Quantity takeoff and construction schedule for a recognized floor plan
#[derive(Parser, Debug)]
#[command(name = "blueprintx-takeoff", version)]
struct Args {
    /// Floor plan project JSON file
    input: PathBuf,

    /// First construction day (YYYY-MM-DD); defaults to today
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Fit the schedule into a window ending on this day (inclusive)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Ignore takeoff quantities and use template phase durations
    #[arg(long)]
    template_only: bool,

    /// Calendar items JSON file to check for double bookings
    #[arg(long)]
    calendar: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    takeoff: TakeoffResult,
    schedule: ConstructionSchedule,
    timeline: Vec<MonthColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicts: Option<Vec<ScheduleConflict>>,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load configuration
    let settings = Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    let engine_config = settings.engine_config()?;
    let project: FloorPlanProject = read_json(&args.input)?;

    tracing::info!(
        env = ?settings.env,
        project_id = %project.id,
        input = %args.input.display(),
        "Starting takeoff"
    );

    let takeoff = TakeoffEngine::new(engine_config.takeoff).compute(&project);

    let now = Utc::now();
    let project_name = if project.name.trim().is_empty() {
        settings.default_project_name.clone()
    } else {
        project.name.clone()
    };
    let request = ScheduleRequest {
        project_id: project.id.clone(),
        project_name,
        start_date: args.start.unwrap_or_else(|| now.date_naive()),
        generated_at: now,
        prior_phases: Vec::new(),
    };

    let scheduler = ScheduleEngine::new(engine_config.schedule);
    let totals = (!args.template_only).then_some(takeoff.totals.as_slice());
    let schedule = match args.end {
        Some(end) => scheduler
            .synthesize_within(&request, end, totals)
            .context("Failed to fit schedule into the requested window")?,
        None => scheduler.synthesize(&request, totals),
    };
    let timeline = month_columns(schedule.start_date, schedule.end_date);

    let conflicts = match &args.calendar {
        Some(path) => {
            let items: Vec<ScheduleItem> = read_json(path)?;
            Some(detect_conflicts(&items))
        }
        None => None,
    };

    let error_count = takeoff
        .errors
        .iter()
        .filter(|e| e.severity() == Severity::Error)
        .count();

    let report = Report {
        takeoff,
        schedule,
        timeline,
        conflicts,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    if settings.strict && error_count > 0 {
        anyhow::bail!("Takeoff reported {} errors", error_count);
    }

    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}
