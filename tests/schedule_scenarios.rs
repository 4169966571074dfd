mod common;

use chrono::{NaiveDate, TimeZone, Utc};

use blueprintx_takeoff::domain::{
    PhaseStatus, PriorPhase, QtyUnit, ScheduleRequest, TradeCode, TradeTotal,
};
use blueprintx_takeoff::services::schedule::month_columns;
use blueprintx_takeoff::{
    compute_takeoff, synthesize_schedule, ScheduleConfig, ScheduleEngine, ScheduleError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request() -> ScheduleRequest {
    ScheduleRequest {
        project_id: "proj-1".into(),
        project_name: "Bedroom refresh".into(),
        start_date: date(2026, 3, 1),
        generated_at: Utc.with_ymd_and_hms(2026, 2, 27, 8, 30, 0).unwrap(),
        prior_phases: vec![],
    }
}

#[test]
fn default_template_is_laid_out_inclusively() {
    let schedule = synthesize_schedule(&request(), None);

    let layout: Vec<(NaiveDate, NaiveDate, u32)> = schedule
        .phases
        .iter()
        .map(|p| (p.start_date, p.end_date, p.duration_days))
        .collect();
    assert_eq!(
        layout,
        vec![
            (date(2026, 3, 1), date(2026, 3, 3), 3),
            (date(2026, 3, 4), date(2026, 3, 8), 5),
            (date(2026, 3, 9), date(2026, 3, 12), 4),
            (date(2026, 3, 13), date(2026, 3, 22), 10),
            (date(2026, 3, 23), date(2026, 3, 28), 6),
            (date(2026, 3, 29), date(2026, 4, 2), 5),
            (date(2026, 4, 3), date(2026, 4, 4), 2),
        ]
    );
    assert_eq!(schedule.end_date, date(2026, 4, 4));
    assert_eq!(schedule.total_days, 35);
    assert_eq!(schedule.generated_at, request().generated_at);
}

#[test]
fn phases_form_a_linear_chain() {
    let schedule = synthesize_schedule(&request(), None);

    for pair in schedule.phases.windows(2) {
        assert_eq!(pair[1].start_date, pair[0].end_date.succ_opt().unwrap());
        assert_eq!(pair[1].dependencies, vec![pair[0].id.clone()]);
        assert_eq!(pair[1].phase_order, pair[0].phase_order + 1);
    }
    assert!(schedule.phases[0].dependencies.is_empty());

    let weight_sum: f64 = schedule.phases.iter().map(|p| p.weight).sum();
    assert!((weight_sum - 1.0).abs() < 1e-9);

    assert_eq!(schedule.phases[0].id, "phase-1");
    assert_eq!(schedule.phases[0].color, "#EF4444");
    assert_eq!(schedule.phases[6].color, "#6B7280");
    assert!(schedule
        .phases
        .iter()
        .all(|p| p.status == PhaseStatus::Pending));
}

#[test]
fn tasks_never_leave_their_phase() {
    let takeoff = compute_takeoff(&common::apartment_project());
    for totals in [None, Some(takeoff.totals.as_slice())] {
        let schedule = synthesize_schedule(&request(), totals);
        for phase in &schedule.phases {
            assert!(!phase.tasks.is_empty(), "{} has no tasks", phase.name);
            for (idx, task) in phase.tasks.iter().enumerate() {
                assert!(task.start_date >= phase.start_date);
                assert!(task.end_date <= phase.end_date);
                assert!(task.start_date <= task.end_date);
                assert_eq!(task.sort_order, idx as u32);
                assert_eq!(task.phase_id, phase.id);
                assert!(phase.trade_codes.contains(&task.trade_code));
            }
            assert_eq!(phase.tasks.last().unwrap().end_date, phase.end_date);
        }
    }
}

#[test]
fn template_mode_has_a_task_per_template_trade() {
    let schedule = synthesize_schedule(&request(), None);
    for phase in &schedule.phases {
        let trades: Vec<_> = phase.tasks.iter().map(|t| t.trade_code).collect();
        assert_eq!(trades, phase.trade_codes);
    }
}

#[test]
fn quantity_schedule_is_deterministic() {
    let takeoff = compute_takeoff(&common::apartment_project());
    let a = synthesize_schedule(&request(), Some(&takeoff.totals));
    let b = synthesize_schedule(&request(), Some(&takeoff.totals));
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert_eq!(
        a.total_days,
        a.phases.iter().map(|p| p.duration_days).sum::<u32>()
    );
    assert!(a.phases.iter().all(|p| p.duration_days >= 1));
}

#[test]
fn prior_phases_keep_ids_and_normalize_statuses() {
    let mut req = request();
    req.prior_phases = vec![
        PriorPhase {
            id: "ph-a".into(),
            status: "COMPLETED".into(),
        },
        PriorPhase {
            id: "ph-b".into(),
            status: "in progress".into(),
        },
        PriorPhase {
            id: "ph-c".into(),
            status: "on hold".into(),
        },
    ];
    let schedule = synthesize_schedule(&req, None);

    assert_eq!(schedule.phases[0].status, PhaseStatus::Completed);
    assert_eq!(schedule.phases[1].status, PhaseStatus::InProgress);
    assert_eq!(schedule.phases[2].status, PhaseStatus::Pending);
    assert_eq!(schedule.phases[2].id, "ph-c");
    assert_eq!(schedule.phases[3].id, "phase-4");
    assert!(schedule.phases[0]
        .tasks
        .iter()
        .all(|t| t.status == PhaseStatus::Completed && t.id.starts_with("task-ph-a-")));
}

#[test]
fn window_mode_fills_the_window_exactly() {
    let engine = ScheduleEngine::default();
    let end = date(2026, 4, 30);
    let schedule = engine.synthesize_within(&request(), end, None).unwrap();

    assert_eq!(schedule.end_date, end);
    assert_eq!(schedule.total_days, 61);
    assert!(schedule.phases.iter().all(|p| p.duration_days >= 1));
    for pair in schedule.phases.windows(2) {
        assert_eq!(pair[1].start_date, pair[0].end_date.succ_opt().unwrap());
    }

    // Carpentry has the largest template share
    let longest = schedule
        .phases
        .iter()
        .max_by_key(|p| p.duration_days)
        .unwrap();
    assert_eq!(longest.phase_order, 4);
}

#[test]
fn window_mode_with_one_day_per_phase() {
    let engine = ScheduleEngine::default();
    let schedule = engine
        .synthesize_within(&request(), date(2026, 3, 7), None)
        .unwrap();
    assert!(schedule.phases.iter().all(|p| p.duration_days == 1));
    assert_eq!(schedule.end_date, date(2026, 3, 7));
}

#[test]
fn window_mode_rejects_invalid_windows() {
    let engine = ScheduleEngine::default();

    let reversed = engine.synthesize_within(&request(), date(2026, 2, 1), None);
    assert!(matches!(
        reversed,
        Err(ScheduleError::InvalidScheduleWindow { .. })
    ));

    // Six days for seven phases
    let short = engine.synthesize_within(&request(), date(2026, 3, 6), None);
    assert!(matches!(short, Err(ScheduleError::InvalidScheduleWindow { .. })));
}

#[test]
fn timeline_spans_the_schedule() {
    let schedule = synthesize_schedule(&request(), None);
    let columns = month_columns(schedule.start_date, schedule.end_date);

    assert_eq!(columns.len(), 2);
    let days: u32 = columns.iter().map(|c| c.days).sum();
    assert_eq!(days, schedule.total_days);
}

#[test]
fn absurd_quantities_are_capped_instead_of_overflowing() {
    let totals = vec![TradeTotal {
        trade_code: TradeCode::Tile,
        trade_name: "Tile".into(),
        unit: QtyUnit::Sqm,
        quantity: 1.0e9,
        line_count: 1,
    }];
    let schedule = synthesize_schedule(&request(), Some(&totals));

    let tile_phase = &schedule.phases[4];
    assert_eq!(tile_phase.duration_days, ScheduleConfig::MAX_PHASE_DAYS);
    assert_eq!(
        schedule.total_days,
        schedule.phases.iter().map(|p| p.duration_days).sum::<u32>()
    );
    for pair in schedule.phases.windows(2) {
        assert_eq!(pair[1].start_date, pair[0].end_date.succ_opt().unwrap());
    }

    let mut far = request();
    far.start_date = NaiveDate::MAX;
    let clamped = synthesize_schedule(&far, Some(&totals));
    assert_eq!(clamped.end_date, NaiveDate::MAX);
}
