//! Construction schedule synthesis.
//!
//! Lays the phase template out as a strict linear chain. Durations come from
//! takeoff quantities when available and from template defaults otherwise.
//! Two layouts are supported:
//! - sequential: phases run back to back from the start date
//! - fit-to-window: an inclusive date window is divided by blended weights
//!
//! Dates are inclusive: a phase of `n` days ends on `start + n - 1` and the
//! next phase starts the day after.

mod timeline;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::config::{PhaseTemplate, ScheduleConfig};
use crate::domain::{
    ConstructionSchedule, PhaseSchedule, PhaseStatus, ScheduleRequest, ScheduleTask, TradeCode,
    TradeTotal,
};
use crate::error::ScheduleError;

pub use timeline::{day_offset, month_columns, MonthColumn};
use timeline::add_days;

/// Phase estimate before layout
#[derive(Debug, Clone)]
struct PhasePlan<'t> {
    template: &'t PhaseTemplate,
    /// Estimated days per trade; `None` when no quantity could be costed
    trade_days: Vec<(TradeCode, Option<f64>)>,
    duration: u32,
    from_quantities: bool,
}

impl PhasePlan<'_> {
    /// Trades that get a task, with their relative weight
    fn task_weights(&self) -> Vec<(TradeCode, f64)> {
        if self.from_quantities {
            self.trade_days
                .iter()
                .filter_map(|(trade, days)| match days {
                    Some(d) if *d > 0.0 => Some((*trade, *d)),
                    _ => None,
                })
                .collect()
        } else {
            self.template
                .trade_codes
                .iter()
                .map(|trade| (*trade, 1.0))
                .collect()
        }
    }
}

/// Schedule engine holding the phase template and duration rates.
#[derive(Debug, Clone, Default)]
pub struct ScheduleEngine {
    config: ScheduleConfig,
}

impl ScheduleEngine {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Sequential layout from `request.start_date`.
    ///
    /// With `trade_totals` the phase durations follow the quantities; without
    /// them every phase takes its template default.
    #[instrument(skip(self, request, trade_totals), fields(project_id = %request.project_id))]
    pub fn synthesize(
        &self,
        request: &ScheduleRequest,
        trade_totals: Option<&[TradeTotal]>,
    ) -> ConstructionSchedule {
        let plans = self.plan(trade_totals);
        let durations: Vec<u32> = plans.iter().map(|p| p.duration).collect();
        let total: u32 = durations.iter().sum();
        let weights: Vec<f64> = durations
            .iter()
            .map(|d| if total == 0 { 0.0 } else { f64::from(*d) / f64::from(total) })
            .collect();

        self.layout(request, &plans, &durations, &weights)
    }

    /// Fit the phases into the inclusive window `request.start_date..=end_date`.
    ///
    /// Each phase gets its blended share of the window and at least one day;
    /// the rounding remainder goes to the phase with the largest share.
    #[instrument(skip(self, request, trade_totals), fields(project_id = %request.project_id))]
    pub fn synthesize_within(
        &self,
        request: &ScheduleRequest,
        end_date: NaiveDate,
        trade_totals: Option<&[TradeTotal]>,
    ) -> Result<ConstructionSchedule, ScheduleError> {
        let start = request.start_date;
        if end_date < start {
            return Err(ScheduleError::window(
                &request.project_id,
                start,
                end_date,
                "end date is before start date",
            ));
        }

        let plans = self.plan(trade_totals);
        let window = day_offset(start, end_date) + 1;
        if window < plans.len() as i64 {
            return Err(ScheduleError::window(
                &request.project_id,
                start,
                end_date,
                &format!(
                    "{} days cannot hold {} phases of at least one day",
                    window,
                    plans.len()
                ),
            ));
        }

        let weights = self.blended_weights(&plans);
        let durations = distribute(window as u32, &weights);
        debug!(window_days = window, ?durations, "Distributed schedule window");

        Ok(self.layout(request, &plans, &durations, &weights))
    }

    /// Estimate every template phase
    fn plan(&self, trade_totals: Option<&[TradeTotal]>) -> Vec<PhasePlan<'_>> {
        self.config
            .phases
            .iter()
            .map(|template| {
                let trade_days: Vec<(TradeCode, Option<f64>)> = template
                    .trade_codes
                    .iter()
                    .map(|trade| (*trade, self.estimate_trade_days(*trade, trade_totals)))
                    .collect();

                let estimated: f64 = trade_days.iter().filter_map(|(_, d)| *d).sum();
                let from_quantities = estimated > 0.0;
                let duration = if from_quantities {
                    let days = estimated.ceil();
                    if days > f64::from(ScheduleConfig::MAX_PHASE_DAYS) {
                        warn!(
                            phase = %template.name,
                            estimated_days = days,
                            max_days = ScheduleConfig::MAX_PHASE_DAYS,
                            "Phase estimate capped"
                        );
                    }
                    (days.min(f64::from(ScheduleConfig::MAX_PHASE_DAYS)) as u32)
                        .max(ScheduleConfig::MIN_PHASE_DAYS)
                } else {
                    template
                        .default_duration_days
                        .max(ScheduleConfig::MIN_PHASE_DAYS)
                };

                PhasePlan {
                    template,
                    trade_days,
                    duration,
                    from_quantities,
                }
            })
            .collect()
    }

    /// Σ quantity × days-per-unit over the trade's totals that have a rate
    fn estimate_trade_days(
        &self,
        trade: TradeCode,
        trade_totals: Option<&[TradeTotal]>,
    ) -> Option<f64> {
        let mut days = None;
        for total in trade_totals?.iter().filter(|t| t.trade_code == trade) {
            match self.config.duration_rate(trade, total.unit) {
                Some(rate) => *days.get_or_insert(0.0) += total.quantity * rate,
                None => debug!(trade = %trade, unit = %total.unit, "No duration rate"),
            }
        }
        days
    }

    /// Template weights blended with quantity-derived weights; without any
    /// costed quantities the template weights stand alone
    fn blended_weights(&self, plans: &[PhasePlan<'_>]) -> Vec<f64> {
        let base = normalize(plans.iter().map(|p| p.template.base_weight).collect());
        if !plans.iter().any(|p| p.from_quantities) {
            return base;
        }
        let derived = normalize(plans.iter().map(|p| f64::from(p.duration)).collect());
        let ratio = self.config.base_weight_ratio;

        base.iter()
            .zip(&derived)
            .map(|(b, d)| ratio * b + (1.0 - ratio) * d)
            .collect()
    }

    fn layout(
        &self,
        request: &ScheduleRequest,
        plans: &[PhasePlan<'_>],
        durations: &[u32],
        weights: &[f64],
    ) -> ConstructionSchedule {
        let mut phases: Vec<PhaseSchedule> = Vec::with_capacity(plans.len());
        let mut cursor = request.start_date;

        for (idx, plan) in plans.iter().enumerate() {
            let phase_order = idx as u32 + 1;
            let duration = durations[idx];
            let start_date = cursor;
            let end_date = add_days(start_date, duration - 1);
            cursor = add_days(end_date, 1);

            let (id, status) = self.phase_identity(request, idx, phase_order);
            let dependencies = phases.last().map(|p| vec![p.id.clone()]).unwrap_or_default();
            let tasks = build_tasks(
                &request.project_id,
                &id,
                status,
                start_date,
                end_date,
                &plan.task_weights(),
            );

            phases.push(PhaseSchedule {
                name: plan.template.name.clone(),
                phase_order,
                status,
                start_date,
                end_date,
                duration_days: duration,
                weight: weights[idx],
                trade_codes: plan.template.trade_codes.clone(),
                dependencies,
                color: self.config.phase_color(phase_order).to_string(),
                tasks,
                id,
            });
        }

        let end_date = phases
            .last()
            .map(|p| p.end_date)
            .unwrap_or(request.start_date);
        let total_days: u32 = durations.iter().sum();

        info!(
            phases = phases.len(),
            total_days = total_days,
            start = %request.start_date,
            end = %end_date,
            "Schedule synthesized"
        );

        ConstructionSchedule {
            project_id: request.project_id.clone(),
            project_name: request.project_name.clone(),
            start_date: request.start_date,
            end_date,
            total_days,
            phases,
            generated_at: request.generated_at,
        }
    }

    /// Reuse a persisted phase id and status when one exists at this position
    fn phase_identity(
        &self,
        request: &ScheduleRequest,
        idx: usize,
        phase_order: u32,
    ) -> (String, PhaseStatus) {
        match request.prior_phases.get(idx) {
            Some(prior) if !prior.id.is_empty() => {
                let normalized = PhaseStatus::normalize(&prior.status);
                if !normalized.recognized {
                    warn!(
                        phase_id = %prior.id,
                        raw_status = %normalized.raw,
                        "Unrecognized phase status, treating as pending"
                    );
                }
                (prior.id.clone(), normalized.status)
            }
            _ => (format!("phase-{}", phase_order), PhaseStatus::Pending),
        }
    }
}

/// Sequential schedule with the standard phase template
pub fn synthesize_schedule(
    request: &ScheduleRequest,
    trade_totals: Option<&[TradeTotal]>,
) -> ConstructionSchedule {
    ScheduleEngine::default().synthesize(request, trade_totals)
}

/// Split a phase window into consecutive trade tasks.
///
/// Task lengths follow the weights (at least one day each); tasks never leave
/// the phase window and the last task ends on the phase end.
fn build_tasks(
    project_id: &str,
    phase_id: &str,
    status: PhaseStatus,
    phase_start: NaiveDate,
    phase_end: NaiveDate,
    weights: &[(TradeCode, f64)],
) -> Vec<ScheduleTask> {
    let phase_days = (day_offset(phase_start, phase_end) + 1) as f64;
    let weight_sum: f64 = weights.iter().map(|(_, w)| w).sum();
    let mut cursor = phase_start;
    let mut tasks = Vec::with_capacity(weights.len());

    for (idx, (trade, weight)) in weights.iter().enumerate() {
        let share = if weight_sum > 0.0 {
            weight / weight_sum
        } else {
            1.0 / weights.len() as f64
        };
        let days = ((phase_days * share).round() as u32).max(1);

        let start_date = cursor.min(phase_end);
        let end_date = if idx + 1 == weights.len() {
            phase_end
        } else {
            add_days(start_date, days - 1).min(phase_end)
        };
        cursor = add_days(end_date, 1);

        tasks.push(ScheduleTask {
            id: format!("task-{}-{}", phase_id, trade.code().to_lowercase()),
            phase_id: phase_id.to_string(),
            project_id: project_id.to_string(),
            trade_code: *trade,
            name: trade.display_name().to_string(),
            start_date,
            end_date,
            duration_days: (day_offset(start_date, end_date) + 1) as u32,
            sort_order: idx as u32,
            status,
        });
    }

    tasks
}

/// Integer day split: floor of each share, at least one day each, the
/// remainder on the largest share
fn distribute(window: u32, weights: &[f64]) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }

    let mut days: Vec<u32> = weights
        .iter()
        .map(|w| ((f64::from(window) * w).floor() as u32).max(ScheduleConfig::MIN_PHASE_DAYS))
        .collect();

    let largest = weights
        .iter()
        .enumerate()
        .fold(0, |best, (idx, w)| if *w > weights[best] { idx } else { best });

    let mut assigned: u32 = days.iter().sum();
    while assigned > window {
        // Minimum-day bumps overshot the window; shave the longest phase
        let Some((idx, _)) = days
            .iter()
            .enumerate()
            .filter(|(_, d)| **d > ScheduleConfig::MIN_PHASE_DAYS)
            .max_by_key(|(_, d)| **d)
        else {
            break;
        };
        days[idx] -= 1;
        assigned -= 1;
    }
    if assigned < window {
        days[largest] += window - assigned;
    }

    days
}

fn normalize(values: Vec<f64>) -> Vec<f64> {
    let sum: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if sum <= 0.0 {
        let n = values.len().max(1) as f64;
        return values.iter().map(|_| 1.0 / n).collect();
    }
    values.iter().map(|v| v.max(0.0) / sum).collect()
}
