//! Daily step records: `"<steps>,<duration>"`.
//!
//! Unlike training records, fields here must not carry surrounding
//! whitespace, and a failed record produces an empty report instead of an
//! error. The cause goes to a [`LogSink`].

use chrono::TimeDelta;
use serde::Serialize;
use tracing::debug;

use crate::TrackerError;
use crate::duration::parse_duration;
use crate::observability::{ReportKind, record_report};
use crate::spentcalories::walking_spent_calories;
use crate::utils::{has_surrounding_whitespace, split_record};

/// Length of one step in meters.
pub const STEP_LENGTH: f64 = 0.65;
/// Meters in one kilometer.
pub const M_IN_KM: f64 = 1000.0;

const STEPS_FIELDS: usize = 2;

/// Write-only destination for messages about rejected records.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Forwards messages to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Derived metrics for one day of steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStepsSummary {
    pub steps: i64,
    pub distance_km: f64,
    pub calories: f64,
}

impl std::fmt::Display for DayStepsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Количество шагов: {}.", self.steps)?;
        writeln!(f, "Дистанция составила {:.2} км.", self.distance_km)?;
        writeln!(f, "Вы сожгли {:.2} ккал.", self.calories)
    }
}

/// Split a daily steps record into step count and duration.
pub fn parse_package(data: &str) -> Result<(i64, TimeDelta), TrackerError> {
    let fields = split_record(data, STEPS_FIELDS)?;
    let (steps_field, duration_field) = (fields[0], fields[1]);

    if has_surrounding_whitespace(steps_field) {
        return Err(TrackerError::InvalidSteps(format!(
            "{steps_field:?} has surrounding whitespace"
        )));
    }
    if has_surrounding_whitespace(duration_field) {
        return Err(TrackerError::InvalidDuration(format!(
            "{duration_field:?} has surrounding whitespace"
        )));
    }

    let digits = steps_field.strip_prefix('+').unwrap_or(steps_field);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrackerError::InvalidSteps(steps_field.to_string()));
    }
    let steps: i64 = digits
        .parse()
        .map_err(|_| TrackerError::InvalidSteps(steps_field.to_string()))?;
    if steps <= 0 {
        return Err(TrackerError::InvalidSteps(steps_field.to_string()));
    }

    let duration = parse_duration(duration_field)
        .map_err(|e| TrackerError::InvalidDuration(e.to_string()))?;
    if duration <= TimeDelta::zero() {
        return Err(TrackerError::InvalidDuration(format!(
            "{duration_field:?} is not positive"
        )));
    }

    Ok((steps, duration))
}

/// Daily steps calculator reporting rejected records to `L`.
#[derive(Debug, Clone, Default)]
pub struct DayStepsCalculator<L: LogSink = TracingSink> {
    sink: L,
}

impl<L: LogSink> DayStepsCalculator<L> {
    pub fn new(sink: L) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &L {
        &self.sink
    }

    /// Parse and compute, returning the precise cause on failure.
    pub fn summarize(
        &self,
        data: &str,
        weight: f64,
        height: f64,
    ) -> Result<DayStepsSummary, TrackerError> {
        let (steps, duration) = parse_package(data)?;
        let distance_km = steps as f64 * STEP_LENGTH / M_IN_KM;
        let calories = walking_spent_calories(steps, weight, height, duration)?;
        Ok(DayStepsSummary {
            steps,
            distance_km,
            calories,
        })
    }

    /// Best-effort summary: failures are logged to the sink and counted,
    /// and yield `None`.
    pub fn report(&self, data: &str, weight: f64, height: f64) -> Option<DayStepsSummary> {
        match self.summarize(data, weight, height) {
            Ok(summary) => {
                debug!(steps = summary.steps, "day steps summary computed");
                record_report(ReportKind::DaySteps, true);
                Some(summary)
            }
            Err(e) => {
                let message = match e {
                    TrackerError::InvalidCalorieInput(_) => {
                        TrackerError::CalorieComputation.to_string()
                    }
                    other => other.to_string(),
                };
                self.sink.log(&message);
                record_report(ReportKind::DaySteps, false);
                None
            }
        }
    }

    /// Formatted report, or an empty string when the record cannot be used.
    pub fn day_action_info(&self, data: &str, weight: f64, height: f64) -> String {
        self.report(data, weight, height)
            .map(|summary| summary.to_string())
            .unwrap_or_default()
    }
}

/// [`DayStepsCalculator::day_action_info`] with the `tracing` sink.
pub fn day_action_info(data: &str, weight: f64, height: f64) -> String {
    DayStepsCalculator::new(TracingSink).day_action_info(data, weight, height)
}
