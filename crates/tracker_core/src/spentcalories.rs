//! Training records: `"<steps>,<kind>,<duration>"`.
//!
//! Distance is estimated from the user's height, speed from distance over the
//! session length, and calories from weight, speed and minutes of activity.
//! Walking burns a fixed fraction of the running estimate.

use chrono::TimeDelta;
use serde::Serialize;
use tracing::debug;

use crate::duration::{hours, minutes, parse_duration};
use crate::observability::{ReportKind, record_report};
use crate::utils::split_record;
use crate::{CalorieInput, TrackerError};

/// Meters in one kilometer.
pub const M_IN_KM: f64 = 1000.0;
/// Minutes in one hour.
pub const MIN_IN_H: f64 = 60.0;
/// Stride length as a fraction of height.
pub const STEP_LENGTH_COEFFICIENT: f64 = 0.45;
/// Share of the running estimate burned while walking.
pub const WALKING_CALORIES_COEFFICIENT: f64 = 0.5;

const TRAINING_FIELDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingKind {
    Running,
    Walking,
}

impl TrainingKind {
    /// Match a kind name case-insensitively. Russian and English names are
    /// both recognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "бег" | "running" => Some(TrainingKind::Running),
            "ходьба" | "walking" => Some(TrainingKind::Walking),
            _ => None,
        }
    }

    pub fn spent_calories(
        self,
        steps: i64,
        weight: f64,
        height: f64,
        duration: TimeDelta,
    ) -> Result<f64, TrackerError> {
        match self {
            TrainingKind::Running => running_spent_calories(steps, weight, height, duration),
            TrainingKind::Walking => walking_spent_calories(steps, weight, height, duration),
        }
    }
}

/// Derived metrics for one training record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    /// Kind exactly as written in the record.
    pub kind: String,
    pub duration_hours: f64,
    pub distance_km: f64,
    pub speed_kmh: f64,
    pub calories: f64,
}

impl std::fmt::Display for TrainingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Тип тренировки: {}", self.kind)?;
        writeln!(f, "Длительность: {:.2} ч.", self.duration_hours)?;
        writeln!(f, "Дистанция: {:.2} км.", self.distance_km)?;
        writeln!(f, "Скорость: {:.2} км/ч", self.speed_kmh)?;
        writeln!(f, "Сожгли калорий: {:.2}", self.calories)
    }
}

/// Split a training record into step count, kind and duration.
///
/// Step and duration fields are trimmed before parsing; the kind is returned
/// verbatim.
pub fn parse_training(data: &str) -> Result<(i64, String, TimeDelta), TrackerError> {
    let fields = split_record(data, TRAINING_FIELDS)?;

    let steps_field = fields[0].trim();
    let steps: i64 = steps_field
        .parse()
        .map_err(|_| TrackerError::InvalidSteps(steps_field.to_string()))?;
    if steps <= 0 {
        return Err(TrackerError::InvalidSteps(steps_field.to_string()));
    }

    let duration_field = fields[2].trim();
    let duration = parse_duration(duration_field)
        .map_err(|e| TrackerError::InvalidDuration(e.to_string()))?;
    if duration <= TimeDelta::zero() {
        return Err(TrackerError::InvalidDuration(format!(
            "{duration_field:?} is not positive"
        )));
    }

    Ok((steps, fields[1].to_string(), duration))
}

/// Distance in kilometers covered in `steps` by a person of `height`.
pub fn distance(steps: i64, height: f64) -> f64 {
    STEP_LENGTH_COEFFICIENT * height * steps as f64 / M_IN_KM
}

/// Mean speed in km/h; zero when the duration is not positive.
pub fn mean_speed(steps: i64, height: f64, duration: TimeDelta) -> f64 {
    if duration <= TimeDelta::zero() {
        return 0.0;
    }
    let h = hours(duration);
    if h <= 0.0 {
        return 0.0;
    }
    distance(steps, height) / h
}

fn check_calorie_inputs(
    steps: i64,
    weight: f64,
    height: f64,
    duration: TimeDelta,
) -> Result<(), TrackerError> {
    if steps <= 0 {
        return Err(TrackerError::InvalidCalorieInput(CalorieInput::Steps));
    }
    if weight.is_nan() || weight <= 0.0 {
        return Err(TrackerError::InvalidCalorieInput(CalorieInput::Weight));
    }
    if height.is_nan() || height <= 0.0 {
        return Err(TrackerError::InvalidCalorieInput(CalorieInput::Height));
    }
    if duration <= TimeDelta::zero() {
        return Err(TrackerError::InvalidCalorieInput(CalorieInput::Duration));
    }
    Ok(())
}

/// Calories burned while running.
pub fn running_spent_calories(
    steps: i64,
    weight: f64,
    height: f64,
    duration: TimeDelta,
) -> Result<f64, TrackerError> {
    check_calorie_inputs(steps, weight, height, duration)?;
    let speed = mean_speed(steps, height, duration);
    Ok(weight * speed * minutes(duration) / MIN_IN_H)
}

/// Calories burned while walking.
pub fn walking_spent_calories(
    steps: i64,
    weight: f64,
    height: f64,
    duration: TimeDelta,
) -> Result<f64, TrackerError> {
    check_calorie_inputs(steps, weight, height, duration)?;
    let speed = mean_speed(steps, height, duration);
    Ok(weight * speed * minutes(duration) / MIN_IN_H * WALKING_CALORIES_COEFFICIENT)
}

/// Parse a training record and compute its summary.
pub fn summarize_training(
    data: &str,
    weight: f64,
    height: f64,
) -> Result<TrainingSummary, TrackerError> {
    let result = build_summary(data, weight, height);
    match &result {
        Ok(summary) => debug!(kind = %summary.kind, "training summary computed"),
        Err(e) => debug!(error = %e, "training record rejected"),
    }
    record_report(ReportKind::Training, result.is_ok());
    result
}

fn build_summary(data: &str, weight: f64, height: f64) -> Result<TrainingSummary, TrackerError> {
    let (steps, kind_name, duration) = parse_training(data)?;
    let kind = TrainingKind::from_name(&kind_name)
        .ok_or_else(|| TrackerError::UnknownTrainingKind(kind_name.clone()))?;

    let calories = kind
        .spent_calories(steps, weight, height, duration)
        .map_err(|_| TrackerError::CalorieComputation)?;

    Ok(TrainingSummary {
        duration_hours: hours(duration),
        distance_km: distance(steps, height),
        speed_kmh: mean_speed(steps, height, duration),
        calories,
        kind: kind_name,
    })
}

/// Formatted training report for a raw record.
pub fn training_info(data: &str, weight: f64, height: f64) -> Result<String, TrackerError> {
    summarize_training(data, weight, height).map(|summary| summary.to_string())
}
