//! Activity tracker core: turns comma-separated activity records into
//! distance, speed and calorie reports.

use thiserror::Error;

pub mod config;
pub mod daysteps;
pub mod duration;
pub mod observability;
pub mod spentcalories;
pub mod utils;

pub use daysteps::{DayStepsCalculator, DayStepsSummary, LogSink, TracingSink, day_action_info};
pub use spentcalories::{TrainingKind, TrainingSummary, training_info};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackerError {
    #[error("malformed record: expected {expected} fields, got {found}")]
    MalformedRecord { expected: usize, found: usize },
    #[error("invalid step count: {0}")]
    InvalidSteps(String),
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("unknown training kind: {0}")]
    UnknownTrainingKind(String),
    #[error("invalid {0}")]
    InvalidCalorieInput(CalorieInput),
    #[error("unable to compute calories")]
    CalorieComputation,
    #[error("configuration error: {0}")]
    Config(String),
}

/// Calorie function argument that failed its precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieInput {
    Steps,
    Weight,
    Height,
    Duration,
}

impl std::fmt::Display for CalorieInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CalorieInput::Steps => "step count",
            CalorieInput::Weight => "weight",
            CalorieInput::Height => "height",
            CalorieInput::Duration => "duration",
        };
        f.write_str(name)
    }
}

/// User body measurements supplied with every calculation.
///
/// `height` is in whatever unit the caller keeps consistent with the
/// step-length coefficient; the calculators never convert it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Biometrics {
    pub weight: f64,
    pub height: f64,
}

impl Biometrics {
    pub fn new(weight: f64, height: f64) -> Self {
        Self { weight, height }
    }
}
