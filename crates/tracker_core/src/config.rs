use crate::{Biometrics, TrackerError};

pub const WEIGHT_KEY: &str = "TRACKER_WEIGHT_KG";
pub const HEIGHT_KEY: &str = "TRACKER_HEIGHT";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub biometrics: Biometrics,
}

impl Config {
    pub fn from_env() -> Result<Self, TrackerError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function instead of the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, TrackerError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let weight = positive(WEIGHT_KEY, get(WEIGHT_KEY))?;
        let height = positive(HEIGHT_KEY, get(HEIGHT_KEY))?;
        Ok(Self {
            biometrics: Biometrics::new(weight, height),
        })
    }
}

fn positive(key: &str, raw: Option<String>) -> Result<f64, TrackerError> {
    let raw = raw.ok_or_else(|| TrackerError::Config(format!("{key} missing")))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| TrackerError::Config(format!("{key} is not a number: {raw:?}")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::Config(format!("{key} must be positive")));
    }
    Ok(value)
}
