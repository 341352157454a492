//! Compound duration strings such as `"40m"`, `"1h30m"` or `"1.5h"`.
//!
//! The grammar is a sequence of `<number><unit>` groups with an optional
//! leading sign. Numbers may carry a fractional part. Accepted units are
//! `ns`, `us` (also `µs`/`μs`), `ms`, `s`, `m` and `h`. The bare string `"0"`
//! is zero. Zero and negative values parse; callers decide whether they are
//! acceptable.

use chrono::TimeDelta;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("malformed duration {0:?}")]
    Malformed(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} out of range")]
    OutOfRange(String),
}

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_MINUTE: f64 = 60.0;
const NANOS_PER_SECOND: f64 = 1e9;

// Fraction digits past this point cannot change the result.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "µs" | "μs" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

/// Scale `.digits` of a group by the unit, truncating sub-nanosecond parts.
fn fraction_nanos(digits: &str, unit: u64) -> u64 {
    let digits = &digits[..digits.len().min(MAX_FRACTION_DIGITS)];
    let (value, scale) = digits.bytes().fold((0u64, 1u64), |(v, s), b| {
        (v * 10 + u64::from(b - b'0'), s * 10)
    });
    (value as f64 * (unit as f64 / scale as f64)) as u64
}

/// Parse a compound duration string.
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let malformed = || DurationError::Malformed(input.to_string());
    let out_of_range = || DurationError::OutOfRange(input.to_string());

    let (negative, mut rest) = match input.as_bytes().first() {
        None => return Err(DurationError::Empty),
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        Some(_) => (false, input),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(malformed());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        let (whole, mut after) = rest.split_at(leading_digits(rest));
        let mut fraction = "";
        if let Some(stripped) = after.strip_prefix('.') {
            (fraction, after) = stripped.split_at(leading_digits(stripped));
        }
        if whole.is_empty() && fraction.is_empty() {
            return Err(malformed());
        }

        let unit_len = after
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| out_of_range())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(out_of_range)?;
        if !fraction.is_empty() {
            nanos = nanos
                .checked_add(fraction_nanos(fraction, scale))
                .ok_or_else(out_of_range)?;
        }
        total = total.checked_add(nanos).ok_or_else(out_of_range)?;
        rest = tail;
    }

    let limit = if negative {
        i64::MIN.unsigned_abs()
    } else {
        i64::MAX as u64
    };
    if total > limit {
        return Err(out_of_range());
    }
    let nanos = if negative {
        (total as i64).wrapping_neg()
    } else {
        total as i64
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Duration as fractional hours.
pub fn hours(d: TimeDelta) -> f64 {
    d.num_seconds() as f64 / SECONDS_PER_HOUR
        + f64::from(d.subsec_nanos()) / (SECONDS_PER_HOUR * NANOS_PER_SECOND)
}

/// Duration as fractional minutes.
pub fn minutes(d: TimeDelta) -> f64 {
    d.num_seconds() as f64 / SECONDS_PER_MINUTE
        + f64::from(d.subsec_nanos()) / (SECONDS_PER_MINUTE * NANOS_PER_SECOND)
}
