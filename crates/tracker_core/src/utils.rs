//! Helpers shared by the record parsers.

use crate::TrackerError;

/// Separator between the fields of a record.
pub const FIELD_SEPARATOR: char = ',';

/// Split `data` into exactly `expected` comma-separated fields.
///
/// Fields are returned untouched; whitespace policy belongs to the caller.
pub fn split_record(data: &str, expected: usize) -> Result<Vec<&str>, TrackerError> {
    let fields: Vec<&str> = data.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(TrackerError::MalformedRecord {
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Number of fields `data` would split into.
pub fn field_count(data: &str) -> usize {
    data.split(FIELD_SEPARATOR).count()
}

/// True when `field` carries leading or trailing whitespace.
pub fn has_surrounding_whitespace(field: &str) -> bool {
    field != field.trim()
}
