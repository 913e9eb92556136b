//! Validation of user-supplied fields before they reach the database.

use chrono::{NaiveDate, NaiveTime};

/// Longest accepted subject, exam or topic name (in characters)
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted free-text note (in characters)
pub const MAX_NOTE_LEN: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty(&'static str),
    TooLong(&'static str, usize),
    InvalidDate(String),
    InvalidTime(String),
    InvertedRange(NaiveDate, NaiveDate),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} must not be empty", field),
            ValidationError::TooLong(field, max) => {
                write!(f, "{} must be at most {} characters", field, max)
            }
            ValidationError::InvalidDate(raw) => {
                write!(f, "'{}' is not a date (expected YYYY-MM-DD)", raw)
            }
            ValidationError::InvalidTime(raw) => {
                write!(f, "'{}' is not a time (expected HH:MM)", raw)
            }
            ValidationError::InvertedRange(from, to) => {
                write!(f, "range start {} is after its end {}", from, to)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trim a name and check it is present and not too long
pub fn validate_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong(field, MAX_NAME_LEN));
    }
    Ok(trimmed.to_string())
}

/// Blank notes are stored as no note
pub fn validate_note(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(note) = value.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if note.chars().count() > MAX_NOTE_LEN {
        return Err(ValidationError::TooLong("note", MAX_NOTE_LEN));
    }
    Ok(Some(note.to_string()))
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, ValidationError> {
    crate::db::parse_date(value.trim()).ok_or_else(|| ValidationError::InvalidDate(value.to_string()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(value.to_string()))
}

pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if from > to {
        return Err(ValidationError::InvertedRange(from, to));
    }
    Ok(())
}
