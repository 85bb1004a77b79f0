//! Request-parameter validation and parsing.
//!
//! Required-field checks run before any store access and the resulting
//! message names every missing field at once.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::config::settings;
use crate::error::ApiError;

/// Collects missing required parameters across a form so the caller can
/// report them all in one message.
#[derive(Debug, Default)]
pub struct FieldCheck {
    missing: Vec<&'static str>,
}

impl FieldCheck {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trimmed value of a required field; absence or emptiness is
    /// recorded and an empty placeholder returned.
    pub fn take<'a>(&mut self, name: &'static str, value: &'a Option<String>) -> &'a str {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(name);
                ""
            }
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::MissingFields(self.missing.join(", ")))
        }
    }
}

pub fn parse_id(name: &str, value: &str) -> Result<i64, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::Validation(format!("{name} must be a numeric identifier")))
}

pub fn parse_elo(name: &str, value: &str) -> Result<i32, ApiError> {
    value
        .parse()
        .map_err(|_| ApiError::Validation(format!("{name} must be an integer rating")))
}

pub fn parse_flag(name: &str, value: &str) -> Result<bool, ApiError> {
    match value {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(ApiError::Validation(format!("{name} must be 0 or 1"))),
    }
}

/// Convert an epoch-seconds date parameter into a calendar date in the
/// configured fixed time zone.
pub fn parse_epoch_date(value: &str) -> Result<NaiveDate, ApiError> {
    let secs: i64 = value
        .parse()
        .map_err(|_| ApiError::Validation("date must be an epoch-seconds integer".into()))?;
    epoch_to_date(secs, settings().tz)
}

/// The same conversion with an explicit offset; the calendar date is
/// taken in that offset, never in the host time zone.
pub fn epoch_to_date(secs: i64, tz: FixedOffset) -> Result<NaiveDate, ApiError> {
    let utc = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| ApiError::Validation("date is out of range".into()))?;
    Ok(utc.with_timezone(&tz).date_naive())
}

pub fn parse_time(value: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ApiError::Validation("time must be HH:MM or HH:MM:SS".into()))
}
