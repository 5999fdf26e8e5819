//! Common validation utilities for schedule times, date ranges, and RFID tags.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// 24-hour wall-clock time with minute resolution ("07:30", "23:59").
    /// Zero-padded so that lexical comparison matches chronological order.
    static ref WALL_TIME_RE: Regex = Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").unwrap();

    /// RFID tag values as read from cards: hex/alphanumeric with separators.
    static ref RFID_TAG_RE: Regex = Regex::new(r"^[A-Za-z0-9:_-]{1,64}$").unwrap();
}

/// Validates a wall-clock time string in 24-hour `HH:MM` format.
pub fn validate_wall_time(value: &str) -> Result<(), ValidationError> {
    if WALL_TIME_RE.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("wall_time_format");
        err.message = Some("Time must be in 24-hour HH:MM format".into());
        Err(err)
    }
}

/// Validates that a schedule time window does not span midnight.
///
/// Both inputs must already be valid `HH:MM` strings; zero-padding makes the
/// lexical comparison equivalent to a chronological one.
pub fn validate_time_window(start_time: &str, end_time: &str) -> Result<(), ValidationError> {
    validate_wall_time(start_time)?;
    validate_wall_time(end_time)?;

    if end_time < start_time {
        let mut err = ValidationError::new("time_window_order");
        err.message = Some("End time must not be earlier than start time".into());
        return Err(err);
    }
    Ok(())
}

/// Validates a schedule date range: end date, when present, must not precede
/// the start date. A missing end date means the schedule is open-ended.
pub fn validate_date_range(
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    if let Some(end) = end_date {
        if end < start_date {
            let mut err = ValidationError::new("date_range_order");
            err.message = Some("End date must not be earlier than start date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Validates the syntax of an RFID tag value.
pub fn validate_rfid_tag(tag: &str) -> Result<(), ValidationError> {
    if RFID_TAG_RE.is_match(tag) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rfid_tag_format");
        err.message =
            Some("RFID tag must be 1-64 characters of [A-Za-z0-9:_-]".into());
        Err(err)
    }
}
