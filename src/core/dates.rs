//! ISO-8601 parsing and formatting at the crate boundary.
//!
//! Instants are naive local date-times. Offsets on input are dropped rather than converted,
//! so `2024-01-05T10:00:00+02:00` is read as 10:00 on Jan 5.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{
    errors::{BudgetError, Result},
    ledger::time_interval::{end_of_day, start_of_day},
};

const DATE_FORMAT: &str = "%Y-%m-%d";
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
/// Offset forms RFC 3339 does not cover: minute precision and basic `+hhmm` offsets.
const ZONED_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Parses a date or date-time string into a local instant.
///
/// A bare date resolves to midnight.
pub fn parse_instant(input: &str) -> Result<NaiveDateTime> {
    let value = input.trim();
    if let Some(instant) = parse_date_time(value) {
        return Ok(instant);
    }
    parse_date(value)
        .map(start_of_day)
        .ok_or_else(|| invalid(input))
}

/// Same as [`parse_instant`]; kept separate so window bounds read symmetrically.
pub fn parse_window_start(input: &str) -> Result<NaiveDateTime> {
    parse_instant(input)
}

/// Parses the inclusive end of a reporting window.
///
/// A bare date covers the whole day and resolves to 23:59:59.999.
pub fn parse_window_end(input: &str) -> Result<NaiveDateTime> {
    let value = input.trim();
    if let Some(instant) = parse_date_time(value) {
        return Ok(instant);
    }
    parse_date(value)
        .map(end_of_day)
        .ok_or_else(|| invalid(input))
}

pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(OUTPUT_FORMAT).to_string()
}

fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(stamped) = DateTime::parse_from_rfc3339(value) {
        return Some(stamped.naive_local());
    }
    if let Some(stamped) = ZONED_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(value, format).ok())
    {
        return Some(stamped.naive_local());
    }
    let wall_clock = value.strip_suffix('Z').unwrap_or(value);
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(wall_clock, format).ok())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

fn invalid(input: &str) -> BudgetError {
    BudgetError::InvalidDate(format!("`{input}` is not an ISO-8601 date"))
}
