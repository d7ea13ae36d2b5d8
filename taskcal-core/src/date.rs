//! Date handling for all-day events.
//!
//! iCalendar `DATE` values are rendered as `YYYYMMDD` without any time-zone
//! suffix. Input dates come from spreadsheets and task APIs, so parsing is
//! deliberately lenient about the shape of the input.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::error::{FeedError, FeedResult};

const ICS_DATE_FORMAT: &str = "%Y%m%d";

/// Plain date layouts accepted on input, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Floating date-time layouts; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a loosely formatted date string into a calendar date.
///
/// Timestamps carrying an offset (RFC 3339) are converted to the local
/// calendar date; floating date-times simply drop their time of day.
pub fn parse_date(input: &str) -> FeedResult<NaiveDate> {
    let s = input.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Local).date_naive());
    }

    Err(FeedError::InvalidDate(input.to_string()))
}

/// Render a date as an iCalendar `DATE` value (`YYYYMMDD`).
pub fn format_ics_date(date: NaiveDate) -> String {
    date.format(ICS_DATE_FORMAT).to_string()
}

/// Parse an iCalendar `DATE` value (`YYYYMMDD`).
pub fn parse_ics_date(value: &str) -> FeedResult<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FeedError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, ICS_DATE_FORMAT)
        .map_err(|_| FeedError::InvalidDate(value.to_string()))
}

/// Convert any accepted date string into the compact `YYYYMMDD` form.
pub fn format_date_to_ics(input: &str) -> FeedResult<String> {
    parse_date(input).map(format_ics_date)
}
