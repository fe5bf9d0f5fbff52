//! Time utilities: turn a caller's "now" into the local calendar date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{CoreError, Result};
use crate::receipt::DATE_FORMAT;

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.trim()
        .parse()
        .map_err(|_| CoreError::InvalidTimezone(tz.to_string()))
}

/// Resolve a reference instant to the calendar date in `tz`.
///
/// Accepts an RFC 3339 timestamp (converted into `tz`), a local
/// "2026-02-20 23:59" in `tz`, or a bare "2026-02-20".
pub fn parse_reference_instant(text: &str, tz: &str) -> Result<NaiveDate> {
    let zone = parse_timezone(tz)?;
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&zone).date_naive());
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
        // DST gaps have no local instant; the calendar date is still unambiguous
        return Ok(zone
            .from_local_datetime(&ndt)
            .earliest()
            .map(|dt| dt.date_naive())
            .unwrap_or_else(|| ndt.date()));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| CoreError::InvalidDate {
        value: text.to_string(),
        reason: format!("not an RFC 3339 timestamp, local datetime or date ({e})"),
    })
}

/// Today's date in `tz` according to the system clock.
pub fn today_in(tz: &str) -> Result<NaiveDate> {
    let zone = parse_timezone(tz)?;
    Ok(chrono::Utc::now().with_timezone(&zone).date_naive())
}
