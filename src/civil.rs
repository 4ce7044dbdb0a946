//! Civil date and time handling.
//!
//! Parsing of user-supplied birth dates, times and IANA zone names, plus the
//! conversions between instants and civil dates in the observer's zone. All
//! parse failures surface as [`CalendarError::InvalidParameters`].

use chrono::{DateTime, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::{DATE_FORMAT, TIME_FORMATS};
use crate::error::CalendarError;

/// Parse a `YYYY-MM-DD` civil date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| {
        CalendarError::InvalidParameters(format!(
            "birth date '{input}' is not a valid YYYY-MM-DD date: {e}"
        ))
    })
}

/// Parse an `HH:MM:SS` or `HH:MM` civil time.
pub fn parse_time(input: &str) -> Result<NaiveTime, CalendarError> {
    let trimmed = input.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            CalendarError::InvalidParameters(format!(
                "birth time '{input}' is not a valid HH:MM or HH:MM:SS time"
            ))
        })
}

/// Parse an IANA time zone name such as `America/New_York`.
pub fn parse_timezone(input: &str) -> Result<Tz, CalendarError> {
    input.trim().parse::<Tz>().map_err(|_| {
        CalendarError::InvalidParameters(format!("unknown timezone '{input}'"))
    })
}

/// Convert a local civil date and time in `timezone` to an instant.
///
/// A time repeated by a DST fold resolves to its earlier occurrence. A time
/// skipped by a DST gap does not exist and is rejected.
pub fn local_to_utc(
    date: NaiveDate,
    time: NaiveTime,
    timezone: Tz,
) -> Result<DateTime<Utc>, CalendarError> {
    let local = date.and_time(time);
    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            CalendarError::InvalidParameters(format!(
                "local time {local} does not exist in {timezone} (skipped by a clock change)"
            ))
        })
}

/// Civil date of `instant` as seen in `timezone`.
pub fn civil_date(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// First instant of `date` in `timezone`.
///
/// When local midnight falls into a DST gap the day starts at the offset in
/// effect around it, which is also what happens for days a zone skipped entirely.
pub fn start_of_day(date: NaiveDate, timezone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    match timezone.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.with_timezone(&Utc),
        None => {
            let offset = timezone.offset_from_utc_datetime(&midnight).fix();
            Utc.from_utc_datetime(&(midnight - offset))
        }
    }
}
