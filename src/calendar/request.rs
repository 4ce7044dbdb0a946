//! Validated generation parameters.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::civil;
use crate::constants::{
    MAXIMUM_LATITUDE, MAXIMUM_LONGITUDE, MAXIMUM_YEAR, MINIMUM_LATITUDE, MINIMUM_LONGITUDE,
    MINIMUM_YEAR,
};
use crate::ephemeris::Observer;
use crate::error::CalendarError;

/// Everything one generation pass depends on.
///
/// Construction validates every field, so a `CalendarRequest` that exists is always
/// safe to hand to the assembler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarRequest {
    year: i32,
    birth_date: NaiveDate,
    birth_time: NaiveTime,
    timezone: Tz,
    observer: Observer,
    birth_instant: DateTime<Utc>,
}

impl CalendarRequest {
    pub fn new(
        year: i32,
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        timezone: Tz,
        observer: Observer,
    ) -> Result<Self, CalendarError> {
        validate_year(year)?;
        validate_observer(&observer)?;
        let birth_instant = civil::local_to_utc(birth_date, birth_time, timezone)?;

        Ok(Self {
            year,
            birth_date,
            birth_time,
            timezone,
            observer,
            birth_instant,
        })
    }

    /// Build a request from unparsed civil strings.
    pub fn parse(
        year: i32,
        birth_date: &str,
        birth_time: &str,
        timezone: &str,
        observer: Observer,
    ) -> Result<Self, CalendarError> {
        let timezone = civil::parse_timezone(timezone)?;
        let birth_date = civil::parse_date(birth_date)?;
        let birth_time = civil::parse_time(birth_time)?;
        Self::new(year, birth_date, birth_time, timezone, observer)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn birth_time(&self) -> NaiveTime {
        self.birth_time
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn observer(&self) -> Observer {
        self.observer
    }

    /// Birth moment as an absolute instant.
    pub fn birth_instant(&self) -> DateTime<Utc> {
        self.birth_instant
    }

    /// Same parameters for another generation year.
    pub fn with_year(&self, year: i32) -> Result<Self, CalendarError> {
        validate_year(year)?;
        Ok(Self { year, ..*self })
    }
}

fn validate_year(year: i32) -> Result<(), CalendarError> {
    if !(MINIMUM_YEAR..=MAXIMUM_YEAR).contains(&year) {
        return Err(CalendarError::InvalidParameters(format!(
            "year {year} is outside the supported range {MINIMUM_YEAR}..={MAXIMUM_YEAR}"
        )));
    }
    Ok(())
}

fn validate_observer(observer: &Observer) -> Result<(), CalendarError> {
    if !observer.latitude.is_finite()
        || !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&observer.latitude)
    {
        return Err(CalendarError::InvalidParameters(format!(
            "latitude {} must be between {MINIMUM_LATITUDE} and {MAXIMUM_LATITUDE} degrees",
            observer.latitude
        )));
    }
    if !observer.longitude.is_finite()
        || !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&observer.longitude)
    {
        return Err(CalendarError::InvalidParameters(format!(
            "longitude {} must be between {MINIMUM_LONGITUDE} and {MAXIMUM_LONGITUDE} degrees",
            observer.longitude
        )));
    }
    if !observer.elevation.is_finite() {
        return Err(CalendarError::InvalidParameters(format!(
            "elevation {} is not a finite number",
            observer.elevation
        )));
    }
    Ok(())
}
