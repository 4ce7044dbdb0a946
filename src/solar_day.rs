//! Solar day windows.
//!
//! A solar day runs from one apparent midnight to the next, with the Sun's upper
//! meridian transit (solar noon) in between. Its length drifts around 24 hours
//! through the year by the change in the equation of time, and that drift is what
//! [`SolarDayWindow::length_delta_seconds`] reports.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::civil;
use crate::constants::{
    MILLIS_PER_DAY, MOON_PHASE_BIN_DEGREES, SOLAR_DAY_BOUNDARY_HOUR_ANGLE, SOLAR_NOON_HOUR_ANGLE,
};
use crate::ephemeris::{Body, EphemerisProvider, Observer, SearchDirection};
use crate::error::EphemerisError;

/// Eight-way lunar phase classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MoonPhase {
    #[serde(rename = "New Moon")]
    NewMoon,
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    #[serde(rename = "Full Moon")]
    FullMoon,
    #[serde(rename = "Waning Gibbous")]
    WaningGibbous,
    #[serde(rename = "Last Quarter")]
    LastQuarter,
    #[serde(rename = "Waning Crescent")]
    WaningCrescent,
}

impl MoonPhase {
    const ORDER: [MoonPhase; 8] = [
        MoonPhase::NewMoon,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::FullMoon,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    /// Classify a phase angle using half-open 45° bins starting at New Moon.
    ///
    /// Angles are wrapped into `[0, 360)` first; exactly 360 lands in the last bin.
    pub fn from_angle(angle: f64) -> Self {
        if angle == 360.0 {
            return MoonPhase::WaningCrescent;
        }
        let bin = (angle.rem_euclid(360.0) / MOON_PHASE_BIN_DEGREES).floor() as usize;
        Self::ORDER[bin.min(Self::ORDER.len() - 1)]
    }

    pub fn label(self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for MoonPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One solar day for one civil date and observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarDayWindow {
    pub civil_date: NaiveDate,
    pub start: DateTime<Utc>,
    pub noon: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub moon_phase: MoonPhase,
    /// `(end - start) - 24h` in seconds; negative for short days.
    pub length_delta_seconds: f64,
}

impl SolarDayWindow {
    /// Whether `instant` falls in `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Day length deviation with an explicit sign, e.g. `+12.500s` or `-0.250s`.
    pub fn length_delta_display(&self) -> String {
        format_length_delta(self.length_delta_seconds)
    }
}

/// Format a signed seconds value with an explicit sign.
pub fn format_length_delta(seconds: f64) -> String {
    format!("{seconds:+.3}s")
}

/// Builds [`SolarDayWindow`]s for a fixed observer and time zone.
pub struct SolarDayResolver<'a, E: EphemerisProvider + ?Sized> {
    provider: &'a E,
    observer: Observer,
    timezone: Tz,
}

impl<'a, E: EphemerisProvider + ?Sized> SolarDayResolver<'a, E> {
    pub fn new(provider: &'a E, observer: Observer, timezone: Tz) -> Self {
        Self {
            provider,
            observer,
            timezone,
        }
    }

    /// Resolve the solar day of `civil_date`.
    ///
    /// Noon is the first solar transit at or after local civil midnight. The window
    /// edges are the apparent midnights immediately before and after that noon.
    pub fn resolve(&self, civil_date: NaiveDate) -> Result<SolarDayWindow, EphemerisError> {
        let midnight = civil::start_of_day(civil_date, self.timezone);

        let noon = self.crossing(SOLAR_NOON_HOUR_ANGLE, midnight, SearchDirection::Forward)?;
        let start = self.crossing(SOLAR_DAY_BOUNDARY_HOUR_ANGLE, noon, SearchDirection::Backward)?;
        let end = self.crossing(SOLAR_DAY_BOUNDARY_HOUR_ANGLE, noon, SearchDirection::Forward)?;

        if !(start < noon && noon < end) {
            return Err(EphemerisError::InconsistentEvents {
                year: civil_date.year(),
                detail: format!(
                    "solar day for {civil_date} is out of order: {start} / {noon} / {end}"
                ),
            });
        }

        let phase_angle = self.provider.lunar_phase_angle(noon)?;
        if !phase_angle.is_finite() {
            return Err(EphemerisError::InvalidValue {
                quantity: "lunar phase angle",
                instant: noon,
                value: phase_angle,
            });
        }

        let length_millis = (end - start).num_milliseconds() - MILLIS_PER_DAY;

        Ok(SolarDayWindow {
            civil_date,
            start,
            noon,
            end,
            moon_phase: MoonPhase::from_angle(phase_angle),
            length_delta_seconds: length_millis as f64 / 1000.0,
        })
    }

    fn crossing(
        &self,
        hour_angle: f64,
        around: DateTime<Utc>,
        direction: SearchDirection,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        self.provider
            .hour_angle_crossing(Body::Sun, &self.observer, hour_angle, around, direction)
    }
}
