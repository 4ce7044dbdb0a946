//! Ephemeris provider interface and bundled implementations.
//!
//! The calendar engine never computes planetary positions itself. Everything it
//! needs to know about the sky goes through [`EphemerisProvider`]:
//!
//! - Earth's heliocentric ecliptic longitude at an instant
//! - the four seasonal events (equinoxes and solstices) of a year
//! - apsis instants (perihelion and aphelion)
//! - the instant a body crosses a given local hour angle
//! - the lunar phase angle
//!
//! ## Module Structure
//!
//! - [`solar`]: Sun series (NOAA/Meeus), equation of time, ΔT and Julian dates
//! - [`lunar`]: Moon longitude main terms and the phase angle
//! - [`meeus`]: [`MeeusEphemeris`], the analytic provider used by the binary
//! - `synthetic`: a uniform-orbit provider for exact tests (`testing-support`)

pub mod lunar;
pub mod meeus;
pub mod solar;

#[cfg(any(test, feature = "testing-support"))]
pub mod synthetic;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::EphemerisError;

pub use meeus::MeeusEphemeris;
#[cfg(any(test, feature = "testing-support"))]
pub use synthetic::SyntheticEphemeris;

/// Celestial body a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Body {
    Sun,
    Earth,
    Moon,
}

/// Geographic position of the observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observer {
    /// Latitude in degrees, north positive.
    pub latitude: f64,
    /// Longitude in degrees, east positive.
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation: f64,
}

impl Observer {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }
}

/// Which way in time a crossing search runs from its starting instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Equinoxes and solstices of one civil year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalEvents {
    pub spring_equinox: DateTime<Utc>,
    pub summer_solstice: DateTime<Utc>,
    pub autumn_equinox: DateTime<Utc>,
    pub winter_solstice: DateTime<Utc>,
}

/// Kind of orbital extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ApsisKind {
    Perihelion,
    Aphelion,
}

impl ApsisKind {
    /// The apsis that follows this one half an orbit later.
    pub fn opposite(self) -> Self {
        match self {
            Self::Perihelion => Self::Aphelion,
            Self::Aphelion => Self::Perihelion,
        }
    }
}

/// An apsis event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Apsis {
    pub kind: ApsisKind,
    pub instant: DateTime<Utc>,
}

/// Source of astronomical facts consumed by the calendar engine.
///
/// Implementations are treated as pure functions of their inputs: the same query
/// must always produce the same answer, and no query may block on anything but
/// computation.
#[cfg_attr(test, mockall::automock)]
pub trait EphemerisProvider {
    /// Earth's heliocentric ecliptic longitude in degrees, in `[0, 360)`.
    fn heliocentric_longitude(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError>;

    /// Equinoxes and solstices of `year`.
    fn seasonal_events(&self, year: i32) -> Result<SeasonalEvents, EphemerisError>;

    /// First apsis of `body` strictly after `search_start`.
    fn search_apsis(
        &self,
        body: Body,
        search_start: DateTime<Utc>,
    ) -> Result<Apsis, EphemerisError>;

    /// The apsis following `previous`.
    fn next_apsis(&self, body: Body, previous: &Apsis) -> Result<Apsis, EphemerisError> {
        let after = previous
            .instant
            .checked_add_signed(Duration::milliseconds(1))
            .ok_or(EphemerisError::InstantOutOfRange {
                operation: "next apsis",
            })?;
        self.search_apsis(body, after)
    }

    /// Instant nearest `around` in `direction` at which `body` reaches
    /// `target_hour_angle` (degrees, 0 = upper meridian transit) for `observer`.
    fn hour_angle_crossing(
        &self,
        body: Body,
        observer: &Observer,
        target_hour_angle: f64,
        around: DateTime<Utc>,
        direction: SearchDirection,
    ) -> Result<DateTime<Utc>, EphemerisError>;

    /// Moon–Sun elongation in degrees, `[0, 360)`: 0 is new moon, 180 full moon.
    fn lunar_phase_angle(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError>;
}

/// Wrap an angle into `[-180, 180)`.
pub(crate) fn wrap_signed_degrees(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Convert a millisecond timestamp back into an instant.
pub(crate) fn instant_from_millis(
    millis: i64,
    operation: &'static str,
) -> Result<DateTime<Utc>, EphemerisError> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or(EphemerisError::InstantOutOfRange { operation })
}
