//! Idealized ephemeris for exact tests.
//!
//! Earth moves on a circular orbit at constant angular speed, the Sun crosses the
//! meridian at mean solar noon every day, and the Moon's phase advances at a
//! constant rate. Every answer is a closed-form expression, so tests can compute
//! expected calendars by hand.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use super::{
    Apsis, ApsisKind, Body, EphemerisProvider, Observer, SearchDirection, SeasonalEvents,
    instant_from_millis,
};
use crate::constants::MILLIS_PER_DAY;
use crate::error::EphemerisError;

const TROPICAL_YEAR_DAYS: f64 = 365.2422;
const SYNODIC_MONTH_DAYS: f64 = 29.530588;

/// Heliocentric longitude of Earth at every spring equinox.
const EQUINOX_LONGITUDE: f64 = 180.0;

/// Fraction of the year from spring equinox to perihelion and aphelion.
const PERIHELION_PHASE: f64 = 0.79;
const APHELION_PHASE: f64 = 0.29;

/// Uniform-orbit ephemeris anchored at a chosen spring equinox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticEphemeris {
    equinox_epoch: DateTime<Utc>,
    new_moon_epoch: DateTime<Utc>,
}

impl Default for SyntheticEphemeris {
    fn default() -> Self {
        // 2000-03-20 07:35 UTC and the new moon of 2000-01-06 18:14 UTC
        Self::new(
            Utc.with_ymd_and_hms(2000, 3, 20, 7, 35, 0).unwrap(),
            Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap(),
        )
    }
}

impl SyntheticEphemeris {
    pub fn new(equinox_epoch: DateTime<Utc>, new_moon_epoch: DateTime<Utc>) -> Self {
        Self {
            equinox_epoch,
            new_moon_epoch,
        }
    }

    fn year_millis() -> f64 {
        TROPICAL_YEAR_DAYS * MILLIS_PER_DAY as f64
    }

    /// Instant `cycles` tropical years after the epoch equinox.
    fn after_epoch(&self, cycles: f64) -> Result<DateTime<Utc>, EphemerisError> {
        let offset = (cycles * Self::year_millis()).round() as i64;
        instant_from_millis(self.equinox_epoch.timestamp_millis() + offset, "synthetic orbit")
    }

    /// Orbital cycles elapsed since the epoch equinox.
    fn cycles_since_epoch(&self, instant: DateTime<Utc>) -> f64 {
        (instant - self.equinox_epoch).num_milliseconds() as f64 / Self::year_millis()
    }

    /// Spring equinox instant for `year`.
    pub fn spring_equinox(&self, year: i32) -> Result<DateTime<Utc>, EphemerisError> {
        self.after_epoch(f64::from(year - self.equinox_epoch.year()))
    }

    /// Instant Earth's longitude is `degrees` past the spring equinox of `year`.
    pub fn instant_at_degree(
        &self,
        year: i32,
        degrees: f64,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        self.after_epoch(f64::from(year - self.equinox_epoch.year()) + degrees / 360.0)
    }

    /// Hour angle of the mean Sun: zero at 12:00 local mean time.
    fn mean_hour_angle(millis: i64, observer_longitude: f64) -> f64 {
        let day_fraction = millis.rem_euclid(MILLIS_PER_DAY) as f64 / MILLIS_PER_DAY as f64;
        (day_fraction * 360.0 + observer_longitude - 180.0).rem_euclid(360.0)
    }
}

impl EphemerisProvider for SyntheticEphemeris {
    fn heliocentric_longitude(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        Ok((EQUINOX_LONGITUDE + 360.0 * self.cycles_since_epoch(instant)).rem_euclid(360.0))
    }

    fn seasonal_events(&self, year: i32) -> Result<SeasonalEvents, EphemerisError> {
        Ok(SeasonalEvents {
            spring_equinox: self.instant_at_degree(year, 0.0)?,
            summer_solstice: self.instant_at_degree(year, 90.0)?,
            autumn_equinox: self.instant_at_degree(year, 180.0)?,
            winter_solstice: self.instant_at_degree(year, 270.0)?,
        })
    }

    fn search_apsis(
        &self,
        body: Body,
        search_start: DateTime<Utc>,
    ) -> Result<Apsis, EphemerisError> {
        if body != Body::Earth {
            return Err(EphemerisError::UnsupportedBody {
                operation: "apsis search",
                body,
            });
        }

        let base = self.cycles_since_epoch(search_start).floor() - 1.0;
        let mut candidates = Vec::with_capacity(6);
        for cycle in 0..3 {
            let cycle = base + f64::from(cycle);
            candidates.push(Apsis {
                kind: ApsisKind::Aphelion,
                instant: self.after_epoch(cycle + APHELION_PHASE)?,
            });
            candidates.push(Apsis {
                kind: ApsisKind::Perihelion,
                instant: self.after_epoch(cycle + PERIHELION_PHASE)?,
            });
        }

        candidates
            .into_iter()
            .filter(|apsis| apsis.instant > search_start)
            .min_by_key(|apsis| apsis.instant)
            .ok_or(EphemerisError::NoConvergence {
                operation: "apsis search",
                instant: search_start,
            })
    }

    fn hour_angle_crossing(
        &self,
        body: Body,
        observer: &Observer,
        target_hour_angle: f64,
        around: DateTime<Utc>,
        direction: SearchDirection,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        if body != Body::Sun {
            return Err(EphemerisError::UnsupportedBody {
                operation: "hour angle crossing",
                body,
            });
        }

        let millis = around.timestamp_millis();
        let current = Self::mean_hour_angle(millis, observer.longitude);
        let mut delta = (target_hour_angle - current).rem_euclid(360.0);
        if direction == SearchDirection::Backward && delta > 0.0 {
            delta -= 360.0;
        }
        let offset = (delta / 360.0 * MILLIS_PER_DAY as f64).round() as i64;
        around
            .checked_add_signed(Duration::milliseconds(offset))
            .ok_or(EphemerisError::InstantOutOfRange {
                operation: "hour angle crossing",
            })
    }

    fn lunar_phase_angle(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        let days = (instant - self.new_moon_epoch).num_milliseconds() as f64 / MILLIS_PER_DAY as f64;
        Ok((360.0 * days / SYNODIC_MONTH_DAYS).rem_euclid(360.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_at_equinox_and_solstice() {
        let eph = SyntheticEphemeris::default();
        let events = eph.seasonal_events(2025).unwrap();
        let at_spring = eph.heliocentric_longitude(events.spring_equinox).unwrap();
        let at_summer = eph.heliocentric_longitude(events.summer_solstice).unwrap();
        assert!((at_spring - 180.0).abs() < 1e-6);
        assert!((at_summer - 270.0).abs() < 1e-6);
        assert_eq!(events.spring_equinox.year(), 2025);
    }

    #[test]
    fn test_mean_noon_and_midnights() {
        let eph = SyntheticEphemeris::default();
        let observer = Observer::new(0.0, -90.0, 0.0);
        let midnight = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        let noon = eph
            .hour_angle_crossing(Body::Sun, &observer, 0.0, midnight, SearchDirection::Forward)
            .unwrap();
        // 90°W: mean noon at 18:00 UTC
        assert_eq!(noon, Utc.with_ymd_and_hms(2025, 5, 1, 18, 0, 0).unwrap());

        let start = eph
            .hour_angle_crossing(Body::Sun, &observer, 180.0, noon, SearchDirection::Backward)
            .unwrap();
        let end = eph
            .hour_angle_crossing(Body::Sun, &observer, 180.0, noon, SearchDirection::Forward)
            .unwrap();
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_apsides_alternate() {
        let eph = SyntheticEphemeris::default();
        let spring = eph.spring_equinox(2025).unwrap();
        let first = eph.search_apsis(Body::Earth, spring).unwrap();
        let second = eph.next_apsis(Body::Earth, &first).unwrap();
        assert_eq!(first.kind, ApsisKind::Aphelion);
        assert_eq!(second.kind, ApsisKind::Perihelion);
        assert!(second.instant < eph.spring_equinox(2026).unwrap());
    }

    #[test]
    fn test_lunar_phase_cycles() {
        let eph = SyntheticEphemeris::default();
        let new_moon = Utc.with_ymd_and_hms(2000, 1, 6, 18, 14, 0).unwrap();
        assert_eq!(eph.lunar_phase_angle(new_moon).unwrap(), 0.0);
        let half = new_moon + Duration::milliseconds((SYNODIC_MONTH_DAYS / 2.0 * 86_400_000.0) as i64);
        assert!((eph.lunar_phase_angle(half).unwrap() - 180.0).abs() < 1e-3);
    }
}
