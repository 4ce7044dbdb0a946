//! Analytic ephemeris provider.
//!
//! [`MeeusEphemeris`] answers every query the calendar engine makes from closed
//! form series, with no data files. Searches (seasons, hour-angle crossings) are
//! Newton iterations on whole milliseconds so repeated queries land on exactly
//! the same instant.

use chrono::{DateTime, TimeZone, Utc};

use super::solar::{
    self, MEAN_SOLAR_MOTION_DEG_PER_DAY, delta_t_seconds, julian_centuries_tt,
    millis_from_julian_day,
};
use super::{
    Apsis, ApsisKind, Body, EphemerisProvider, Observer, SearchDirection, SeasonalEvents, lunar,
    instant_from_millis, wrap_signed_degrees,
};
use crate::constants::MILLIS_PER_DAY;
use crate::error::EphemerisError;

/// Iteration cap for the Newton searches. Each converges in under ten steps.
const MAX_REFINEMENTS: u32 = 50;

/// Apsides are tried this many half-orbits past the first estimate before giving up.
const MAX_APSIS_CANDIDATES: u32 = 8;

/// Seasonal targets: apparent solar longitude and a first guess (month, day) at 12:00 UTC.
const SEASON_TARGETS: [(f64, u32, u32); 4] =
    [(0.0, 3, 20), (90.0, 6, 21), (180.0, 9, 22), (270.0, 12, 21)];

/// Newton iteration on whole milliseconds from `start`.
///
/// `step_at` returns the correction predicted at a timestamp. The search ends when
/// the correction is at most one millisecond, or when it flips sign without
/// shrinking; the rate used for the step is a mean rate, so the last step can
/// overshoot by a millisecond either way. In the flip case the timestamp with the
/// smaller correction wins.
fn refine_millis<F>(
    start: DateTime<Utc>,
    operation: &'static str,
    mut step_at: F,
) -> Result<DateTime<Utc>, EphemerisError>
where
    F: FnMut(i64) -> i64,
{
    let mut millis = start.timestamp_millis();
    let mut previous: Option<(i64, i64)> = None;

    for _ in 0..MAX_REFINEMENTS {
        let step = step_at(millis);
        if step.abs() <= 1 {
            return instant_from_millis(millis, operation);
        }
        if let Some((previous_millis, previous_step)) = previous
            && previous_step.signum() != step.signum()
            && step.abs() >= previous_step.abs()
        {
            let best = if previous_step.abs() < step.abs() {
                previous_millis
            } else {
                millis
            };
            return instant_from_millis(best, operation);
        }
        previous = Some((millis, step));
        millis += step;
    }

    Err(EphemerisError::NoConvergence {
        operation,
        instant: start,
    })
}

/// Closed-form ephemeris after Meeus and the NOAA solar calculator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeeusEphemeris;

impl MeeusEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Instant the Sun's apparent longitude reaches `target`, starting near `guess`.
    fn solve_solar_longitude(
        &self,
        target: f64,
        guess: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, EphemerisError> {
        refine_millis(guess, "seasonal event", |millis| {
            let longitude = solar::sun_apparent_lon(julian_centuries_tt(millis));
            let days = wrap_signed_degrees(target - longitude) / MEAN_SOLAR_MOTION_DEG_PER_DAY;
            (days * MILLIS_PER_DAY as f64).round() as i64
        })
    }

    /// Earth apsis for `half_cycles` half-orbits after the January 2000 perihelion.
    ///
    /// Meeus chapter 38 with the corrections that move the Earth–Moon barycenter
    /// result onto Earth itself.
    fn apsis_at(half_cycles: i64) -> Result<Apsis, EphemerisError> {
        let k = half_cycles as f64 / 2.0;
        let kind = if half_cycles.rem_euclid(2) == 0 {
            ApsisKind::Perihelion
        } else {
            ApsisKind::Aphelion
        };

        let jde = 2_451_547.507 + 365.259_635_8 * k + 0.000_000_015_6 * k * k;
        let a = [
            328.41 + 132.788585 * k,
            316.13 + 584.903153 * k,
            346.20 + 450.380738 * k,
            136.95 + 659.306737 * k,
            249.52 + 329.653368 * k,
        ]
        .map(|angle: f64| angle.to_radians().sin());
        let correction = match kind {
            ApsisKind::Perihelion => {
                1.278 * a[0] - 0.055 * a[1] - 0.091 * a[2] - 0.056 * a[3] - 0.045 * a[4]
            }
            ApsisKind::Aphelion => {
                -1.352 * a[0] + 0.061 * a[1] + 0.062 * a[2] + 0.029 * a[3] + 0.031 * a[4]
            }
        };

        let tt_millis = millis_from_julian_day(jde + correction);
        let ut_millis = tt_millis
            - (delta_t_seconds(solar::decimal_year(tt_millis)) * 1000.0).round() as i64;
        Ok(Apsis {
            kind,
            instant: instant_from_millis(ut_millis, "apsis")?,
        })
    }
}

impl EphemerisProvider for MeeusEphemeris {
    fn heliocentric_longitude(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        Ok(solar::earth_heliocentric_lon(julian_centuries_tt(
            instant.timestamp_millis(),
        )))
    }

    fn seasonal_events(&self, year: i32) -> Result<SeasonalEvents, EphemerisError> {
        let mut instants = [DateTime::<Utc>::UNIX_EPOCH; 4];
        for (slot, &(target, month, day)) in instants.iter_mut().zip(SEASON_TARGETS.iter()) {
            let guess = Utc
                .with_ymd_and_hms(year, month, day, 12, 0, 0)
                .single()
                .ok_or(EphemerisError::InstantOutOfRange {
                    operation: "seasonal event",
                })?;
            *slot = self.solve_solar_longitude(target, guess)?;
        }

        let [spring_equinox, summer_solstice, autumn_equinox, winter_solstice] = instants;
        Ok(SeasonalEvents {
            spring_equinox,
            summer_solstice,
            autumn_equinox,
            winter_solstice,
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

        let year = solar::decimal_year(search_start.timestamp_millis());
        // Start one half-orbit early so the estimate never overshoots
        let mut half_cycles = (2.0 * 0.99997 * (year - 2000.01)).floor() as i64 - 1;
        for _ in 0..MAX_APSIS_CANDIDATES {
            let apsis = Self::apsis_at(half_cycles)?;
            if apsis.instant > search_start {
                return Ok(apsis);
            }
            half_cycles += 1;
        }

        Err(EphemerisError::NoConvergence {
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

        let mut millis = around.timestamp_millis();
        let current = solar::sun_hour_angle(millis, observer.longitude);
        let residual = wrap_signed_degrees(target_hour_angle - current);
        if (residual / 360.0 * MILLIS_PER_DAY as f64).round() == 0.0 {
            // Already on the crossing
            return Ok(around);
        }

        let mut delta = residual.rem_euclid(360.0);
        if direction == SearchDirection::Backward && delta > 0.0 {
            delta -= 360.0;
        }
        millis += (delta / 360.0 * MILLIS_PER_DAY as f64).round() as i64;

        let start = instant_from_millis(millis, "hour angle crossing")?;
        refine_millis(start, "hour angle crossing", |millis| {
            let residual = wrap_signed_degrees(
                target_hour_angle - solar::sun_hour_angle(millis, observer.longitude),
            );
            (residual / 360.0 * MILLIS_PER_DAY as f64).round() as i64
        })
    }

    fn lunar_phase_angle(&self, instant: DateTime<Utc>) -> Result<f64, EphemerisError> {
        Ok(lunar::phase_angle(julian_centuries_tt(
            instant.timestamp_millis(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MAXIMUM_YEAR, MINIMUM_YEAR};
    use chrono::{Datelike, Duration};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn assert_near(actual: DateTime<Utc>, expected: DateTime<Utc>, tolerance: Duration) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "{actual} differs from {expected} by {diff}"
        );
    }

    #[test]
    fn test_seasonal_events_2025() {
        let events = MeeusEphemeris::new().seasonal_events(2025).unwrap();
        let tolerance = Duration::minutes(30);
        assert_near(events.spring_equinox, utc(2025, 3, 20, 9, 1), tolerance);
        assert_near(events.summer_solstice, utc(2025, 6, 21, 2, 42), tolerance);
        assert_near(events.autumn_equinox, utc(2025, 9, 22, 18, 19), tolerance);
        assert_near(events.winter_solstice, utc(2025, 12, 21, 15, 3), tolerance);
    }

    #[test]
    fn test_seasonal_events_every_supported_year() {
        let provider = MeeusEphemeris::new();
        let mut failures = Vec::new();
        for year in MINIMUM_YEAR..=MAXIMUM_YEAR + 1 {
            match provider.seasonal_events(year) {
                Ok(events) => {
                    assert!(events.spring_equinox < events.summer_solstice, "{year}");
                    assert!(events.summer_solstice < events.autumn_equinox, "{year}");
                    assert!(events.autumn_equinox < events.winter_solstice, "{year}");
                    assert_eq!(events.spring_equinox.year(), year);
                }
                Err(e) => failures.push((year, e)),
            }
        }
        assert!(failures.is_empty(), "failing years: {failures:?}");
    }

    #[test]
    fn test_winter_solstice_2026() {
        let events = MeeusEphemeris::new().seasonal_events(2026).unwrap();
        assert_near(events.winter_solstice, utc(2026, 12, 21, 20, 50), Duration::minutes(30));
    }

    #[test]
    fn test_refinement_accepts_one_millisecond_overshoot() {
        let start = utc(2025, 1, 1, 0, 0);
        let root = start.timestamp_millis() + 5_000;
        // Mean-rate steps that land one millisecond past the root either way
        let found = refine_millis(start, "test", |millis| {
            if millis < root { root - millis + 1 } else { -1 }
        })
        .unwrap();
        assert!((found.timestamp_millis() - root).abs() <= 1);
    }

    #[test]
    fn test_refinement_stops_on_oscillation() {
        let start = utc(2025, 1, 1, 0, 0);
        let root = start.timestamp_millis() + 5_000;
        let found = refine_millis(start, "test", |millis| {
            if millis <= root { root - millis + 2 } else { -(millis - root + 2) }
        })
        .unwrap();
        assert!((found.timestamp_millis() - root).abs() <= 2);

        let diverging = refine_millis(start, "test", |_| 10);
        assert!(matches!(
            diverging,
            Err(EphemerisError::NoConvergence { operation: "test", .. })
        ));
    }

    #[test]
    fn test_seasonal_events_are_deterministic() {
        let provider = MeeusEphemeris::new();
        assert_eq!(
            provider.seasonal_events(1999).unwrap(),
            provider.seasonal_events(1999).unwrap()
        );
    }

    #[test]
    fn test_earth_longitude_at_equinox() {
        let provider = MeeusEphemeris::new();
        let spring = provider.seasonal_events(2025).unwrap().spring_equinox;
        let lon = provider.heliocentric_longitude(spring).unwrap();
        // Earth is opposite the Sun; apparent vs geometric differs by ~0.006°
        assert!((lon - 180.0).abs() < 0.02, "longitude {lon}");
    }

    #[test]
    fn test_apsides_2025() {
        let provider = MeeusEphemeris::new();
        let first = provider
            .search_apsis(Body::Earth, utc(2025, 1, 1, 0, 0))
            .unwrap();
        assert_eq!(first.kind, ApsisKind::Perihelion);
        assert_near(first.instant, utc(2025, 1, 4, 13, 28), Duration::hours(12));

        let second = provider.next_apsis(Body::Earth, &first).unwrap();
        assert_eq!(second.kind, ApsisKind::Aphelion);
        assert_near(second.instant, utc(2025, 7, 3, 19, 55), Duration::hours(12));

        let third = provider.next_apsis(Body::Earth, &second).unwrap();
        assert_eq!(third.kind, ApsisKind::Perihelion);
        assert_eq!(third.instant.year(), 2026);
    }

    #[test]
    fn test_apsis_search_is_strictly_after_start() {
        let provider = MeeusEphemeris::new();
        let perihelion = provider
            .search_apsis(Body::Earth, utc(2025, 1, 1, 0, 0))
            .unwrap();
        let again = provider
            .search_apsis(Body::Earth, perihelion.instant)
            .unwrap();
        assert_eq!(again.kind, ApsisKind::Aphelion);
    }

    #[test]
    fn test_unsupported_bodies() {
        let provider = MeeusEphemeris::new();
        let observer = Observer::new(0.0, 0.0, 0.0);
        assert!(matches!(
            provider.search_apsis(Body::Moon, utc(2025, 1, 1, 0, 0)),
            Err(EphemerisError::UnsupportedBody { body: Body::Moon, .. })
        ));
        assert!(matches!(
            provider.hour_angle_crossing(
                Body::Moon,
                &observer,
                0.0,
                utc(2025, 1, 1, 0, 0),
                SearchDirection::Forward
            ),
            Err(EphemerisError::UnsupportedBody { .. })
        ));
    }

    #[test]
    fn test_solar_noon_new_york() {
        let provider = MeeusEphemeris::new();
        let observer = Observer::new(41.454380, -74.430420, 0.0);
        // Local midnight EDT on 2025-03-20
        let midnight = utc(2025, 3, 20, 4, 0);
        let noon = provider
            .hour_angle_crossing(
                Body::Sun,
                &observer,
                0.0,
                midnight,
                SearchDirection::Forward,
            )
            .unwrap();
        // 12:00 mean solar time at 74.43°W is 16:57:43 UTC; equation of time ≈ -7.5 min
        assert_near(noon, utc(2025, 3, 20, 17, 5), Duration::minutes(2));
    }

    #[test]
    fn test_hour_angle_crossing_directions() {
        let provider = MeeusEphemeris::new();
        let observer = Observer::new(51.5, -0.1, 0.0);
        let noon = provider
            .hour_angle_crossing(
                Body::Sun,
                &observer,
                0.0,
                utc(2025, 6, 1, 0, 0),
                SearchDirection::Forward,
            )
            .unwrap();
        let before = provider
            .hour_angle_crossing(Body::Sun, &observer, 180.0, noon, SearchDirection::Backward)
            .unwrap();
        let after = provider
            .hour_angle_crossing(Body::Sun, &observer, 180.0, noon, SearchDirection::Forward)
            .unwrap();

        assert!(before < noon && noon < after);
        assert_near(noon - Duration::hours(12), before, Duration::minutes(1));
        assert_near(noon + Duration::hours(12), after, Duration::minutes(1));

        // Searching again from the found instant returns it unchanged
        let same = provider
            .hour_angle_crossing(Body::Sun, &observer, 0.0, noon, SearchDirection::Backward)
            .unwrap();
        assert!((same - noon).abs() <= Duration::milliseconds(1));
    }

    #[test]
    fn test_lunar_phase_range() {
        let provider = MeeusEphemeris::new();
        let phase = provider.lunar_phase_angle(utc(2025, 2, 12, 13, 53)).unwrap();
        assert!((0.0..360.0).contains(&phase));
        assert!((phase - 180.0).abs() < 1.0);
    }
}
