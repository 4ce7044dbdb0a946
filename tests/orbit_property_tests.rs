use proptest::prelude::*;

use orbitcal::orbit::locator::{bisect, covers_target};
use orbitcal::orbit::{angular_distance, normalize, normalize_precise};
use orbitcal::solar_day::MoonPhase;

/// Generate heliocentric longitudes, including values outside one turn
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -720.0..720.0
}

/// Generate spring equinox reference longitudes
fn reference_strategy() -> impl Strategy<Value = f64> {
    0.0..360.0
}

/// Property tests for reference degree normalization
#[cfg(test)]
mod normalization_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_normalized_degrees_stay_in_circle(
            longitude in longitude_strategy(),
            reference in reference_strategy()
        ) {
            let precise = normalize_precise(longitude, reference).degrees();
            let rounded = normalize(longitude, reference).degrees();

            prop_assert!((0.0..360.0).contains(&precise), "precise {precise}");
            prop_assert!((0.0..360.0).contains(&rounded), "rounded {rounded}");
            prop_assert!(angular_distance(precise, rounded) <= 0.005 + 1e-9);
        }

        #[test]
        fn test_month_bucket_in_range(
            longitude in longitude_strategy(),
            reference in reference_strategy()
        ) {
            let degree = normalize(longitude, reference);
            let bucket = degree.month_bucket();
            prop_assert!(bucket < 12);
            prop_assert!(degree.degrees() >= bucket as f64 * 30.0);
        }

        #[test]
        fn test_angular_distance_is_symmetric(a in longitude_strategy(), b in longitude_strategy()) {
            let forward = angular_distance(a, b);
            prop_assert!((0.0..=180.0).contains(&forward));
            prop_assert!((forward - angular_distance(b, a)).abs() < 1e-9);
        }

        #[test]
        fn test_moon_phase_total_over_circle(angle in 0.0..=360.0f64) {
            prop_assert!(!MoonPhase::from_angle(angle).label().is_empty());
        }
    }
}

/// Property tests for the wrap-aware bisection
#[cfg(test)]
mod bisection_tests {
    use super::*;

    const DAY_MILLIS: i64 = 86_400_000;

    /// Degree at `millis` for a body moving linearly from `start_degree`.
    fn linear_degree(start_degree: f64, span: f64, millis: i64) -> f64 {
        (start_degree + span * millis as f64 / DAY_MILLIS as f64).rem_euclid(360.0)
    }

    proptest! {
        #[test]
        fn test_window_covers_its_own_degrees(
            start in 0.0..360.0f64,
            span in 0.9..1.1f64,
            fraction in 0.0..=1.0f64
        ) {
            let end = (start + span).rem_euclid(360.0);
            let target = (start + span * fraction).rem_euclid(360.0);
            prop_assert!(covers_target(start, end, target),
                "window {start}..{end} should cover {target}");
        }

        #[test]
        fn test_bisection_converges_inside_window(
            start in 0.0..360.0f64,
            span in 0.9..1.1f64,
            fraction in 0.0..=1.0f64
        ) {
            let end = linear_degree(start, span, DAY_MILLIS);
            let target = (start + span * fraction).rem_euclid(360.0);

            let crossing = bisect(0, DAY_MILLIS, start, end, target, |millis| {
                Ok(linear_degree(start, span, millis))
            })
            .unwrap();

            let crossing = crossing.expect("target inside the window must be found");
            prop_assert!((0..=DAY_MILLIS).contains(&crossing.millis));
            prop_assert!(crossing.iterations <= 100);
            let found = linear_degree(start, span, crossing.millis);
            prop_assert!(angular_distance(found, target) < 0.001);
        }

        #[test]
        fn test_seam_crossing_windows(
            before_seam in 0.01..0.99f64,
            fraction in 0.0..=1.0f64
        ) {
            // Windows that start just below 360 and end just past 0
            let start = 360.0 - before_seam;
            let span = 1.0;
            let end = linear_degree(start, span, DAY_MILLIS);
            prop_assert!(end < start);

            let target = (start + span * fraction).rem_euclid(360.0);
            let crossing = bisect(0, DAY_MILLIS, start, end, target, |millis| {
                Ok(linear_degree(start, span, millis))
            })
            .unwrap();

            prop_assert!(crossing.is_some(), "no crossing for {target} in {start}..{end}");
        }
    }
}
