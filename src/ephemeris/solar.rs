//! Solar position series.
//!
//! Based on the NOAA solar calculator equations, which in turn follow
//! "Astronomical Algorithms" by Jean Meeus. Accuracy is around 0.01° in
//! longitude and a few seconds in the equation of time for dates within a couple
//! of centuries of J2000, which is far below what the calendar needs.
//!
//! Angles are returned in degrees unless the name says otherwise. The argument
//! `t` is always Julian centuries since J2000.0 on the TT scale.

use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const JD_UNIX_EPOCH: f64 = 2_440_587.5;
const JD_J2000: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;
const DAYS_PER_GREGORIAN_YEAR: f64 = 365.2425;

/// Mean daily motion of the Sun in ecliptic longitude.
pub const MEAN_SOLAR_MOTION_DEG_PER_DAY: f64 = 0.985_647_36;

// # Time Scales

/// Julian day (UT) of an instant.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    julian_day_from_millis(instant.timestamp_millis())
}

/// Julian day (UT) of a millisecond Unix timestamp.
pub fn julian_day_from_millis(millis: i64) -> f64 {
    millis as f64 / MILLIS_PER_DAY + JD_UNIX_EPOCH
}

/// Millisecond Unix timestamp of a Julian day (UT), rounded to the nearest millisecond.
pub fn millis_from_julian_day(jd: f64) -> i64 {
    ((jd - JD_UNIX_EPOCH) * MILLIS_PER_DAY).round() as i64
}

/// Decimal Gregorian year of a millisecond timestamp, precise enough for ΔT.
pub fn decimal_year(millis: i64) -> f64 {
    1970.0 + millis as f64 / MILLIS_PER_DAY / DAYS_PER_GREGORIAN_YEAR
}

/// ΔT = TT − UT in seconds.
///
/// Espenak & Meeus polynomial fits. Outside 1800–2150 the long-term parabola
/// is used, which only matters for the validation range edges.
pub fn delta_t_seconds(year: f64) -> f64 {
    match year {
        y if (1800.0..1860.0).contains(&y) => {
            let t = y - 1800.0;
            13.72 - 0.332447 * t + 0.0068612 * t.powi(2) + 0.0041116 * t.powi(3)
                - 0.00037436 * t.powi(4)
                + 0.0000121272 * t.powi(5)
                - 0.0000001699 * t.powi(6)
                + 0.000000000875 * t.powi(7)
        }
        y if (1860.0..1900.0).contains(&y) => {
            let t = y - 1860.0;
            7.62 + 0.5737 * t - 0.251754 * t.powi(2) + 0.01680668 * t.powi(3)
                - 0.0004473624 * t.powi(4)
                + t.powi(5) / 233_174.0
        }
        y if (1900.0..1920.0).contains(&y) => {
            let t = y - 1900.0;
            -2.79 + 1.494119 * t - 0.0598939 * t.powi(2) + 0.0061966 * t.powi(3)
                - 0.000197 * t.powi(4)
        }
        y if (1920.0..1941.0).contains(&y) => {
            let t = y - 1920.0;
            21.20 + 0.84493 * t - 0.076100 * t.powi(2) + 0.0020936 * t.powi(3)
        }
        y if (1941.0..1961.0).contains(&y) => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2547.0
        }
        y if (1961.0..1986.0).contains(&y) => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
        }
        y if (1986.0..2005.0).contains(&y) => {
            let t = y - 2000.0;
            63.86 + 0.3345 * t - 0.060374 * t.powi(2)
                + 0.0017275 * t.powi(3)
                + 0.000651814 * t.powi(4)
                + 0.00002373599 * t.powi(5)
        }
        y if (2005.0..2050.0).contains(&y) => {
            let t = y - 2000.0;
            62.92 + 0.32217 * t + 0.005589 * t.powi(2)
        }
        y if (2050.0..2150.0).contains(&y) => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u.powi(2) - 0.5628 * (2150.0 - y)
        }
        y => {
            let u = (y - 1820.0) / 100.0;
            -20.0 + 32.0 * u.powi(2)
        }
    }
}

/// Julian centuries since J2000.0 (TT) for a millisecond UT timestamp.
pub fn julian_centuries_tt(millis: i64) -> f64 {
    let delta_t_days = delta_t_seconds(decimal_year(millis)) / 86_400.0;
    (julian_day_from_millis(millis) + delta_t_days - JD_J2000) / DAYS_PER_CENTURY
}

/// Julian centuries since J2000.0 (TT) → Julian ephemeris day.
pub fn julian_ephemeris_day(t: f64) -> f64 {
    t * DAYS_PER_CENTURY + JD_J2000
}

// # Sun Series

/// Geometric mean longitude of the Sun, in `[0, 360)`.
pub fn sun_geom_mean_lon(t: f64) -> f64 {
    (280.46646 + t * (36000.76983 + t * 0.0003032)).rem_euclid(360.0)
}

/// Geometric mean anomaly of the Sun.
pub fn sun_geom_mean_anomaly(t: f64) -> f64 {
    357.52911 + t * (35999.05029 - t * 0.0001537)
}

/// Eccentricity of Earth's orbit (unitless).
pub fn earth_orbit_eccentricity(t: f64) -> f64 {
    0.016708634 - t * (0.000042037 + t * 0.0000001267)
}

/// Equation of center of the Sun.
pub fn sun_equation_of_center(t: f64) -> f64 {
    let m = sun_geom_mean_anomaly(t).to_radians();
    m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * m).sin() * 0.000289
}

/// Geometric (true) geocentric longitude of the Sun, in `[0, 360)`.
pub fn sun_true_lon(t: f64) -> f64 {
    (sun_geom_mean_lon(t) + sun_equation_of_center(t)).rem_euclid(360.0)
}

/// Apparent geocentric longitude of the Sun (nutation and aberration), in `[0, 360)`.
pub fn sun_apparent_lon(t: f64) -> f64 {
    let omega = (125.04 - 1934.136 * t).to_radians();
    (sun_true_lon(t) - 0.00569 - 0.00478 * omega.sin()).rem_euclid(360.0)
}

/// Heliocentric longitude of Earth: the Sun's geometric longitude seen from the
/// other end of the Earth–Sun line.
pub fn earth_heliocentric_lon(t: f64) -> f64 {
    (sun_true_lon(t) + 180.0).rem_euclid(360.0)
}

/// Mean obliquity of the ecliptic.
pub fn mean_ecliptic_obliquity(t: f64) -> f64 {
    let sec = 21.448 - t * (46.815 + t * (0.00059 - t * 0.001813));
    23.0 + (26.0 + sec / 60.0) / 60.0
}

/// Obliquity corrected for nutation.
pub fn obliquity_corr(t: f64) -> f64 {
    let omega = 125.04 - t * 1934.136;
    mean_ecliptic_obliquity(t) + 0.00256 * omega.to_radians().cos()
}

/// Difference between apparent and mean solar time, in minutes.
pub fn equation_of_time(t: f64) -> f64 {
    let epsilon = obliquity_corr(t).to_radians();
    let l_0 = sun_geom_mean_lon(t).to_radians();
    let e = earth_orbit_eccentricity(t);
    let m = sun_geom_mean_anomaly(t).to_radians();
    let y = (epsilon / 2.0).tan().powi(2);

    let eq_time = y * (2.0 * l_0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l_0).cos()
        - 0.5 * y * y * (4.0 * l_0).sin()
        - 1.25 * e * e * (2.0 * m).sin();
    4.0 * eq_time.to_degrees()
}

/// Local hour angle of the Sun in `[0, 360)` at a millisecond UT timestamp.
///
/// 0 is the upper meridian transit (apparent noon), 180 apparent midnight.
pub fn sun_hour_angle(millis: i64, observer_longitude: f64) -> f64 {
    let minutes_of_day = millis.rem_euclid(86_400_000) as f64 / 60_000.0;
    let true_solar_minutes =
        minutes_of_day + equation_of_time(julian_centuries_tt(millis)) + 4.0 * observer_longitude;
    (true_solar_minutes / 4.0 - 180.0).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t_of(y: i32, m: u32, d: u32, h: u32) -> f64 {
        let instant = Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap();
        julian_centuries_tt(instant.timestamp_millis())
    }

    #[test]
    fn test_julian_day_of_j2000() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(julian_day(j2000), JD_J2000);
        assert_eq!(millis_from_julian_day(JD_J2000), j2000.timestamp_millis());
    }

    #[test]
    fn test_delta_t_reasonable() {
        // Published values: ~63.8 s in 2000, ~69 s in 2020
        assert!((delta_t_seconds(2000.0) - 63.86).abs() < 0.5);
        assert!((delta_t_seconds(2020.0) - 71.6).abs() < 3.0);
        assert!((delta_t_seconds(1900.0) - (-2.79)).abs() < 0.01);
        // Segments should meet without large jumps
        for edge in [1860.0, 1900.0, 1920.0, 1941.0, 1961.0, 1986.0, 2005.0, 2050.0] {
            let jump = (delta_t_seconds(edge) - delta_t_seconds(edge - 1e-6)).abs();
            assert!(jump < 2.0, "ΔT jumps by {jump} s at {edge}");
        }
    }

    #[test]
    fn test_sun_longitude_near_equinox() {
        // March equinox 2025 is on March 20 around 09:01 UTC
        let lon = sun_apparent_lon(t_of(2025, 3, 20, 9));
        assert!(lon < 0.05 || lon > 359.95, "apparent longitude {lon}");
    }

    #[test]
    fn test_earth_opposite_sun() {
        let t = t_of(2025, 6, 21, 3);
        let diff = (earth_heliocentric_lon(t) - sun_true_lon(t)).rem_euclid(360.0);
        assert!((diff - 180.0).abs() < 1e-9);
        // Around the June solstice Earth sits near 270°
        assert!((earth_heliocentric_lon(t) - 270.0).abs() < 0.1);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Early November: sundial fast by ~16.4 minutes
        assert!((equation_of_time(t_of(2025, 11, 3, 12)) - 16.4).abs() < 0.5);
        // Mid February: sundial slow by ~14.2 minutes
        assert!((equation_of_time(t_of(2025, 2, 11, 12)) + 14.2).abs() < 0.5);
    }

    #[test]
    fn test_sun_hour_angle_at_greenwich_noon() {
        // Around the equation of time zero crossing (mid April), apparent noon at
        // Greenwich is within a couple of minutes of 12:00 UTC
        let noon = Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap();
        let ha = sun_hour_angle(noon.timestamp_millis(), 0.0);
        assert!(ha < 0.5 || ha > 359.5, "hour angle {ha}");
    }
}
