//! Lunar longitude and phase angle.
//!
//! Uses the fundamental arguments of Meeus chapter 47 and the ten largest
//! periodic terms of the Moon's longitude. The result is good to roughly 0.3°,
//! which is under an hour of lunar motion and plenty for 45° phase bins.

use super::solar::sun_apparent_lon;

/// Periodic longitude terms: (D, M, M', F multipliers, coefficient in degrees).
const LONGITUDE_TERMS: [(f64, f64, f64, f64, f64); 10] = [
    (0.0, 0.0, 1.0, 0.0, 6.288774),
    (2.0, 0.0, -1.0, 0.0, 1.274027),
    (2.0, 0.0, 0.0, 0.0, 0.658314),
    (0.0, 0.0, 2.0, 0.0, 0.213618),
    (0.0, 1.0, 0.0, 0.0, -0.185116),
    (0.0, 0.0, 0.0, 2.0, -0.114332),
    (2.0, 0.0, -2.0, 0.0, 0.058793),
    (2.0, -1.0, -1.0, 0.0, 0.057066),
    (2.0, 0.0, 1.0, 0.0, 0.053322),
    (2.0, -1.0, 0.0, 0.0, 0.045758),
];

/// Geocentric ecliptic longitude of the Moon in `[0, 360)`.
///
/// `t` is Julian centuries since J2000.0 (TT).
pub fn moon_longitude(t: f64) -> f64 {
    let mean_longitude = 218.3164477 + 481267.88123421 * t;
    let elongation = 297.8501921 + 445267.1114034 * t;
    let sun_anomaly = 357.5291092 + 35999.0502909 * t;
    let moon_anomaly = 134.9633964 + 477198.8675055 * t;
    let latitude_argument = 93.2720950 + 483202.0175233 * t;

    let periodic: f64 = LONGITUDE_TERMS
        .iter()
        .map(|&(d, m, mp, f, coefficient)| {
            let argument =
                d * elongation + m * sun_anomaly + mp * moon_anomaly + f * latitude_argument;
            coefficient * argument.to_radians().sin()
        })
        .sum();

    (mean_longitude + periodic).rem_euclid(360.0)
}

/// Moon–Sun elongation in ecliptic longitude, `[0, 360)`.
pub fn phase_angle(t: f64) -> f64 {
    (moon_longitude(t) - sun_apparent_lon(t)).rem_euclid(360.0)
}
