//! Reference frame normalization.
//!
//! Every orbital degree in the crate is measured from a Spring Equinox reference
//! longitude and lives in `[0, 360)`. This module is the only place that performs
//! the subtraction and the wrap, so the seam at 360°→0° is handled once.

use std::fmt;

use serde::Serialize;

use crate::constants::{
    DISPLAY_DECIMALS, FULL_CIRCLE_DEGREES, MONTH_SPAN_DEGREES, MONTHS_PER_YEAR,
};

/// Offset from a Spring Equinox reference longitude, in `[0, 360)`.
///
/// Only the normalizer functions below can create one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ReferenceDegree(f64);

impl ReferenceDegree {
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Orbital month bucket, `0..12`, using the floor rule.
    pub fn month_bucket(self) -> usize {
        let bucket = (self.0 / MONTH_SPAN_DEGREES).floor() as usize;
        // Index 12 only arises from a 360.0 that slipped through; it belongs to month 0
        if bucket >= MONTHS_PER_YEAR { 0 } else { bucket }
    }

    /// Same degree rounded to display precision.
    pub fn rounded(self) -> Self {
        Self(round_into_circle(self.0))
    }
}

impl fmt::Display for ReferenceDegree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.0)
    }
}

/// Unrounded offset of `longitude` from `reference_longitude`.
///
/// Used by the target search, where display rounding would hide the
/// 0.001° tolerance.
pub fn normalize_precise(longitude: f64, reference_longitude: f64) -> ReferenceDegree {
    let offset =
        (longitude - reference_longitude + FULL_CIRCLE_DEGREES).rem_euclid(FULL_CIRCLE_DEGREES);
    // rem_euclid can return exactly 360.0 for tiny negative inputs
    if offset >= FULL_CIRCLE_DEGREES {
        ReferenceDegree(0.0)
    } else {
        ReferenceDegree(offset)
    }
}

/// Offset of `longitude` from `reference_longitude`, rounded to two decimals.
///
/// Used for month classification and display. A value that rounds up to 360.00
/// wraps to 0.00.
pub fn normalize(longitude: f64, reference_longitude: f64) -> ReferenceDegree {
    normalize_precise(longitude, reference_longitude).rounded()
}

fn round_into_circle(degrees: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    let rounded = (degrees * scale).round() / scale;
    if rounded >= FULL_CIRCLE_DEGREES { 0.0 } else { rounded }
}

/// Smallest angle between two degrees on the circle, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(FULL_CIRCLE_DEGREES);
    d.min(FULL_CIRCLE_DEGREES - d)
}
