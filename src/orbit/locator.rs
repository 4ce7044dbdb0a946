//! Orbital target search.
//!
//! Finds the instant in an orbital year at which Earth's reference degree equals a
//! fixed target. The search runs in two stages: a cheap filter over solar day
//! windows using the degrees at their edges, then a bisection over millisecond
//! timestamps inside each candidate window.
//!
//! Reference degrees wrap from 360 back to 0 once per year, so a window can start
//! at 359.8° and end at 0.7°. Both the filter ([`covers_target`]) and the bisection
//! direction ([`bisection_step`]) handle that case explicitly.

use chrono::{DateTime, Utc};

use super::frame::{ReferenceDegree, angular_distance, normalize_precise};
use super::memo::LongitudeMemo;
use crate::constants::{
    BISECTION_MAX_ITERATIONS, BISECTION_TOLERANCE_DEGREES, FULL_CIRCLE_DEGREES,
};
use crate::ephemeris::{EphemerisProvider, instant_from_millis};
use crate::error::EphemerisError;
use crate::solar_day::SolarDayWindow;

/// Whether a window whose edges sit at `start_degree` and `end_degree` can contain
/// `target`.
///
/// When `start_degree > end_degree` the window crosses the 360/0 seam and covers
/// everything from `start_degree` up and everything up to `end_degree`.
pub fn covers_target(start_degree: f64, end_degree: f64, target: f64) -> bool {
    if start_degree <= end_degree {
        start_degree <= target && target <= end_degree
    } else {
        target >= start_degree || target <= end_degree
    }
}

/// Which half of the current interval the bisection keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// Target lies before the probe: keep `[low, mid]`.
    Lower,
    /// Target lies at or after the probe: keep `[mid, high]`.
    Upper,
}

/// Decide where `target` lies relative to `probe` inside a window spanning
/// `start_degree..end_degree`.
///
/// In a seam-crossing window, degrees below `start_degree` are lifted by 360 so the
/// window becomes one increasing run before comparing.
pub fn bisection_step(
    start_degree: f64,
    end_degree: f64,
    probe: f64,
    target: f64,
) -> SearchStep {
    let unwrap = |degree: f64| {
        if start_degree > end_degree && degree < start_degree {
            degree + FULL_CIRCLE_DEGREES
        } else {
            degree
        }
    };

    if unwrap(target) < unwrap(probe) {
        SearchStep::Lower
    } else {
        SearchStep::Upper
    }
}

/// Result of a successful bisection inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub millis: i64,
    pub iterations: u32,
}

/// Bisect `[start_millis, end_millis]` for the timestamp where `degree_at` is within
/// tolerance of `target`.
///
/// `start_degree` and `end_degree` are the degrees at the interval edges. Returns
/// `Ok(None)` if the iteration budget runs out or the interval collapses without a
/// match.
pub fn bisect<F>(
    start_millis: i64,
    end_millis: i64,
    start_degree: f64,
    end_degree: f64,
    target: f64,
    mut degree_at: F,
) -> Result<Option<Crossing>, EphemerisError>
where
    F: FnMut(i64) -> Result<f64, EphemerisError>,
{
    let mut low = start_millis;
    let mut high = end_millis;

    for iteration in 1..=BISECTION_MAX_ITERATIONS {
        if high - low < 1 {
            break;
        }
        let mid = low + (high - low) / 2;
        let probe = degree_at(mid)?;

        if angular_distance(probe, target) < BISECTION_TOLERANCE_DEGREES {
            return Ok(Some(Crossing {
                millis: mid,
                iterations: iteration,
            }));
        }

        match bisection_step(start_degree, end_degree, probe, target) {
            SearchStep::Lower => high = mid,
            SearchStep::Upper if low == mid => break,
            SearchStep::Upper => low = mid,
        }
    }

    Ok(None)
}

/// Where the orbital birthday ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMatch {
    /// Bisection converged inside the window at `day_index`.
    Located {
        instant: DateTime<Utc>,
        day_index: usize,
        iterations: u32,
    },
    /// No window produced a match; the raw birth instant is used instead.
    Fallback { instant: DateTime<Utc> },
}

impl TargetMatch {
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Self::Located { instant, .. } | Self::Fallback { instant } => *instant,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Scan `windows` in order for the crossing of `target`.
///
/// Every candidate window is bisected. If more than one converges, the last one
/// processed is kept. If none converges the result is `fallback`.
pub fn locate_target<E: EphemerisProvider + ?Sized>(
    memo: &mut LongitudeMemo<'_, E>,
    windows: &[SolarDayWindow],
    reference_longitude: f64,
    target: ReferenceDegree,
    fallback: DateTime<Utc>,
) -> Result<TargetMatch, EphemerisError> {
    let target = target.degrees();
    let mut found: Option<TargetMatch> = None;

    for (day_index, window) in windows.iter().enumerate() {
        let start_degree =
            normalize_precise(memo.longitude_at(window.start)?, reference_longitude).degrees();
        let end_degree =
            normalize_precise(memo.longitude_at(window.end)?, reference_longitude).degrees();

        if !covers_target(start_degree, end_degree, target) {
            continue;
        }

        log_debug!(
            "Target {:.4}° is inside {} ({:.4}° .. {:.4}°)",
            target,
            window.civil_date,
            start_degree,
            end_degree
        );

        let crossing = bisect(
            window.start.timestamp_millis(),
            window.end.timestamp_millis(),
            start_degree,
            end_degree,
            target,
            |millis| {
                let instant = instant_from_millis(millis, "target bisection")?;
                Ok(normalize_precise(memo.longitude_at(instant)?, reference_longitude).degrees())
            },
        )?;

        match crossing {
            Some(crossing) => {
                let instant = instant_from_millis(crossing.millis, "target bisection")?;
                log_debug!(
                    "Target reached at {} after {} iterations",
                    instant.to_rfc3339(),
                    crossing.iterations
                );
                found = Some(TargetMatch::Located {
                    instant,
                    day_index,
                    iterations: crossing.iterations,
                });
            }
            None => log_debug!("Bisection inside {} did not converge", window.civil_date),
        }
    }

    Ok(found.unwrap_or_else(|| {
        log_warning!(
            "Orbital target {:.4}° not found in any solar day, using birth instant {}",
            target,
            fallback.to_rfc3339()
        );
        TargetMatch::Fallback { instant: fallback }
    }))
}
