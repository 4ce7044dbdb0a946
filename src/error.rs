//! Error types for calendar generation.
//!
//! Two layers exist: [`EphemerisError`] is what an ephemeris provider reports for a
//! single query, and [`CalendarError`] is what a whole generation pass reports to
//! its caller. Parameter problems are caught before the first provider call so the
//! two kinds never mix.

use chrono::{DateTime, Utc};

use crate::ephemeris::Body;

/// Failure reported by an [`EphemerisProvider`](crate::ephemeris::EphemerisProvider).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EphemerisError {
    /// The provider cannot answer this query for the requested body.
    #[error("{operation} is not supported for {body:?}")]
    UnsupportedBody {
        /// Query that was attempted.
        operation: &'static str,
        /// Body the query was made for.
        body: Body,
    },

    /// An iterative search inside the provider did not settle.
    #[error("{operation} did not converge near {instant}")]
    NoConvergence {
        /// Query that was attempted.
        operation: &'static str,
        /// Instant the search was centered on.
        instant: DateTime<Utc>,
    },

    /// The provider produced a value outside its documented range.
    #[error("{quantity} out of range at {instant}: {value}")]
    InvalidValue {
        /// Name of the offending quantity.
        quantity: &'static str,
        /// Instant the value was computed for.
        instant: DateTime<Utc>,
        /// The value itself.
        value: f64,
    },

    /// An instant could not be represented (arithmetic left the chrono range).
    #[error("instant out of range while computing {operation}")]
    InstantOutOfRange {
        /// Query that was attempted.
        operation: &'static str,
    },

    /// A set of events came back out of chronological order.
    #[error("{detail} (year {year})")]
    InconsistentEvents {
        /// Year the events were requested for.
        year: i32,
        /// What was wrong with them.
        detail: String,
    },
}

impl EphemerisError {
    /// Instant the failing query concerned, when one is known.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::NoConvergence { instant, .. } | Self::InvalidValue { instant, .. } => {
                Some(*instant)
            }
            Self::UnsupportedBody { .. }
            | Self::InstantOutOfRange { .. }
            | Self::InconsistentEvents { .. } => None,
        }
    }
}

/// Failure of a complete calendar generation pass.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Parameters were rejected before any computation began.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The ephemeris provider failed; the pass was aborted.
    #[error("ephemeris failure while generating year {year}{}: {source}", fmt_instant(.instant))]
    Ephemeris {
        /// Calendar year being generated.
        year: i32,
        /// Offending instant, when the provider reported one.
        instant: Option<DateTime<Utc>>,
        /// Underlying provider error.
        #[source]
        source: EphemerisError,
    },
}

fn fmt_instant(instant: &Option<DateTime<Utc>>) -> String {
    instant
        .map(|i| format!(" at {}", i.to_rfc3339()))
        .unwrap_or_default()
}

impl CalendarError {
    /// Wrap a provider failure with the year being generated.
    pub fn ephemeris(year: i32, source: EphemerisError) -> Self {
        Self::Ephemeris {
            year,
            instant: source.instant(),
            source,
        }
    }

    /// True for errors raised before any ephemeris call was made.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidParameters(_))
    }
}
