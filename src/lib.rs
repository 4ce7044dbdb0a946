//! # Orbitcal Library
//!
//! Builds calendars whose years, months and days follow Earth's position around the
//! Sun instead of civil convention.
//!
//! ## Architecture
//!
//! - **Ephemeris**: `ephemeris` defines the [`EphemerisProvider`] trait the engine
//!   consumes and ships the analytic [`MeeusEphemeris`]
//! - **Orbit**: `orbit` measures reference degrees from a spring equinox, caches
//!   longitude lookups and searches for the orbital birthday
//! - **Solar days**: `solar_day` turns a civil date into a noon-centred solar day
//! - **Calendar**: `calendar` assembles one orbital year into twelve 30° months
//! - **Infrastructure**: civil time parsing, TOML configuration, logging, errors
//!
//! ```no_run
//! use orbitcal::{MeeusEphemeris, generate_calendar};
//!
//! let calendar = generate_calendar(
//!     2025,
//!     "2000-02-04",
//!     "10:00",
//!     "America/New_York",
//!     41.454380,
//!     -74.430420,
//!     0.0,
//!     &MeeusEphemeris::new(),
//! )?;
//! assert_eq!(calendar.months().len(), 12);
//! # Ok::<(), orbitcal::CalendarError>(())
//! ```

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod calendar;
pub mod civil;
pub mod config;
pub mod constants;
pub mod ephemeris;
pub mod error;
pub mod orbit;
pub mod report;
pub mod solar_day;

pub use calendar::{
    CalendarRequest, CalendarYear, DayRecord, EventTag, MonthRecord, generate, generate_calendar,
};
pub use ephemeris::{EphemerisProvider, MeeusEphemeris, Observer};
pub use error::{CalendarError, EphemerisError};
