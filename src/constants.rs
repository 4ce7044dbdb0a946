//! Application-wide constants and default values.
//!
//! Numeric limits for configuration validation, the search tolerances used by the
//! orbital target locator, and the fixed geometry of the twelve orbital months all
//! live here so the rest of the crate never hardcodes them.

// # Search Parameters

/// Maximum bisection steps spent inside a single candidate solar day.
pub const BISECTION_MAX_ITERATIONS: u32 = 100;

/// Angular distance below which a bisection probe counts as the target crossing.
pub const BISECTION_TOLERANCE_DEGREES: f64 = 0.001;

// # Orbital Geometry

/// Width of one orbital month in reference degrees.
pub const MONTH_SPAN_DEGREES: f64 = 30.0;

/// Number of orbital months per orbital year.
pub const MONTHS_PER_YEAR: usize = 12;

/// Full turn in degrees.
pub const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// Decimal places kept by the display/classification normalizer.
pub const DISPLAY_DECIMALS: i32 = 2;

// # Solar Day Geometry

/// Hour angle of the Sun at local apparent noon.
pub const SOLAR_NOON_HOUR_ANGLE: f64 = 0.0;

/// Hour angle that bounds a solar day on both sides of noon (twelve hours away).
pub const SOLAR_DAY_BOUNDARY_HOUR_ANGLE: f64 = 180.0;

/// Nominal civil day length in milliseconds.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Width of one lunar phase bin in degrees.
pub const MOON_PHASE_BIN_DEGREES: f64 = 45.0;

// # Validation Limits

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

/// Lowest elevation accepted for an observer (Dead Sea shore is about -430 m).
pub const MINIMUM_ELEVATION: f64 = -500.0;
/// Highest elevation accepted for an observer.
pub const MAXIMUM_ELEVATION: f64 = 10_000.0;

/// Range of generation years the bundled ephemeris series are trusted for.
pub const MINIMUM_YEAR: i32 = 1800;
pub const MAXIMUM_YEAR: i32 = 2200;

// # Configuration Defaults

pub const CONFIG_DIR_NAME: &str = "orbitcal";
pub const CONFIG_FILE_NAME: &str = "orbitcal.toml";
pub const DEFAULT_BIRTH_DATE: &str = "2000-01-01";
pub const DEFAULT_BIRTH_TIME: &str = "12:00:00";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LATITUDE: f64 = 0.0;
pub const DEFAULT_LONGITUDE: f64 = 0.0;
pub const DEFAULT_ELEVATION: f64 = 0.0;
pub const DEFAULT_DEBUG: bool = false;

/// Accepted spellings for civil birth dates and times.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

// # Exit Codes

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
