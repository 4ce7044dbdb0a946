//! Configuration system for orbitcal.
//!
//! Settings live in a TOML file, `orbitcal.toml`, in the user's configuration
//! directory (`$XDG_CONFIG_HOME/orbitcal/` on Linux) or in a directory chosen once
//! per process with [`set_config_dir`]. A missing file is created with defaults on
//! first load.
//!
//! ```toml
//! #[Birth]
//! birth_date = "2000-01-01"  # Civil birth date (YYYY-MM-DD)
//! birth_time = "12:00:00"    # Civil birth time (HH:MM:SS or HH:MM)
//! timezone = "UTC"           # IANA timezone of the birth and the observer
//!
//! #[Observer]
//! latitude = 0.000000        # Geographic latitude (-90 to 90)
//! longitude = 0.000000       # Geographic longitude (-180 to 180)
//! elevation = 0              # Meters above sea level
//!
//! #[Output]
//! debug = false              # Print every classified day
//! ```
//!
//! `year` may also be set to pin the generated orbital year; without it the
//! current civil year is used.
//!
//! ## Private Coordinates
//!
//! An optional `geo.toml` next to `orbitcal.toml` may hold `latitude`, `longitude`
//! and `elevation`. Values found there override the main file, so the main file can
//! be shared without revealing a location.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::calendar::CalendarRequest;
use crate::constants::*;
use crate::ephemeris::Observer;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};
pub use validation::validate_config;

/// Coordinates stored separately from the main configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub(crate) struct GeoConfig {
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
    pub(crate) elevation: Option<f64>,
}

/// Settings loaded from `orbitcal.toml`.
///
/// Every field is optional in the file. After [`load`] or [`load_from_path`] all
/// fields except `year` are filled in with defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Orbital year to generate; the current civil year when absent.
    pub year: Option<i32>,
    /// Civil birth date, `YYYY-MM-DD`.
    pub birth_date: Option<String>,
    /// Civil birth time, `HH:MM:SS` or `HH:MM`.
    pub birth_time: Option<String>,
    /// IANA time zone for the birth time and the observer's civil days.
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Meters above sea level.
    pub elevation: Option<f64>,
    /// Enable per-day debug output.
    pub debug: Option<bool>,
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &Path) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    /// Orbital year to generate, honoring an explicit override first.
    pub fn resolve_year(&self, override_year: Option<i32>) -> i32 {
        override_year
            .or(self.year)
            .unwrap_or_else(|| Local::now().year())
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug.unwrap_or(DEFAULT_DEBUG)
    }

    /// Observer built from the configured coordinates.
    pub fn observer(&self) -> Observer {
        Observer::new(
            self.latitude.unwrap_or(DEFAULT_LATITUDE),
            self.longitude.unwrap_or(DEFAULT_LONGITUDE),
            self.elevation.unwrap_or(DEFAULT_ELEVATION),
        )
    }

    /// Convert to a validated generation request.
    pub fn to_request(&self, override_year: Option<i32>) -> Result<CalendarRequest> {
        let year = self.resolve_year(override_year);
        CalendarRequest::parse(
            year,
            self.birth_date.as_deref().unwrap_or(DEFAULT_BIRTH_DATE),
            self.birth_time.as_deref().unwrap_or(DEFAULT_BIRTH_TIME),
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE),
            self.observer(),
        )
        .with_context(|| format!("Configuration cannot produce a calendar for {year}"))
    }

    pub fn log_config(&self, source: &Path) {
        log_block_start!("Loaded configuration from {}", loading::display_path(source));

        if let Some(year) = self.year {
            log_indented!("Year: {}", year);
        }
        log_indented!(
            "Birth: {} {} ({})",
            self.birth_date.as_deref().unwrap_or(DEFAULT_BIRTH_DATE),
            self.birth_time.as_deref().unwrap_or(DEFAULT_BIRTH_TIME),
            self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE)
        );

        let observer = self.observer();
        let lat_dir = if observer.latitude >= 0.0 { "N" } else { "S" };
        let lon_dir = if observer.longitude >= 0.0 { "E" } else { "W" };
        log_indented!(
            "Location: {:.3}°{}, {:.3}°{}, {} m",
            observer.latitude.abs(),
            lat_dir,
            observer.longitude.abs(),
            lon_dir,
            observer.elevation
        );

        if let Some(geo_path) = source.parent().map(|dir| dir.join("geo.toml"))
            && geo_path.exists()
        {
            log_indented!("Coordinates from {}", loading::display_path(&geo_path));
        }
    }
}
