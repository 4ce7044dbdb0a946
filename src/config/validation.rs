//! Configuration validation functionality.
//!
//! Rejects values the calendar engine cannot work with before any generation
//! starts, with messages that name the offending field.

use anyhow::{Context, Result};

use super::Config;
use crate::civil;
use crate::constants::*;

/// Check every field that is present; absent fields fall back to valid defaults.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(year) = config.year
        && !(MINIMUM_YEAR..=MAXIMUM_YEAR).contains(&year)
    {
        anyhow::bail!(
            "year ({}) must be between {} and {}",
            year,
            MINIMUM_YEAR,
            MAXIMUM_YEAR
        );
    }

    if let Some(ref date) = config.birth_date {
        civil::parse_date(date).context("Invalid birth_date in config. Use YYYY-MM-DD format")?;
    }

    if let Some(ref time) = config.birth_time {
        civil::parse_time(time)
            .context("Invalid birth_time in config. Use HH:MM:SS or HH:MM format")?;
    }

    if let Some(ref timezone) = config.timezone {
        civil::parse_timezone(timezone)
            .context("Invalid timezone in config. Use an IANA name such as \"Europe/Paris\"")?;
    }

    if let Some(lat) = config.latitude
        && !(MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if let Some(elevation) = config.elevation
        && !(MINIMUM_ELEVATION..=MAXIMUM_ELEVATION).contains(&elevation)
    {
        anyhow::bail!(
            "elevation ({} m) must be between {} and {} meters",
            elevation,
            MINIMUM_ELEVATION,
            MAXIMUM_ELEVATION
        );
    }

    Ok(())
}
