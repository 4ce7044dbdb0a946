//! Default configuration file creation.
//!
//! Writes a commented `orbitcal.toml` through [`ConfigBuilder`], which keeps the
//! trailing comments aligned no matter how long the default values are.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::loading::display_path;
use crate::constants::*;

/// Create a default config file, optionally with known coordinates.
///
/// When a `geo.toml` already sits in the target directory the coordinates are
/// written there instead of into the main file.
pub fn create_default_config(path: &Path, coords: Option<(f64, f64)>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let (lat, lon) = coords.unwrap_or((DEFAULT_LATITUDE, DEFAULT_LONGITUDE));

    let geo_path = path.parent().map(|parent| parent.join("geo.toml"));
    let use_geo_file = geo_path.as_ref().is_some_and(|p| p.exists());

    if let Some(geo_path) = geo_path.filter(|_| use_geo_file) {
        let geo_content = format!(
            "#[Private geo coordinates]\nlatitude = {lat:.6}\nlongitude = {lon:.6}\nelevation = {DEFAULT_ELEVATION:.1}\n"
        );
        fs::write(&geo_path, geo_content)
            .with_context(|| format!("Failed to write coordinates to {}", display_path(&geo_path)))?;
        log_indented!(
            "Saved coordinates to separate geo file: {}",
            display_path(&geo_path)
        );
    }

    let config_content = ConfigBuilder::new()
        .add_section("Birth")
        .add_setting(
            "birth_date",
            &format!("\"{DEFAULT_BIRTH_DATE}\""),
            "Civil birth date (YYYY-MM-DD)",
        )
        .add_setting(
            "birth_time",
            &format!("\"{DEFAULT_BIRTH_TIME}\""),
            "Civil birth time (HH:MM:SS or HH:MM)",
        )
        .add_setting(
            "timezone",
            &format!("\"{DEFAULT_TIMEZONE}\""),
            "IANA timezone of the birth and the observer",
        )
        .add_section("Observer");

    let config_content = if use_geo_file {
        config_content
    } else {
        config_content
            .add_setting(
                "latitude",
                &format!("{lat:.6}"),
                &format!("Geographic latitude ({MINIMUM_LATITUDE} to {MAXIMUM_LATITUDE})"),
            )
            .add_setting(
                "longitude",
                &format!("{lon:.6}"),
                &format!("Geographic longitude ({MINIMUM_LONGITUDE} to {MAXIMUM_LONGITUDE})"),
            )
            .add_setting(
                "elevation",
                &format!("{DEFAULT_ELEVATION:.1}"),
                &format!("Meters above sea level ({MINIMUM_ELEVATION} to {MAXIMUM_ELEVATION})"),
            )
    };

    let config_content = config_content
        .add_section("Output")
        .add_setting(
            "debug",
            &DEFAULT_DEBUG.to_string(),
            "Print every classified day",
        )
        .build();

    fs::write(path, config_content).context("Failed to write default config file")?;
    Ok(())
}

/// Builder for creating dynamically-aligned configuration files.
///
/// Calculates the widest setting line and pads every comment to the same column.
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // One space between the widest setting and its comment
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        let mut content = result.join("\n");
        content.push('\n');
        content
    }
}
