//! Configuration management for ExtrudeKit
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats, selected by file extension.
//!
//! Configuration is organized into logical sections:
//! - Print properties (geometry, feed, overrides, backlash, session temperatures)
//! - Output locations (gcode directory, simulation preview file)

use crate::error::{SettingsError, SettingsResult};
use crate::properties::PrintProperties;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where generated scripts are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Directory watched by the printer host for uploaded gcode files
    pub gcode_directory: PathBuf,
    /// File a web gcode viewer loads for simulation previews
    pub preview_file: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            gcode_directory: home.join("gcode_files"),
            preview_file: home.join("webgcode").join("samples").join("show_me.gcode"),
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub print: PrintProperties,
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_for(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the configuration file in the platform config directory
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("extrudekit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_for(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_for(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> SettingsResult<()> {
        self.print.validate()?;
        Ok(())
    }
}
