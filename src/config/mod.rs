//! Configuration file support for pagemark.
//!
//! This module handles loading and validating user settings from the
//! configuration file located at `~/.config/pagemark/config.toml`. Settings
//! include ink tool defaults, the pre-commit canvas placeholder, and
//! annotation store tuning.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

// Re-export commonly used types at module level
pub use types::{
    CanvasConfig, ColorSpec, StoreCompression, StoreConfig, StoreStorageMode, ToolsConfig,
};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML
/// file. All fields have sensible defaults and will use those if not
/// specified in the config file.
///
/// # Example TOML
/// ```toml
/// [tools]
/// pen_color = "black"
/// pen_width = 3.0
/// highlighter_color = "yellow"
/// highlighter_opacity = 0.3
///
/// [canvas]
/// width = 1000.0
/// height = 1000.0
///
/// [store]
/// enabled = true
/// compress = "auto"
/// ```
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Ink tool defaults (colors, widths, highlighter opacity)
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Pre-commit canvas placeholder settings
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Annotation store settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values won't cause
    /// rendering issues. Invalid values are clamped to the nearest valid
    /// value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `pen_width` / `highlighter_width`: 1.0 - 20.0
    /// - `highlighter_opacity`: 0.05 - 1.0
    /// - `canvas.width` / `canvas.height`: 100.0 - 10000.0
    fn validate_and_clamp(&mut self) {
        if !(1.0..=20.0).contains(&self.tools.pen_width) {
            log::warn!(
                "Invalid pen_width {:.1}, clamping to 1.0-20.0 range",
                self.tools.pen_width
            );
            self.tools.pen_width = self.tools.pen_width.clamp(1.0, 20.0);
        }

        if !(1.0..=20.0).contains(&self.tools.highlighter_width) {
            log::warn!(
                "Invalid highlighter_width {:.1}, clamping to 1.0-20.0 range",
                self.tools.highlighter_width
            );
            self.tools.highlighter_width = self.tools.highlighter_width.clamp(1.0, 20.0);
        }

        if !(0.05..=1.0).contains(&self.tools.highlighter_opacity) {
            log::warn!(
                "Invalid highlighter_opacity {:.2}, clamping to 0.05-1.0 range",
                self.tools.highlighter_opacity
            );
            self.tools.highlighter_opacity = self.tools.highlighter_opacity.clamp(0.05, 1.0);
        }

        if !(100.0..=10_000.0).contains(&self.canvas.width) {
            log::warn!(
                "Invalid canvas width {:.0}, clamping to 100-10000 range",
                self.canvas.width
            );
            self.canvas.width = self.canvas.width.clamp(100.0, 10_000.0);
        }

        if !(100.0..=10_000.0).contains(&self.canvas.height) {
            log::warn!(
                "Invalid canvas height {:.0}, clamping to 100-10000 range",
                self.canvas.height
            );
            self.canvas.height = self.canvas.height.clamp(100.0, 10_000.0);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/pagemark/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("pagemark");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from file, or returns defaults if not found.
    ///
    /// Attempts to read and parse the config file at
    /// `~/.config/pagemark/config.toml`. If the file doesn't exist, returns
    /// a Config with default values. All loaded values are validated and
    /// clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }
}
