//! Configuration management for levelplot.
//!
//! Settings are an explicit value created once per session and passed by
//! reference into every draw. They are layered with the following precedence:
//! 1. Environment variables (highest priority)
//! 2. JSON config file
//! 3. Default values (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::colormaps::get_colormap;
use crate::error::{PlotError, Result};
use crate::norm::{Extend, DEFAULT_NCOLORS};

/// Environment variable overriding the default colormap
pub const ENV_CMAP: &str = "LEVELPLOT_CMAP";
/// Environment variable overriding the default level count
pub const ENV_LEVELS: &str = "LEVELPLOT_LEVELS";
/// Environment variable overriding the default extend mode
pub const ENV_EXTEND: &str = "LEVELPLOT_EXTEND";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "LEVELPLOT_LOG_LEVEL";

/// Colormap and level defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Default colormap name
    #[serde(default = "default_cmap")]
    pub cmap: String,

    /// Default number of automatically chosen levels
    #[serde(default = "default_levels")]
    pub levels: usize,

    /// Default extend mode
    #[serde(default)]
    pub extend: Extend,

    /// Size of the colormap lookup table
    #[serde(default = "default_lut_size")]
    pub lut_size: usize,

    /// Put row 0 of the data at the top of rendered images
    #[serde(default)]
    pub origin_upper: bool,
}

/// Automatic labeling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Derive axis labels and titles from array metadata
    #[serde(default = "default_true")]
    pub autoformat: bool,

    /// Append units to axis labels
    #[serde(default = "default_true")]
    pub units_in_labels: bool,
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Image configuration
    #[serde(default)]
    pub image: ImageConfig,

    /// Formatting configuration
    #[serde(default)]
    pub format: FormatConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = path {
            let file_config = Self::load_from_file(path)?;
            config.merge(file_config);
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.image = other.image;
        self.format = other.format;
        self.log_level = other.log_level;
    }

    /// Apply overrides from a key lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cmap) = lookup(ENV_CMAP) {
            self.image.cmap = cmap;
        }
        if let Some(levels) = lookup(ENV_LEVELS) {
            self.image.levels = levels.trim().parse().map_err(|_| PlotError::Config {
                message: format!("{} must be a positive integer, got {:?}", ENV_LEVELS, levels),
            })?;
        }
        if let Some(extend) = lookup(ENV_EXTEND) {
            self.image.extend = extend.parse()?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(PlotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        if self.image.levels == 0 {
            return Err(PlotError::Config {
                message: "Level count cannot be 0".to_string(),
            });
        }

        if self.image.lut_size == 0 {
            return Err(PlotError::Config {
                message: "Lookup table size cannot be 0".to_string(),
            });
        }

        get_colormap(&self.image.cmap).map_err(|_| PlotError::Config {
            message: format!("Unknown default colormap: {}", self.image.cmap),
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image: ImageConfig::default(),
            format: FormatConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            cmap: default_cmap(),
            levels: default_levels(),
            extend: Extend::Neither,
            lut_size: default_lut_size(),
            origin_upper: false,
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            autoformat: true,
            units_in_labels: true,
        }
    }
}

// Default value functions for serde
fn default_cmap() -> String {
    "viridis".to_string()
}

fn default_levels() -> usize {
    11
}

fn default_lut_size() -> usize {
    DEFAULT_NCOLORS
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
