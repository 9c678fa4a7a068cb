//! Configuration module.
//!
//! Handles loading, validating, and merging `webify.toml`. Stock defaults are
//! the base layer; a user file only needs the keys it wants to change, and
//! command-line flags override both.
//!
//! ## Config File Location
//!
//! `webify.toml` in the current directory, or any file passed with
//! `--config <path>`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [conversion]
//! quality = 80              # WebP quality (1-100)
//! max_dimension = 1920      # Longer side of every output, in pixels (100-4000)
//! auto_max_dimension = true # Suggest max_dimension from the input files
//!
//! [estimate]
//! mode = "stepped"          # "stepped" or "interpolated"
//!
//! [preview]
//! max_dimension = 800       # Previews larger than this are shrunk
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [conversion]
//! quality = 90
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::convert::ConversionSettings;
use crate::estimate::EstimateMode;
use crate::imaging::{DEFAULT_PREVIEW_MAX, MaxDimension, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "webify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `webify.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebifyConfig {
    /// Quality and size applied to every converted file.
    pub conversion: ConversionConfig,
    /// Size estimator settings.
    pub estimate: EstimateConfig,
    /// Preview rendering settings.
    pub preview: PreviewConfig,
}

impl WebifyConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quality = self.conversion.quality;
        if !(Quality::MIN..=Quality::MAX).contains(&quality) {
            return Err(ConfigError::Validation(format!(
                "conversion.quality must be {}-{}, got {}",
                Quality::MIN,
                Quality::MAX,
                quality
            )));
        }
        let max = self.conversion.max_dimension;
        if !(MaxDimension::MIN..=MaxDimension::MAX).contains(&max) {
            return Err(ConfigError::Validation(format!(
                "conversion.max_dimension must be {}-{}, got {}",
                MaxDimension::MIN,
                MaxDimension::MAX,
                max
            )));
        }
        if self.preview.max_dimension == 0 {
            return Err(ConfigError::Validation(
                "preview.max_dimension must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Starting settings for a session.
    pub fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            quality: Quality::new(self.conversion.quality),
            max_dimension: MaxDimension::new(self.conversion.max_dimension),
        }
    }
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Lossy WebP quality, 1-100.
    pub quality: u32,
    /// Longer side of every output, 100-4000.
    pub max_dimension: u32,
    /// Replace `max_dimension` with the longest side found in the inputs,
    /// rounded up to the next multiple of 100.
    pub auto_max_dimension: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            max_dimension: MaxDimension::default().value(),
            auto_max_dimension: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimateConfig {
    pub mode: EstimateMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub max_dimension: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_PREVIEW_MAX,
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(WebifyConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<WebifyConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: WebifyConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<WebifyConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_some() {
        log::debug!("loaded config from {}", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `webify.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Webify Configuration
# ====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# webify reads ./webify.toml, or the file given with --config.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Conversion
# ---------------------------------------------------------------------------
[conversion]
# Lossy WebP quality (1-100). Higher is larger and sharper.
quality = 80

# Longer side of every output image, in pixels (100-4000).
# Smaller images are enlarged to this size.
max_dimension = 1920

# Set max_dimension from the largest input, rounded up to a multiple of 100.
auto_max_dimension = true

# ---------------------------------------------------------------------------
# Size estimate
# ---------------------------------------------------------------------------
[estimate]
# "stepped" buckets quality into five calibrated factors.
# "interpolated" is an experimental linear fit between calibration points.
mode = "stepped"

# ---------------------------------------------------------------------------
# Preview
# ---------------------------------------------------------------------------
[preview]
# Previews are shrunk so their longer side fits this size; never enlarged.
max_dimension = 800
"##
}
