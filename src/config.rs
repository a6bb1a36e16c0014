//! Application configuration module.
//!
//! Handles loading, validating, and merging `stylecam.toml`. Stock defaults
//! are overridden by whatever the user file sets; the file itself is optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [style]
//! path = "style.xml"        # Style document read at startup and by `set`
//!
//! [output]
//! dir = "captures"          # Where styled images are written
//! format = "jpeg"           # "jpeg" or "png"
//!
//! [batch]
//! max_threads = 4           # Max parallel workers (omit for auto = CPU cores)
//!
//! [logging]
//! level = "warn"            # Log filter when RUST_LOG is not set
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [output]
//! format = "png"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{ApplyConfig, RasterFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stylecam.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Application configuration loaded from `stylecam.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Style document location.
    pub style: StyleConfig,
    /// Output directory and format for styled images.
    pub output: OutputConfig,
    /// Parallel apply settings.
    pub batch: BatchConfig,
    /// Log filter.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.style.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "style.path must not be empty".into(),
            ));
        }
        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation("output.dir must not be empty".into()));
        }
        if self.batch.max_threads == Some(0) {
            return Err(ConfigError::Validation(
                "batch.max_threads must be at least 1".into(),
            ));
        }
        EnvFilter::try_new(&self.logging.level).map_err(|e| {
            ConfigError::Validation(format!(
                "logging.level '{}' is not a valid filter: {e}",
                self.logging.level
            ))
        })?;
        Ok(())
    }

    /// Where and how the filter applier writes its output.
    pub fn apply_config(&self) -> ApplyConfig {
        ApplyConfig {
            output_dir: self.output.dir.clone(),
            format: self.output.format,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    pub path: PathBuf,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(crate::codec::STYLE_FILE_NAME),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: RasterFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("captures"),
            format: RasterFormat::Jpeg,
        }
    }
}

/// Parallel apply settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &BatchConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.min(cores)).unwrap_or(cores)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(AppConfig::default())?)
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

/// Load config from `path`.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `stylecam.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# stylecam configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Style document
# ---------------------------------------------------------------------------
[style]
# Flat XML document holding preset, brightness, saturation, contrast,
# rotation and compress. A missing file means "all defaults".
path = "style.xml"

# ---------------------------------------------------------------------------
# Styled output
# ---------------------------------------------------------------------------
[output]
# Directory receiving styled images. Sources are never overwritten.
dir = "captures"
# Re-encode format: "jpeg" (quality from the style's compress factor)
# or "png" (lossless; compress has no effect).
format = "jpeg"

# ---------------------------------------------------------------------------
# Batch apply
# ---------------------------------------------------------------------------
[batch]
# Maximum parallel workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_threads = 4

# ---------------------------------------------------------------------------
# Logging
# ---------------------------------------------------------------------------
[logging]
# Filter used when RUST_LOG is not set, e.g. "info" or "stylecam=debug".
level = "warn"
"##
}
