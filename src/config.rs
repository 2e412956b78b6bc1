//! Tool configuration.
//!
//! Stock defaults are built in; a user `config.toml` (passed with `--config`)
//! overrides any subset of them. The merged result is validated once, at
//! startup, and then passed by reference into every operation. Nothing reads
//! settings from globals.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [bars]
//! threshold = 30          # A channel above this value marks a pixel as content
//! padding = 2             # Pixels kept around the detected content
//! aspect_ratio = [16, 9]  # width:height of the final crop
//! quality = 95            # JPEG quality when re-saving (PNG/WebP are lossless)
//!
//! [resize]
//! max_width = 1200        # Output never wider than this
//! max_height = 900        # Output never taller than this
//! quality = 85            # JPEG quality of the re-encoded file
//! min_size_mb = 0.5       # Files smaller than this are skipped
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [resize]
//! max_width = 1600
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Black-bar removal settings.
    pub bars: BarsConfig,
    /// Web resize settings.
    pub resize: ResizeConfig,
}

/// Border remover settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BarsConfig {
    /// Channel intensity (0–255) a pixel must exceed on any channel to count
    /// as content.
    pub threshold: u8,
    /// Pixels added on each side of the detected content, clamped to the image.
    pub padding: u32,
    /// Target aspect ratio as `[width, height]`.
    pub aspect_ratio: [u32; 2],
    /// JPEG quality used when writing a cropped JPEG back. PNG and WebP are
    /// written losslessly and ignore it.
    pub quality: u8,
}

impl Default for BarsConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            padding: 2,
            aspect_ratio: [16, 9],
            quality: 95,
        }
    }
}

impl BarsConfig {
    pub fn aspect(&self) -> (u32, u32) {
        (self.aspect_ratio[0], self.aspect_ratio[1])
    }
}

/// Web resizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality of the re-encoded output.
    pub quality: u8,
    /// Files below this size (in MiB) are left alone.
    pub min_size_mb: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 900,
            quality: 85,
            min_size_mb: 0.5,
        }
    }
}

impl ResizeConfig {
    pub fn max_dimensions(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    /// `min_size_mb` in bytes.
    pub fn min_size_bytes(&self) -> u64 {
        (self.min_size_mb * 1024.0 * 1024.0) as u64
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.bars.quality) {
            return Err(ConfigError::Validation("bars.quality must be 1-100".into()));
        }
        if self.bars.aspect_ratio[0] == 0 || self.bars.aspect_ratio[1] == 0 {
            return Err(ConfigError::Validation(
                "bars.aspect_ratio values must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.resize.quality) {
            return Err(ConfigError::Validation(
                "resize.quality must be 1-100".into(),
            ));
        }
        if self.resize.max_width == 0 || self.resize.max_height == 0 {
            return Err(ConfigError::Validation(
                "resize.max_width and resize.max_height must be non-zero".into(),
            ));
        }
        if !self.resize.min_size_mb.is_finite() || self.resize.min_size_mb < 0.0 {
            return Err(ConfigError::Validation(
                "resize.min_size_mb must be a non-negative number".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
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

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the run configuration.
///
/// Without a file the stock defaults are used. A file that is named but
/// missing is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# asset-prep configuration
# ========================
# Every key is optional. Delete what you don't need to change.

[bars]
# A pixel counts as content when ANY of its R, G, B channels is above this
# value (0-255). Everything else is treated as black bar.
threshold = 30

# Pixels kept around the detected content on each side.
padding = 2

# Final crop ratio as [width, height]. Images are cropped, never padded.
aspect_ratio = [16, 9]

# JPEG quality (1-100) when writing a cropped JPEG back.
# PNG and WebP are always written losslessly.
quality = 95

[resize]
# Images are scaled down to fit inside max_width x max_height.
# Smaller images are re-encoded at their current size, never enlarged.
max_width = 1200
max_height = 900

# JPEG quality (1-100) of the re-encoded output.
quality = 85

# Files smaller than this many MiB are skipped.
min_size_mb = 0.5
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_documented_values() {
        let config = Config::default();
        assert_eq!(config.bars.threshold, 30);
        assert_eq!(config.bars.padding, 2);
        assert_eq!(config.bars.aspect(), (16, 9));
        assert_eq!(config.bars.quality, 95);
        assert_eq!(config.resize.max_dimensions(), (1200, 900));
        assert_eq!(config.resize.quality, 85);
        assert_eq!(config.resize.min_size_mb, 0.5);
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let config: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn min_size_bytes_converts_mebibytes() {
        let config = ResizeConfig::default();
        assert_eq!(config.min_size_bytes(), 512 * 1024);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[resize]
max_width = 1600
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resize.max_width, 1600);
        // Default values preserved
        assert_eq!(config.resize.max_height, 900);
        assert_eq!(config.bars, BarsConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let toml = r#"
[bars]
treshold = 10
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_without_file_is_default() {
        assert_eq!(load_config(None).unwrap(), Config::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[bars]
aspect_ratio = [4, 3]

[resize]
quality = 70
min_size_mb = 0.0
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.bars.aspect(), (4, 3));
        assert_eq!(config.bars.threshold, 30);
        assert_eq!(config.resize.quality, 70);
        assert_eq!(config.resize.min_size_bytes(), 0);
    }

    #[test]
    fn load_config_missing_named_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn zero_aspect_is_rejected() {
        let overlay: toml::Value = toml::from_str("[bars]\naspect_ratio = [16, 0]").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_quality_is_rejected() {
        let overlay: toml::Value = toml::from_str("[resize]\nquality = 0").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn zero_max_dimension_is_rejected() {
        let overlay: toml::Value = toml::from_str("[resize]\nmax_height = 0").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn negative_min_size_is_rejected() {
        let overlay: toml::Value = toml::from_str("[resize]\nmin_size_mb = -1.0").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str("[bars]\npadding = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["bars"]["padding"].as_integer(), Some(5));
        assert_eq!(merged["bars"]["threshold"].as_integer(), Some(30));
        assert_eq!(merged["resize"]["max_width"].as_integer(), Some(1200));
    }
}
