#![forbid(unsafe_code)]

//! Layout-engine configuration as data.
//!
//! Every tunable of the editor and the sizing engine lives in one
//! [`LayoutConfig`] that can be loaded from TOML or JSON. Missing keys fall
//! back to the built-in defaults, so a file only needs the values it changes.
//!
//! ```toml
//! history_depth = 50
//! max_nesting_depth = 4
//!
//! [sizing]
//! max_xs_height_ratio = 150.0
//!
//! [sizing.container_widths]
//! xl = 1400
//! ```

use std::path::Path;

use dashgrid_core::{Breakpoint, GRID_COLUMNS, GRID_ROW_HEIGHT_PX, ScreenThresholds};
use serde::{Deserialize, Serialize};

use crate::sizing::WidthBucketTable;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Undo entries retained before the oldest is evicted.
    pub history_depth: usize,
    /// Maximum layout nesting depth; a flat layout has depth 1.
    pub max_nesting_depth: usize,
    pub sizing: SizingConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            history_depth: 100,
            max_nesting_depth: 8,
            sizing: SizingConfig::default(),
        }
    }
}

/// Sizing-engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Pixel height of one grid row.
    pub row_height_px: u32,
    /// Ceiling for ratio heights produced on the narrowest breakpoint.
    pub max_xs_height_ratio: f64,
    /// Derived widths per authored `xl` width.
    pub width_buckets: WidthBucketTable,
    /// Container pixel width per breakpoint.
    pub container_widths: ContainerWidths,
    pub screen_thresholds: ScreenThresholds,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            row_height_px: GRID_ROW_HEIGHT_PX,
            max_xs_height_ratio: 180.0,
            width_buckets: WidthBucketTable::default(),
            container_widths: ContainerWidths::default(),
            screen_thresholds: ScreenThresholds::DEFAULT,
        }
    }
}

/// Container width in pixels for each breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerWidths {
    pub xs: u32,
    pub sm: u32,
    pub md: u32,
    pub lg: u32,
    pub xl: u32,
}

impl ContainerWidths {
    #[must_use]
    pub const fn get(&self, bp: Breakpoint) -> u32 {
        match bp {
            Breakpoint::Xs => self.xs,
            Breakpoint::Sm => self.sm,
            Breakpoint::Md => self.md,
            Breakpoint::Lg => self.lg,
            Breakpoint::Xl => self.xl,
        }
    }
}

impl Default for ContainerWidths {
    fn default() -> Self {
        Self {
            xs: 540,
            sm: 540,
            md: 720,
            lg: 960,
            xl: 1140,
        }
    }
}

impl LayoutConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.history_depth == 0 {
            errors.push("history_depth must be > 0".into());
        }
        if self.max_nesting_depth == 0 {
            errors.push("max_nesting_depth must be > 0".into());
        }

        let sizing = &self.sizing;
        if sizing.row_height_px == 0 {
            errors.push("sizing.row_height_px must be > 0".into());
        }
        if !(sizing.max_xs_height_ratio.is_finite() && sizing.max_xs_height_ratio > 0.0) {
            errors.push(format!(
                "sizing.max_xs_height_ratio must be finite and > 0, got {}",
                sizing.max_xs_height_ratio
            ));
        }
        for (xl_width, derived) in sizing.width_buckets.entries() {
            for (bp, width) in derived.iter() {
                if width > GRID_COLUMNS {
                    errors.push(format!(
                        "sizing.width_buckets[{xl_width}].{bp} must be <= {GRID_COLUMNS}, got {width}"
                    ));
                }
            }
        }
        if !sizing.screen_thresholds.is_monotonic() {
            errors.push("sizing.screen_thresholds must be non-decreasing".into());
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
