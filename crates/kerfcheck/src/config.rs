//! Inspection parameters shared by reference loading and query extraction.
//!
//! The binarization threshold lives here exactly once: reference and query
//! images are always thresholded with the same value, otherwise their
//! boundaries are not comparable.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default binarization threshold (intensity `>=` threshold is foreground).
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Default deviation tolerance in pixels.
pub const DEFAULT_TOLERANCE_PX: f64 = 0.5;

/// Errors raised while loading or validating an [`InspectConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid config JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field is out of range.
    #[error("{0}")]
    Invalid(String),
}

/// Inspection configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectConfig {
    /// Binarization threshold; pixels with intensity `>= threshold` are foreground.
    pub threshold: u8,
    /// Maximum permitted outward deviation (pixels) before a point is a defect.
    pub tolerance_px: f64,
    /// Optional Gaussian pre-smoothing sigma (pixels), applied identically to
    /// reference and query images. Keep it small or disabled: burrs a few
    /// pixels wide are erased by wide kernels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothing_sigma: Option<f32>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            tolerance_px: DEFAULT_TOLERANCE_PX,
            smoothing_sigma: None,
        }
    }
}

impl InspectConfig {
    /// Config with a custom tolerance and default threshold.
    pub fn with_tolerance(tolerance_px: f64) -> Self {
        Self {
            tolerance_px,
            ..Self::default()
        }
    }

    /// Load and validate a config from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&data)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Check that all fields are in range.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance_px.is_finite() || self.tolerance_px < 0.0 {
            return Err("tolerance_px must be finite and >= 0".to_string());
        }
        if self.threshold == 0 {
            return Err("threshold must be >= 1 (0 marks every pixel as foreground)".to_string());
        }
        if let Some(sigma) = self.smoothing_sigma {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err("smoothing_sigma must be finite and > 0".to_string());
            }
        }
        Ok(())
    }
}
