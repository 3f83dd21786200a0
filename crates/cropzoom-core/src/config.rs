//! Editor settings.
//!
//! Every field has a default matching the profile photo editor: a 320 px
//! preview viewport, a 400x400 JPEG at quality 90 on a white background, and
//! a 15 MiB upload limit. Hosts may override any subset from JSON; missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DEFAULT_MAX_UPLOAD_BYTES;
use crate::encode::OutputFormat;
use crate::raster::{InterpolationFilter, OutputSpec};

/// Largest output side the editor will render.
pub const MAX_OUTPUT_SIDE: u32 = 4096;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid editor config: {0}")]
    Invalid(String),
}

/// Settings shared by every session of an editor host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Side of the square preview viewport in display pixels
    pub viewport_side: f64,
    /// Side of the square output raster in pixels
    pub output_side: u32,
    /// Encoding of the saved crop
    pub format: OutputFormat,
    /// Opaque color behind the image (visible where the image does not cover)
    pub background: [u8; 3],
    /// Sampling filter for the CPU rasterizer
    pub filter: InterpolationFilter,
    /// Largest accepted upload in bytes
    pub max_upload_bytes: u64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            viewport_side: 320.0,
            output_side: 400,
            format: OutputFormat::default(),
            background: [255, 255, 255],
            filter: InterpolationFilter::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl CropConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: CropConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from JSON, falling back to defaults on any error.
    pub fn from_json_or_default(json: &str) -> Self {
        Self::from_json(json).unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid editor config; using defaults");
            Self::default()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.viewport_side.is_finite() || self.viewport_side <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "viewport_side must be positive, got {}",
                self.viewport_side
            )));
        }
        if self.output_side == 0 || self.output_side > MAX_OUTPUT_SIDE {
            return Err(ConfigError::Invalid(format!(
                "output_side must be between 1 and {MAX_OUTPUT_SIDE}, got {}",
                self.output_side
            )));
        }
        if let OutputFormat::Jpeg { quality } = self.format {
            if !(1..=100).contains(&quality) {
                return Err(ConfigError::Invalid(format!(
                    "JPEG quality must be between 1 and 100, got {quality}"
                )));
            }
        }
        Ok(())
    }

    pub fn output_spec(&self) -> OutputSpec {
        OutputSpec {
            side: self.output_side,
            background: self.background,
            format: self.format,
        }
    }
}
