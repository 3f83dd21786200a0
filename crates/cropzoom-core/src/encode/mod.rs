//! Encoding of the rendered crop square.
//!
//! This module provides functionality for:
//! - Encoding RGB pixels to JPEG with a fixed quality (the default output)
//! - Encoding RGB pixels to PNG when a lossless result is wanted
//!
//! Both encoders are deterministic: the same pixels and settings always
//! produce the same bytes. No metadata or color profile is written.

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// JPEG quality used for saved crops unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while encoding the output raster.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Encoded format of a saved crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy JPEG with the given quality (1-100)
    Jpeg { quality: u8 },
    /// Lossless PNG
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Encode RGB pixel data in this format.
    pub fn encode(self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
        match self {
            OutputFormat::Jpeg { quality } => encode_jpeg(pixels, width, height, quality),
            OutputFormat::Png => encode_png(pixels, width, height),
        }
    }
}

/// Check that an RGB buffer matches its dimensions.
fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}
