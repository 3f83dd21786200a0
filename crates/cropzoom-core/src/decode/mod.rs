//! Source image pipeline for the crop editor.
//!
//! This module provides functionality for:
//! - Validating an upload's MIME type and size
//! - Decoding JPEG, PNG, GIF and WebP bytes into RGBA pixels
//! - Applying EXIF orientation so the source matches what the browser shows
//!
//! # Examples
//!
//! ```ignore
//! use cropzoom_core::decode::{decode_image, validate_upload, DEFAULT_MAX_UPLOAD_BYTES};
//!
//! validate_upload("image/jpeg", bytes.len() as u64, DEFAULT_MAX_UPLOAD_BYTES)?;
//! let source = decode_image(&bytes)?;
//! println!("Decoded {}x{} source", source.width(), source.height());
//! ```

mod reader;
mod types;
mod upload;

pub use reader::{decode_image, get_orientation};
pub use types::{DecodeError, Orientation, SourceImage};
pub use upload::{validate_upload, UploadError, DEFAULT_MAX_UPLOAD_BYTES};
