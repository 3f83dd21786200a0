//! Upload checks WASM bindings.
//!
//! Run these on the `File` the user picked before reading its bytes, so an
//! oversized or non-image file is refused without decoding anything.
//!
//! # Example
//!
//! ```typescript
//! try {
//!   validate_upload(file.type, file.size);
//! } catch (message) {
//!   showError(message);
//!   return;
//! }
//! ```

use cropzoom_core::decode::{self, UploadError, DEFAULT_MAX_UPLOAD_BYTES};
use wasm_bindgen::prelude::*;

use crate::js_error;

/// Check a file's MIME type and size.
///
/// # Arguments
///
/// * `mime_type` - The file's `type`, which must start with `image/`
/// * `size` - The file's `size` in bytes
/// * `max_bytes` - Optional limit; defaults to 15 MiB
///
/// # Errors
///
/// Returns an error message if the type is not an image type or the file
/// is larger than the limit.
#[wasm_bindgen]
pub fn validate_upload(mime_type: &str, size: f64, max_bytes: Option<f64>) -> Result<(), JsValue> {
    check_upload(mime_type, size, max_bytes).map_err(js_error)
}

/// The default upload limit in bytes.
#[wasm_bindgen]
pub fn max_upload_bytes() -> f64 {
    DEFAULT_MAX_UPLOAD_BYTES as f64
}

/// JS numbers arrive as `f64`; negative and NaN sizes count as empty.
fn to_bytes(value: f64) -> u64 {
    if value.is_nan() || value <= 0.0 {
        0
    } else {
        value.ceil() as u64
    }
}

pub(crate) fn check_upload(
    mime_type: &str,
    size: f64,
    max_bytes: Option<f64>,
) -> Result<(), UploadError> {
    let max = max_bytes.map_or(DEFAULT_MAX_UPLOAD_BYTES, to_bytes);
    decode::validate_upload(mime_type, to_bytes(size), max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_images_within_limit() {
        assert!(check_upload("image/jpeg", 1024.0, None).is_ok());
        assert!(check_upload("image/heic", 15.0 * 1024.0 * 1024.0, None).is_ok());
    }

    #[test]
    fn test_rejects_non_images() {
        assert_eq!(
            check_upload("application/pdf", 10.0, None),
            Err(UploadError::InvalidFileType("application/pdf".to_string()))
        );
    }

    #[test]
    fn test_rejects_oversized_files() {
        let size = 15.0 * 1024.0 * 1024.0 + 1.0;
        assert!(matches!(
            check_upload("image/png", size, None),
            Err(UploadError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_custom_limit() {
        assert!(check_upload("image/png", 2048.0, Some(1024.0)).is_err());
        assert!(check_upload("image/png", 1024.0, Some(1024.0)).is_ok());
    }

    #[test]
    fn test_odd_sizes() {
        assert_eq!(to_bytes(f64::NAN), 0);
        assert_eq!(to_bytes(-3.0), 0);
        assert_eq!(to_bytes(10.2), 11);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(max_upload_bytes(), 15_728_640.0);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_validate_upload_ok() {
        assert!(validate_upload("image/webp", 500.0, None).is_ok());
    }

    #[wasm_bindgen_test]
    fn test_validate_upload_error_message() {
        let err = validate_upload("text/plain", 5.0, None).unwrap_err();
        let message = err.as_string().unwrap();
        assert!(message.contains("Please select an image file"));
    }
}
