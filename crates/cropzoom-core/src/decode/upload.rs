//! Checks applied to a file the user picked before it reaches the editor.

use thiserror::Error;

/// Largest upload the editor accepts by default (15 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 15 * 1024 * 1024;

/// Reasons an upload is refused before decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The file's MIME type is not an image type.
    #[error("Invalid file type: {0}. Please select an image file.")]
    InvalidFileType(String),

    /// The file exceeds the upload size limit.
    #[error("File too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { size: u64, max: u64 },
}

/// Validate an upload's MIME type and size.
///
/// Any `image/*` type is accepted here; whether the format can actually be
/// decoded is decided by [`decode_image`](super::decode_image).
pub fn validate_upload(mime_type: &str, size: u64, max_bytes: u64) -> Result<(), UploadError> {
    let is_image = mime_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"));
    if !is_image {
        return Err(UploadError::InvalidFileType(mime_type.to_string()));
    }

    if size > max_bytes {
        return Err(UploadError::FileTooLarge {
            size,
            max: max_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_image_types() {
        for mime in ["image/jpeg", "image/png", "image/webp", "IMAGE/GIF"] {
            assert!(validate_upload(mime, 1024, DEFAULT_MAX_UPLOAD_BYTES).is_ok(), "{mime}");
        }
    }

    #[test]
    fn test_rejects_non_image_types() {
        assert_eq!(
            validate_upload("application/pdf", 10, DEFAULT_MAX_UPLOAD_BYTES),
            Err(UploadError::InvalidFileType("application/pdf".to_string()))
        );
        assert!(validate_upload("", 10, DEFAULT_MAX_UPLOAD_BYTES).is_err());
        assert!(validate_upload("imag", 10, DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert!(validate_upload("image/png", DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES).is_ok());
        assert_eq!(
            validate_upload("image/png", DEFAULT_MAX_UPLOAD_BYTES + 1, DEFAULT_MAX_UPLOAD_BYTES),
            Err(UploadError::FileTooLarge {
                size: DEFAULT_MAX_UPLOAD_BYTES + 1,
                max: DEFAULT_MAX_UPLOAD_BYTES,
            })
        );
    }

    #[test]
    fn test_multibyte_mime_does_not_panic() {
        assert!(validate_upload("imagé/png", 10, DEFAULT_MAX_UPLOAD_BYTES).is_err());
    }
}
