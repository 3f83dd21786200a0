//! Storage key helpers for saved crops.
//!
//! The page uploads the crop itself; these bindings only build the object
//! key so every client names assets the same way.

use cropzoom_core::store::{asset_key, AssetKind, StoreError};
use wasm_bindgen::prelude::*;

use crate::editor::JsCropResult;
use crate::js_error;

/// Build the storage key for a saved crop, e.g. `user-1/profile-photo.jpg`.
///
/// # Arguments
///
/// * `owner_id` - The creator or brand id owning the asset
/// * `kind` - `"profile-photo"` or `"brand-logo"`
/// * `crop` - The saved crop; its format picks the extension
///
/// # Errors
///
/// Returns an error for an unknown kind or an empty / path-like owner id.
#[wasm_bindgen]
pub fn crop_asset_key(owner_id: &str, kind: &str, crop: &JsCropResult) -> Result<String, JsValue> {
    key_for(owner_id, kind, &crop.extension()).map_err(js_error)
}

fn parse_kind(kind: &str) -> Option<AssetKind> {
    [AssetKind::ProfilePhoto, AssetKind::BrandLogo]
        .into_iter()
        .find(|k| k.stem() == kind)
}

fn key_for(owner_id: &str, kind: &str, extension: &str) -> Result<String, StoreError> {
    let kind = parse_kind(kind)
        .ok_or_else(|| StoreError::InvalidKey(format!("unknown asset kind '{kind}'")))?;
    asset_key(owner_id, kind, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("profile-photo"), Some(AssetKind::ProfilePhoto));
        assert_eq!(parse_kind("brand-logo"), Some(AssetKind::BrandLogo));
        assert_eq!(parse_kind("banner"), None);
    }

    #[test]
    fn test_key_for() {
        assert_eq!(key_for("u1", "profile-photo", "jpg").unwrap(), "u1/profile-photo.jpg");
        assert_eq!(key_for("b7", "brand-logo", "png").unwrap(), "b7/brand-logo.png");
        assert!(key_for("u1", "banner", "jpg").is_err());
        assert!(key_for("", "brand-logo", "jpg").is_err());
    }
}
