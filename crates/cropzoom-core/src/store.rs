//! Storage collaborator for saved crops.
//!
//! The editor never stores anything itself: it hands a [`CropResult`] to the
//! host page, and the host persists the bytes through an [`AssetStore`] and
//! keeps the returned URL together with the edit state, so the photo can be
//! re-opened later exactly where the user left it.

use std::collections::HashMap;

use thiserror::Error;

use crate::raster::CropResult;
use crate::EditState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid asset key: {0}")]
    InvalidKey(String),

    #[error("Storage backend failed: {0}")]
    Backend(String),
}

/// What a stored crop is used for; decides its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// A creator's profile photo
    ProfilePhoto,
    /// A brand's logo
    BrandLogo,
}

impl AssetKind {
    pub fn stem(self) -> &'static str {
        match self {
            AssetKind::ProfilePhoto => "profile-photo",
            AssetKind::BrandLogo => "brand-logo",
        }
    }
}

/// Accepts encoded bytes and returns a stable retrievable reference.
pub trait AssetStore {
    /// Store `bytes` under `key`, replacing any previous object, and return
    /// the URL the asset can be fetched from.
    fn put(&mut self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError>;
}

/// Build the storage key for an owner's asset, e.g. `abc123/profile-photo.jpg`.
///
/// # Errors
///
/// Returns `StoreError::InvalidKey` if `owner_id` is empty or contains a
/// path separator.
pub fn asset_key(owner_id: &str, kind: AssetKind, extension: &str) -> Result<String, StoreError> {
    let owner_id = owner_id.trim();
    if owner_id.is_empty() || owner_id.contains(['/', '\\']) || owner_id == ".." {
        return Err(StoreError::InvalidKey(owner_id.to_string()));
    }
    Ok(format!("{owner_id}/{}.{extension}", kind.stem()))
}

/// What the host records after persisting a crop.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCrop {
    pub url: String,
    pub edit_state: EditState,
}

/// Persist a crop for `owner_id` and return its URL plus the edit state.
pub fn persist_crop<S: AssetStore + ?Sized>(
    store: &mut S,
    owner_id: &str,
    kind: AssetKind,
    crop: &CropResult,
) -> Result<StoredCrop, StoreError> {
    let key = asset_key(owner_id, kind, crop.format.extension())?;
    let url = store.put(&key, &crop.bytes, crop.mime_type)?;
    tracing::debug!(%key, bytes = crop.bytes.len(), "stored crop");
    Ok(StoredCrop {
        url,
        edit_state: crop.edit_state,
    })
}

/// An object stored in a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process [`AssetStore`], handy for tests and local previews.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    base_url: String,
    objects: HashMap<String, StoredObject>,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&StoredObject> {
        self.objects.get(key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl AssetStore for MemoryStore {
    fn put(&mut self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.objects.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("{}/{key}", self.base_url.trim_end_matches('/')))
    }
}
