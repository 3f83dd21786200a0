//! Cropzoom Core - Crop and zoom engine for profile photos
//!
//! This crate lets a user position and scale an uploaded photo inside a fixed
//! square viewport, then rasterizes exactly what is visible into a fixed-size
//! output image. It is used for creator profile photos and brand logos.
//!
//! # Module Structure
//!
//! - `geometry` - Natural, viewport and output coordinate spaces
//! - `interaction` - Zoom buttons and drag-to-pan state transitions
//! - `decode` - Turning uploaded bytes into a [`decode::SourceImage`]
//! - `raster` - Sampling the visible region into the output square
//! - `encode` - JPEG and PNG encoding of the rendered square
//! - `editor` - Session contract (construct, save, cancel) for host pages
//! - `config` - Editor settings with serde defaults
//! - `store` - Storage collaborator contract for saved crops

pub mod config;
pub mod decode;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod interaction;
pub mod raster;
pub mod store;

pub use config::{ConfigError, CropConfig};
pub use decode::{decode_image, validate_upload, DecodeError, SourceImage, UploadError};
pub use editor::{EditorError, EditorSession, PendingSave, RenderedSave, SessionOutcome};
pub use encode::{EncodeError, OutputFormat};
pub use geometry::{Point, Rect, ViewportGeometry};
pub use interaction::InteractionController;
pub use raster::{rasterize, CpuRasterizer, CropResult, InterpolationFilter, RasterError, Rasterizer};
pub use store::{asset_key, persist_crop, AssetKind, AssetStore, MemoryStore, StoreError, StoredCrop};

/// Smallest zoom factor the editor allows.
pub const ZOOM_MIN: f64 = 0.5;

/// Largest zoom factor the editor allows.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom change applied by one zoom-in or zoom-out press.
pub const ZOOM_STEP: f64 = 0.1;

/// Zoom values are snapped to this many steps per unit so repeated presses
/// never accumulate floating-point drift.
const ZOOM_GRID: f64 = 1_000_000.0;

/// The user's crop selection: zoom about the viewport center plus a pan
/// offset in viewport pixels.
///
/// `zoom_factor` is always within [`ZOOM_MIN`]..=[`ZOOM_MAX`]; the pan offset
/// is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditState {
    /// Scale applied about the viewport center (0.5 to 3.0)
    pub zoom_factor: f64,
    /// Translation in viewport pixels
    pub pan_offset: Point,
}

impl Default for EditState {
    fn default() -> Self {
        Self {
            zoom_factor: 1.0,
            pan_offset: Point::ZERO,
        }
    }
}

impl EditState {
    /// Create an edit state, clamping the zoom into range.
    ///
    /// Non-finite zoom falls back to 1.0 and non-finite pan components fall
    /// back to 0, so a corrupted persisted state still opens the editor.
    pub fn new(zoom_factor: f64, pan_offset: Point) -> Self {
        let sanitize = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            zoom_factor: clamp_zoom(zoom_factor),
            pan_offset: Point::new(sanitize(pan_offset.x), sanitize(pan_offset.y)),
        }
    }

    /// Re-apply the invariants to a state that may come from outside
    /// (deserialized from a host, for instance).
    pub fn sanitized(self) -> Self {
        Self::new(self.zoom_factor, self.pan_offset)
    }

    /// Check if this is the untouched default selection
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Clamp a zoom factor into the allowed range, snapping it to the zoom grid.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return 1.0;
    }
    let snapped = (zoom * ZOOM_GRID).round() / ZOOM_GRID;
    snapped.clamp(ZOOM_MIN, ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_state_default() {
        let state = EditState::default();
        assert!(state.is_default());
        assert_eq!(state.zoom_factor, 1.0);
        assert_eq!(state.pan_offset, Point::ZERO);
    }

    #[test]
    fn test_edit_state_clamps_zoom() {
        assert_eq!(EditState::new(10.0, Point::ZERO).zoom_factor, ZOOM_MAX);
        assert_eq!(EditState::new(0.01, Point::ZERO).zoom_factor, ZOOM_MIN);
        assert_eq!(EditState::new(-2.0, Point::ZERO).zoom_factor, ZOOM_MIN);
    }

    #[test]
    fn test_edit_state_sanitizes_non_finite() {
        let state = EditState::new(f64::NAN, Point::new(f64::INFINITY, 4.0));
        assert_eq!(state.zoom_factor, 1.0);
        assert_eq!(state.pan_offset, Point::new(0.0, 4.0));
    }

    #[test]
    fn test_edit_state_keeps_unbounded_pan() {
        let state = EditState::new(1.0, Point::new(-10_000.0, 25_000.0));
        assert_eq!(state.pan_offset.x, -10_000.0);
        assert_eq!(state.pan_offset.y, 25_000.0);
    }

    #[test]
    fn test_clamp_zoom_removes_step_drift() {
        let mut zoom = 1.0;
        for _ in 0..10 {
            zoom += ZOOM_STEP;
        }
        assert_eq!(clamp_zoom(zoom), 2.0);
    }

    #[test]
    fn test_edit_state_serde_shape() {
        let state = EditState::new(1.5, Point::new(10.0, -5.0));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"zoom_factor":1.5,"pan_offset":{"x":10.0,"y":-5.0}}"#);

        let parsed: EditState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }
}
