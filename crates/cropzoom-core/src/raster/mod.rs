//! Rasterization of the visible crop into a fixed-size output image.
//!
//! The rasterizer is a pure function of the source image, the edit state and
//! the output settings: the same inputs always produce the same bytes.
//!
//! # Pipeline
//!
//! 1. Decline (return `Ok(None)`) if the source has no dimensions yet
//! 2. Invert the coordinate model to get the natural-space region visible
//!    through the whole viewport (see [`ViewportGeometry::source_region`])
//! 3. Hand the region to a [`Rasterizer`] backend, which fills the output
//!    with the background, draws the region scaled to fill the square, and
//!    encodes the result
//!
//! The circular mask some hosts draw over the viewport is decoration only:
//! the full square is always rasterized.

mod cpu;
mod sample;

use thiserror::Error;

pub use cpu::CpuRasterizer;
pub use sample::InterpolationFilter;

use crate::config::CropConfig;
use crate::decode::SourceImage;
use crate::encode::{EncodeError, OutputFormat};
use crate::geometry::{Rect, ViewportGeometry};
use crate::EditState;

/// Errors that can occur while rasterizing a crop.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The output side length is zero.
    #[error("Invalid output size: {0}")]
    InvalidOutputSize(u32),

    /// Encoding the rendered square failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// A non-CPU backend failed (for example a canvas security restriction).
    #[error("Rasterizer backend failed: {0}")]
    Backend(String),
}

/// What the backend must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    /// Side length of the square output in pixels
    pub side: u32,
    /// Opaque color painted before the source is drawn
    pub background: [u8; 3],
    /// Encoding of the result
    pub format: OutputFormat,
}

/// A drawing and encoding backend.
///
/// Implementations draw `region` (natural-space, non-integer) of `source`
/// scaled to fill an `output.side` square and return the encoded bytes.
/// The coordinate math lives outside the backend, so a browser canvas, a CPU
/// library or a GPU blit can be swapped in without touching it.
pub trait Rasterizer {
    fn draw(
        &self,
        source: &SourceImage,
        region: Rect,
        output: &OutputSpec,
    ) -> Result<Vec<u8>, RasterError>;
}

impl<R: Rasterizer + ?Sized> Rasterizer for &R {
    fn draw(
        &self,
        source: &SourceImage,
        region: Rect,
        output: &OutputSpec,
    ) -> Result<Vec<u8>, RasterError> {
        (**self).draw(source, region, output)
    }
}

/// The saved crop: encoded square image plus the state that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CropResult {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes`
    pub mime_type: &'static str,
    /// Output format used for `bytes`
    pub format: OutputFormat,
    /// Width and height of the encoded image in pixels
    pub side: u32,
    /// Zoom and pan that produced this crop, for seeding a later re-edit
    pub edit_state: EditState,
}

impl CropResult {
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }
}

/// Rasterize the crop the user sees for `state`.
///
/// # Returns
///
/// - `Ok(Some(result))` with exactly `config.output_side` square pixels
/// - `Ok(None)` if the source is not ready (zero width or height)
///
/// # Errors
///
/// Returns a `RasterError` if the backend or encoder fails. No partial
/// result is ever produced.
pub fn rasterize<R: Rasterizer + ?Sized>(
    rasterizer: &R,
    source: &SourceImage,
    state: &EditState,
    config: &CropConfig,
) -> Result<Option<CropResult>, RasterError> {
    let Some(geometry) =
        ViewportGeometry::new(config.viewport_side, source.width(), source.height())
    else {
        tracing::debug!(
            width = source.width(),
            height = source.height(),
            "source not ready; declining to rasterize"
        );
        return Ok(None);
    };

    let state = state.sanitized();
    let region = geometry.source_region(&state);
    let output = config.output_spec();
    let bytes = rasterizer.draw(source, region, &output)?;

    Ok(Some(CropResult {
        bytes,
        mime_type: output.format.mime_type(),
        format: output.format,
        side: output.side,
        edit_state: state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use std::cell::RefCell;

    /// Gradient test image: red grows with x, green with y.
    fn gradient(width: u32, height: u32) -> SourceImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(2).saturating_sub(1).max(1)) as u8);
                pixels.push((y * 255 / height.max(2).saturating_sub(1).max(1)) as u8);
                pixels.push(64);
                pixels.push(255);
            }
        }
        SourceImage::from_rgba(width, height, pixels).unwrap()
    }

    fn decode(result: &CropResult) -> image::RgbImage {
        image::load_from_memory(&result.bytes).unwrap().into_rgb8()
    }

    /// Records the region it was asked to draw.
    #[derive(Default)]
    struct RecordingRasterizer {
        regions: RefCell<Vec<Rect>>,
    }

    impl Rasterizer for RecordingRasterizer {
        fn draw(&self, _: &SourceImage, region: Rect, _: &OutputSpec) -> Result<Vec<u8>, RasterError> {
            self.regions.borrow_mut().push(region);
            Ok(vec![1, 2, 3])
        }
    }

    struct FailingRasterizer;

    impl Rasterizer for FailingRasterizer {
        fn draw(&self, _: &SourceImage, _: Rect, _: &OutputSpec) -> Result<Vec<u8>, RasterError> {
            Err(RasterError::Backend("canvas is tainted".to_string()))
        }
    }

    #[test]
    fn test_output_is_configured_size() {
        let config = CropConfig::default();
        let result = rasterize(&CpuRasterizer::default(), &gradient(300, 120), &EditState::default(), &config)
            .unwrap()
            .unwrap();

        assert_eq!(result.side, 400);
        assert_eq!(result.mime_type, "image/jpeg");
        assert_eq!(decode(&result).dimensions(), (400, 400));
    }

    #[test]
    fn test_unready_source_declines() {
        let result = rasterize(
            &CpuRasterizer::default(),
            &SourceImage::unready(),
            &EditState::default(),
            &CropConfig::default(),
        );
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_backend_receives_inverse_mapped_region() {
        let recorder = RecordingRasterizer::default();
        let config = CropConfig::default();
        let state = EditState::new(2.0, Point::new(0.0, 0.0));
        rasterize(&recorder, &gradient(1000, 500), &state, &config).unwrap();

        let region = recorder.regions.borrow()[0];
        assert!((region.width - 250.0).abs() < 1e-9);
        assert!((region.x - 375.0).abs() < 1e-9);
        assert!((region.y - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_backend_failure_produces_no_result() {
        let result = rasterize(&FailingRasterizer, &gradient(10, 10), &EditState::default(), &CropConfig::default());
        assert!(matches!(result, Err(RasterError::Backend(_))));
    }

    #[test]
    fn test_result_echoes_edit_state() {
        let state = EditState::new(1.5, Point::new(10.0, -5.0));
        let result = rasterize(&RecordingRasterizer::default(), &gradient(20, 20), &state, &CropConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(result.edit_state, state);
        assert_eq!(result.bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let source = gradient(640, 480);
        let state = EditState::new(1.5, Point::new(10.0, -5.0));
        let config = CropConfig::default();

        let a = rasterize(&CpuRasterizer::default(), &source, &state, &config).unwrap().unwrap();
        let b = rasterize(&CpuRasterizer::default(), &source, &state, &config).unwrap().unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(decode(&a), decode(&b));
    }

    #[test]
    fn test_png_output_matches_direct_render() {
        let source = gradient(200, 300);
        let state = EditState::new(1.2, Point::new(-14.0, 30.0));
        let mut config = CropConfig::default();
        config.format = OutputFormat::Png;

        let result = rasterize(&CpuRasterizer::default(), &source, &state, &config).unwrap().unwrap();
        let geometry = ViewportGeometry::new(config.viewport_side, 200, 300).unwrap();
        let expected = CpuRasterizer::default().render(
            &source,
            geometry.source_region(&state),
            config.output_side,
            config.background,
        );
        assert_eq!(decode(&result), expected);
    }

    #[test]
    fn test_panned_out_of_view_is_background() {
        let source = gradient(100, 100);
        let mut config = CropConfig::default();
        config.format = OutputFormat::Png;
        config.background = [10, 200, 30];
        let state = EditState::new(1.0, Point::new(1000.0, 0.0));

        let result = rasterize(&CpuRasterizer::default(), &source, &state, &config).unwrap().unwrap();
        let img = decode(&result);
        assert_eq!(img.get_pixel(0, 0).0, [10, 200, 30]);
        assert_eq!(img.get_pixel(399, 399).0, [10, 200, 30]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
