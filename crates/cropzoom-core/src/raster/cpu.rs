//! CPU rasterizer backed by the `image` crate.

use image::RgbImage;

use super::sample::{axis_taps, resample, InterpolationFilter};
use super::{OutputSpec, RasterError, Rasterizer};
use crate::decode::SourceImage;
use crate::geometry::Rect;

/// Software rasterizer: samples the source region into an RGB buffer, then
/// encodes it with the requested output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuRasterizer {
    pub filter: InterpolationFilter,
}

impl CpuRasterizer {
    pub fn new(filter: InterpolationFilter) -> Self {
        Self { filter }
    }

    /// Render `region` of `source` into a `side`x`side` RGB image.
    ///
    /// The output is first filled with `background`; every output pixel
    /// center is then mapped linearly into the region and filtered. The
    /// region is used with its exact non-integer bounds. When the region is
    /// larger than the output, the filter covers each output pixel's whole
    /// footprint in the source.
    pub fn render(
        &self,
        source: &SourceImage,
        region: Rect,
        side: u32,
        background: [u8; 3],
    ) -> RgbImage {
        let mut output = RgbImage::from_pixel(side, side, image::Rgb(background));
        if !source.is_ready() || side == 0 {
            return output;
        }

        let step_x = region.width / side as f64;
        let step_y = region.height / side as f64;
        let columns: Vec<_> = (0..side)
            .map(|ox| {
                let nx = region.x + (ox as f64 + 0.5) * step_x;
                axis_taps(nx, step_x, source.width(), self.filter)
            })
            .collect();

        for oy in 0..side {
            let ny = region.y + (oy as f64 + 0.5) * step_y;
            let Some(rows) = axis_taps(ny, step_y, source.height(), self.filter) else {
                continue;
            };
            for (ox, taps) in columns.iter().enumerate() {
                if let Some(taps) = taps {
                    let rgb = resample(source, taps, &rows, background);
                    output.put_pixel(ox as u32, oy, image::Rgb(rgb));
                }
            }
        }

        output
    }
}

impl Rasterizer for CpuRasterizer {
    fn draw(
        &self,
        source: &SourceImage,
        region: Rect,
        output: &OutputSpec,
    ) -> Result<Vec<u8>, RasterError> {
        if output.side == 0 {
            return Err(RasterError::InvalidOutputSize(output.side));
        }
        let rendered = self.render(source, region, output.side, output.background);
        let bytes = output
            .format
            .encode(rendered.as_raw(), output.side, output.side)?;
        Ok(bytes)
    }
}
