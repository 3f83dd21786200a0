//! Source resampling with bilinear and Lanczos3 kernels.
//!
//! Sampling takes a continuous natural-space coordinate where pixel `i` spans
//! `[i, i + 1)`. Points outside the image get no taps so the caller keeps
//! the background there. Near the edges, taps clamp to the border pixel
//! instead of reading black, so a crop flush with the image edge shows no
//! dark seam.
//!
//! When the output is smaller than the source region the kernel is
//! stretched by the shrink ratio, so every source pixel under an output
//! pixel's footprint contributes. Bilinear then becomes a tent filter of
//! radius `scale`, Lanczos3 a Lanczos window of radius `3 * scale`.
//!
//! Source alpha is handled with premultiplied accumulation and the result is
//! composited over the opaque background.

use serde::{Deserialize, Serialize};

use crate::decode::SourceImage;

/// Interpolation filter used when sampling the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Lanczos3 interpolation, sharper on strong edges.
    Lanczos3,
}

impl InterpolationFilter {
    /// Kernel radius at a scale of one source pixel.
    fn support(self) -> f64 {
        match self {
            InterpolationFilter::Bilinear => 1.0,
            InterpolationFilter::Lanczos3 => 3.0,
        }
    }

    fn weight(self, x: f64) -> f64 {
        match self {
            InterpolationFilter::Bilinear => (1.0 - x.abs()).max(0.0),
            InterpolationFilter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

/// Source indices along one axis with their normalized weights.
pub(crate) type Taps = Vec<(usize, f64)>;

/// Compute the taps for natural coordinate `pos` along an axis of `len`
/// pixels, where one output pixel covers `scale` source pixels.
///
/// Returns `None` if `pos` lies outside `[0, len)`.
pub(crate) fn axis_taps(
    pos: f64,
    scale: f64,
    len: u32,
    filter: InterpolationFilter,
) -> Option<Taps> {
    if !(pos >= 0.0 && pos < len as f64) {
        return None;
    }

    let scale = if scale.is_finite() { scale.max(1.0) } else { 1.0 };
    // Pixel-center coordinates
    let center = pos - 0.5;
    let radius = filter.support() * scale;
    let first = (center - radius).floor() as i64;
    let last = (center + radius).ceil() as i64;

    let mut taps: Taps = Vec::with_capacity((last - first + 1) as usize);
    let mut sum = 0.0;
    for i in first..=last {
        let weight = filter.weight((i as f64 - center) / scale);
        if weight == 0.0 {
            continue;
        }
        let index = clamp_index(i, len);
        match taps.last_mut() {
            Some((last_index, w)) if *last_index == index => *w += weight,
            _ => taps.push((index, weight)),
        }
        sum += weight;
    }

    if sum.abs() > f64::EPSILON {
        for tap in &mut taps {
            tap.1 /= sum;
        }
    }
    Some(taps)
}

/// Filter the source through separable `columns` x `rows` taps and composite
/// the result over `background`.
pub(crate) fn resample(
    source: &SourceImage,
    columns: &[(usize, f64)],
    rows: &[(usize, f64)],
    background: [u8; 3],
) -> [u8; 3] {
    let mut acc = Accum::default();
    for &(sy, wy) in rows {
        let mut row = Accum::default();
        for &(sx, wx) in columns {
            row.add(source.pixel(sx, sy), wx);
        }
        acc.merge(row, wy);
    }
    composite(acc, background)
}

/// Premultiplied RGB plus coverage, all in the 0..=255 / 0..=1 ranges.
#[derive(Debug, Clone, Copy, Default)]
struct Accum {
    rgb: [f64; 3],
    alpha: f64,
}

impl Accum {
    #[inline]
    fn add(&mut self, px: [u8; 4], weight: f64) {
        let a = px[3] as f64 / 255.0 * weight;
        self.rgb[0] += px[0] as f64 * a;
        self.rgb[1] += px[1] as f64 * a;
        self.rgb[2] += px[2] as f64 * a;
        self.alpha += a;
    }

    #[inline]
    fn merge(&mut self, other: Accum, weight: f64) {
        for i in 0..3 {
            self.rgb[i] += other.rgb[i] * weight;
        }
        self.alpha += other.alpha * weight;
    }
}

#[inline]
fn composite(acc: Accum, background: [u8; 3]) -> [u8; 3] {
    let uncovered = 1.0 - acc.alpha.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for i in 0..3 {
        let v = acc.rgb[i] + background[i] as f64 * uncovered;
        out[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    out
}

#[inline]
fn clamp_index(i: i64, len: u32) -> usize {
    i.clamp(0, len as i64 - 1) as usize
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;
    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
