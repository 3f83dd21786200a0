//! Coordinate model for the crop editor.
//!
//! Three spaces are involved when the user positions a photo:
//!
//! - **Natural space**: the source image's own pixel grid, origin top-left,
//!   extent `(natural_width, natural_height)`.
//! - **Viewport space**: the square preview box the user manipulates, origin
//!   top-left, side `V` in display pixels.
//! - **Output space**: the square raster produced on save, side `O`.
//!
//! The image is cover-fitted into the viewport (its shorter side spans `V`),
//! centered, then scaled by the zoom factor about the viewport center and
//! translated by the pan offset. The pan offset is measured in viewport
//! pixels, so dragging moves the image one-for-one with the pointer at any
//! zoom level.
//!
//! # Forward Mapping
//!
//! ```text
//! s      = V / min(w, h)
//! base   = ((V - w*s) / 2, (V - h*s) / 2)
//! c      = (V / 2, V / 2)
//! view   = ((natural * s + base) - c) * zoom + c + pan
//! ```
//!
//! The inverse mapping is exact; no intermediate value is rounded.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::EditState;

/// A point (or vector) in one of the editor's coordinate spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Axis-aligned rectangle with non-integer bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Geometry of one editing session: viewport side and source dimensions.
///
/// Construction fails for an unready source (zero width or height) or a
/// degenerate viewport, so every method can assume a positive cover scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    viewport_side: f64,
    natural_width: f64,
    natural_height: f64,
}

impl ViewportGeometry {
    /// Create the geometry for a viewport of side `viewport_side` showing an
    /// image of the given natural dimensions.
    ///
    /// Returns `None` if either natural dimension is zero or the viewport side
    /// is not a positive finite number.
    pub fn new(viewport_side: f64, natural_width: u32, natural_height: u32) -> Option<Self> {
        if natural_width == 0 || natural_height == 0 {
            return None;
        }
        if !viewport_side.is_finite() || viewport_side <= 0.0 {
            return None;
        }
        Some(Self {
            viewport_side,
            natural_width: natural_width as f64,
            natural_height: natural_height as f64,
        })
    }

    pub fn viewport_side(&self) -> f64 {
        self.viewport_side
    }

    /// Natural dimensions as `(width, height)`.
    pub fn natural_size(&self) -> (f64, f64) {
        (self.natural_width, self.natural_height)
    }

    /// Scale that maps the shorter natural side onto the viewport side.
    #[inline]
    pub fn cover_scale(&self) -> f64 {
        self.viewport_side / self.natural_width.min(self.natural_height)
    }

    /// Top-left of the cover-fitted image at zoom 1 and no pan.
    ///
    /// At least one component is always zero; the other is negative when the
    /// image overflows the viewport along that axis.
    pub fn base_offset(&self) -> Point {
        let s = self.cover_scale();
        Point::new(
            (self.viewport_side - self.natural_width * s) / 2.0,
            (self.viewport_side - self.natural_height * s) / 2.0,
        )
    }

    #[inline]
    fn viewport_center(&self) -> Point {
        let half = self.viewport_side / 2.0;
        Point::new(half, half)
    }

    /// Map a point from natural space into viewport space.
    pub fn natural_to_viewport(&self, natural: Point, state: &EditState) -> Point {
        let s = self.cover_scale();
        let base = self.base_offset();
        let c = self.viewport_center();
        let zoom = state.zoom_factor;

        Point::new(
            (natural.x * s + base.x - c.x) * zoom + c.x + state.pan_offset.x,
            (natural.y * s + base.y - c.y) * zoom + c.y + state.pan_offset.y,
        )
    }

    /// Map a point from viewport space back into natural space.
    ///
    /// This is the exact inverse of [`natural_to_viewport`](Self::natural_to_viewport).
    pub fn viewport_to_natural(&self, view: Point, state: &EditState) -> Point {
        let s = self.cover_scale();
        let base = self.base_offset();
        let c = self.viewport_center();
        let zoom = state.zoom_factor;

        Point::new(
            ((view.x - state.pan_offset.x - c.x) / zoom + c.x - base.x) / s,
            ((view.y - state.pan_offset.y - c.y) / zoom + c.y - base.y) / s,
        )
    }

    /// The natural-space rectangle that is visible through the whole viewport.
    ///
    /// The region is square, generally non-integer, and may extend beyond the
    /// image bounds when the user has zoomed out or panned the image away.
    /// Its side is `min(w, h) / zoom` and its center sits at the image center
    /// shifted by `-pan / (zoom * s)`.
    pub fn source_region(&self, state: &EditState) -> Rect {
        let top_left = self.viewport_to_natural(Point::ZERO, state);
        let side = self.viewport_side / (state.zoom_factor * self.cover_scale());
        Rect::new(top_left.x, top_left.y, side, side)
    }

    /// Where the whole image is drawn in viewport space.
    ///
    /// UI layers use this to place the preview; parts outside `[0, V]` are
    /// clipped by the viewport.
    pub fn displayed_rect(&self, state: &EditState) -> Rect {
        let top_left = self.natural_to_viewport(Point::ZERO, state);
        let bottom_right = self.natural_to_viewport(
            Point::new(self.natural_width, self.natural_height),
            state,
        );
        Rect::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < EPS, "expected {b}, got {a}");
    }

    fn state(zoom: f64, x: f64, y: f64) -> EditState {
        EditState::new(zoom, Point::new(x, y))
    }

    #[test]
    fn test_rejects_unready_dimensions() {
        assert!(ViewportGeometry::new(320.0, 0, 100).is_none());
        assert!(ViewportGeometry::new(320.0, 100, 0).is_none());
        assert!(ViewportGeometry::new(0.0, 100, 100).is_none());
        assert!(ViewportGeometry::new(f64::NAN, 100, 100).is_none());
    }

    #[test]
    fn test_cover_scale_uses_shorter_side() {
        let geo = ViewportGeometry::new(320.0, 1600, 800).unwrap();
        assert_close(geo.cover_scale(), 0.4);

        let geo = ViewportGeometry::new(320.0, 640, 1280).unwrap();
        assert_close(geo.cover_scale(), 0.5);
    }

    #[test]
    fn test_base_offset_centers_overflowing_axis() {
        // 1600x800 at scale 0.4 is 640x320; 320 px overflow on x
        let geo = ViewportGeometry::new(320.0, 1600, 800).unwrap();
        let base = geo.base_offset();
        assert_close(base.x, -160.0);
        assert_close(base.y, 0.0);
    }

    #[test]
    fn test_default_state_shows_center_square() {
        let geo = ViewportGeometry::new(320.0, 1600, 800).unwrap();
        let region = geo.source_region(&EditState::default());
        assert_close(region.x, 400.0);
        assert_close(region.y, 0.0);
        assert_close(region.width, 800.0);
        assert_close(region.height, 800.0);
    }

    #[test]
    fn test_zoom_shrinks_region_about_center() {
        let geo = ViewportGeometry::new(320.0, 1000, 1000).unwrap();
        let region = geo.source_region(&state(2.0, 0.0, 0.0));
        assert_close(region.width, 500.0);
        assert_close(region.x, 250.0);
        assert_close(region.y, 250.0);
        assert_close(region.center().x, 500.0);
    }

    #[test]
    fn test_pan_is_in_viewport_pixels() {
        // scale = 320 / 1000 = 0.32; panning 32 view px = 100 natural px at zoom 1
        let geo = ViewportGeometry::new(320.0, 1000, 1000).unwrap();
        let region = geo.source_region(&state(1.0, 32.0, -16.0));
        assert_close(region.x, -100.0);
        assert_close(region.y, 50.0);

        // At zoom 2 the same drag moves half as far in natural space
        let region = geo.source_region(&state(2.0, 32.0, 0.0));
        assert_close(region.x, 250.0 - 50.0);
    }

    #[test]
    fn test_forward_then_inverse_is_identity() {
        let geo = ViewportGeometry::new(320.0, 1234, 567).unwrap();
        let st = state(1.7, 13.5, -42.25);
        let p = Point::new(300.25, 100.75);
        let back = geo.viewport_to_natural(geo.natural_to_viewport(p, &st), &st);
        assert_close(back.x, p.x);
        assert_close(back.y, p.y);
    }

    #[test]
    fn test_displayed_rect_default_covers_viewport() {
        let geo = ViewportGeometry::new(320.0, 800, 1600).unwrap();
        let rect = geo.displayed_rect(&EditState::default());
        assert_close(rect.x, 0.0);
        assert_close(rect.y, -160.0);
        assert_close(rect.width, 320.0);
        assert_close(rect.height, 640.0);
    }

    #[test]
    fn test_point_operators() {
        let a = Point::new(130.0, 80.0);
        let b = Point::new(100.0, 100.0);
        assert_eq!(a - b, Point::new(30.0, -20.0));
        assert_eq!(Point::ZERO + (a - b), Point::new(30.0, -20.0));
        assert_eq!(a + b - b, a);
    }

    #[test]
    fn test_region_is_not_rounded() {
        let geo = ViewportGeometry::new(320.0, 1001, 999).unwrap();
        let region = geo.source_region(&state(1.3, 0.7, 0.0));
        assert!(region.x.fract() != 0.0);
        assert_close(region.width, 999.0 / 1.3);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
