//! Cartesian viewport and its affine map to SVG pixel space

use crate::{Axis, SigmetError, SigmetResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// VIEWPORT
// ============================================================================

/// Cartesian rectangle visible in the plot area.
///
/// `top` is the coordinate at the top pixel edge and `bottom` the one at the
/// bottom edge, so a plot with y increasing upward has `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Viewport {
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Signed horizontal span (`right - left`)
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Signed vertical span (`bottom - top`)
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Bounds along an axis, in pixel order (left/right or top/bottom)
    pub fn bounds(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::Horizontal => (self.left, self.right),
            Axis::Vertical => (self.top, self.bottom),
        }
    }

    /// Signed span along an axis
    pub fn span(&self, axis: Axis) -> f64 {
        let (start, end) = self.bounds(axis);
        end - start
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite()
            && self.right.is_finite()
            && self.top.is_finite()
            && self.bottom.is_finite()
    }

    /// True if either axis has zero span or a bound is not finite
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.left == self.right || self.top == self.bottom
    }

    /// Reject degenerate rectangles
    pub fn validate(self) -> SigmetResult<Self> {
        if self.is_degenerate() {
            Err(SigmetError::DegenerateViewport(self))
        } else {
            Ok(self)
        }
    }

    /// Shift by a Cartesian offset
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.left + dx,
            self.right + dx,
            self.top + dy,
            self.bottom + dy,
        )
    }

    /// Multiply every bound by `factor` (scaling about the origin)
    pub fn scale_about_origin(&self, factor_x: f64, factor_y: f64) -> Self {
        Self::new(
            self.left * factor_x,
            self.right * factor_x,
            self.top * factor_y,
            self.bottom * factor_y,
        )
    }

    /// Rectangle with positive width and height, for background drawing
    pub fn extent(&self) -> CartesianExtent {
        CartesianExtent {
            x: self.left.min(self.right),
            y: self.top.min(self.bottom),
            width: (self.right - self.left).abs(),
            height: (self.bottom - self.top).abs(),
        }
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Viewport, tolerance: f64) -> bool {
        (self.left - other.left).abs() <= tolerance
            && (self.right - other.right).abs() <= tolerance
            && (self.top - other.top).abs() <= tolerance
            && (self.bottom - other.bottom).abs() <= tolerance
    }
}

/// Normalized Cartesian rectangle (non-negative width and height)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CartesianExtent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// ============================================================================
// AFFINE TRANSFORM
// ============================================================================

/// Scale and offset mapping Cartesian coordinates to plot-local pixels.
///
/// Equivalent to the SVG matrix `matrix(scale_x 0 0 scale_y offset_x offset_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl AffineTransform {
    pub const IDENTITY: AffineTransform = AffineTransform {
        scale_x: 1.0,
        scale_y: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    pub const fn new(scale_x: f64, scale_y: f64, offset_x: f64, offset_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            offset_x,
            offset_y,
        }
    }

    /// Coefficients that map `viewport` onto a `width` x `height` pixel area
    pub fn from_viewport(viewport: &Viewport, width: f64, height: f64) -> SigmetResult<Self> {
        let viewport = viewport.validate()?;
        if !(width > 0.0 && height > 0.0) {
            return Err(SigmetError::EmptyFrame { width, height });
        }

        let scale_x = width / (viewport.right - viewport.left);
        let scale_y = height / (viewport.bottom - viewport.top);

        Ok(Self {
            scale_x,
            scale_y,
            offset_x: -scale_x * viewport.left,
            offset_y: -scale_y * viewport.top,
        })
    }

    pub fn is_invertible(&self) -> bool {
        self.scale_x != 0.0
            && self.scale_y != 0.0
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.offset_x.is_finite()
            && self.offset_y.is_finite()
    }

    /// Invert the map over a `width` x `height` pixel area
    pub fn viewport(&self, width: f64, height: f64) -> SigmetResult<Viewport> {
        if !self.is_invertible() {
            return Err(SigmetError::SingularTransform);
        }

        Ok(Viewport {
            left: -self.offset_x / self.scale_x,
            right: (width - self.offset_x) / self.scale_x,
            top: -self.offset_y / self.scale_y,
            bottom: (height - self.offset_y) / self.scale_y,
        })
    }

    /// Map a Cartesian point to plot-local pixels
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.scale_x * x + self.offset_x,
            self.scale_y * y + self.offset_y,
        )
    }

    /// Value for an SVG `transform` attribute
    pub fn svg_matrix(&self) -> String {
        format!(
            "matrix({} 0 0 {} {} {})",
            self.scale_x, self.scale_y, self.offset_x, self.offset_y
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ============================================================================
// PLOT FRAME & MARGINS
// ============================================================================

/// Pixel rectangle of the plot area in outer SVG coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotFrame {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pixel origin along an axis
    pub fn origin(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Pixel size along an axis
    pub fn size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Inclusive test of an outer SVG coordinate against the frame edges
    pub fn contains(&self, axis: Axis, position: f64) -> bool {
        let start = self.origin(axis);
        start <= position && position <= start + self.size(axis)
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Space between the outer SVG edges and the plot frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PlotMargins {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Margins left around `frame` inside an SVG of the given size
    pub fn around(frame: &PlotFrame, svg_width: f64, svg_height: f64) -> Self {
        Self {
            top: frame.y,
            right: svg_width - frame.x - frame.width,
            bottom: svg_height - frame.y - frame.height,
            left: frame.x,
        }
    }

    /// Plot width for an SVG of `svg_width` (never negative)
    pub fn inner_width(&self, svg_width: f64) -> f64 {
        (svg_width - self.left - self.right).max(0.0)
    }

    /// Plot height for an SVG of `svg_height` (never negative)
    pub fn inner_height(&self, svg_height: f64) -> f64 {
        (svg_height - self.top - self.bottom).max(0.0)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Viewport {
        Viewport::new(-100.0, 100.0, -50.0, 50.0)
    }

    #[test]
    fn test_affine_from_viewport() {
        let xform = AffineTransform::from_viewport(&scenario(), 400.0, 200.0).unwrap();
        assert_eq!(xform.scale_x, 2.0);
        assert_eq!(xform.scale_y, 2.0);
        assert_eq!(xform.apply(-100.0, -50.0), (0.0, 0.0));
        assert_eq!(xform.apply(0.0, 0.0), (200.0, 100.0));
        assert_eq!(xform.apply(100.0, 50.0), (400.0, 200.0));
    }

    #[test]
    fn test_affine_inverted_vertical_axis() {
        let view = Viewport::new(0.0, 10.0, 5.0, -5.0);
        let xform = AffineTransform::from_viewport(&view, 100.0, 100.0).unwrap();
        assert!(xform.scale_y < 0.0);
        assert_eq!(xform.apply(0.0, 5.0), (0.0, 0.0));
        assert_eq!(xform.apply(10.0, -5.0), (100.0, 100.0));
    }

    #[test]
    fn test_viewport_round_trip() {
        let view = Viewport::new(-37.5, 912.25, 480.0, -20.0);
        let xform = AffineTransform::from_viewport(&view, 640.0, 480.0).unwrap();
        let back = xform.viewport(640.0, 480.0).unwrap();
        assert!(back.approx_eq(&view, 1e-9));
    }

    #[test]
    fn test_degenerate_viewport_rejected() {
        let flat = Viewport::new(3.0, 3.0, 0.0, 1.0);
        assert!(flat.is_degenerate());
        assert_eq!(
            AffineTransform::from_viewport(&flat, 10.0, 10.0),
            Err(SigmetError::DegenerateViewport(flat))
        );

        let nan = Viewport::new(0.0, f64::NAN, 0.0, 1.0);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_empty_frame_rejected() {
        let result = AffineTransform::from_viewport(&scenario(), 0.0, 200.0);
        assert!(matches!(result, Err(SigmetError::EmptyFrame { .. })));
    }

    #[test]
    fn test_singular_transform() {
        let xform = AffineTransform::new(0.0, 1.0, 0.0, 0.0);
        assert_eq!(xform.viewport(10.0, 10.0), Err(SigmetError::SingularTransform));
    }

    #[test]
    fn test_extent_normalizes() {
        let extent = Viewport::new(10.0, -10.0, 5.0, -5.0).extent();
        assert_eq!(extent.x, -10.0);
        assert_eq!(extent.y, -5.0);
        assert_eq!(extent.width, 20.0);
        assert_eq!(extent.height, 10.0);
    }

    #[test]
    fn test_frame_contains_inclusive() {
        let frame = PlotFrame::new(50.0, 20.0, 400.0, 200.0);
        assert!(frame.contains(Axis::Horizontal, 50.0));
        assert!(frame.contains(Axis::Horizontal, 450.0));
        assert!(!frame.contains(Axis::Horizontal, 450.5));
        assert!(frame.contains(Axis::Vertical, 220.0));
        assert!(!frame.contains(Axis::Vertical, 19.0));
    }

    #[test]
    fn test_margins_around_frame() {
        let frame = PlotFrame::new(60.0, 30.0, 500.0, 400.0);
        let margins = PlotMargins::around(&frame, 700.0, 500.0);
        assert_eq!(margins, PlotMargins::new(30.0, 140.0, 70.0, 60.0));
        assert_eq!(margins.inner_width(900.0), 700.0);
        assert_eq!(margins.inner_height(50.0), 0.0);
    }

    #[test]
    fn test_svg_matrix() {
        let xform = AffineTransform::new(2.0, -2.0, 200.0, 100.0);
        assert_eq!(xform.svg_matrix(), "matrix(2 0 0 -2 200 100)");
    }
}
