//! Coordinate transform between the Cartesian viewport and SVG pixels.
//!
//! The affine coefficients live in the scene (the `transform` of the
//! Cartesian group); everything else is derived from them on demand.

use sigmet_core::{AffineTransform, Axis, PlotFrame, SigmetError, SigmetResult, Viewport};

// ============================================================================
// STRATEGY PATTERN: Geometry Provider
// ============================================================================

/// Source of the plot pixel geometry and the installed affine coefficients
pub trait GeometryProvider {
    /// Plot area in outer SVG pixels
    fn frame(&self) -> PlotFrame;

    /// Currently installed Cartesian-to-pixel coefficients
    fn affine(&self) -> AffineTransform;

    /// Install new coefficients (no redraw)
    fn install_affine(&mut self, affine: AffineTransform);
}

/// Geometry held in plain values
#[derive(Debug, Clone, PartialEq)]
pub struct InMemoryGeometry {
    pub frame: PlotFrame,
    pub affine: AffineTransform,
}

impl InMemoryGeometry {
    pub fn new(frame: PlotFrame) -> Self {
        Self {
            frame,
            affine: AffineTransform::IDENTITY,
        }
    }

    /// Geometry showing `viewport` in `frame`
    pub fn with_viewport(frame: PlotFrame, viewport: Viewport) -> SigmetResult<Self> {
        let affine = AffineTransform::from_viewport(&viewport, frame.width, frame.height)?;
        Ok(Self { frame, affine })
    }
}

impl GeometryProvider for InMemoryGeometry {
    fn frame(&self) -> PlotFrame {
        self.frame
    }

    fn affine(&self) -> AffineTransform {
        self.affine
    }

    fn install_affine(&mut self, affine: AffineTransform) {
        self.affine = affine;
    }
}

// ============================================================================
// VIEW MAPPING
// ============================================================================

/// Snapshot of viewport and frame with infallible conversions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMapping {
    viewport: Viewport,
    frame: PlotFrame,
}

impl ViewMapping {
    pub fn new(viewport: Viewport, frame: PlotFrame) -> SigmetResult<Self> {
        if !frame.has_area() {
            return Err(SigmetError::EmptyFrame {
                width: frame.width,
                height: frame.height,
            });
        }
        Ok(Self {
            viewport: viewport.validate()?,
            frame,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame(&self) -> PlotFrame {
        self.frame
    }

    /// Cartesian units per pixel along an axis (signed)
    pub fn units_per_pixel(&self, axis: Axis) -> f64 {
        self.viewport.span(axis) / self.frame.size(axis)
    }

    /// Cartesian value to plot-local pixels
    pub fn cartesian_to_pixel(&self, value: f64, axis: Axis) -> f64 {
        let (start, _) = self.viewport.bounds(axis);
        (value - start) / self.units_per_pixel(axis)
    }

    /// Plot-local pixels to Cartesian value
    pub fn pixel_to_cartesian(&self, pixel: f64, axis: Axis) -> f64 {
        let (start, _) = self.viewport.bounds(axis);
        start + pixel * self.units_per_pixel(axis)
    }

    /// Cartesian value to outer SVG pixels
    pub fn cartesian_to_svg(&self, value: f64, axis: Axis) -> f64 {
        self.frame.origin(axis) + self.cartesian_to_pixel(value, axis)
    }

    /// Outer SVG pixels to Cartesian value
    pub fn svg_to_cartesian(&self, pixel: f64, axis: Axis) -> f64 {
        self.pixel_to_cartesian(pixel - self.frame.origin(axis), axis)
    }
}

// ============================================================================
// COORDINATE TRANSFORM
// ============================================================================

/// Owner of the Cartesian viewport of one plot
#[derive(Debug, Clone)]
pub struct CoordinateTransform<G> {
    geometry: G,
}

impl<G: GeometryProvider> CoordinateTransform<G> {
    pub fn new(geometry: G) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn into_inner(self) -> G {
        self.geometry
    }

    pub fn frame(&self) -> PlotFrame {
        self.geometry.frame()
    }

    /// Visible Cartesian rectangle, recovered from the installed coefficients
    pub fn viewport(&self) -> SigmetResult<Viewport> {
        let frame = self.geometry.frame();
        self.geometry.affine().viewport(frame.width, frame.height)
    }

    /// Install coefficients that show `viewport`. Dependent elements are not
    /// redrawn.
    pub fn set_viewport(&mut self, viewport: Viewport) -> SigmetResult<()> {
        let frame = self.geometry.frame();
        let affine = AffineTransform::from_viewport(&viewport, frame.width, frame.height)?;
        tracing::trace!(?viewport, ?affine, "installing Cartesian transform");
        self.geometry.install_affine(affine);
        Ok(())
    }

    /// Current viewport and frame as a conversion snapshot
    pub fn mapping(&self) -> SigmetResult<ViewMapping> {
        ViewMapping::new(self.viewport()?, self.geometry.frame())
    }

    pub fn cartesian_to_pixel(&self, value: f64, axis: Axis) -> SigmetResult<f64> {
        Ok(self.mapping()?.cartesian_to_pixel(value, axis))
    }

    pub fn pixel_to_cartesian(&self, pixel: f64, axis: Axis) -> SigmetResult<f64> {
        Ok(self.mapping()?.pixel_to_cartesian(pixel, axis))
    }
}

// ============================================================================
// TESTS
// ============================================================================
