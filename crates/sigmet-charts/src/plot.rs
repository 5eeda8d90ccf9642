//! Interactive state of one plot.
//!
//! `PlotSession` owns the coordinate transform over the scene, the axis label
//! pools and the drag tracker. Every user gesture ends in `redraw`, which
//! regenerates the background and both axes from the current viewport.

use crate::drag::DragTracker;
use crate::labels::{self, plan_labels, LabelPlan, LabelPool, LabelSurface};
use crate::transform::{CoordinateTransform, GeometryProvider, ViewMapping};
use crate::zoom::{resize_viewport, zoom_viewport};
use serde::{Deserialize, Serialize};
use sigmet_core::{
    Axis, CartesianExtent, PixelPoint, PrecisionFormatter, SigmetError, SigmetResult, Viewport,
    DEFAULT_LABEL_PRECISION,
};

// ============================================================================
// STRATEGY PATTERN: Plot Scene
// ============================================================================

/// Everything a plot session draws on
pub trait PlotScene: GeometryProvider + LabelSurface {
    /// Shift the plot and the axes by a pixel offset during a drag
    fn translate_preview(&mut self, dx: f64, dy: f64);

    /// Put the plot back at its position from before the drag
    fn restore_rest_position(&mut self);

    /// Position the axis elements and titles around the plot frame
    fn layout_axes(&mut self);

    /// Cover the visible Cartesian rectangle with the background
    fn update_background(&mut self, extent: &CartesianExtent);

    /// Multiply stroke widths, dash patterns and marker sizes by `factor`
    fn scale_presentation(&mut self, factor: f64);

    /// Give the plot area a new pixel size
    fn resize_plot(&mut self, width: f64, height: f64);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Axis label settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Significant digits of x axis labels
    pub x_precision: usize,
    /// Significant digits of y axis labels
    pub y_precision: usize,
    /// Share of the axis length the labels may occupy
    pub budget_fraction: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            x_precision: DEFAULT_LABEL_PRECISION,
            y_precision: DEFAULT_LABEL_PRECISION,
            budget_fraction: 0.25,
        }
    }
}

impl LabelConfig {
    pub fn with_precision(mut self, x: usize, y: usize) -> Self {
        self.x_precision = x;
        self.y_precision = y;
        self
    }

    pub fn formatter(&self, axis: Axis) -> PrecisionFormatter {
        match axis {
            Axis::Horizontal => PrecisionFormatter::new(self.x_precision),
            Axis::Vertical => PrecisionFormatter::new(self.y_precision),
        }
    }
}

// ============================================================================
// PLOT SESSION
// ============================================================================

pub struct PlotSession<S: PlotScene> {
    transform: CoordinateTransform<S>,
    x_labels: LabelPool<S::Entry>,
    y_labels: LabelPool<S::Entry>,
    drag: DragTracker,
    config: LabelConfig,
}

impl<S: PlotScene> PlotSession<S> {
    pub fn new(scene: S, config: LabelConfig) -> Self {
        Self {
            transform: CoordinateTransform::new(scene),
            x_labels: LabelPool::new(),
            y_labels: LabelPool::new(),
            drag: DragTracker::new(),
            config,
        }
    }

    pub fn scene(&self) -> &S {
        self.transform.geometry()
    }

    pub fn scene_mut(&mut self) -> &mut S {
        self.transform.geometry_mut()
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    pub fn viewport(&self) -> SigmetResult<Viewport> {
        self.transform.viewport()
    }

    pub fn mapping(&self) -> SigmetResult<ViewMapping> {
        self.transform.mapping()
    }

    /// Install a viewport and redraw everything that depends on it
    pub fn set_viewport(&mut self, viewport: Viewport) -> SigmetResult<()> {
        self.transform.set_viewport(viewport)?;
        self.redraw()
    }

    /// Regenerate axes, background and labels for the current viewport
    pub fn redraw(&mut self) -> SigmetResult<()> {
        let mapping = self.transform.mapping()?;
        let scene = self.transform.geometry_mut();
        scene.layout_axes();
        scene.update_background(&mapping.viewport().extent());

        for &axis in Axis::all() {
            let plan = self.label_axis(axis)?;
            tracing::trace!(axis = axis.name(), spacing = ?plan.spacing, count = plan.coords.len(), "axis labelled");
        }
        Ok(())
    }

    /// Choose and apply labels for one axis
    pub fn label_axis(&mut self, axis: Axis) -> SigmetResult<LabelPlan> {
        let mapping = self.transform.mapping()?;
        let (lo, hi) = mapping.viewport().bounds(axis);
        let budget = mapping.frame().size(axis) * self.config.budget_fraction;
        let formatter = self.config.formatter(axis);

        let pool = match axis {
            Axis::Horizontal => &mut self.x_labels,
            Axis::Vertical => &mut self.y_labels,
        };
        let scene = self.transform.geometry_mut();

        Ok(plan_labels(lo, hi, budget, |coords| {
            labels::apply_axis_labels(pool, scene, &mapping, axis, coords, &formatter)
        }))
    }

    /// Show labels at `coords` on `axis`; returns the extent of the visible
    /// labels
    pub fn apply_axis_labels(&mut self, coords: &[f64], axis: Axis) -> SigmetResult<f64> {
        let mapping = self.transform.mapping()?;
        let formatter = self.config.formatter(axis);
        let pool = match axis {
            Axis::Horizontal => &mut self.x_labels,
            Axis::Vertical => &mut self.y_labels,
        };
        Ok(labels::apply_axis_labels(
            pool,
            self.transform.geometry_mut(),
            &mapping,
            axis,
            coords,
            &formatter,
        ))
    }

    /// Zoom by `factor` (`< 1` zooms in)
    pub fn zoom(&mut self, factor: f64) -> SigmetResult<()> {
        let viewport = zoom_viewport(&self.transform.viewport()?, factor)?;
        self.transform.set_viewport(viewport)?;
        self.transform.geometry_mut().scale_presentation(factor);
        tracing::debug!(factor, ?viewport, "zoomed");
        self.redraw()
    }

    /// Resize the plot area to `width` x `height` pixels
    pub fn resize(&mut self, width: f64, height: f64) -> SigmetResult<()> {
        if !(width > 0.0 && height > 0.0) {
            return Err(SigmetError::EmptyFrame { width, height });
        }

        let frame = self.transform.frame();
        let viewport = resize_viewport(
            &self.transform.viewport()?,
            (frame.width, frame.height),
            (width, height),
        );

        self.transform.geometry_mut().resize_plot(width, height);
        self.transform.set_viewport(viewport)?;
        tracing::debug!(width, height, ?viewport, "plot resized");
        self.redraw()
    }

    pub fn drag_start(&mut self, point: PixelPoint) {
        if self.drag.start(point) {
            tracing::trace!("unfinished drag discarded");
        }
    }

    pub fn drag_move(&mut self, point: PixelPoint) {
        if let Some((dx, dy)) = self.drag.move_to(point) {
            self.transform.geometry_mut().translate_preview(dx, dy);
        }
    }

    /// Finish a drag at `point`; returns false if no drag was in progress
    pub fn drag_end(&mut self, point: PixelPoint) -> SigmetResult<bool> {
        let Some((dx, dy)) = self.drag.finish(point) else {
            return Ok(false);
        };

        let mapping = self.transform.mapping()?;
        let viewport = mapping.viewport().translate(
            -dx * mapping.units_per_pixel(Axis::Horizontal),
            -dy * mapping.units_per_pixel(Axis::Vertical),
        );

        self.transform.geometry_mut().restore_rest_position();
        self.transform.set_viewport(viewport)?;
        tracing::debug!(dx, dy, ?viewport, "drag finished");
        self.redraw()?;
        Ok(true)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Cartesian coordinates of an outer SVG pixel position
    pub fn cursor_position(&self, point: PixelPoint) -> SigmetResult<(f64, f64)> {
        let mapping = self.transform.mapping()?;
        Ok((
            mapping.svg_to_cartesian(point.x, Axis::Horizontal),
            mapping.svg_to_cartesian(point.y, Axis::Vertical),
        ))
    }

    pub fn into_scene(self) -> S {
        self.transform.into_inner()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeScene;
    use sigmet_core::PlotFrame;

    fn session() -> PlotSession<FakeScene> {
        let scene = FakeScene::new(
            PlotFrame::new(60.0, 20.0, 400.0, 200.0),
            Viewport::new(-100.0, 100.0, 50.0, -50.0),
        );
        let mut session = PlotSession::new(scene, LabelConfig::default());
        session.redraw().unwrap();
        session
    }

    #[test]
    fn test_redraw_labels_within_budget() {
        let session = session();
        let scene = session.scene();
        assert_eq!(scene.axis_layouts, 1);
        assert_eq!(
            scene.background,
            Some(CartesianExtent { x: -100.0, y: -50.0, width: 200.0, height: 100.0 })
        );

        let x_texts = scene.surface.visible_texts_on(Axis::Horizontal);
        let x_extent: f64 = x_texts.iter().map(|t| t.len() as f64 * 8.0).sum();
        assert!(!x_texts.is_empty());
        assert!(x_extent <= 100.0, "{:?}", x_texts);
        assert!(x_texts.contains(&"0".to_string()));

        let y_count = scene.surface.visible_texts_on(Axis::Vertical).len();
        assert!(y_count as f64 * 12.0 <= 50.0);
    }

    #[test]
    fn test_zoom_then_unzoom() {
        let mut session = session();
        session.zoom(0.75).unwrap();
        assert!(session
            .viewport()
            .unwrap()
            .approx_eq(&Viewport::new(-75.0, 75.0, 37.5, -37.5), 1e-9));
        assert_eq!(session.scene().presentation_scale, 0.75);

        session.zoom(4.0 / 3.0).unwrap();
        assert!(session
            .viewport()
            .unwrap()
            .approx_eq(&Viewport::new(-100.0, 100.0, 50.0, -50.0), 1e-9));
        assert_eq!(session.scene().axis_layouts, 3);
    }

    #[test]
    fn test_invalid_zoom_leaves_view() {
        let mut session = session();
        let before = session.viewport().unwrap();
        assert!(session.zoom(0.0).is_err());
        assert_eq!(session.viewport().unwrap(), before);
        assert_eq!(session.scene().presentation_scale, 1.0);
    }

    #[test]
    fn test_drag_moves_viewport() {
        let mut session = session();
        session.drag_start(PixelPoint::new(100.0, 100.0));
        session.drag_move(PixelPoint::new(110.0, 95.0));
        assert_eq!(session.scene().preview, (10.0, -5.0));
        assert!(session.is_dragging());

        assert!(session.drag_end(PixelPoint::new(120.0, 90.0)).unwrap());
        assert_eq!(session.scene().preview, (0.0, 0.0));
        assert!(session
            .viewport()
            .unwrap()
            .approx_eq(&Viewport::new(-110.0, 90.0, 45.0, -55.0), 1e-9));
        assert!(!session.drag_end(PixelPoint::new(0.0, 0.0)).unwrap());
    }

    #[test]
    fn test_resize_preserves_scale() {
        let mut session = session();
        session.resize(600.0, 300.0).unwrap();
        assert_eq!(session.scene().geometry.frame.width, 600.0);
        assert!(session
            .viewport()
            .unwrap()
            .approx_eq(&Viewport::new(-150.0, 150.0, 75.0, -75.0), 1e-9));
        assert!(session.resize(0.0, 300.0).is_err());
        assert_eq!(session.scene().geometry.frame.width, 600.0);
    }

    #[test]
    fn test_cursor_position() {
        let session = session();
        let (x, y) = session.cursor_position(PixelPoint::new(260.0, 20.0)).unwrap();
        assert_eq!((x, y), (0.0, 50.0));
    }

    #[test]
    fn test_apply_axis_labels_direct() {
        let mut session = session();
        let extent = session.apply_axis_labels(&[-50.0, 500.0], Axis::Horizontal).unwrap();
        assert_eq!(extent, 24.0);
        assert_eq!(
            session.scene().surface.visible_texts_on(Axis::Horizontal),
            vec!["-50"]
        );
    }
}
