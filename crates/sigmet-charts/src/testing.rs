//! In-memory scene for session and label tests

use crate::labels::LabelSurface;
use crate::plot::PlotScene;
use crate::transform::{GeometryProvider, InMemoryGeometry};
use sigmet_core::{AffineTransform, Axis, CartesianExtent, PlotFrame, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FakeLabel {
    pub axis: Axis,
    pub position: f64,
    pub text: String,
    pub visible: bool,
}

/// Label surface with fixed-width characters and fixed line height
#[derive(Debug, Clone)]
pub(crate) struct FakeSurface {
    pub char_width: f64,
    pub line_height: f64,
    pub labels: Vec<FakeLabel>,
}

impl FakeSurface {
    pub fn new(char_width: f64) -> Self {
        Self {
            char_width,
            line_height: 12.0,
            labels: Vec::new(),
        }
    }

    pub fn visible_texts(&self) -> Vec<String> {
        self.labels
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.text.clone())
            .collect()
    }

    pub fn visible_texts_on(&self, axis: Axis) -> Vec<String> {
        self.labels
            .iter()
            .filter(|l| l.visible && l.axis == axis)
            .map(|l| l.text.clone())
            .collect()
    }
}

impl LabelSurface for FakeSurface {
    type Entry = usize;

    fn create_entry(&mut self, axis: Axis) -> usize {
        self.labels.push(FakeLabel {
            axis,
            position: 0.0,
            text: String::new(),
            visible: false,
        });
        self.labels.len() - 1
    }

    fn show_entry(&mut self, entry: &usize, axis: Axis, position: f64, text: &str) -> f64 {
        let label = &mut self.labels[*entry];
        label.position = position;
        label.text = text.to_string();
        label.visible = true;
        match axis {
            Axis::Horizontal => text.chars().count() as f64 * self.char_width,
            Axis::Vertical => self.line_height,
        }
    }

    fn hide_entry(&mut self, entry: &usize) {
        let label = &mut self.labels[*entry];
        label.visible = false;
        label.text.clear();
    }
}

/// Plot scene recording what the session asked it to draw
#[derive(Debug, Clone)]
pub(crate) struct FakeScene {
    pub geometry: InMemoryGeometry,
    pub surface: FakeSurface,
    pub preview: (f64, f64),
    pub background: Option<CartesianExtent>,
    pub presentation_scale: f64,
    pub axis_layouts: usize,
}

impl FakeScene {
    pub fn new(frame: PlotFrame, viewport: Viewport) -> Self {
        let geometry = InMemoryGeometry::with_viewport(frame, viewport)
            .expect("test viewport must be valid");
        Self {
            geometry,
            surface: FakeSurface::new(8.0),
            preview: (0.0, 0.0),
            background: None,
            presentation_scale: 1.0,
            axis_layouts: 0,
        }
    }
}

impl GeometryProvider for FakeScene {
    fn frame(&self) -> PlotFrame {
        self.geometry.frame()
    }

    fn affine(&self) -> AffineTransform {
        self.geometry.affine()
    }

    fn install_affine(&mut self, affine: AffineTransform) {
        self.geometry.install_affine(affine);
    }
}

impl LabelSurface for FakeScene {
    type Entry = usize;

    fn create_entry(&mut self, axis: Axis) -> usize {
        self.surface.create_entry(axis)
    }

    fn show_entry(&mut self, entry: &usize, axis: Axis, position: f64, text: &str) -> f64 {
        self.surface.show_entry(entry, axis, position, text)
    }

    fn hide_entry(&mut self, entry: &usize) {
        self.surface.hide_entry(entry);
    }
}

impl PlotScene for FakeScene {
    fn translate_preview(&mut self, dx: f64, dy: f64) {
        self.preview.0 += dx;
        self.preview.1 += dy;
    }

    fn restore_rest_position(&mut self) {
        self.preview = (0.0, 0.0);
    }

    fn layout_axes(&mut self) {
        self.axis_layouts += 1;
    }

    fn update_background(&mut self, extent: &CartesianExtent) {
        self.background = Some(*extent);
    }

    fn scale_presentation(&mut self, factor: f64) {
        self.presentation_scale *= factor;
    }

    fn resize_plot(&mut self, width: f64, height: f64) {
        self.geometry.frame.width = width;
        self.geometry.frame.height = height;
    }
}
