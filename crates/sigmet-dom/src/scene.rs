//! The plot scene on the live SVG document.
//!
//! `SvgPlotScene` reads the plot geometry once at load and caches it; every
//! later change goes through the scene, so the cached values and the
//! document attributes stay in step.

use crate::{
    attr_f64, first_matrix, first_of_class, optional, required, set_attr, set_matrix,
    set_view_box, svg_element, view_box, DomError, DomResult, ViewerConfig, WindowLayout,
};
use sigmet_charts::{AttributeScaler, GeometryProvider, LabelSurface, PlotScene, SceneNode};
use sigmet_core::{AffineTransform, Axis, CartesianExtent, PlotFrame, PlotMargins, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, SvgGraphicsElement, SvgTextContentElement};

// ============================================================================
// AXIS LABELS
// ============================================================================

/// Text and tick mark of one axis label
#[derive(Debug, Clone)]
pub struct AxisLabel {
    pub text: Element,
    pub tick: Element,
}

impl AxisLabel {
    fn create(document: &Document, axis_element: &Element, axis: Axis) -> DomResult<Self> {
        let text = svg_element(document, "text")?;
        let tick = svg_element(document, "line")?;

        match axis {
            Axis::Horizontal => {
                set_attr(&text, "class", "xAxisLabel");
                set_attr(&text, "text-anchor", "middle");
                set_attr(&tick, "class", "xAxisTick");
            }
            Axis::Vertical => {
                set_attr(&text, "class", "yAxisLabel");
                set_attr(&text, "text-anchor", "end");
                set_attr(&text, "dominant-baseline", "mathematical");
                set_attr(&tick, "class", "yAxisTick");
            }
        }
        set_attr(&tick, "stroke", "black");
        set_attr(&tick, "stroke-width", 1);
        set_attr(&text, "visibility", "hidden");
        set_attr(&tick, "visibility", "hidden");

        axis_element.append_child(&text)?;
        axis_element.append_child(&tick)?;
        Ok(Self { text, tick })
    }

    fn set_visibility(&self, visibility: &str) {
        set_attr(&self.text, "visibility", visibility);
        set_attr(&self.tick, "visibility", visibility);
        self.text.set_text_content(Some(""));
    }
}

// ============================================================================
// SCENE GRAPH VISITOR
// ============================================================================

/// Element of the live document as a scene graph node
pub struct DomNode(pub Element);

impl SceneNode for DomNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.0.get_attribute(name)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        set_attr(&self.0, name, value);
    }

    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut Self)) {
        let children = self.0.children();
        for i in 0..children.length() {
            if let Some(child) = children.item(i) {
                visit(&mut DomNode(child));
            }
        }
    }
}

// ============================================================================
// MEASUREMENTS
// ============================================================================

/// Positions of the axis elements while the plot is at rest
#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisRest {
    x_axis_x: f64,
    x_axis_y: f64,
    /// Height of the x axis element and of its viewBox
    x_axis_height: f64,
    x_view_height: f64,
    y_axis_x: f64,
    y_axis_y: f64,
    y_axis_width: f64,
    y_view_x: f64,
    y_view_width: f64,
    /// How far the axes reach beyond the plot edges
    x_overhang: f64,
    y_overhang: f64,
}

/// Tick and font sizes of the axis labels
#[derive(Debug, Clone, Copy, PartialEq)]
struct LabelMetrics {
    tick_len: f64,
    font_size: f64,
    pad: f64,
}

impl LabelMetrics {
    /// Metrics for a measured font, with the padding that fills the
    /// horizontal axis band
    fn measured(tick_len: f64, font_size: f64, x_axis_height: f64) -> Self {
        Self {
            tick_len,
            font_size,
            pad: x_axis_height - tick_len - font_size,
        }
    }
}

fn attr_or_zero(element: &Element, name: &str) -> f64 {
    attr_f64(element, name).unwrap_or(0.0)
}

/// Width and height attributes, falling back to the rendered box
fn element_size(element: &Element) -> (f64, f64) {
    let rect = element.get_bounding_client_rect();
    (
        attr_f64(element, "width").unwrap_or_else(|_| rect.width()),
        attr_f64(element, "height").unwrap_or_else(|_| rect.height()),
    )
}

/// Rendered height of an optional control
fn control_height(document: &Document, id: &str) -> f64 {
    optional(document, id)
        .map(|el| el.get_bounding_client_rect().height())
        .unwrap_or(0.0)
}

/// Height of an SVG element in user units, zero if it has no box
fn bbox_height(element: &Element) -> f64 {
    element
        .dyn_ref::<SvgGraphicsElement>()
        .and_then(|g| g.get_b_box().ok())
        .map(|rect| rect.height() as f64)
        .unwrap_or(0.0)
}

/// Viewport shown by a document at its own plot size, with that size
pub fn document_viewport(document: &Document) -> DomResult<(Viewport, f64, f64)> {
    let plot = required(document, "plot")?;
    let cart_g = required(document, "cartG")?;
    let width = attr_f64(&plot, "width")?;
    let height = attr_f64(&plot, "height")?;
    let [a, _, _, d, e, f] = first_matrix(&cart_g)?;
    let viewport = AffineTransform::new(a, d, e, f).viewport(width, height)?;
    Ok((viewport, width, height))
}

// ============================================================================
// SVG PLOT SCENE
// ============================================================================

pub struct SvgPlotScene {
    document: Document,
    outermost: Element,
    plot: Element,
    plot_rect: Element,
    background: Element,
    cart_g: Element,
    x_axis: Element,
    x_axis_clip: Element,
    x_title: Element,
    y_axis: Element,
    y_axis_clip: Element,
    y_title_transform: Element,
    color_legend: Option<Element>,

    frame: PlotFrame,
    affine: AffineTransform,
    layout: WindowLayout,
    rest: AxisRest,
    metrics: LabelMetrics,
    preview: (f64, f64),
}

impl SvgPlotScene {
    /// Read the plot geometry from `document` and clear the static axis
    /// labels it was rendered with
    pub fn load(document: &Document, config: &ViewerConfig) -> DomResult<Self> {
        let outermost = required(document, "outermost")?;
        let plot = required(document, "plot")?;
        let x_axis = required(document, "xAxis")?;
        let y_axis = required(document, "yAxis")?;
        // Only the transform group of the y title moves
        required(document, "yTitle")?;

        let frame = PlotFrame::new(
            attr_or_zero(&plot, "x"),
            attr_or_zero(&plot, "y"),
            attr_f64(&plot, "width")?,
            attr_f64(&plot, "height")?,
        );
        let (svg_width, svg_height) = element_size(&outermost);
        let margins = PlotMargins::around(&frame, svg_width, svg_height);
        let reserve = config.window_bottom
            + control_height(document, "zoom_in")
            + control_height(document, "cursor_loc");

        let x_axis_width = attr_f64(&x_axis, "width")?;
        let x_axis_height = attr_f64(&x_axis, "height")?;
        let y_axis_width = attr_f64(&y_axis, "width")?;
        let y_axis_height = attr_f64(&y_axis, "height")?;
        let [_, _, _, x_view_height] = view_box(&x_axis)?;
        let [y_view_x, _, y_view_width, _] = view_box(&y_axis)?;
        let rest = AxisRest {
            x_axis_x: attr_or_zero(&x_axis, "x"),
            x_axis_y: attr_or_zero(&x_axis, "y"),
            x_axis_height,
            x_view_height,
            y_axis_x: attr_or_zero(&y_axis, "x"),
            y_axis_y: attr_or_zero(&y_axis, "y"),
            y_axis_width,
            y_view_x,
            y_view_width,
            x_overhang: x_axis_width - frame.width,
            y_overhang: y_axis_height - frame.height,
        };

        let tick = first_of_class(document, "xAxisTick")?;
        let tick_len = attr_f64(&tick, "y2")? - attr_f64(&tick, "y1")?;
        let font_size = bbox_height(&first_of_class(document, "xAxisLabel")?);
        let metrics = LabelMetrics::measured(tick_len, font_size, x_axis_height);

        let cart_g = required(document, "cartG")?;
        let [a, _, _, d, e, f] = first_matrix(&cart_g)?;

        let scene = Self {
            document: document.clone(),
            plot_rect: required(document, "PlotRect")?,
            background: required(document, "plotBackground")?,
            cart_g,
            x_axis_clip: required(document, "xAxisClipRect")?,
            x_title: required(document, "xTitle")?,
            y_axis_clip: required(document, "yAxisClipRect")?,
            y_title_transform: required(document, "yTitleTransform")?,
            color_legend: optional(document, "color_legend"),
            outermost,
            plot,
            x_axis,
            y_axis,
            frame,
            affine: AffineTransform::new(a, d, e, f),
            layout: WindowLayout::new(margins, reserve, config.legend_gap),
            rest,
            metrics,
            preview: (0.0, 0.0),
        };

        remove_children(&scene.x_axis);
        remove_children(&scene.y_axis);

        tracing::debug!(?frame, ?margins, tick_len, font_size, "plot scene loaded");
        Ok(scene)
    }

    /// Look up the plot group and background again after the plot elements
    /// were replaced
    pub fn reattach(&mut self, document: &Document) -> DomResult<()> {
        self.cart_g = required(document, "cartG")?;
        self.background = required(document, "plotBackground")?;
        set_attr(&self.cart_g, "transform", self.affine.svg_matrix());
        Ok(())
    }

    pub fn layout(&self) -> WindowLayout {
        self.layout
    }

    pub fn margins(&self) -> PlotMargins {
        self.layout.margins
    }

    /// Re-measure the label font, which may change with the page style
    fn measure_font(&mut self) {
        let Ok(label) = first_of_class(&self.document, "xAxisLabel") else {
            return;
        };
        let height = bbox_height(&label);
        if height > 0.0 {
            self.metrics =
                LabelMetrics::measured(self.metrics.tick_len, height, self.rest.x_axis_height);
        }
    }

    fn position_plot(&self, dx: f64, dy: f64) {
        set_attr(&self.plot, "x", self.frame.x + dx);
        set_attr(&self.plot, "y", self.frame.y + dy);
    }
}

fn remove_children(element: &Element) {
    while let Some(child) = element.last_child() {
        if let Err(e) = element.remove_child(&child) {
            tracing::warn!("Could not clear axis: {}", DomError::from(e));
            return;
        }
    }
}

impl GeometryProvider for SvgPlotScene {
    fn frame(&self) -> PlotFrame {
        self.frame
    }

    fn affine(&self) -> AffineTransform {
        self.affine
    }

    fn install_affine(&mut self, affine: AffineTransform) {
        self.affine = affine;
        set_attr(&self.cart_g, "transform", affine.svg_matrix());
    }
}

impl LabelSurface for SvgPlotScene {
    type Entry = Option<AxisLabel>;

    fn create_entry(&mut self, axis: Axis) -> Self::Entry {
        let parent = match axis {
            Axis::Horizontal => &self.x_axis,
            Axis::Vertical => &self.y_axis,
        };
        AxisLabel::create(&self.document, parent, axis)
            .map_err(|e| tracing::warn!("Could not create {} axis label: {}", axis.name(), e))
            .ok()
    }

    fn show_entry(&mut self, entry: &Self::Entry, axis: Axis, position: f64, text: &str) -> f64 {
        let Some(label) = entry else {
            return 0.0;
        };
        label.set_visibility("visible");
        let LabelMetrics { tick_len, font_size, pad } = self.metrics;

        match axis {
            Axis::Horizontal => {
                let top = self.rest.x_axis_y;
                set_attr(&label.text, "x", position);
                set_attr(&label.text, "y", top + tick_len + pad + font_size);
                label.text.set_text_content(Some(text));
                set_attr(&label.tick, "x1", position);
                set_attr(&label.tick, "x2", position);
                set_attr(&label.tick, "y1", top);
                set_attr(&label.tick, "y2", top + tick_len);
                label
                    .text
                    .dyn_ref::<SvgTextContentElement>()
                    .map(|t| t.get_computed_text_length() as f64)
                    .unwrap_or(0.0)
            }
            Axis::Vertical => {
                let right = self.rest.y_axis_x + self.rest.y_axis_width;
                set_attr(&label.text, "x", right - 1.5 * tick_len);
                set_attr(&label.text, "y", position);
                label.text.set_text_content(Some(text));
                set_attr(&label.tick, "x1", right - tick_len);
                set_attr(&label.tick, "x2", right);
                set_attr(&label.tick, "y1", position);
                set_attr(&label.tick, "y2", position);
                bbox_height(&label.text)
            }
        }
    }

    fn hide_entry(&mut self, entry: &Self::Entry) {
        if let Some(label) = entry {
            label.set_visibility("hidden");
        }
    }
}

impl PlotScene for SvgPlotScene {
    fn translate_preview(&mut self, dx: f64, dy: f64) {
        let (px, py) = self.preview;
        self.preview = (px + dx, py + dy);
        let (px, py) = self.preview;

        self.position_plot(px, py);
        set_attr(&self.x_axis, "x", self.rest.x_axis_x + px);
        set_attr(&self.y_axis, "y", self.rest.y_axis_y + py);
    }

    fn restore_rest_position(&mut self) {
        self.preview = (0.0, 0.0);
        self.position_plot(0.0, 0.0);
        set_attr(&self.x_axis, "x", self.rest.x_axis_x);
        set_attr(&self.y_axis, "y", self.rest.y_axis_y);
    }

    fn layout_axes(&mut self) {
        self.measure_font();
        let LabelMetrics { font_size, pad, .. } = self.metrics;
        let rest = &mut self.rest;

        // x axis follows the bottom edge of the plot
        rest.x_axis_y = self.frame.y + self.frame.height;
        let axis_width = self.frame.width + rest.x_overhang;
        set_attr(&self.x_axis, "x", rest.x_axis_x);
        set_attr(&self.x_axis, "y", rest.x_axis_y);
        set_attr(&self.x_axis, "width", axis_width);
        set_attr(&self.x_axis_clip, "y", rest.x_axis_y);
        set_attr(&self.x_axis_clip, "width", axis_width);
        set_view_box(
            &self.x_axis,
            [rest.x_axis_x, rest.x_axis_y, axis_width, rest.x_view_height],
        );
        set_attr(&self.x_title, "x", rest.x_axis_x + axis_width / 2.0);
        set_attr(
            &self.x_title,
            "y",
            rest.x_axis_y + rest.x_view_height + pad + font_size,
        );

        let axis_height = self.frame.height + rest.y_overhang;
        set_attr(&self.y_axis, "y", rest.y_axis_y);
        set_attr(&self.y_axis, "height", axis_height);
        set_attr(&self.y_axis_clip, "height", axis_height);
        set_view_box(
            &self.y_axis,
            [rest.y_view_x, rest.y_axis_y, rest.y_view_width, axis_height],
        );
        match first_matrix(&self.y_title_transform) {
            Ok(mut m) => {
                m[5] = rest.y_axis_y + axis_height / 2.0;
                set_matrix(&self.y_title_transform, m);
            }
            Err(e) => tracing::warn!("Could not move y axis title: {}", e),
        }
    }

    fn update_background(&mut self, extent: &CartesianExtent) {
        set_attr(&self.background, "x", extent.x);
        set_attr(&self.background, "y", extent.y);
        set_attr(&self.background, "width", extent.width);
        set_attr(&self.background, "height", extent.height);
    }

    fn scale_presentation(&mut self, factor: f64) {
        let scaler = AttributeScaler::for_zoom(factor);
        let mut plot = DomNode(self.plot.clone());
        let mut changed = 0;
        plot.for_each_child(&mut |child| changed += scaler.visit(child));
        tracing::trace!(factor, changed, "presentation attributes scaled");
    }

    fn resize_plot(&mut self, width: f64, height: f64) {
        self.frame.width = width;
        self.frame.height = height;

        let (svg_width, svg_height) = self.layout.svg_size(width, height);
        set_attr(&self.outermost, "width", svg_width);
        set_attr(&self.outermost, "height", svg_height);
        set_attr(&self.plot, "width", width);
        set_attr(&self.plot, "height", height);
        set_attr(&self.plot_rect, "width", width);
        set_attr(&self.plot_rect, "height", height);

        if let Some(legend) = &self.color_legend {
            match first_matrix(legend) {
                Ok(m) => set_attr(
                    legend,
                    "transform",
                    format!("translate({} {})", self.layout.legend_x(width), m[5]),
                ),
                Err(e) => tracing::debug!("Color legend not moved: {}", e),
            }
        }
    }
}
