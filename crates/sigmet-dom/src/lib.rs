//! # sigmet-dom
//!
//! Browser binding of the SIGMET plot viewer.
//! Implements the scene traits of `sigmet-charts` on the live SVG document
//! and wires pointer, button, window and navigation events.
//!
//! ## Modules
//!
//! - `config` - Viewer configuration read from the document
//! - `layout` - Plot size for a window size
//! - `scene` - `SvgPlotScene`, the production plot scene
//! - `viewer` - Event wiring and volume swaps

pub mod config;
pub mod layout;
pub mod scene;
pub mod viewer;

pub use config::*;
pub use layout::*;
pub use scene::*;
pub use viewer::*;

use sigmet_core::SigmetError;
use std::fmt::Display;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, SvgGraphicsElement};

/// SVG namespace for created elements
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// ERRORS
// ============================================================================

pub type DomResult<T> = Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("No browser window")]
    NoWindow,

    #[error("Window has no document")]
    NoDocument,

    #[error("Required element #{0} not found")]
    MissingElement(String),

    #[error("Element {0} is not an SVG graphics element")]
    NotGraphics(String),

    #[error("Element {element} has no usable {attribute} attribute")]
    BadAttribute { element: String, attribute: String },

    #[error("JavaScript exception: {0}")]
    Js(String),

    #[error(transparent)]
    Plot(#[from] SigmetError),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

// ============================================================================
// ELEMENT HELPERS
// ============================================================================

pub fn window() -> DomResult<web_sys::Window> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> DomResult<Document> {
    window()?.document().ok_or(DomError::NoDocument)
}

/// Element that must exist for the viewer to work
pub fn required(document: &Document, id: &str) -> DomResult<Element> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| DomError::MissingElement(id.to_string()))
}

/// Element whose absence only disables a feature
pub fn optional(document: &Document, id: &str) -> Option<Element> {
    let element = document.get_element_by_id(id);
    if element.is_none() {
        tracing::debug!("No #{} in document", id);
    }
    element
}

/// First element of a class
pub fn first_of_class(document: &Document, class: &str) -> DomResult<Element> {
    document
        .get_elements_by_class_name(class)
        .item(0)
        .ok_or_else(|| DomError::MissingElement(format!(".{}", class)))
}

fn describe(element: &Element) -> String {
    let id = element.id();
    if id.is_empty() {
        element.tag_name()
    } else {
        format!("#{}", id)
    }
}

/// Numeric attribute value
pub fn attr_f64(element: &Element, name: &str) -> DomResult<f64> {
    element
        .get_attribute(name)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .ok_or_else(|| DomError::BadAttribute {
            element: describe(element),
            attribute: name.to_string(),
        })
}

/// Set an attribute; failures are logged
pub fn set_attr(element: &Element, name: &str, value: impl Display) {
    if let Err(e) = element.set_attribute(name, &value.to_string()) {
        tracing::warn!("Could not set {} on {}: {:?}", name, describe(element), e);
    }
}

/// `viewBox` as `[min_x, min_y, width, height]`
pub fn view_box(element: &Element) -> DomResult<[f64; 4]> {
    let bad = || DomError::BadAttribute {
        element: describe(element),
        attribute: "viewBox".to_string(),
    };
    let text = element.get_attribute("viewBox").ok_or_else(bad)?;
    let values: Vec<f64> = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| bad()))
        .collect::<DomResult<_>>()?;
    <[f64; 4]>::try_from(values).map_err(|_| bad())
}

pub fn set_view_box(element: &Element, view_box: [f64; 4]) {
    let [x, y, w, h] = view_box;
    set_attr(element, "viewBox", format!("{} {} {} {}", x, y, w, h));
}

/// Coefficients `[a, b, c, d, e, f]` of the first entry of a transform list
pub fn first_matrix(element: &Element) -> DomResult<[f64; 6]> {
    let graphics = element
        .dyn_ref::<SvgGraphicsElement>()
        .ok_or_else(|| DomError::NotGraphics(describe(element)))?;
    let matrix = graphics.transform().base_val().get_item(0)?.matrix();
    Ok([
        matrix.a() as f64,
        matrix.b() as f64,
        matrix.c() as f64,
        matrix.d() as f64,
        matrix.e() as f64,
        matrix.f() as f64,
    ])
}

pub fn set_matrix(element: &Element, m: [f64; 6]) {
    set_attr(
        element,
        "transform",
        format!("matrix({} {} {} {} {} {})", m[0], m[1], m[2], m[3], m[4], m[5]),
    );
}

/// Create an element in the SVG namespace
pub fn svg_element(document: &Document, tag: &str) -> DomResult<Element> {
    Ok(document.create_element_ns(Some(SVG_NS), tag)?)
}

/// Show or hide an element through `visibility` and `display`
pub fn set_shown(element: &Element, shown: bool) {
    if shown {
        set_attr(element, "visibility", "visible");
        set_attr(element, "display", "inline");
    } else {
        set_attr(element, "visibility", "hidden");
        set_attr(element, "display", "none");
    }
}
