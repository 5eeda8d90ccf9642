//! Zoom and resize math, and scaling of presentation attributes.
//!
//! When the origin sits at a corner of the view (a typical RHI plot with the
//! radar at the lower left), zooming and resizing keep the origin fixed.
//! Otherwise the view changes symmetrically about its center.

use sigmet_core::{Axis, SigmetError, SigmetResult, Viewport};

/// Distance from a corner, as a fraction of the span, within which the origin
/// counts as being at that corner
pub const CORNER_FRACTION: f64 = 1.0 / 128.0;

/// Default zoom-in factor (view shrinks to 3/4)
pub const ZOOM_IN_FACTOR: f64 = 3.0 / 4.0;

/// Default zoom-out factor
pub const ZOOM_OUT_FACTOR: f64 = 4.0 / 3.0;

/// True if the origin is within `CORNER_FRACTION` of a corner on both axes
pub fn origin_near_corner(viewport: &Viewport) -> bool {
    Axis::all().iter().all(|&axis| {
        let (start, end) = viewport.bounds(axis);
        let tolerance = (end - start).abs() * CORNER_FRACTION;
        start.abs() < tolerance || end.abs() < tolerance
    })
}

fn check_scale(factor: f64) -> SigmetResult<f64> {
    if factor > 0.0 && factor.is_finite() {
        Ok(factor)
    } else {
        Err(SigmetError::InvalidScale(factor))
    }
}

/// Viewport after zooming by `factor` (`< 1` zooms in, `> 1` zooms out)
pub fn zoom_viewport(viewport: &Viewport, factor: f64) -> SigmetResult<Viewport> {
    let factor = check_scale(factor)?;
    let viewport = viewport.validate()?;

    if origin_near_corner(&viewport) {
        return Ok(viewport.scale_about_origin(factor, factor));
    }

    let dx = viewport.width() * (1.0 - factor) / 2.0;
    let dy = viewport.height() * (1.0 - factor) / 2.0;
    Ok(Viewport::new(
        viewport.left + dx,
        viewport.right - dx,
        viewport.top + dy,
        viewport.bottom - dy,
    ))
}

/// Viewport for a plot resized from `old` to `new` pixels, keeping the
/// Cartesian units per pixel. A non-positive old size leaves it unchanged.
pub fn resize_viewport(viewport: &Viewport, old: (f64, f64), new: (f64, f64)) -> Viewport {
    let (old_w, old_h) = old;
    let (new_w, new_h) = new;
    if !(old_w > 0.0 && old_h > 0.0 && new_w.is_finite() && new_h.is_finite()) {
        return *viewport;
    }

    if origin_near_corner(viewport) {
        return viewport.scale_about_origin(new_w / old_w, new_h / old_h);
    }

    let dx = (new_w - old_w) * viewport.width() / old_w / 2.0;
    let dy = (new_h - old_h) * viewport.height() / old_h / 2.0;
    Viewport::new(
        viewport.left - dx,
        viewport.right + dx,
        viewport.top - dy,
        viewport.bottom + dy,
    )
}

// ============================================================================
// PRESENTATION ATTRIBUTES
// ============================================================================

/// Attribute rescaled after a zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledAttr {
    /// Single number, scaled only when positive
    Scalar(&'static str),
    /// Whitespace or comma separated numbers
    List(&'static str),
}

impl ScaledAttr {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scalar(name) | Self::List(name) => name,
        }
    }

    /// Scaled attribute text, or `None` to leave the attribute alone
    pub fn scale(&self, value: &str, factor: f64) -> Option<String> {
        match self {
            Self::Scalar(_) => {
                let v: f64 = value.trim().parse().ok()?;
                (v > 0.0).then(|| (v * factor).to_string())
            }
            Self::List(_) => {
                let items: Vec<f64> = value
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.parse::<f64>().ok())
                    .collect::<Option<_>>()?;
                if items.is_empty() {
                    return None;
                }
                let scaled: Vec<String> = items.iter().map(|v| (v * factor).to_string()).collect();
                Some(scaled.join(" "))
            }
        }
    }
}

/// Attributes that keep their on-screen size through a zoom
pub const ZOOM_SCALED_ATTRS: [ScaledAttr; 5] = [
    ScaledAttr::Scalar("stroke-width"),
    ScaledAttr::Scalar("stroke-dashoffset"),
    ScaledAttr::Scalar("markerWidth"),
    ScaledAttr::Scalar("markerHeight"),
    ScaledAttr::List("stroke-dasharray"),
];

/// Element of the plot scene graph
pub trait SceneNode {
    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&mut self, name: &str, value: &str);

    /// Call `visit` on each child element in document order
    fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut Self));
}

/// Visitor multiplying allow-listed attributes by a factor
#[derive(Debug, Clone, Copy)]
pub struct AttributeScaler<'a> {
    attrs: &'a [ScaledAttr],
    factor: f64,
}

impl<'a> AttributeScaler<'a> {
    pub fn new(attrs: &'a [ScaledAttr], factor: f64) -> Self {
        Self { attrs, factor }
    }

    /// Scaler for the zoom allow-list
    pub fn for_zoom(factor: f64) -> AttributeScaler<'static> {
        AttributeScaler::new(&ZOOM_SCALED_ATTRS, factor)
    }

    /// Rescale `node` and its descendants; returns the number of attributes
    /// changed
    pub fn visit<N: SceneNode>(&self, node: &mut N) -> usize {
        let mut changed = 0;

        for attr in self.attrs {
            let Some(value) = node.attribute(attr.name()) else {
                continue;
            };
            if let Some(scaled) = attr.scale(&value, self.factor) {
                node.set_attribute(attr.name(), &scaled);
                changed += 1;
            }
        }

        node.for_each_child(&mut |child| changed += self.visit(child));
        changed
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Default)]
    struct TreeNode {
        attrs: BTreeMap<String, String>,
        children: Vec<TreeNode>,
    }

    impl TreeNode {
        fn with(attrs: &[(&str, &str)], children: Vec<TreeNode>) -> Self {
            Self {
                attrs: attrs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                children,
            }
        }

        fn get(&self, name: &str) -> Option<&str> {
            self.attrs.get(name).map(String::as_str)
        }
    }

    impl SceneNode for TreeNode {
        fn attribute(&self, name: &str) -> Option<String> {
            self.attrs.get(name).cloned()
        }

        fn set_attribute(&mut self, name: &str, value: &str) {
            self.attrs.insert(name.to_string(), value.to_string());
        }

        fn for_each_child(&mut self, visit: &mut dyn FnMut(&mut Self)) {
            for child in &mut self.children {
                visit(child);
            }
        }
    }

    #[test]
    fn test_zoom_centered() {
        let view = Viewport::new(-100.0, 100.0, -50.0, 50.0);
        let zoomed = zoom_viewport(&view, 0.75).unwrap();
        assert_eq!(zoomed, Viewport::new(-75.0, 75.0, -37.5, 37.5));
    }

    #[test]
    fn test_zoom_inverse() {
        let views = [
            Viewport::new(-100.0, 100.0, -50.0, 50.0),
            Viewport::new(12.0, 480.0, 300.0, -20.0),
            Viewport::new(0.0, 150_000.0, 15_000.0, 0.0),
        ];
        for view in views {
            let back = zoom_viewport(&zoom_viewport(&view, ZOOM_IN_FACTOR).unwrap(), ZOOM_OUT_FACTOR)
                .unwrap();
            assert!(back.approx_eq(&view, 1e-9 * view.width().abs()), "{:?}", back);
        }
    }

    #[test]
    fn test_zoom_about_corner() {
        let view = Viewport::new(0.0, 150_000.0, 15_000.0, 0.0);
        assert!(origin_near_corner(&view));
        let zoomed = zoom_viewport(&view, 0.5).unwrap();
        assert_eq!(zoomed, Viewport::new(0.0, 75_000.0, 7_500.0, 0.0));
    }

    #[test]
    fn test_corner_requires_both_axes() {
        assert!(!origin_near_corner(&Viewport::new(0.0, 100.0, 60.0, 20.0)));
        assert!(origin_near_corner(&Viewport::new(-0.5, 100.0, 60.0, 0.2)));
        assert!(!origin_near_corner(&Viewport::new(-50.0, 50.0, 50.0, -50.0)));
    }

    #[test]
    fn test_zoom_rejects_bad_factor() {
        let view = Viewport::new(-1.0, 1.0, 1.0, -1.0);
        assert_eq!(zoom_viewport(&view, 0.0), Err(SigmetError::InvalidScale(0.0)));
        assert!(zoom_viewport(&view, -2.0).is_err());
        assert!(zoom_viewport(&view, f64::INFINITY).is_err());
        assert!(zoom_viewport(&Viewport::new(1.0, 1.0, 0.0, 1.0), 0.5).is_err());
    }

    #[test]
    fn test_resize_keeps_units_per_pixel() {
        let view = Viewport::new(-100.0, 100.0, 50.0, -50.0);
        let resized = resize_viewport(&view, (400.0, 200.0), (600.0, 300.0));
        assert_eq!(resized, Viewport::new(-150.0, 150.0, 75.0, -75.0));
        assert_eq!(resized.width() / 600.0, view.width() / 400.0);
    }

    #[test]
    fn test_resize_about_corner() {
        let view = Viewport::new(0.0, 100_000.0, 10_000.0, 0.0);
        let resized = resize_viewport(&view, (400.0, 200.0), (200.0, 300.0));
        assert_eq!(resized, Viewport::new(0.0, 50_000.0, 15_000.0, 0.0));
    }

    #[test]
    fn test_resize_from_empty_plot() {
        let view = Viewport::new(-1.0, 1.0, 1.0, -1.0);
        assert_eq!(resize_viewport(&view, (0.0, 200.0), (300.0, 300.0)), view);
    }

    #[test]
    fn test_scaled_attr_values() {
        let width = ScaledAttr::Scalar("stroke-width");
        assert_eq!(width.scale("2", 0.5).as_deref(), Some("1"));
        assert_eq!(width.scale("0", 0.5), None);
        assert_eq!(width.scale("-1", 0.5), None);
        assert_eq!(width.scale("thin", 0.5), None);

        let dashes = ScaledAttr::List("stroke-dasharray");
        assert_eq!(dashes.scale("4, 2 1", 0.5).as_deref(), Some("2 1 0.5"));
        assert_eq!(dashes.scale("none", 0.5), None);
        assert_eq!(dashes.scale("", 0.5), None);
    }

    #[test]
    fn test_attribute_scaler_walks_tree() {
        let mut root = TreeNode::with(
            &[("stroke-width", "2")],
            vec![
                TreeNode::with(&[("markerWidth", "8"), ("fill", "red")], vec![]),
                TreeNode::with(
                    &[],
                    vec![TreeNode::with(
                        &[("stroke-dasharray", "6 2"), ("stroke-dashoffset", "0")],
                        vec![],
                    )],
                ),
            ],
        );

        let changed = AttributeScaler::for_zoom(0.75).visit(&mut root);
        assert_eq!(changed, 3);
        assert_eq!(root.get("stroke-width"), Some("1.5"));
        assert_eq!(root.children[0].get("markerWidth"), Some("6"));
        assert_eq!(root.children[0].get("fill"), Some("red"));
        let leaf = &root.children[1].children[0];
        assert_eq!(leaf.get("stroke-dasharray"), Some("4.5 1.5"));
        assert_eq!(leaf.get("stroke-dashoffset"), Some("0"));
    }
}
