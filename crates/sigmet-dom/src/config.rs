//! Viewer configuration.
//!
//! A document may carry a JSON object in the `data-viewer-config` attribute
//! of `#outermost`; absent fields take their defaults.

use serde::{Deserialize, Serialize};
use sigmet_charts::{LabelConfig, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use sigmet_nav::NavConfig;
use web_sys::Element;

/// Attribute holding the JSON configuration
pub const CONFIG_ATTRIBUTE: &str = "data-viewer-config";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Resize the plot with the window, keeping the margins it loaded with
    pub keep_margins: bool,
    /// Pixels left free below the SVG for other page content
    pub window_bottom: f64,
    pub labels: LabelConfig,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Space between the plot and the colour legend
    pub legend_gap: f64,
    pub resize_debounce_ms: u32,
    /// trace, debug, info, warn or error
    pub log_level: String,
    pub nav: NavConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            keep_margins: true,
            window_bottom: 60.0,
            labels: LabelConfig::default(),
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            legend_gap: 24.0,
            resize_debounce_ms: 100,
            log_level: "info".to_string(),
            nav: NavConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration from the element's attribute, defaults if it is
    /// missing or malformed
    pub fn from_element(element: &Element) -> Self {
        let Some(json) = element.get_attribute(CONFIG_ATTRIBUTE) else {
            return Self::default();
        };
        Self::from_json(&json).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", CONFIG_ATTRIBUTE, e);
            Self::default()
        })
    }

    pub fn keep_margins(mut self, keep: bool) -> Self {
        self.keep_margins = keep;
        self
    }

    pub fn zoom_factors(mut self, zoom_in: f64, zoom_out: f64) -> Self {
        self.zoom_in_factor = zoom_in;
        self.zoom_out_factor = zoom_out;
        self
    }

    pub fn debounce(mut self, ms: u32) -> Self {
        self.resize_debounce_ms = ms;
        self
    }

    pub fn nav(mut self, nav: NavConfig) -> Self {
        self.nav = nav;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert!(config.keep_margins);
        assert_eq!(config.window_bottom, 60.0);
        assert_eq!(config.zoom_in_factor, 0.75);
        assert_eq!(config.labels.x_precision, 6);
        assert_eq!(config.resize_debounce_ms, 100);
    }

    #[test]
    fn test_partial_json() {
        let config = ViewerConfig::from_json(
            r#"{"keep_margins": false, "labels": {"y_precision": 3}, "nav": {"image_root": "/svg"}}"#,
        )
        .unwrap();
        assert!(!config.keep_margins);
        assert_eq!(config.labels.y_precision, 3);
        assert_eq!(config.labels.x_precision, 6);
        assert_eq!(config.nav.image_root, "/svg");
        assert_eq!(config.nav.index_url, sigmet_nav::DEFAULT_INDEX_URL);
        assert_eq!(config.legend_gap, 24.0);
    }

    #[test]
    fn test_malformed_json() {
        assert!(ViewerConfig::from_json("{keep_margins: yes").is_err());
        assert!(ViewerConfig::from_json(r#"{"window_bottom": "tall"}"#).is_err());
    }

    #[test]
    fn test_builder() {
        let config = ViewerConfig::default().keep_margins(false).zoom_factors(0.5, 2.0).debounce(250);
        assert!(!config.keep_margins);
        assert_eq!(config.zoom_out_factor, 2.0);
        assert_eq!(config.resize_debounce_ms, 250);
    }
}
