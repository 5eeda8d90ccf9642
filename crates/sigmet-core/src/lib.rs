//! # sigmet-core
//!
//! Core domain types for the SIGMET plot viewer.
//! Implements Strategy pattern for axis label formatting.
//!
//! ## Modules
//!
//! - `viewport` - Cartesian viewport, affine transform, plot frame and margins
//! - `geog` - Great circle stepping and beam height for cursor geolocation
//! - `caption` - Radar location and sweep parsed from the plot caption
//! - `image` - Image file names, image index and navigation buttons
//! - `error` - Error type shared by the pure crates

pub mod caption;
pub mod error;
pub mod geog;
pub mod image;
pub mod viewport;

pub use caption::*;
pub use error::*;
pub use geog::*;
pub use image::*;
pub use viewport::*;

use serde::{Deserialize, Serialize};

/// Default number of significant digits in axis labels
pub const DEFAULT_LABEL_PRECISION: usize = 6;

// ============================================================================
// AXIS
// ============================================================================

/// Plot axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Horizontal => "x",
            Self::Vertical => "y",
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Horizontal, Self::Vertical]
    }
}

/// Point in SVG pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset from `origin` to this point
    pub fn delta_from(&self, origin: PixelPoint) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }
}

// ============================================================================
// STRATEGY PATTERN: Label Formatters
// ============================================================================

/// Strategy trait for axis label text
pub trait LabelFormatter: Send + Sync {
    fn format(&self, value: f64) -> String;
}

/// Fixed significant-digit formatter without trailing zeros
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionFormatter {
    pub precision: usize,
}

impl PrecisionFormatter {
    pub fn new(precision: usize) -> Self {
        Self { precision }
    }
}

impl Default for PrecisionFormatter {
    fn default() -> Self {
        Self {
            precision: DEFAULT_LABEL_PRECISION,
        }
    }
}

impl LabelFormatter for PrecisionFormatter {
    fn format(&self, value: f64) -> String {
        format_label(value, self.precision)
    }
}

/// Format `value` with `precision` significant digits.
///
/// Trailing zeros of the fractional part are removed, then a bare decimal
/// point. Magnitudes below 1e-6 or with more integer digits than `precision`
/// use exponent notation.
pub fn format_label(value: f64, precision: usize) -> String {
    let precision = precision.clamp(1, 21);

    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if exponent < -6 || exponent >= precision as i32 {
        let s = format!("{:.*e}", precision - 1, value);
        return match s.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_fraction(mantissa), exp),
            None => s,
        };
    }

    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    let s = format!("{:.*}", decimals, value);
    let trimmed = trim_fraction(&s);
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

// ============================================================================
// TESTS
// ============================================================================
