//! Plot geometry for a window size.
//!
//! The SVG is assumed to sit at the top left of the window. On resize it
//! takes the window width and the window height minus a reserved strip at
//! the bottom; the plot keeps the margins it had when the page loaded.

use sigmet_core::PlotMargins;

/// Outer SVG and plot sizes for one window size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotSizes {
    pub svg_width: f64,
    pub svg_height: f64,
    pub plot_width: f64,
    pub plot_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLayout {
    pub margins: PlotMargins,
    /// Pixels kept free below the SVG
    pub reserve: f64,
    /// Space between the plot and the colour legend
    pub legend_gap: f64,
}

impl WindowLayout {
    pub fn new(margins: PlotMargins, reserve: f64, legend_gap: f64) -> Self {
        Self {
            margins,
            reserve,
            legend_gap,
        }
    }

    pub fn sizes(&self, window_width: f64, window_height: f64) -> PlotSizes {
        let svg_width = window_width.max(0.0);
        let svg_height = (window_height - self.reserve).max(0.0);
        PlotSizes {
            svg_width,
            svg_height,
            plot_width: self.margins.inner_width(svg_width),
            plot_height: self.margins.inner_height(svg_height),
        }
    }

    /// Outer SVG size around a plot of the given size
    pub fn svg_size(&self, plot_width: f64, plot_height: f64) -> (f64, f64) {
        (
            self.margins.left + plot_width + self.margins.right,
            self.margins.top + plot_height + self.margins.bottom,
        )
    }

    /// Horizontal position of the colour legend
    pub fn legend_x(&self, plot_width: f64) -> f64 {
        self.margins.left + plot_width + self.legend_gap
    }
}
