//! # sigmet-charts
//!
//! Interaction engine for pre-rendered SIGMET radar plots.
//! Knows nothing about the browser: the scene is reached through traits.
//!
//! ## Architecture
//!
//! Uses Strategy pattern for:
//! - Plot geometry (`GeometryProvider`)
//! - Label drawing and measurement (`LabelSurface`)
//! - Scene graph traversal (`SceneNode`)
//! - The whole drawable plot (`PlotScene`)
//!
//! ## Modules
//!
//! - `transform` - Cartesian viewport to SVG pixel mapping
//! - `labels` - Axis label spacing search and label pool
//! - `zoom` - Zoom and resize math, presentation attribute scaling
//! - `drag` - Drag gesture state machine
//! - `readout` - Cursor geolocation
//! - `plot` - Per-plot session tying the above together

pub mod drag;
pub mod labels;
pub mod plot;
pub mod readout;
pub mod transform;
pub mod zoom;

#[cfg(test)]
pub(crate) mod testing;

pub use drag::*;
pub use labels::*;
pub use plot::*;
pub use readout::*;
pub use transform::*;
pub use zoom::*;
