//! Error types for the SIGMET plot viewer.

use crate::Viewport;
use thiserror::Error;

/// Result type alias using SigmetError.
pub type SigmetResult<T> = Result<T, SigmetError>;

/// Primary error type for viewport math and metadata parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SigmetError {
    // === Geometry Errors ===
    #[error("Degenerate viewport: {0:?}")]
    DegenerateViewport(Viewport),

    #[error("Plot frame has no area: {width} x {height}")]
    EmptyFrame { width: f64, height: f64 },

    #[error("Cartesian transform is not invertible")]
    SingularTransform,

    #[error("Zoom factor must be positive and finite: {0}")]
    InvalidScale(f64),

    // === Caption Errors ===
    #[error("Caption does not give the radar location")]
    MissingLocation,

    #[error("Caption does not describe an RHI or PPI sweep")]
    MissingSweep,

    #[error("Invalid number in caption: {0:?}")]
    InvalidNumber(String),

    // === Image Name Errors ===
    #[error("No data type in image name: {0}")]
    MissingDataType(String),

    #[error("Invalid volume time in image name: {0}")]
    InvalidVolumeTime(String),
}

impl SigmetError {
    /// Caption problems only disable the cursor readout
    pub fn is_caption_error(&self) -> bool {
        matches!(
            self,
            Self::MissingLocation | Self::MissingSweep | Self::InvalidNumber(_)
        )
    }
}
