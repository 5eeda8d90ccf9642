//! # sigmet-nav
//!
//! Previous/next volume navigation.
//! Fetches the image index for the current data type and the SVG documents
//! of neighbouring volumes.
//!
//! ## Modules
//!
//! - `index` - Image index XML parsing
//! - `client` - HTTP client updating the viewer state

pub mod client;
pub mod index;

pub use client::*;
pub use index::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory holding the SVG images
pub const DEFAULT_IMAGE_ROOT: &str = "http://smartr.metr.ou.edu/smartr2/images/svg";

/// CGI listing the images of one data type
pub const DEFAULT_INDEX_URL: &str = "http://smartr.metr.ou.edu/cgi-bin/smartr2/img_idx";

// ============================================================================
// ERRORS
// ============================================================================

pub type NavResult<T> = Result<T, NavError>;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] gloo_net::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed image index: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Image index has no root element")]
    MissingRoot,

    #[error("Image index ends inside an element")]
    Truncated,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Locations of the image index and the images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Prefix joined to the names listed in the index
    pub image_root: String,
    /// Index CGI, queried with `?data_type=`
    pub index_url: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            image_root: DEFAULT_IMAGE_ROOT.to_string(),
            index_url: DEFAULT_INDEX_URL.to_string(),
        }
    }
}

impl NavConfig {
    pub fn new(image_root: impl Into<String>, index_url: impl Into<String>) -> Self {
        Self {
            image_root: image_root.into(),
            index_url: index_url.into(),
        }
    }

    pub fn image_root(mut self, root: impl Into<String>) -> Self {
        self.image_root = root.into();
        self
    }

    pub fn index_url(mut self, url: impl Into<String>) -> Self {
        self.index_url = url.into();
        self
    }
}
