//! # sigmet-state
//!
//! Reactive state of the SIGMET plot viewer.
//! Uses Leptos signals so the document is touched only when a value changes.

pub mod volume;

pub use volume::*;

use leptos::prelude::*;
use sigmet_core::{NavButtons, NavDirection};

// ============================================================================
// BUTTON STYLE
// ============================================================================

/// Presentation of a navigation button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Enabled,
    Dimmed,
}

impl ButtonStyle {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Dimmed }
    }

    /// Stroke of the button outline, text and arrow
    pub fn stroke(&self) -> &'static str {
        match self {
            Self::Enabled => "black",
            Self::Dimmed => "#888",
        }
    }

    /// Arrow head marker
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Enabled => "url(#arrow)",
            Self::Dimmed => "url(#dim_arrow)",
        }
    }
}

/// Styles of the previous and next buttons
pub fn button_styles(buttons: NavButtons) -> [(NavDirection, ButtonStyle); 2] {
    [
        (NavDirection::Previous, ButtonStyle::from_enabled(buttons.prev_enabled)),
        (NavDirection::Next, ButtonStyle::from_enabled(buttons.next_enabled)),
    ]
}

// ============================================================================
// VIEWER STATE
// ============================================================================

/// Global viewer state with reactive signals
#[derive(Clone, Copy)]
pub struct ViewerState {
    /// Displayed volume and navigation
    pub volume: VolumeState,
    /// Text of the cursor readout (`None` when the cursor left the plot or
    /// the readout is disabled)
    pub cursor_text: RwSignal<Option<String>>,
}

impl ViewerState {
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            volume: VolumeState::new(current_url),
            cursor_text: RwSignal::new(None),
        }
    }

    pub fn set_cursor_text(&self, text: String) {
        self.cursor_text.set(Some(text));
    }

    pub fn clear_cursor_text(&self) {
        self.cursor_text.set(None);
    }
}
