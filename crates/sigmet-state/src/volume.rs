//! Reactive state of the displayed volume and its neighbours

use chrono::NaiveDateTime;
use leptos::prelude::*;
use sigmet_core::{ImageIndex, ImageName, NavButtons, NavDirection};

/// Volume currently shown and the index it belongs to
#[derive(Clone, Copy)]
pub struct VolumeState {
    /// URL of the displayed image
    pub current_url: RwSignal<String>,
    /// Latest image index for the current data type
    pub index: RwSignal<ImageIndex>,
    /// True while a neighbouring volume is being fetched
    pub updating: RwSignal<bool>,
}

impl VolumeState {
    pub fn new(current_url: impl Into<String>) -> Self {
        Self {
            current_url: RwSignal::new(current_url.into()),
            index: RwSignal::new(ImageIndex::default()),
            updating: RwSignal::new(false),
        }
    }

    /// Parsed name of the current image, if it follows the naming scheme
    pub fn image_name(&self) -> Option<ImageName> {
        self.current_url
            .with_untracked(|url| ImageName::parse(url).ok())
    }

    pub fn volume_time(&self) -> Option<NaiveDateTime> {
        self.image_name().map(|name| name.volume_time)
    }

    /// Enabled state of the navigation buttons (tracked)
    pub fn nav_buttons(&self) -> NavButtons {
        let url = self.current_url.get();
        self.index.with(|index| NavButtons::from_index(index, &url))
    }

    /// URL of the neighbouring volume in `direction`
    pub fn neighbor_url(&self, direction: NavDirection) -> Option<String> {
        let url = self.current_url.get_untracked();
        self.index
            .with_untracked(|index| index.neighbor(&url, direction).map(str::to_string))
    }

    /// Replace the image index
    pub fn set_index(&self, index: ImageIndex) {
        tracing::debug!(images = index.len(), "image index updated");
        self.index.set(index);
    }

    pub fn begin_update(&self) {
        self.updating.set(true);
    }

    /// A neighbouring volume was installed
    pub fn volume_loaded(&self, url: impl Into<String>) {
        self.current_url.set(url.into());
        self.updating.set(false);
    }

    /// A fetch failed or returned an unusable document
    pub fn update_failed(&self) {
        self.updating.set(false);
    }

    pub fn is_updating(&self) -> bool {
        self.updating.get_untracked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> VolumeState {
        let state = VolumeState::new("root/B_20130815235056_DB_DBZ_1.svg");
        state.set_index(ImageIndex::new(vec![
            "root/A_20130815234556_DB_DBZ_1.svg".into(),
            "root/B_20130815235056_DB_DBZ_1.svg".into(),
        ]));
        state
    }

    #[test]
    fn test_neighbors_follow_current_url() {
        let state = state();
        assert_eq!(
            state.neighbor_url(NavDirection::Previous).as_deref(),
            Some("root/A_20130815234556_DB_DBZ_1.svg")
        );
        assert_eq!(state.neighbor_url(NavDirection::Next), None);

        let buttons = state.nav_buttons();
        assert!(buttons.prev_enabled);
        assert!(!buttons.next_enabled);
    }

    #[test]
    fn test_update_cycle() {
        let state = state();
        state.begin_update();
        assert!(state.is_updating());
        state.volume_loaded("root/A_20130815234556_DB_DBZ_1.svg");
        assert!(!state.is_updating());
        assert!(!state.nav_buttons().prev_enabled);
        assert_eq!(state.image_name().map(|n| n.data_type.to_string()).as_deref(), Some("DB_DBZ"));
    }
}
