//! Image file names, the image index and navigation button state

use crate::{SigmetError, SigmetResult};
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// `_<volume time>_<data type>_` inside an image file name
static STAMP_AND_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d{14})_(DB_[0-9A-Z]+)_").unwrap());

// ============================================================================
// DATA TYPE
// ============================================================================

/// Radar moment identifier (e.g., "DB_DBZ", "DB_VEL")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType(pub String);

impl DataType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// IMAGE NAME
// ============================================================================

/// Parsed image URL of the form `.../CPOLRVP_20130815235056_DB_DBZ_54.0.svg`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageName {
    pub url: String,
    pub data_type: DataType,
    pub volume_time: NaiveDateTime,
}

impl ImageName {
    pub fn parse(url: &str) -> SigmetResult<Self> {
        let (stamp, data_type) = find_stamp_and_type(url)
            .ok_or_else(|| SigmetError::MissingDataType(url.to_string()))?;

        let volume_time = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|_| SigmetError::InvalidVolumeTime(stamp.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            data_type: DataType::new(data_type),
            volume_time,
        })
    }

    /// Last path segment of the URL
    pub fn file_name(&self) -> &str {
        self.url.rsplit('/').next().unwrap_or(&self.url)
    }
}

fn find_stamp_and_type(url: &str) -> Option<(&str, &str)> {
    let caps = STAMP_AND_TYPE.captures(url)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

// ============================================================================
// IMAGE INDEX
// ============================================================================

/// Direction of volume navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavDirection {
    Previous,
    Next,
}

impl NavDirection {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Previous => "previous",
            Self::Next => "next",
        }
    }
}

/// Ordered list of image URLs available for one data type
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageIndex {
    pub images: Vec<String>,
}

impl ImageIndex {
    pub fn new(images: Vec<String>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Position of `url` in the index
    pub fn position(&self, url: &str) -> Option<usize> {
        self.images.iter().position(|img| img == url)
    }

    pub fn is_first(&self, url: &str) -> bool {
        self.images.first().is_some_and(|img| img == url)
    }

    pub fn is_last(&self, url: &str) -> bool {
        self.images.last().is_some_and(|img| img == url)
    }

    /// URL adjacent to `current` in `direction`
    pub fn neighbor(&self, current: &str, direction: NavDirection) -> Option<&str> {
        let idx = self.position(current)?;
        let target = match direction {
            NavDirection::Previous => idx.checked_sub(1)?,
            NavDirection::Next => idx + 1,
        };
        self.images.get(target).map(String::as_str)
    }
}

/// Enabled state of the previous/next volume buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavButtons {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl NavButtons {
    /// Buttons for `current` within `index`; both dimmed if it is not listed
    pub fn from_index(index: &ImageIndex, current: &str) -> Self {
        match index.position(current) {
            Some(idx) => Self {
                prev_enabled: idx > 0,
                next_enabled: idx + 1 < index.len(),
            },
            None => Self::default(),
        }
    }

    pub fn is_enabled(&self, direction: NavDirection) -> bool {
        match direction {
            NavDirection::Previous => self.prev_enabled,
            NavDirection::Next => self.next_enabled,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const URL: &str =
        "http://smartr.metr.ou.edu/smartr2/images/svg/CPOLRVP_20130815235056_DB_DBZ_54.0.svg";

    fn index() -> ImageIndex {
        ImageIndex::new(vec!["a.svg".into(), "b.svg".into(), "c.svg".into()])
    }

    #[test]
    fn test_parse_image_name() {
        let name = ImageName::parse(URL).unwrap();
        assert_eq!(name.data_type.as_str(), "DB_DBZ");
        assert_eq!(name.volume_time.year(), 2013);
        assert_eq!(name.volume_time.month(), 8);
        assert_eq!(name.volume_time.hour(), 23);
        assert_eq!(name.volume_time.second(), 56);
        assert_eq!(name.file_name(), "CPOLRVP_20130815235056_DB_DBZ_54.0.svg");
    }

    #[test]
    fn test_parse_skips_false_candidates() {
        let name = ImageName::parse("X_123_KTLX_20130815235056_DB_VEL2_0.5.svg").unwrap();
        assert_eq!(name.data_type, DataType::new("DB_VEL2"));
    }

    #[test]
    fn test_parse_skips_malformed_stamp() {
        let name =
            ImageName::parse("/svg/run_2013081523505_DB_DBZ_/KTLX_20130815235056_DB_VEL_0.5.svg")
                .unwrap();
        assert_eq!(name.data_type, DataType::new("DB_VEL"));
        assert_eq!(name.volume_time.minute(), 50);
    }

    #[test]
    fn test_missing_data_type() {
        let url = "http://example.com/plot.svg";
        assert_eq!(
            ImageName::parse(url),
            Err(SigmetError::MissingDataType(url.to_string()))
        );
        assert!(ImageName::parse("A_20130815235056_DB__x.svg").is_err());
        assert!(ImageName::parse("A_20130815235056_db_dbz_x.svg").is_err());
    }

    #[test]
    fn test_invalid_volume_time() {
        let err = ImageName::parse("A_20131315235056_DB_DBZ_1.svg").unwrap_err();
        assert_eq!(err, SigmetError::InvalidVolumeTime("20131315235056".to_string()));
    }

    #[test]
    fn test_index_neighbors() {
        let idx = index();
        assert_eq!(idx.neighbor("b.svg", NavDirection::Previous), Some("a.svg"));
        assert_eq!(idx.neighbor("b.svg", NavDirection::Next), Some("c.svg"));
        assert_eq!(idx.neighbor("a.svg", NavDirection::Previous), None);
        assert_eq!(idx.neighbor("c.svg", NavDirection::Next), None);
        assert_eq!(idx.neighbor("z.svg", NavDirection::Next), None);
        assert!(idx.is_first("a.svg"));
        assert!(idx.is_last("c.svg"));
    }

    #[test]
    fn test_nav_buttons() {
        let idx = index();
        assert_eq!(
            NavButtons::from_index(&idx, "a.svg"),
            NavButtons { prev_enabled: false, next_enabled: true }
        );
        assert_eq!(
            NavButtons::from_index(&idx, "b.svg"),
            NavButtons { prev_enabled: true, next_enabled: true }
        );
        let last = NavButtons::from_index(&idx, "c.svg");
        assert!(last.is_enabled(NavDirection::Previous));
        assert!(!last.is_enabled(NavDirection::Next));
        assert_eq!(NavButtons::from_index(&idx, "z.svg"), NavButtons::default());
    }

    #[test]
    fn test_single_image_index() {
        let idx = ImageIndex::new(vec!["only.svg".into()]);
        assert_eq!(NavButtons::from_index(&idx, "only.svg"), NavButtons::default());
        assert!(ImageIndex::default().is_empty());
    }
}
