//! Radar metadata parsed from the plot caption.
//!
//! The static renderer writes captions such as
//! `KTLX ... -97.2778 deg lon, 35.3331 deg lat ... PPI tilt = 0.5 deg`.

use crate::{GeoPoint, SigmetError, SigmetResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static LOCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([e\d.-]+) deg lon, ([e\d.-]+) deg lat").unwrap());
static RHI_AZIMUTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RHI az = ([e\d.-]+) deg").unwrap());
static PPI_TILT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PPI tilt = ([e\d.-]+) deg").unwrap());

/// Scan geometry of the plotted sweep, angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Sweep {
    /// Range height indicator at a fixed azimuth
    Rhi { azimuth: f64 },
    /// Plan position indicator at a fixed elevation
    Ppi { tilt: f64 },
}

impl Sweep {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rhi { .. } => "RHI",
            Self::Ppi { .. } => "PPI",
        }
    }
}

/// Radar location and sweep type taken from a caption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarCaption {
    pub location: GeoPoint,
    pub sweep: Sweep,
}

impl RadarCaption {
    /// Parse caption text. A PPI description wins if both sweep kinds appear.
    pub fn parse(text: &str) -> SigmetResult<Self> {
        let location = parse_location(text)?;

        let sweep = if let Some(tilt) = degrees_after(text, &PPI_TILT)? {
            Sweep::Ppi {
                tilt: tilt.to_radians(),
            }
        } else if let Some(azimuth) = degrees_after(text, &RHI_AZIMUTH)? {
            Sweep::Rhi {
                azimuth: azimuth.to_radians(),
            }
        } else {
            return Err(SigmetError::MissingSweep);
        };

        Ok(Self { location, sweep })
    }
}

fn parse_location(text: &str) -> SigmetResult<GeoPoint> {
    let caps = LOCATION.captures(text).ok_or(SigmetError::MissingLocation)?;
    let lon = parse_number(&caps[1])?;
    let lat = parse_number(&caps[2])?;
    Ok(GeoPoint::from_degrees(lon, lat))
}

/// Number of degrees captured by `pattern`, if it matches
fn degrees_after(text: &str, pattern: &Regex) -> SigmetResult<Option<f64>> {
    pattern
        .captures(text)
        .map(|caps| parse_number(&caps[1]))
        .transpose()
}

fn parse_number(token: &str) -> SigmetResult<f64> {
    token
        .parse::<f64>()
        .map_err(|_| SigmetError::InvalidNumber(token.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================
