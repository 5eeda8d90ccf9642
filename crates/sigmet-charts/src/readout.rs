//! Geographic readout of the cursor position.
//!
//! Plot Cartesian coordinates are meters relative to the radar. For an RHI
//! sweep x is range along the fixed azimuth and y is height; for a PPI sweep
//! x is east and y is north of the radar.

use sigmet_core::{
    beam_height, geog_step, range_to_angle, GeoPoint, RadarCaption, SigmetResult, Sweep,
};
use std::fmt;

/// Cursor geolocation for one plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorReadout {
    origin: GeoPoint,
    sweep: Sweep,
}

/// Geographic position and height above the radar of a cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorLocation {
    pub position: GeoPoint,
    pub height_m: f64,
}

impl CursorReadout {
    pub fn new(caption: RadarCaption) -> Self {
        Self {
            origin: caption.location,
            sweep: caption.sweep,
        }
    }

    pub fn from_caption_text(text: &str) -> SigmetResult<Self> {
        RadarCaption::parse(text).map(Self::new)
    }

    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    /// Locate the Cartesian point (`x`, `y`) in meters
    pub fn locate(&self, x: f64, y: f64) -> CursorLocation {
        match self.sweep {
            Sweep::Rhi { azimuth } => CursorLocation {
                position: geog_step(self.origin, azimuth, range_to_angle(x)),
                height_m: y,
            },
            Sweep::Ppi { tilt } => {
                // Compass bearing: clockwise from north, so x and y swap places
                // relative to the math-angle atan2(y, x)
                let bearing = x.atan2(y);
                let delta = range_to_angle(x.hypot(y));
                CursorLocation {
                    position: geog_step(self.origin, bearing, delta),
                    height_m: beam_height(delta, tilt),
                }
            }
        }
    }
}

impl fmt::Display for CursorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lon = self.position.lon_deg();
        let lat = self.position.lat_deg();
        let ew = if lon > 0.0 { "E" } else { "W" };
        let ns = if lat > 0.0 { "N" } else { "S" };
        let height = if self.height_m.round() == 0.0 {
            0.0
        } else {
            self.height_m
        };
        write!(
            f,
            "Cursor: {:.3} {} {:.3} {} {:.0} m-agl",
            lon.abs(),
            ew,
            lat.abs(),
            ns,
            height
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sigmet_core::EARTH_RADIUS_4_3;

    fn ktlx(sweep: Sweep) -> CursorReadout {
        CursorReadout::new(RadarCaption {
            location: GeoPoint::from_degrees(-97.2778, 35.3331),
            sweep,
        })
    }

    #[test]
    fn test_readout_at_radar() {
        let readout = ktlx(Sweep::Ppi { tilt: 0.5_f64.to_radians() });
        let loc = readout.locate(0.0, 0.0);
        assert_eq!(loc.to_string(), "Cursor: 97.278 W 35.333 N 0 m-agl");
    }

    #[test]
    fn test_ppi_bearing_is_compass() {
        let readout = ktlx(Sweep::Ppi { tilt: 0.0 });
        let north = readout.locate(0.0, 10_000.0).position;
        let east = readout.locate(10_000.0, 0.0).position;
        assert!(north.lat > readout.origin().lat);
        assert!((north.lon - readout.origin().lon).abs() < 1e-9);
        assert!(east.lon > readout.origin().lon);
    }

    #[test]
    fn test_ppi_height_uses_beam_geometry() {
        let tilt = 1.0_f64.to_radians();
        let readout = ktlx(Sweep::Ppi { tilt });
        let loc = readout.locate(30_000.0, 40_000.0);
        let expected = beam_height(50_000.0 / EARTH_RADIUS_4_3, tilt);
        assert!((loc.height_m - expected).abs() < 1e-6);
        assert!(loc.height_m > 800.0);
    }

    #[test]
    fn test_rhi_height_is_y() {
        let readout = ktlx(Sweep::Rhi { azimuth: 90.0_f64.to_radians() });
        let loc = readout.locate(20_000.0, 1523.4);
        assert_eq!(loc.height_m, 1523.4);
        assert!(loc.position.lon > readout.origin().lon);
        assert!(loc.to_string().ends_with(" 1523 m-agl"));
    }

    #[test]
    fn test_hemisphere_letters() {
        let loc = CursorLocation {
            position: GeoPoint::from_degrees(131.044, -12.2492),
            height_m: -0.3,
        };
        assert_eq!(loc.to_string(), "Cursor: 131.044 E 12.249 S 0 m-agl");
    }

    #[test]
    fn test_from_caption_text() {
        let readout =
            CursorReadout::from_caption_text("-97.3 deg lon, 35.3 deg lat. RHI az = 10 deg").unwrap();
        assert_eq!(readout.sweep().label(), "RHI");
        assert!(CursorReadout::from_caption_text("no metadata").is_err());
    }
}
