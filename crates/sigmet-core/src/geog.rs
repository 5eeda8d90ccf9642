//! Spherical earth geometry for the cursor readout.
//!
//! Ranges from the radar are converted to great circle angles with an
//! effective earth radius of 4/3 the true radius, which accounts for normal
//! atmospheric refraction of the radar beam.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

/// Effective earth radius in meters (4/3 rule, international nautical mile).
pub const EARTH_RADIUS_4_3: f64 = 4.0 / 3.0 * 1852.0 * 60.0 * 180.0 / PI;

/// Geographic point, angles in radians
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self {
            lon: lon_deg.to_radians(),
            lat: lat_deg.to_radians(),
        }
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon.to_degrees()
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat.to_degrees()
    }
}

/// Destination reached from `origin` after a great circle step of angular
/// length `delta` along `bearing` (radians clockwise from north).
///
/// Haversine form after Sinnott, "Virtues of the Haversine", Sky and
/// Telescope 68(2), 1984. Latitude is clamped to the poles and longitude
/// wrapped into [-pi, pi).
pub fn geog_step(origin: GeoPoint, bearing: f64, delta: f64) -> GeoPoint {
    let sin_s = delta.sin();
    let sin_d = bearing.sin();
    let cos_d = bearing.cos();

    let a = 0.5
        * ((origin.lat + delta).sin() * (1.0 + cos_d)
            + (origin.lat - delta).sin() * (1.0 - cos_d));
    let lat = if a > 1.0 {
        FRAC_PI_2
    } else if a < -1.0 {
        -FRAC_PI_2
    } else {
        a.asin()
    };

    let y = sin_s * sin_d;
    let x = 0.5
        * ((origin.lat + delta).cos() * (1.0 + cos_d)
            + (origin.lat - delta).cos() * (1.0 - cos_d));
    let lon = wrap_longitude(origin.lon + y.atan2(x));

    GeoPoint { lon, lat }
}

/// Wrap a longitude in radians into [-pi, pi)
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon + PI).rem_euclid(2.0 * PI) - PI
}

/// Height of the beam above the radar after great circle angle `delta`
/// at elevation `tilt` (radians), in meters.
///
/// Not guarded at `tilt + delta = pi/2`, where the result is not finite.
pub fn beam_height(delta: f64, tilt: f64) -> f64 {
    2.0 * EARTH_RADIUS_4_3 * (delta / 2.0).sin() * (tilt + delta / 2.0).sin()
        / (tilt + delta).cos()
}

/// Great circle angle subtended by a ground range in meters
pub fn range_to_angle(range_m: f64) -> f64 {
    range_m / EARTH_RADIUS_4_3
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_earth_radius() {
        assert!((EARTH_RADIUS_4_3 - 8_488_942.7).abs() < 1.0);
    }

    #[test]
    fn test_step_north() {
        let origin = GeoPoint::new(0.3, 0.5);
        let dest = geog_step(origin, 0.0, 0.01);
        assert!((dest.lat - 0.51).abs() < EPS);
        assert!((dest.lon - 0.3).abs() < EPS);
    }

    #[test]
    fn test_step_east_along_equator() {
        let dest = geog_step(GeoPoint::new(0.0, 0.0), FRAC_PI_2, 0.2);
        assert!(dest.lat.abs() < EPS);
        assert!((dest.lon - 0.2).abs() < EPS);
    }

    #[test]
    fn test_step_west_wraps_dateline() {
        let origin = GeoPoint::new(-PI + 0.05, 0.0);
        let dest = geog_step(origin, -FRAC_PI_2, 0.1);
        assert!((dest.lon - (PI - 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_step_zero_distance() {
        let origin = GeoPoint::from_degrees(-97.46, 35.18);
        let dest = geog_step(origin, 1.234, 0.0);
        assert!((dest.lon - origin.lon).abs() < EPS);
        assert!((dest.lat - origin.lat).abs() < EPS);
    }

    #[test]
    fn test_latitude_clamped_at_pole() {
        let dest = geog_step(GeoPoint::new(0.0, FRAC_PI_2 - 0.01), 0.0, 0.05);
        assert!(dest.lat <= FRAC_PI_2);
    }

    #[test]
    fn test_beam_height_flat_tilt() {
        // Zero tilt: height grows as range^2 / (2 a0)
        let range = 100_000.0;
        let height = beam_height(range_to_angle(range), 0.0);
        let expected = range * range / (2.0 * EARTH_RADIUS_4_3);
        assert!((height - expected).abs() < 1.0);
    }

    #[test]
    fn test_beam_height_rises_with_tilt() {
        let delta = range_to_angle(50_000.0);
        assert!(beam_height(delta, 1.0_f64.to_radians()) > beam_height(delta, 0.0));
        assert_eq!(beam_height(0.0, 0.3), 0.0);
    }

    #[test]
    fn test_wrap_longitude() {
        assert!((wrap_longitude(3.0 * PI / 2.0) + FRAC_PI_2).abs() < EPS);
        assert!((wrap_longitude(0.25) - 0.25).abs() < EPS);
    }

    #[test]
    fn test_wrap_longitude_half_open() {
        assert_eq!(wrap_longitude(PI), -PI);
        assert_eq!(wrap_longitude(-PI), -PI);
        assert!(wrap_longitude(PI - EPS) > 0.0);
    }
}
