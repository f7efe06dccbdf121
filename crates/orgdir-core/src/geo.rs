// crates/orgdir-core/src/geo.rs

//! # Distance Calculator
//!
//! Great-circle distance on a spherical Earth using the spherical law of
//! cosines. The radius search is a linear scan over buildings, so this is the
//! only geometry the directory needs.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Distance to `other` in kilometers on a sphere of radius `radius_km`.
    #[inline]
    pub fn distance_to(&self, other: &GeoPoint, radius_km: f64) -> f64 {
        distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
            radius_km,
        )
    }
}

/// Calculate the great-circle distance between two points in kilometers.
///
/// `acos(sin φ1·sin φ2 + cos φ1·cos φ2·cos Δλ) · R`
///
/// The `acos` argument is clamped to `[-1, 1]`: for identical (or antipodal)
/// points floating-point rounding can push it just outside the domain, which
/// would otherwise yield `NaN`. Identical points are exactly `0.0`, so a
/// zero-radius search still matches a building at the center.
///
/// # Arguments
/// * `lat1`, `lon1` - First point in degrees
/// * `lat2`, `lon2` - Second point in degrees
/// * `radius_km` - Sphere radius, normally [`EARTH_RADIUS_KM`]
#[inline]
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_km: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = lon2.to_radians() - lon1.to_radians();

    let cos_angle = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();

    cos_angle.clamp(-1.0, 1.0).acos() * radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_are_zero_apart() {
        for (lat, lon) in [
            (0.0, 0.0),
            (55.7558, 37.6173),
            (-33.8688, 151.2093),
            (89.9999, -179.9),
            (12.345678, 98.765432),
        ] {
            let d = distance_km(lat, lon, lat, lon, EARTH_RADIUS_KM);
            assert!(!d.is_nan(), "NaN for ({lat}, {lon})");
            assert_eq!(d, 0.0, "for ({lat}, {lon})");
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let moscow = GeoPoint::new(55.7558, 37.6173);
        let spb = GeoPoint::new(59.9343, 30.3351);
        let ab = moscow.distance_to(&spb, EARTH_RADIUS_KM);
        let ba = spb.distance_to(&moscow, EARTH_RADIUS_KM);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_city_pair() {
        // Moscow -> Saint Petersburg is roughly 634 km.
        let d = distance_km(55.7558, 37.6173, 59.9343, 30.3351, EARTH_RADIUS_KM);
        assert!((d - 634.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn antipodes_are_half_circumference() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0, EARTH_RADIUS_KM);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);
    }
}
