//! Geodesic distance capability.
//!
//! The pipeline treats "distance along the Earth between two lon/lat pairs"
//! as an opaque primitive supplied by the mapping collaborator. A spherical
//! great-circle implementation is provided for standalone use and tests.

use sst_common::LonLat;

/// Mean Earth radius in kilometers (IUGG).
const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Capability: shortest-path surface distance between two points.
pub trait Geodesic: Send + Sync {
    /// Distance in kilometers.
    fn distance_km(&self, a: LonLat, b: LonLat) -> f64;
}

/// Haversine great-circle distance on a spherical Earth.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl Geodesic for GreatCircle {
    fn distance_km(&self, a: LonLat, b: LonLat) -> f64 {
        let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
        let dlat = (b.lat - a.lat).to_radians();
        let dlon = (b.lon - a.lon).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = LonLat::new(-102.91, 16.53);
        assert_eq!(GreatCircle.distance_km(p, p), 0.0);
    }

    #[test]
    fn test_equator_degree() {
        // One degree of longitude at the equator is ~111.2 km.
        let d = GreatCircle.distance_km(LonLat::new(0.0, 0.0), LonLat::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_symmetry() {
        let a = LonLat::new(-93.67, -0.54);
        let b = LonLat::new(-98.18, 2.34);
        let ab = GreatCircle.distance_km(a, b);
        let ba = GreatCircle.distance_km(b, a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab > 0.0);
    }
}
