//! Great-circle distance on a spherical earth.

use crate::models::GeoPoint;

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates, in meters.
///
/// Symmetric in its arguments; identical coordinates yield exactly 0.
pub fn haversine_distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Haversine distance between two points, in meters.
pub fn distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_distance_m(a.lat, a.lng, b.lat, b.lng)
}

/// Haversine distance between two points, in kilometers.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    distance_m(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric() {
        let pairs = [
            (10.793711, 106.669042, 10.797958, 106.671525),
            (48.8566, 2.3522, 52.5200, 13.4050),
            (-33.8688, 151.2093, 35.6762, 139.6503),
        ];
        for (lat1, lng1, lat2, lng2) in pairs {
            assert_eq!(
                haversine_distance_m(lat1, lng1, lat2, lng2),
                haversine_distance_m(lat2, lng2, lat1, lng1)
            );
        }
    }

    #[test]
    fn test_zero_for_identical_points() {
        assert_eq!(haversine_distance_m(10.8, 106.7, 10.8, 106.7), 0.0);
        assert_eq!(haversine_distance_m(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(haversine_distance_m(-90.0, 180.0, -90.0, 180.0), 0.0);
    }

    #[test]
    fn test_known_distance() {
        // 0.01 degrees of latitude is ~1112m on a 6371km sphere
        let d = haversine_distance_m(10.0, 106.0, 10.01, 106.0);
        assert!((d - 1111.9).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_point_wrappers_agree() {
        let a = GeoPoint {
            lat: 10.793711,
            lng: 106.669042,
        };
        let b = GeoPoint {
            lat: 10.797958,
            lng: 106.671525,
        };
        let m = distance_m(&a, &b);
        assert_eq!(m, haversine_distance_m(a.lat, a.lng, b.lat, b.lng));
        assert_eq!(distance_km(&a, &b), m / 1000.0);
    }
}
