//! Great-circle distance between WGS84 coordinates.

use crate::models::GeoPoint;

/// Mean Earth radius used for all distances, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres.
///
/// Symmetric to the last bit, zero for identical points, and never NaN for
/// valid coordinates: the haversine term is clamped to `[0, 1]` because rounding
/// can push it just outside that range for near-identical or antipodal points.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    // Canonical argument order so d(a, b) and d(b, a) run the same arithmetic.
    let (a, b) = if (a.lat, a.lon) <= (b.lat, b.lon) {
        (a, b)
    } else {
        (b, a)
    };

    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine, Point};

    #[test]
    fn test_identical_points_are_zero() {
        let p = GeoPoint::new(51.2967, -0.3306);
        assert_eq!(haversine_km(p, p), 0.0);
        let origin = GeoPoint::new(0.0, 0.0);
        assert_eq!(haversine_km(origin, origin), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let a = GeoPoint::new(51.4, -0.3);
        let b = GeoPoint::new(51.29, -0.33);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_antipodal_points() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = haversine_km(a, b);
        assert!(!d.is_nan());
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

        let north = GeoPoint::new(90.0, 0.0);
        let south = GeoPoint::new(-90.0, 0.0);
        assert!((haversine_km(north, south) - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_short_range_distance() {
        // 0.01 degrees of latitude
        let d = haversine_km(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.0));
        let expected = 0.01_f64.to_radians() * EARTH_RADIUS_KM;
        assert!((d - expected).abs() / expected < 1e-6);
        assert!((d - 1.1119).abs() < 1e-4);
    }

    #[test]
    fn test_agrees_with_geo_haversine() {
        // geo uses a slightly larger mean radius, so compare with a loose tolerance.
        let a = GeoPoint::new(51.4149, -0.3021);
        let b = GeoPoint::new(51.3386, -0.2678);
        let ours = haversine_km(a, b);
        let to_geo = |p: GeoPoint| Point::new(p.lon, p.lat);
        let theirs = Haversine.distance(to_geo(a), to_geo(b)) / 1000.0;
        assert!((ours - theirs).abs() / theirs < 1e-5);
    }
}
