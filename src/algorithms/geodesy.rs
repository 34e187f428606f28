//! Great-circle distance and local tangent-plane offsets
//!
//! Distances use a spherical Earth. The radius is passed in so the accumulator
//! can honour its configured value; [`EARTH_RADIUS_M`] is the usual choice.

use nalgebra::Vector2;
use crate::core::{Fix, EARTH_RADIUS_M};

/// Haversine distance in meters between two points given in decimal degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64, radius_m: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    radius_m * c
}

/// Haversine distance between two fixes
pub fn distance_between(from: &Fix, to: &Fix, radius_m: f64) -> f64 {
    haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude, radius_m)
}

/// East/north offset of `point` from `origin` on the origin's tangent plane (meters)
///
/// Flat-earth approximation; good to well under a percent over a few kilometers,
/// which is all a single track needs for displacement reporting.
pub fn local_offset(origin: &Fix, point: &Fix, radius_m: f64) -> Vector2<f64> {
    let lat_diff = (point.latitude - origin.latitude).to_radians();
    // Shortest way round, so a track crossing the antimeridian stays local
    let lon_diff = ((point.longitude - origin.longitude + 180.0).rem_euclid(360.0) - 180.0)
        .to_radians();
    let ref_lat_rad = origin.latitude.to_radians();

    let east = radius_m * lon_diff * ref_lat_rad.cos();
    let north = radius_m * lat_diff;

    Vector2::new(east, north)
}

/// Straight-line displacement between two fixes using the default Earth radius
pub fn net_displacement(origin: &Fix, point: &Fix) -> f64 {
    local_offset(origin, point, EARTH_RADIUS_M).norm()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let d = haversine_distance(0.0, 0.0, 0.0, 1.0, EARTH_RADIUS_M);
        assert_abs_diff_eq!(d, 111_195.0, epsilon = 1.0);
    }

    #[test]
    fn test_zero_distance_for_identical_points() {
        let d = haversine_distance(48.8566, 2.3522, 48.8566, 2.3522, EARTH_RADIUS_M);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Fix::new(37.7749, -122.4194, 0);
        let b = Fix::new(37.7750, -122.4180, 1000);
        let ab = distance_between(&a, &b, EARTH_RADIUS_M);
        let ba = distance_between(&b, &a, EARTH_RADIUS_M);
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-9);
        assert!(ab > 100.0 && ab < 150.0);
    }

    #[test]
    fn test_radius_scales_distance() {
        let d1 = haversine_distance(0.0, 0.0, 1.0, 0.0, 1.0);
        let d2 = haversine_distance(0.0, 0.0, 1.0, 0.0, 2.0);
        assert_abs_diff_eq!(d2, 2.0 * d1, epsilon = 1e-12);
    }

    #[test]
    fn test_local_offset_axes() {
        let origin = Fix::new(0.0, 0.0, 0);
        let north = Fix::new(0.001, 0.0, 0);
        let east = Fix::new(0.0, 0.001, 0);

        let n = local_offset(&origin, &north, EARTH_RADIUS_M);
        assert_abs_diff_eq!(n.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(n.y, 111.195, epsilon = 0.01);

        let e = local_offset(&origin, &east, EARTH_RADIUS_M);
        assert_abs_diff_eq!(e.x, 111.195, epsilon = 0.01);
        assert_abs_diff_eq!(e.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_local_offset_across_antimeridian() {
        let west_of_line = Fix::new(0.0, 179.99995, 0);
        let east_of_line = Fix::new(0.0, -179.99995, 1000);

        let offset = local_offset(&west_of_line, &east_of_line, EARTH_RADIUS_M);
        assert_abs_diff_eq!(offset.x, 11.1195, epsilon = 0.01);
        assert_abs_diff_eq!(offset.y, 0.0, epsilon = 1e-9);

        let back = local_offset(&east_of_line, &west_of_line, EARTH_RADIUS_M);
        assert_abs_diff_eq!(back.x, -11.1195, epsilon = 0.01);

        assert_abs_diff_eq!(
            net_displacement(&west_of_line, &east_of_line),
            distance_between(&west_of_line, &east_of_line, EARTH_RADIUS_M),
            epsilon = 0.01
        );
    }

    #[test]
    fn test_net_displacement_matches_haversine_over_short_range() {
        let a = Fix::new(51.5007, -0.1246, 0);
        let b = Fix::new(51.5014, -0.1419, 0);
        let flat = net_displacement(&a, &b);
        let sphere = distance_between(&a, &b, EARTH_RADIUS_M);
        assert!((flat - sphere).abs() / sphere < 0.01);
    }
}
