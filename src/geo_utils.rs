//! Geographic utilities for distance and centroid calculations.

use geo::{Centroid, MultiPoint, Point};

use crate::Loc;

/// Earth radius in meters used by every proximity test in the crate.
pub const EARTH_RADIUS_M: f64 = 6_378_000.0;

/// Great-circle distance between two locations in meters (haversine).
///
/// Symmetric, zero for identical points, and always finite and non-negative
/// for valid coordinates: the haversine term is clamped to `[0, 1]` so that
/// rounding near identical or antipodal points cannot produce NaN.
///
/// # Example
/// ```
/// use holematch::Loc;
/// use holematch::geo_utils::haversine_distance;
///
/// let a = Loc::new(36.0, -115.0);
/// let b = Loc::new(37.0, -115.0);
/// let d = haversine_distance(&a, &b);
/// assert!((d - 111_317.0).abs() < 1_000.0);
/// ```
pub fn haversine_distance(a: &Loc, b: &Loc) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Total length of a polyline in meters.
pub fn path_distance(points: &[Loc]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

/// Centroid of a set of locations, `None` when empty.
pub fn compute_center(points: &[Loc]) -> Option<Loc> {
    let multi: MultiPoint<f64> = points
        .iter()
        .map(|p| Point::new(p.longitude, p.latitude))
        .collect::<Vec<_>>()
        .into();
    multi.centroid().map(|c| Loc::new(c.y(), c.x()))
}
