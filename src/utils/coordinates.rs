use crate::models::GeoPoint;
use crate::utils::constants::EARTH_RADIUS_M;

/// Surface distance in meters between two points on a spherical earth.
///
/// Uses the haversine formula. It is off by up to ~0.5% against an ellipsoid,
/// which is irrelevant for deciding whether a trackpoint moved a few meters.
///
/// # Examples
/// ```
/// use gpx_heatmap::models::GeoPoint;
/// use gpx_heatmap::utils::great_circle_distance;
///
/// let d = great_circle_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0));
/// assert!((d - 111_195.0).abs() < 1.0);
/// ```
pub fn great_circle_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    haversine_distance(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Calculate the distance in meters between two points using the Haversine formula
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}
