use crate::domain::model::GeoPoint;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres (haversine), `None` if either point is unknown.
pub fn distance_km(a: Option<GeoPoint>, b: Option<GeoPoint>) -> Option<f64> {
    let (a, b) = (a?, b?);
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    Some(EARTH_RADIUS_KM * 2.0 * h.sqrt().asin())
}
