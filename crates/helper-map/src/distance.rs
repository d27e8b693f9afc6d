/*
[INPUT]:  Two coordinates in degrees
[OUTPUT]: Great-circle distance in kilometers
[POS]:    Pure geometry helpers shared by the map session and the task list
[UPDATE]: When changing the distance model or display precision
*/

use helper_map_adapter::Coordinate;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    // sin² is even, so taking |Δ| keeps d(A, B) bit-identical to d(B, A).
    let d_lat = (to.latitude - from.latitude).abs().to_radians();
    let d_lon = (to.longitude - from.longitude).abs().to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Round a distance to two decimals, the precision shown to users.
pub fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}
