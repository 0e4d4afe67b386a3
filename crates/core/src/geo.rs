//! Coordinate type and distance math.
//!
//! Two distance computations live here and they are NOT interchangeable:
//!
//! - [`haversine_km`] is the great-circle distance used for display and
//!   sorting, in kilometers rounded to one decimal place.
//! - [`near_destination`] is the arrival check: a planar Euclidean test on
//!   raw lat/lng degree deltas against a fixed threshold. It is an
//!   approximation with different units and must never be fed to anything
//!   expecting kilometers.

use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Arrival threshold in raw degrees (roughly 200 m at these latitudes).
pub const NEAR_THRESHOLD_DEG: f64 = 0.002;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a coordinate from latitude and longitude degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Great-circle distance between two coordinates in kilometers.
///
/// Haversine formula with Earth radius 6371 km, rounded to one decimal
/// place. Symmetric, and zero for identical points.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    round_one_decimal(EARTH_RADIUS_KM * c)
}

/// Whether `user` has arrived at `target`.
///
/// Planar Euclidean test on raw degree deltas, threshold
/// [`NEAR_THRESHOLD_DEG`]. Cheaper than Haversine and adequate at the
/// ~200 m scale this gate operates on.
#[must_use]
pub fn near_destination(user: Coordinate, target: Coordinate) -> bool {
    let d_lat = user.lat - target.lat;
    let d_lng = user.lng - target.lng;
    (d_lat * d_lat + d_lng * d_lng).sqrt() < NEAR_THRESHOLD_DEG
}

fn round_one_decimal(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
