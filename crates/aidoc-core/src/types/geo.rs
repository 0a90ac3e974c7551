//! Planar coordinates

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair.
///
/// Trip interpolation treats these as plain planar coordinates, not points on
/// a sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Linear interpolation towards `to`, applied to each axis independently.
    ///
    /// `fraction` is clamped to `[0, 1]`. The endpoints are returned exactly
    /// so that callers can compare positions with `==`.
    pub fn lerp(self, to: GeoPoint, fraction: f64) -> GeoPoint {
        if fraction <= 0.0 {
            return self;
        }
        if fraction >= 1.0 {
            return to;
        }
        GeoPoint {
            lat: self.lat + (to.lat - self.lat) * fraction,
            lng: self.lng + (to.lng - self.lng) * fraction,
        }
    }
}

/// A provider's registered location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lng: f64,
    /// Street address shown in listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Coordinates without the address
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}
