//! Planar geographic primitives.
//!
//! Coordinates are (longitude, latitude) in degrees and distances are plain
//! Euclidean distances over those degrees. This is the planar approximation
//! the attractor radii are expressed in; it is not a geodesic distance.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A geographic position as (longitude, latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GeoPoint {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Euclidean distance to another point, in coordinate units.
    pub fn distance(self, other: Self) -> f64 {
        (self.lon - other.lon).hypot(self.lat - other.lat)
    }

    /// Whether both coordinates are finite.
    pub const fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

/// An axis-aligned bounding box with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundingBox {
    /// Western edge.
    pub min_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a bounding box from its four edges.
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// East-west extent.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// North-south extent.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Whether the point lies inside or on the edge of the box.
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lon >= self.min_lon
            && point.lon <= self.max_lon
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }

    /// Expand the box by `buffer` on every side.
    pub fn buffered(&self, buffer: f64) -> Self {
        Self {
            min_lon: self.min_lon - buffer,
            min_lat: self.min_lat - buffer,
            max_lon: self.max_lon + buffer,
            max_lat: self.max_lat + buffer,
        }
    }
}
