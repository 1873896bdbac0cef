//! Tunable thresholds for contradiction detection.
//!
//! Defaults are the empirically chosen constants the downstream
//! classification bands were calibrated against. They live here as
//! configuration so they are visible and overridable, but changing them
//! shifts every score produced by the pipeline.

use serde::Deserialize;

/// Thresholds for the three contradiction detectors.
///
/// Deserialized from the `detector` section of `strata-config.yaml`; any
/// omitted key takes its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Vegetation density above which a short canopy is contradictory (default: 0.7).
    pub vegetation_high: f64,
    /// Canopy height in metres below which dense vegetation is contradictory (default: 10).
    pub canopy_low: f64,
    /// Vegetation density below which a tall canopy is contradictory (default: 0.3).
    pub vegetation_low: f64,
    /// Canopy height in metres above which sparse vegetation is contradictory (default: 20).
    pub canopy_high: f64,
    /// Canopy height that maps to full strength in the inverse case (default: 30).
    pub canopy_high_scale: f64,

    /// Lower bound (exclusive) of the settlement distance-to-water band (default: 50).
    pub water_min_distance: f64,
    /// Upper bound (exclusive) of the settlement distance-to-water band (default: 500).
    pub water_max_distance: f64,
    /// Elevation in metres a cell must exceed to be above flood level (default: 5).
    pub min_elevation: f64,
    /// Elevation in metres at which the elevation factor saturates (default: 20).
    pub elevation_scale: f64,
    /// Slope in degrees a cell must stay below (default: 10).
    pub max_slope: f64,

    /// Absolute first difference counted as an edge (default: 0.2).
    pub edge_threshold: f64,
    /// Edge density above which a geometric grid is flagged (default: 0.3).
    pub edge_density_threshold: f64,
    /// Minimum rows and columns for the geometric detector to run (default: 3).
    pub min_matrix_dim: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            vegetation_high: 0.7,
            canopy_low: 10.0,
            vegetation_low: 0.3,
            canopy_high: 20.0,
            canopy_high_scale: 30.0,
            water_min_distance: 50.0,
            water_max_distance: 500.0,
            min_elevation: 5.0,
            elevation_scale: 20.0,
            max_slope: 10.0,
            edge_threshold: 0.2,
            edge_density_threshold: 0.3,
            min_matrix_dim: 3,
        }
    }
}

impl DetectorConfig {
    /// Check that every divisor is positive and finite.
    ///
    /// Returns the name of the first offending key.
    pub fn invalid_key(&self) -> Option<&'static str> {
        [
            ("detector.canopy_low", self.canopy_low),
            ("detector.canopy_high_scale", self.canopy_high_scale),
            ("detector.water_max_distance", self.water_max_distance),
            ("detector.elevation_scale", self.elevation_scale),
            ("detector.max_slope", self.max_slope),
        ]
        .into_iter()
        .find(|(_, value)| !(value.is_finite() && *value > 0.0))
        .map(|(key, _)| key)
    }
}
