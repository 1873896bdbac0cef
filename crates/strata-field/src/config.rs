//! Tunables for the attractor field and symbolic seeding.

use serde::Deserialize;

/// Attractor field configuration.
///
/// Deserialized from the `field` section of `strata-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Attractor count at which snapshots build a spatial index (default: 256).
    ///
    /// Below this a linear scan is faster than building the grid. Results
    /// are identical either way.
    pub index_threshold: usize,
    /// Radius given to seeded historical references that name none (default: 0.1).
    pub historical_radius: f64,
    /// Radius given to seeded geological features that name none (default: 0.05).
    pub geological_radius: f64,
    /// Confidence assumed for a missing source score during seeding (default: 0.5).
    pub default_confidence: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            index_threshold: 256,
            historical_radius: 0.1,
            geological_radius: 0.05,
            default_confidence: 0.5,
        }
    }
}
