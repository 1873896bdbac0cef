//! Environmental contradiction detection for the Strata pipeline.
//!
//! A contradiction is a mismatch between two normally-correlated
//! environmental signals, used as evidence of human landscape modification.
//!
//! # Modules
//!
//! - [`config`] -- [`DetectorConfig`] thresholds with calibrated defaults.
//! - [`detector`] -- [`ContradictionDetector`]: vegetation/canopy mismatch,
//!   water-proximity pattern, and the combined per-cell pass.
//! - [`geometric`] -- Edge-density heuristic over fine vegetation grids.

pub mod config;
pub mod detector;
pub mod geometric;

pub use config::DetectorConfig;
pub use detector::{ContradictionDetector, Detection};
pub use geometric::{GEOMETRIC_GRID, GeometricDetection, GeometricPattern};
