//! Resonance scoring for the Strata site-resonance pipeline.
//!
//! Combines contradiction detection with attractor influence into a
//! per-cell score, uncertainty width, and predicted site type.
//!
//! # Modules
//!
//! - [`config`] -- `strata-config.yaml` loading and validation
//! - [`resonance`] -- The resonance calculator
//! - [`pipeline`] -- Per-cell and parallel batch scoring
//! - [`heatmap`] -- Ranking and heatmap projection

pub mod config;
pub mod heatmap;
pub mod pipeline;
pub mod resonance;

pub use config::{
    ClassificationConfig, ConfigError, InputsConfig, LoggingConfig, ResonanceConfig, StrataConfig,
};
pub use heatmap::{ResultFilter, heatmap, rank};
pub use pipeline::ScoringPipeline;
pub use resonance::ResonanceCalculator;
