//! Shared type definitions for the Strata site-resonance pipeline.
//!
//! This crate is the single source of truth for the value types passed
//! between the detector, the attractor field, and the resonance calculator.
//! Output types flow downstream to `TypeScript` via `ts-rs` for the map
//! dashboard.
//!
//! # Modules
//!
//! - [`ids`] -- Attractor and cell identifiers
//! - [`enums`] -- Contradiction kinds, attractor categories, site types
//! - [`geometry`] -- Planar points and bounding boxes
//! - [`sample`] -- Per-cell environmental input records
//! - [`structs`] -- Contradictions, attractors, influences, and results

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod sample;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{AttractorCategory, ContradictionKind, SiteType};
pub use geometry::{BoundingBox, GeoPoint};
pub use ids::{AttractorId, CellId};
pub use sample::{
    CellInput, EnvironmentalSample, PatternMatrix, RaggedMatrixError, RequiredMeasurements,
};
pub use structs::{
    Attractor, AttractorContribution, CellInfluence, CellScore, ContradictionRecord,
    ContradictionSummary, HeatmapPoint, InfluenceField, InfluenceResult, NewAttractor,
    ResonanceMetadata, ResonanceResult, clamp_unit,
};
