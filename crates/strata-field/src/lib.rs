//! Attractor knowledge field for the Strata site-resonance pipeline.
//!
//! Attractors are point-shaped markers of prior knowledge (historical
//! accounts, geological features, confirmed sites) whose influence decays
//! linearly to zero at their radius. This crate owns the collection and
//! computes combined influence at a point or over a region.
//!
//! # Modules
//!
//! - [`field`] -- The mutable, generation-counted collection
//! - [`snapshot`] -- Immutable views that scoring runs against
//! - [`decay`] -- Distance decay and influence summation
//! - [`index`] -- Sparse hash grid for large collections
//! - [`seed`] -- Knowledge source records and seeding
//! - [`repository`] -- Persistence seam
//! - [`config`] -- Field tunables
//! - [`error`] -- Error types

pub mod config;
pub mod decay;
pub mod error;
pub mod field;
pub mod index;
pub mod repository;
pub mod seed;
pub mod snapshot;

pub use config::FieldConfig;
pub use error::FieldError;
pub use field::AttractorField;
pub use repository::{AttractorRepository, MemoryRepository};
pub use seed::{GeologicalFeature, HistoricalReference, KnowledgeSource};
pub use snapshot::FieldSnapshot;
