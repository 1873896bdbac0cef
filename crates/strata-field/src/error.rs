//! Error types for the `strata-field` crate.
//!
//! Influence computation itself never fails; errors arise only when an
//! attractor definition cannot be made valid by clamping, or when the
//! persistence collaborator fails.

use strata_types::AttractorId;

/// Errors that can occur while building or loading an attractor field.
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    /// A coordinate or radius was `NaN` or infinite.
    #[error("attractor {name:?} has a non-finite {field}")]
    NonFinite {
        /// Name of the offending attractor.
        name: String,
        /// Which value was non-finite (`position` or `influence_radius`).
        field: &'static str,
    },

    /// An attractor with the same identifier is already in the field.
    #[error("duplicate attractor id: {0}")]
    DuplicateAttractor(AttractorId),

    /// The attractor repository failed to load or store.
    #[error("attractor repository error: {message}")]
    Repository {
        /// Description of the repository failure.
        message: String,
    },
}
