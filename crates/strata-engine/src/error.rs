//! Error types for the batch engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes while loading inputs, scoring, and writing results.

use std::path::PathBuf;

/// Top-level error for the batch engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: strata_core::ConfigError,
    },

    /// The attractor field could not be built.
    #[error("field error: {source}")]
    Field {
        /// The underlying field error.
        #[from]
        source: strata_field::FieldError,
    },

    /// An input or output file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A file held JSON of the wrong shape.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        /// The file involved.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}
