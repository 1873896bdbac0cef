//! File-backed collaborators: JSON inputs, results, and attractor storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use strata_field::{AttractorRepository, FieldError};
use strata_types::Attractor;

use crate::error::EngineError;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let contents = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), EngineError> {
    let io_error = |source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(io_error)
}

/// An attractor collection stored as one JSON array on disk.
///
/// The file is read once on open; every insert rewrites it.
#[derive(Debug)]
pub struct JsonFileRepository {
    path: PathBuf,
    attractors: Vec<Attractor>,
}

impl JsonFileRepository {
    /// Open the collection at `path`. A missing file is an empty collection.
    pub fn open(path: &Path) -> Result<Self, EngineError> {
        let attractors = if path.exists() {
            read_json(path)?
        } else {
            info!(path = %path.display(), "attractor file not found, starting empty");
            Vec::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            attractors,
        })
    }
}

impl AttractorRepository for JsonFileRepository {
    fn load_all(&self) -> Result<Vec<Attractor>, FieldError> {
        Ok(self.attractors.clone())
    }

    fn insert(&mut self, attractor: &Attractor) -> Result<(), FieldError> {
        self.attractors.push(attractor.clone());
        write_json(&self.path, &self.attractors).map_err(|e| FieldError::Repository {
            message: e.to_string(),
        })
    }
}
