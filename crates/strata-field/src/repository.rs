//! Persistence seam for attractor collections.
//!
//! The field loads its collection wholesale at startup and writes new
//! attractors back one at a time. Storage is a collaborator: this crate
//! ships only an in-memory implementation.

use crate::error::FieldError;
use strata_types::Attractor;

/// Trait for loading and storing attractors.
///
/// Implementations must return attractors in a stable order; the field
/// sums influence in collection order.
pub trait AttractorRepository {
    /// Load every stored attractor.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Repository`] if the backing store cannot be read.
    fn load_all(&self) -> Result<Vec<Attractor>, FieldError>;

    /// Persist one attractor.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Repository`] if the backing store cannot be written.
    fn insert(&mut self, attractor: &Attractor) -> Result<(), FieldError>;
}

/// A repository held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    attractors: Vec<Attractor>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub const fn new() -> Self {
        Self {
            attractors: Vec::new(),
        }
    }

    /// Number of stored attractors.
    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }
}

impl From<Vec<Attractor>> for MemoryRepository {
    fn from(attractors: Vec<Attractor>) -> Self {
        Self { attractors }
    }
}

impl AttractorRepository for MemoryRepository {
    fn load_all(&self) -> Result<Vec<Attractor>, FieldError> {
        Ok(self.attractors.clone())
    }

    fn insert(&mut self, attractor: &Attractor) -> Result<(), FieldError> {
        self.attractors.push(attractor.clone());
        Ok(())
    }
}
