//! The mutable attractor field.
//!
//! [`AttractorField`] owns the authoritative attractor collection. Every
//! change bumps its generation; scoring never reads the field directly but
//! takes a [`FieldSnapshot`] and runs against that.

use ahash::AHashSet;
use tracing::{debug, info, warn};

use strata_types::{
    Attractor, AttractorCategory, AttractorId, BoundingBox, CellId, GeoPoint, InfluenceField,
    InfluenceResult, NewAttractor, clamp_unit,
};

use crate::config::FieldConfig;
use crate::decay;
use crate::error::FieldError;
use crate::repository::AttractorRepository;
use crate::seed::KnowledgeSource;
use crate::snapshot::{self, FieldSnapshot};

/// The authoritative collection of attractors.
#[derive(Debug, Clone, Default)]
pub struct AttractorField {
    attractors: Vec<Attractor>,
    ids: AHashSet<AttractorId>,
    generation: u64,
    config: FieldConfig,
}

impl AttractorField {
    /// Create an empty field.
    pub fn new(config: FieldConfig) -> Self {
        Self {
            attractors: Vec::new(),
            ids: AHashSet::new(),
            generation: 0,
            config,
        }
    }

    /// Build a field from every attractor held by `repository`.
    ///
    /// Stored attractors go through the same validation as [`Self::insert`].
    ///
    /// # Errors
    ///
    /// Returns the repository's error if loading fails, or
    /// [`FieldError::NonFinite`] / [`FieldError::DuplicateAttractor`] if a
    /// stored attractor is malformed.
    pub fn from_repository(
        repository: &impl AttractorRepository,
        config: FieldConfig,
    ) -> Result<Self, FieldError> {
        let mut field = Self::new(config);
        for attractor in repository.load_all()? {
            field.insert(attractor)?;
        }
        info!(
            attractors = field.len(),
            generation = field.generation,
            "attractor field loaded"
        );
        Ok(field)
    }

    /// The field configuration.
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Current generation; increases with every accepted attractor.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// The attractors, in insertion order.
    pub fn attractors(&self) -> &[Attractor] {
        &self.attractors
    }

    /// Number of attractors.
    pub fn len(&self) -> usize {
        self.attractors.len()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.attractors.is_empty()
    }

    /// Validate and add a new attractor with a fresh identifier.
    ///
    /// Strength is clamped into `[0, 1]` and a negative radius becomes zero.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NonFinite`] if the position or radius is `NaN`
    /// or infinite.
    pub fn add(&mut self, new: NewAttractor) -> Result<Attractor, FieldError> {
        self.insert(Attractor {
            id: AttractorId::new(),
            name: new.name,
            category: new.category,
            strength: new.strength,
            influence_radius: new.influence_radius,
            position: new.position,
            metadata: new.metadata,
        })
    }

    /// Validate and add an attractor that already has an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::NonFinite`] for a non-finite position or radius
    /// and [`FieldError::DuplicateAttractor`] if the id is already present.
    pub fn insert(&mut self, mut attractor: Attractor) -> Result<Attractor, FieldError> {
        if !attractor.position.is_finite() {
            return Err(FieldError::NonFinite {
                name: attractor.name,
                field: "position",
            });
        }
        if !attractor.influence_radius.is_finite() {
            return Err(FieldError::NonFinite {
                name: attractor.name,
                field: "influence_radius",
            });
        }
        if self.ids.contains(&attractor.id) {
            return Err(FieldError::DuplicateAttractor(attractor.id));
        }

        attractor.strength = clamp_unit(attractor.strength);
        attractor.influence_radius = attractor.influence_radius.max(0.0);

        self.ids.insert(attractor.id);
        self.generation = self.generation.saturating_add(1);
        debug!(
            attractor_id = %attractor.id,
            name = %attractor.name,
            category = %attractor.category,
            strength = attractor.strength,
            radius = attractor.influence_radius,
            generation = self.generation,
            "attractor added"
        );
        self.attractors.push(attractor.clone());
        Ok(attractor)
    }

    /// Attractors matching an optional category and bounding box.
    pub fn query(
        &self,
        category: Option<AttractorCategory>,
        bbox: Option<&BoundingBox>,
    ) -> Vec<Attractor> {
        snapshot::filter(&self.attractors, category, bbox)
    }

    /// Combined influence at `point` over the current collection.
    pub fn influence_at(&self, point: GeoPoint) -> InfluenceResult {
        decay::accumulate(&self.attractors, point)
    }

    /// Influence over `region`; see [`FieldSnapshot::influence_field`].
    pub fn influence_field(&self, region: BoundingBox, cells: &[(CellId, GeoPoint)]) -> InfluenceField {
        self.snapshot().influence_field(region, cells)
    }

    /// Freeze the current collection into an immutable snapshot.
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot::new(
            self.attractors.clone(),
            self.generation,
            self.config.index_threshold,
        )
    }

    /// Create attractors from a knowledge source.
    ///
    /// Records without coordinates, or whose values cannot be validated, are
    /// skipped with a warning. Returns the attractors created.
    pub fn seed_symbolic_attractors(&mut self, source: &KnowledgeSource) -> Vec<Attractor> {
        let historical = source.historical_references.iter().map(|r| {
            (r.name.as_str(), "historical_references", r.to_new_attractor(&self.config))
        });
        let geological = source.geological_features.iter().map(|f| {
            (f.name.as_str(), "geological_features", f.to_new_attractor(&self.config))
        });
        let candidates: Vec<_> = historical.chain(geological).collect();

        let mut created = Vec::new();
        for (name, section, new) in candidates {
            let Some(new) = new else {
                warn!(record = %name, section, "knowledge record has no coordinates, skipping");
                continue;
            };
            match self.add(new) {
                Ok(attractor) => created.push(attractor),
                Err(error) => warn!(record = %name, section, %error, "knowledge record rejected, skipping"),
            }
        }

        info!(
            created = created.len(),
            generation = self.generation,
            "symbolic attractors seeded"
        );
        created
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeMap;

    use crate::repository::MemoryRepository;
    use crate::seed::{GeologicalFeature, HistoricalReference};

    use super::*;

    fn new_attractor(strength: f64, radius: f64) -> NewAttractor {
        NewAttractor {
            name: "plaza".to_owned(),
            category: AttractorCategory::Historical,
            position: GeoPoint::new(0.0, 0.0),
            strength,
            influence_radius: radius,
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn add_clamps_strength_and_radius() {
        let mut field = AttractorField::default();
        let a = field.add(new_attractor(1.7, -0.5)).unwrap();
        assert_eq!(a.strength, 1.0);
        assert_eq!(a.influence_radius, 0.0);
        let b = field.add(new_attractor(-0.3, 0.1)).unwrap();
        assert_eq!(b.strength, 0.0);
        assert_eq!(field.generation(), 2);
    }

    #[test]
    fn add_rejects_non_finite_values() {
        let mut field = AttractorField::default();
        let bad_radius = field.add(new_attractor(0.5, f64::NAN));
        assert!(matches!(
            bad_radius,
            Err(FieldError::NonFinite { field: "influence_radius", .. })
        ));
        let mut bad_pos = new_attractor(0.5, 0.1);
        bad_pos.position = GeoPoint::new(f64::INFINITY, 0.0);
        assert!(matches!(
            field.add(bad_pos),
            Err(FieldError::NonFinite { field: "position", .. })
        ));
        assert!(field.is_empty());
        assert_eq!(field.generation(), 0);
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let mut field = AttractorField::default();
        let a = field.add(new_attractor(0.5, 0.1)).unwrap();
        assert!(matches!(
            field.insert(a.clone()),
            Err(FieldError::DuplicateAttractor(id)) if id == a.id
        ));
    }

    #[test]
    fn rejected_attractor_does_not_reserve_its_id() {
        let valid = AttractorField::default().add(new_attractor(0.5, 0.1)).unwrap();
        let mut malformed = valid.clone();
        malformed.influence_radius = f64::NAN;

        let mut field = AttractorField::default();
        assert!(field.insert(malformed).is_err());
        assert!(field.insert(valid.clone()).is_ok());
        assert!(matches!(
            field.insert(valid),
            Err(FieldError::DuplicateAttractor(_))
        ));
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn large_repository_loads_without_duplicates() {
        let attractors: Vec<_> = (0..5_000_u32)
            .map(|i| {
                let mut source = AttractorField::default();
                let mut new = new_attractor(0.5, 0.01);
                new.position = GeoPoint::new(f64::from(i) * 0.001, 0.0);
                source.add(new).unwrap()
            })
            .collect();
        let repo = MemoryRepository::from(attractors);
        let field = AttractorField::from_repository(&repo, FieldConfig::default()).unwrap();
        assert_eq!(field.len(), 5_000);
        assert_eq!(field.generation(), 5_000);
    }

    #[test]
    fn snapshot_is_isolated_from_later_adds() {
        let mut field = AttractorField::default();
        field.add(new_attractor(0.8, 0.1)).unwrap();
        let snap = field.snapshot();
        field.add(new_attractor(0.8, 0.1)).unwrap();

        assert_eq!(snap.generation(), 1);
        assert_eq!(snap.len(), 1);
        assert_eq!(field.generation(), 2);
        let point = GeoPoint::new(0.05, 0.0);
        assert!((snap.influence_at(point).total - 0.4).abs() < 1e-12);
        assert!((field.influence_at(point).total - 0.8).abs() < 1e-12);
    }

    #[test]
    fn seeding_skips_unplaceable_records() {
        let source = KnowledgeSource {
            historical_references: vec![
                HistoricalReference {
                    name: "located".to_owned(),
                    coordinates: Some((-63.0, -10.0)),
                    reliability: Some(0.6),
                    ..HistoricalReference::default()
                },
                HistoricalReference {
                    name: "rumour".to_owned(),
                    ..HistoricalReference::default()
                },
            ],
            geological_features: vec![GeologicalFeature {
                name: "bad radius".to_owned(),
                coordinates: Some((0.0, 0.0)),
                influence_radius: Some(f64::INFINITY),
                ..GeologicalFeature::default()
            }],
        };
        let mut field = AttractorField::default();
        let created = field.seed_symbolic_attractors(&source);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "located");
        assert!((created[0].strength - 0.55).abs() < 1e-12);
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn loads_from_repository() {
        let mut source = AttractorField::default();
        source.add(new_attractor(0.5, 0.1)).unwrap();
        source.add(new_attractor(0.6, 0.2)).unwrap();
        let repo = MemoryRepository::from(source.attractors().to_vec());

        let field = AttractorField::from_repository(&repo, FieldConfig::default()).unwrap();
        assert_eq!(field.len(), 2);
        assert_eq!(field.generation(), 2);
        assert_eq!(field.attractors(), source.attractors());
    }

    #[test]
    fn repository_duplicates_are_rejected() {
        let mut source = AttractorField::default();
        let a = source.add(new_attractor(0.5, 0.1)).unwrap();
        let repo = MemoryRepository::from(vec![a.clone(), a]);
        assert!(AttractorField::from_repository(&repo, FieldConfig::default()).is_err());
    }
}
