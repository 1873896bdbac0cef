//! Immutable point-in-time views of an attractor field.
//!
//! A [`FieldSnapshot`] is what scoring runs against. It is cheap to clone
//! (one `Arc`), `Send + Sync`, and never observes later mutation of the
//! field it was taken from. The `generation` it carries is stamped on every
//! result computed from it.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use strata_types::{
    Attractor, AttractorCategory, BoundingBox, CellId, CellInfluence, GeoPoint, InfluenceField,
    InfluenceResult,
};

use crate::decay;
use crate::index::SparseGrid;

#[derive(Debug)]
struct SnapshotInner {
    generation: u64,
    loaded_at: DateTime<Utc>,
    attractors: Vec<Attractor>,
    index: Option<SparseGrid>,
    index_threshold: usize,
}

/// A read-only, versioned view of an attractor collection.
#[derive(Debug, Clone)]
pub struct FieldSnapshot {
    inner: Arc<SnapshotInner>,
}

impl FieldSnapshot {
    /// Freeze `attractors` into a snapshot stamped with `generation`.
    ///
    /// A spatial index is built when the collection holds at least
    /// `index_threshold` attractors.
    pub fn new(attractors: Vec<Attractor>, generation: u64, index_threshold: usize) -> Self {
        Self::build(attractors, generation, Utc::now(), index_threshold)
    }

    fn build(
        attractors: Vec<Attractor>,
        generation: u64,
        loaded_at: DateTime<Utc>,
        index_threshold: usize,
    ) -> Self {
        let index = if attractors.len() >= index_threshold {
            SparseGrid::build(&attractors)
        } else {
            None
        };
        Self {
            inner: Arc::new(SnapshotInner {
                generation,
                loaded_at,
                attractors,
                index,
                index_threshold,
            }),
        }
    }

    /// A snapshot with no attractors at generation zero.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, usize::MAX)
    }

    /// Generation of the field when the snapshot was taken.
    pub fn generation(&self) -> u64 {
        self.inner.generation
    }

    /// When the snapshot was taken.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.inner.loaded_at
    }

    /// The attractors, in collection order.
    pub fn attractors(&self) -> &[Attractor] {
        &self.inner.attractors
    }

    /// Number of attractors.
    pub fn len(&self) -> usize {
        self.inner.attractors.len()
    }

    /// Whether the snapshot holds no attractors.
    pub fn is_empty(&self) -> bool {
        self.inner.attractors.is_empty()
    }

    /// Whether influence queries go through the spatial index.
    pub fn is_indexed(&self) -> bool {
        self.inner.index.is_some()
    }

    /// Combined influence of every attractor in range of `point`.
    pub fn influence_at(&self, point: GeoPoint) -> InfluenceResult {
        let attractors = &self.inner.attractors;
        match &self.inner.index {
            Some(grid) => decay::accumulate(
                grid.candidates(point)
                    .into_iter()
                    .filter_map(|i| attractors.get(i)),
                point,
            ),
            None => decay::accumulate(attractors, point),
        }
    }

    /// Attractors matching an optional category and bounding box.
    pub fn query(
        &self,
        category: Option<AttractorCategory>,
        bbox: Option<&BoundingBox>,
    ) -> Vec<Attractor> {
        filter(&self.inner.attractors, category, bbox)
    }

    /// Influence at each cell centroid inside `region`.
    ///
    /// Cells outside the region are dropped. Only attractors positioned
    /// inside the region buffered by its larger extent take part.
    pub fn influence_field(&self, region: BoundingBox, cells: &[(CellId, GeoPoint)]) -> InfluenceField {
        let buffer = region.width().max(region.height());
        let nearby = region.buffered(buffer);
        let restricted = Self::build(
            filter(&self.inner.attractors, None, Some(&nearby)),
            self.inner.generation,
            self.inner.loaded_at,
            self.inner.index_threshold,
        );

        let cells: BTreeMap<CellId, CellInfluence> = cells
            .iter()
            .filter(|(_, centroid)| region.contains(*centroid))
            .map(|(id, centroid)| {
                (
                    id.clone(),
                    CellInfluence {
                        position: *centroid,
                        influence: restricted.influence_at(*centroid),
                    },
                )
            })
            .collect();

        InfluenceField {
            region,
            cell_count: cells.len(),
            attractor_count: restricted.len(),
            generation: self.inner.generation,
            cells,
        }
    }
}

pub(crate) fn filter(
    attractors: &[Attractor],
    category: Option<AttractorCategory>,
    bbox: Option<&BoundingBox>,
) -> Vec<Attractor> {
    attractors
        .iter()
        .filter(|a| category.is_none_or(|c| a.category == c))
        .filter(|a| bbox.is_none_or(|b| b.contains(a.position)))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use strata_types::AttractorId;

    use super::*;

    fn attractor(name: &str, category: AttractorCategory, lon: f64, lat: f64, radius: f64) -> Attractor {
        Attractor {
            id: AttractorId::new(),
            name: name.to_owned(),
            category,
            strength: 0.8,
            influence_radius: radius,
            position: GeoPoint::new(lon, lat),
            metadata: BTreeMap::new(),
        }
    }

    fn sample_attractors() -> Vec<Attractor> {
        vec![
            attractor("mound", AttractorCategory::Historical, 0.0, 0.0, 0.1),
            attractor("outcrop", AttractorCategory::Geological, 0.5, 0.5, 0.2),
            attractor("far", AttractorCategory::Mythic, 9.0, 9.0, 0.5),
        ]
    }

    fn sample_snapshot(threshold: usize) -> FieldSnapshot {
        FieldSnapshot::new(sample_attractors(), 7, threshold)
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn snapshots_are_send_and_sync() {
        assert_send_sync::<FieldSnapshot>();
    }

    #[test]
    fn empty_snapshot_has_no_influence() {
        let snap = FieldSnapshot::empty();
        assert_eq!(snap.generation(), 0);
        assert_eq!(snap.influence_at(GeoPoint::new(0.0, 0.0)), InfluenceResult::default());
    }

    #[test]
    fn half_radius_scenario() {
        let snap = FieldSnapshot::new(
            vec![attractor("a", AttractorCategory::Historical, 0.0, 0.0, 0.1)],
            1,
            usize::MAX,
        );
        let result = snap.influence_at(GeoPoint::new(0.05, 0.0));
        assert!((result.total - 0.4).abs() < 1e-12);
    }

    #[test]
    fn indexed_and_linear_agree() {
        let attractors = sample_attractors();
        let linear = FieldSnapshot::new(attractors.clone(), 7, usize::MAX);
        let indexed = FieldSnapshot::new(attractors, 7, 0);
        assert!(!linear.is_indexed());
        assert!(indexed.is_indexed());
        for point in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.45, 0.4),
            GeoPoint::new(9.2, 9.1),
            GeoPoint::new(-3.0, 2.0),
        ] {
            let a = linear.influence_at(point);
            let b = indexed.influence_at(point);
            assert_eq!(a.total.to_bits(), b.total.to_bits());
            assert_eq!(a.contributions, b.contributions);
        }
        assert_eq!(linear.influence_at(GeoPoint::new(0.45, 0.4)).contributions.len(), 1);
    }

    #[test]
    fn query_filters_by_category_and_bbox() {
        let snap = sample_snapshot(usize::MAX);
        let geo = snap.query(Some(AttractorCategory::Geological), None);
        assert_eq!(geo.len(), 1);
        assert_eq!(geo[0].name, "outcrop");

        let bbox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
        assert_eq!(snap.query(None, Some(&bbox)).len(), 2);
        assert!(snap.query(Some(AttractorCategory::Mythic), Some(&bbox)).is_empty());
        assert_eq!(snap.query(None, None).len(), 3);
    }

    #[test]
    fn influence_field_drops_outside_cells_and_far_attractors() {
        let snap = sample_snapshot(usize::MAX);
        let region = BoundingBox::new(-0.1, -0.1, 0.1, 0.1);
        let cells = vec![
            (CellId::new("in"), GeoPoint::new(0.0, 0.0)),
            (CellId::new("out"), GeoPoint::new(0.5, 0.5)),
        ];
        let field = snap.influence_field(region, &cells);

        assert_eq!(field.cell_count, 1);
        assert_eq!(field.generation, 7);
        // Buffer is 0.2: only the mound at the origin remains.
        assert_eq!(field.attractor_count, 1);
        let cell = &field.cells[&CellId::new("in")];
        assert!((cell.influence.total - 0.8).abs() < 1e-12);
        assert!(!field.cells.contains_key(&CellId::new("out")));
    }

    #[test]
    fn clones_share_state() {
        let snap = sample_snapshot(usize::MAX);
        let clone = snap.clone();
        assert_eq!(clone.loaded_at(), snap.loaded_at());
        assert_eq!(clone.len(), 3);
    }
}
