//! Core value structs: contradictions, attractors, influences, and results.
//!
//! Everything here is a plain value object. Records are produced fresh per
//! evaluation and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AttractorCategory, ContradictionKind, SiteType};
use crate::geometry::{BoundingBox, GeoPoint};
use crate::ids::{AttractorId, CellId};

/// Clamp a strength or influence value into `[0, 1]`.
///
/// `NaN` maps to `0.0` so a malformed input can never leak into a score.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Contradictions
// ---------------------------------------------------------------------------

/// One detected contradiction within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContradictionRecord {
    /// Which detector produced this record.
    #[serde(rename = "type")]
    pub kind: ContradictionKind,
    /// Strength of the contradiction in `[0, 1]`.
    pub strength: f64,
    /// Human-readable description.
    pub description: String,
    /// Sub-pattern label (e.g. `geometric_grid`) for pattern detectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_type: Option<String>,
    /// Pattern-specific measurements (e.g. `edge_density`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, f64>,
}

/// All contradictions detected for one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ContradictionSummary {
    /// The evaluated cell.
    pub cell_id: CellId,
    /// Flagged contradictions, in detector order.
    pub contradictions: Vec<ContradictionRecord>,
    /// Maximum strength over all contradictions (0 when none).
    pub overall_strength: f64,
}

impl ContradictionSummary {
    /// An empty summary for a cell (no detectors ran or none flagged).
    pub const fn empty(cell_id: CellId) -> Self {
        Self {
            cell_id,
            contradictions: Vec::new(),
            overall_strength: 0.0,
        }
    }

    /// Build a summary from records, deriving the overall strength.
    ///
    /// The overall strength is the maximum, never the sum, of record
    /// strengths.
    pub fn from_records(cell_id: CellId, contradictions: Vec<ContradictionRecord>) -> Self {
        let overall_strength = contradictions
            .iter()
            .map(|c| clamp_unit(c.strength))
            .fold(0.0_f64, f64::max);
        Self {
            cell_id,
            contradictions,
            overall_strength,
        }
    }

    /// Number of contradictions detected.
    pub fn count(&self) -> usize {
        self.contradictions.len()
    }

    /// Whether any record has the given kind.
    pub fn has_kind(&self, kind: ContradictionKind) -> bool {
        self.contradictions.iter().any(|c| c.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Attractors
// ---------------------------------------------------------------------------

/// A point of prior knowledge that biases scoring toward nearby cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Attractor {
    /// Unique identifier.
    pub id: AttractorId,
    /// Display name.
    pub name: String,
    /// Kind of knowledge this attractor encodes.
    pub category: AttractorCategory,
    /// Strength in `[0, 1]`.
    pub strength: f64,
    /// Radius of influence in coordinate units (degrees). Zero means the
    /// attractor only affects its exact position.
    pub influence_radius: f64,
    /// Geographic position.
    pub position: GeoPoint,
    /// Free-form provenance metadata.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Caller-supplied definition of an attractor before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttractor {
    /// Display name.
    pub name: String,
    /// Kind of knowledge.
    pub category: AttractorCategory,
    /// Position of the attractor.
    pub position: GeoPoint,
    /// Requested strength; clamped into `[0, 1]` on creation.
    pub strength: f64,
    /// Requested radius; negative values clamp to zero.
    pub influence_radius: f64,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Influence
// ---------------------------------------------------------------------------

/// A single attractor's contribution at a query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AttractorContribution {
    /// The contributing attractor.
    pub attractor_id: AttractorId,
    /// Its display name.
    pub attractor_name: String,
    /// Its category.
    pub category: AttractorCategory,
    /// Strength contributed after distance decay.
    pub influence: f64,
    /// Distance from the attractor to the query point.
    pub distance: f64,
}

/// Combined attractor influence at one point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InfluenceResult {
    /// Contributions from every attractor within range, in collection order.
    pub contributions: Vec<AttractorContribution>,
    /// Sum of contributions, capped at 1.0.
    pub total: f64,
}

/// Influence computed at one cell centroid as part of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellInfluence {
    /// Cell centroid.
    pub position: GeoPoint,
    /// Influence at the centroid.
    pub influence: InfluenceResult,
}

/// A rasterized influence field over a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InfluenceField {
    /// The requested region (without buffer).
    pub region: BoundingBox,
    /// Number of cells evaluated.
    pub cell_count: usize,
    /// Number of attractors inside the buffered region.
    pub attractor_count: usize,
    /// Generation of the attractor snapshot the field was computed from.
    pub generation: u64,
    /// Per-cell influence.
    pub cells: BTreeMap<CellId, CellInfluence>,
}

// ---------------------------------------------------------------------------
// Resonance
// ---------------------------------------------------------------------------

/// The inputs that produced a resonance score, kept for audit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResonanceMetadata {
    /// Overall contradiction strength from the summary.
    pub contradiction_strength: f64,
    /// Total attractor influence at the cell centroid.
    pub attractor_influence: f64,
    /// Sum of per-type modifiers applied.
    pub modifiers: f64,
    /// Number of contradictions (evidence count).
    pub contradiction_count: usize,
    /// Generation of the attractor snapshot used.
    pub field_generation: u64,
}

/// Final composite score for one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResonanceResult {
    /// The scored cell.
    pub cell_id: CellId,
    /// Composite score in `[0, 1]`.
    pub score: f64,
    /// Uncertainty width in `[0, 0.4]`; smaller is more confident.
    pub confidence_interval: f64,
    /// Predicted site type.
    pub site_type: SiteType,
    /// Calculation inputs.
    pub metadata: ResonanceMetadata,
}

/// Detector output and score for one cell, as emitted by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellScore {
    /// Cell centroid.
    pub centroid: GeoPoint,
    /// Detected contradictions.
    pub contradictions: ContradictionSummary,
    /// Resonance result.
    pub resonance: ResonanceResult,
}

/// One point of a score heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HeatmapPoint {
    /// The cell.
    pub cell_id: CellId,
    /// Resonance score.
    pub score: f64,
    /// Centroid latitude.
    pub lat: f64,
    /// Centroid longitude.
    pub lng: f64,
    /// Heat weight (the score).
    pub weight: f64,
}
