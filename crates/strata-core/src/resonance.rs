//! Resonance scoring.
//!
//! A cell's resonance combines two independent lines of evidence: how
//! strongly its own measurements contradict natural expectations, and how
//! much prior knowledge points at its location. The result is a score, an
//! uncertainty width, and a predicted site type.

use tracing::debug;

use strata_field::FieldSnapshot;
use strata_types::{
    ContradictionKind, ContradictionSummary, GeoPoint, ResonanceMetadata, ResonanceResult,
    SiteType, clamp_unit,
};

use crate::config::{ClassificationConfig, ResonanceConfig};

/// Combines contradiction summaries with attractor influence.
#[derive(Debug, Clone, Default)]
pub struct ResonanceCalculator {
    resonance: ResonanceConfig,
    classification: ClassificationConfig,
}

impl ResonanceCalculator {
    /// Create a calculator with the given weights and bands.
    pub const fn new(resonance: ResonanceConfig, classification: ClassificationConfig) -> Self {
        Self {
            resonance,
            classification,
        }
    }

    /// Weights and constants in use.
    pub const fn resonance_config(&self) -> &ResonanceConfig {
        &self.resonance
    }

    /// Classification bands in use.
    pub const fn classification_config(&self) -> &ClassificationConfig {
        &self.classification
    }

    /// Score one cell against a field snapshot.
    ///
    /// `position` is the cell centroid. The score is clamped into `[0, 1]`
    /// and the confidence interval into `[0, interval_base]`.
    pub fn score(
        &self,
        summary: &ContradictionSummary,
        position: GeoPoint,
        snapshot: &FieldSnapshot,
    ) -> ResonanceResult {
        let r = &self.resonance;
        let strength = clamp_unit(summary.overall_strength);
        let influence = snapshot.influence_at(position).total;

        let base = strength * r.contradiction_weight + influence * r.attractor_weight;
        let modifiers = self.modifiers(summary);
        let score = clamp_unit(base + modifiers);
        let confidence_interval = self.confidence_interval(summary.count(), strength, influence);
        let site_type = self.classify(score, summary);

        debug!(
            cell_id = %summary.cell_id,
            score,
            confidence_interval,
            site_type = %site_type,
            generation = snapshot.generation(),
            "cell scored"
        );

        ResonanceResult {
            cell_id: summary.cell_id.clone(),
            score,
            confidence_interval,
            site_type,
            metadata: ResonanceMetadata {
                contradiction_strength: strength,
                attractor_influence: influence,
                modifiers,
                contradiction_count: summary.count(),
                field_generation: snapshot.generation(),
            },
        }
    }

    /// Sum of modifiers, one per contradiction kind present.
    ///
    /// A kind contributes once no matter how many records carry it.
    pub fn modifiers(&self, summary: &ContradictionSummary) -> f64 {
        let r = &self.resonance;
        [
            (ContradictionKind::GeometricPattern, r.geometric_modifier),
            (ContradictionKind::WaterProximity, r.water_modifier),
            (ContradictionKind::VegetationCanopy, r.vegetation_modifier),
        ]
        .into_iter()
        .filter(|(kind, _)| summary.has_kind(*kind))
        .map(|(_, modifier)| modifier)
        .sum()
    }

    /// Uncertainty width; narrows with more evidence and stronger signals.
    #[allow(clippy::cast_precision_loss)]
    pub fn confidence_interval(&self, count: usize, strength: f64, influence: f64) -> f64 {
        let r = &self.resonance;
        let evidence = (count as f64 / r.evidence_divisor).min(r.evidence_cap);
        let signal = strength * r.interval_strength_weight + influence * r.interval_influence_weight;
        let width = r.interval_base * (1.0 - evidence) * (1.0 - signal);
        if width.is_nan() {
            r.interval_base
        } else {
            width.max(0.0).min(r.interval_base)
        }
    }

    /// Predict a site type. Rules are checked in order; the first match wins.
    ///
    /// A strong geometric pattern outranks a strong water-proximity pattern
    /// whatever order the records appear in.
    pub fn classify(&self, score: f64, summary: &ContradictionSummary) -> SiteType {
        let c = &self.classification;
        let strongest = |kind: ContradictionKind, above: f64| {
            summary
                .contradictions
                .iter()
                .any(|record| record.kind == kind && record.strength > above)
        };

        if score < c.unlikely_below {
            SiteType::Unlikely
        } else if strongest(ContradictionKind::GeometricPattern, c.settlement_geometric_strength) {
            SiteType::Settlement
        } else if strongest(ContradictionKind::WaterProximity, c.ceremonial_water_strength) {
            SiteType::CeremonialCenter
        } else if score >= c.major_settlement_min {
            SiteType::MajorSettlement
        } else if score >= c.minor_settlement_min {
            SiteType::MinorSettlement
        } else {
            SiteType::PotentialSite
        }
    }
}
