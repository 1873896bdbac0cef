//! Batch scoring over many cells.
//!
//! Every cell in a batch is scored against the same [`FieldSnapshot`], so a
//! batch sees one consistent generation of the attractor field even if the
//! field is changed while the batch runs.

use rayon::prelude::*;
use tracing::{info, warn};

use strata_detect::ContradictionDetector;
use strata_field::FieldSnapshot;
use strata_types::{CellInput, CellScore};

use crate::config::StrataConfig;
use crate::resonance::ResonanceCalculator;

/// Detector and calculator wired together.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    detector: ContradictionDetector,
    calculator: ResonanceCalculator,
}

impl ScoringPipeline {
    /// Create a pipeline from its two stages.
    pub const fn new(detector: ContradictionDetector, calculator: ResonanceCalculator) -> Self {
        Self {
            detector,
            calculator,
        }
    }

    /// Create a pipeline from the loaded configuration.
    pub fn from_config(config: &StrataConfig) -> Self {
        Self::new(
            ContradictionDetector::new(config.detector.clone()),
            ResonanceCalculator::new(config.resonance.clone(), config.classification.clone()),
        )
    }

    /// The contradiction detector.
    pub const fn detector(&self) -> &ContradictionDetector {
        &self.detector
    }

    /// The resonance calculator.
    pub const fn calculator(&self) -> &ResonanceCalculator {
        &self.calculator
    }

    /// Detect contradictions in one cell and score it.
    ///
    /// An incomplete sample yields an empty summary, so the score rests on
    /// attractor influence alone.
    pub fn score_cell(&self, input: &CellInput, snapshot: &FieldSnapshot) -> CellScore {
        let contradictions = self.detector.detect_all(&input.sample);
        let resonance = self
            .calculator
            .score(&contradictions, input.centroid, snapshot);
        CellScore {
            centroid: input.centroid,
            contradictions,
            resonance,
        }
    }

    /// Score every complete cell in parallel.
    ///
    /// Cells missing a required measurement are skipped with a warning.
    /// Output order follows input order.
    pub fn score_batch(&self, inputs: &[CellInput], snapshot: &FieldSnapshot) -> Vec<CellScore> {
        let scores: Vec<CellScore> = inputs
            .par_iter()
            .filter_map(|input| {
                if input.sample.required().is_none() {
                    warn!(
                        cell_id = %input.sample.cell_id,
                        missing = ?input.sample.missing_required(),
                        "incomplete cell record, skipping"
                    );
                    return None;
                }
                Some(self.score_cell(input, snapshot))
            })
            .collect();

        info!(
            cells = inputs.len(),
            scored = scores.len(),
            skipped = inputs.len().saturating_sub(scores.len()),
            generation = snapshot.generation(),
            "batch scored"
        );
        scores
    }
}
