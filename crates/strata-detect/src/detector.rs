//! Contradiction detection over a single cell's measurements.
//!
//! In undisturbed forest, dense vegetation and tall canopy co-occur, and
//! terrain near water is as likely to be floodplain as bluff. When those
//! signals disagree the disagreement is evidence of human modification:
//! clearing, cultivation, raised platforms, earthworks under regrowth.
//!
//! Each detector is a pure function of its inputs. None of them fail on
//! numeric input: values outside a rule's band (including `NaN`) simply
//! produce an unflagged [`Detection`].

use std::collections::BTreeMap;

use tracing::{debug, warn};

use strata_types::{
    ContradictionKind, ContradictionRecord, ContradictionSummary, EnvironmentalSample,
    PatternMatrix, clamp_unit,
};

use crate::config::DetectorConfig;
use crate::geometric::{self, GeometricDetection};

/// Outcome of a scalar detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Whether the contradiction was flagged.
    pub flagged: bool,
    /// Strength in `[0, 1]`; zero when not flagged.
    pub strength: f64,
}

impl Detection {
    /// The unflagged result.
    pub const NONE: Self = Self {
        flagged: false,
        strength: 0.0,
    };

    const fn hit(strength: f64) -> Self {
        Self {
            flagged: true,
            strength,
        }
    }
}

/// Detector for statistically implausible co-occurrences of environmental
/// signals.
#[derive(Debug, Clone, Default)]
pub struct ContradictionDetector {
    config: DetectorConfig,
}

impl ContradictionDetector {
    /// Create a detector with the given thresholds.
    pub const fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    pub const fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Flag dense vegetation under a short canopy, or sparse vegetation under
    /// a tall one.
    pub fn detect_vegetation_canopy_mismatch(
        &self,
        vegetation_density: f64,
        canopy_height: f64,
    ) -> Detection {
        let c = &self.config;
        let density = vegetation_density.min(1.0);

        if vegetation_density > c.vegetation_high && canopy_height < c.canopy_low {
            Detection::hit(clamp_unit(density * (1.0 - canopy_height / c.canopy_low)))
        } else if vegetation_density < c.vegetation_low && canopy_height > c.canopy_high {
            Detection::hit(clamp_unit((1.0 - density) * (canopy_height / c.canopy_high_scale)))
        } else {
            Detection::NONE
        }
    }

    /// Flag terrain that is near water but elevated and gently sloped.
    ///
    /// Strength is the product of three linear ramps: closer to water,
    /// higher above it (saturating), and flatter all score higher.
    pub fn detect_water_proximity_pattern(
        &self,
        distance_to_water: f64,
        elevation: f64,
        slope: f64,
    ) -> Detection {
        let c = &self.config;
        let in_band = distance_to_water > c.water_min_distance
            && distance_to_water < c.water_max_distance
            && elevation > c.min_elevation
            && slope < c.max_slope;
        if !in_band {
            return Detection::NONE;
        }

        let proximity_factor = 1.0 - distance_to_water / c.water_max_distance;
        let elevation_factor = (elevation / c.elevation_scale).min(1.0);
        let slope_factor = 1.0 - slope / c.max_slope;
        Detection::hit(clamp_unit(proximity_factor * elevation_factor * slope_factor))
    }

    /// Run the edge-density heuristic over a pattern matrix.
    ///
    /// See [`geometric`] for the caveats of this heuristic.
    pub fn detect_geometric_pattern(&self, matrix: &PatternMatrix) -> GeometricDetection {
        geometric::detect(matrix, &self.config)
    }

    /// Run every detector over a sample.
    ///
    /// If any required measurement is missing or non-finite the summary is
    /// empty and a data-quality warning is logged; there is no partial
    /// evaluation. The geometric detector runs only when a pattern matrix is
    /// present. Overall strength is the maximum record strength.
    pub fn detect_all(&self, sample: &EnvironmentalSample) -> ContradictionSummary {
        let Some(m) = sample.required() else {
            warn!(
                cell_id = %sample.cell_id,
                missing = ?sample.missing_required(),
                "missing required measurements, skipping contradiction detection"
            );
            return ContradictionSummary::empty(sample.cell_id.clone());
        };

        let mut records = Vec::new();

        let mismatch = self.detect_vegetation_canopy_mismatch(m.ndvi_mean, m.canopy_height_mean);
        if mismatch.flagged {
            records.push(ContradictionRecord {
                kind: ContradictionKind::VegetationCanopy,
                strength: mismatch.strength,
                description: "Vegetation density disagrees with canopy height".to_owned(),
                pattern_type: None,
                metadata: BTreeMap::new(),
            });
        }

        let water =
            self.detect_water_proximity_pattern(m.water_proximity, m.elevation_mean, m.slope_mean);
        if water.flagged {
            records.push(ContradictionRecord {
                kind: ContradictionKind::WaterProximity,
                strength: water.strength,
                description: "Near water yet above flood level on gentle terrain".to_owned(),
                pattern_type: None,
                metadata: BTreeMap::new(),
            });
        }

        if let Some(matrix) = &sample.pattern_matrix {
            let geometric = self.detect_geometric_pattern(matrix);
            for pattern in geometric.patterns {
                records.push(ContradictionRecord {
                    kind: ContradictionKind::GeometricPattern,
                    strength: pattern.strength,
                    description: "Regular edge structure unlike natural vegetation variation"
                        .to_owned(),
                    pattern_type: Some(pattern.pattern_type.to_owned()),
                    metadata: BTreeMap::from([("edge_density".to_owned(), pattern.edge_density)]),
                });
            }
        }

        let summary = ContradictionSummary::from_records(sample.cell_id.clone(), records);
        debug!(
            cell_id = %summary.cell_id,
            count = summary.count(),
            overall_strength = summary.overall_strength,
            "contradiction detection complete"
        );
        summary
    }
}
