//! Edge-density heuristic for regular spatial structure.
//!
//! Human-made features (raised fields, causeways, plaza edges) tend to
//! produce sharp, regular transitions in fine-grained vegetation density,
//! while natural variation is smoother. This module counts sharp
//! transitions and flags a cell when they are unusually dense.
//!
//! This is a coarse proxy, not a validated computer-vision detector: it has
//! no notion of orientation, periodicity, or shape, and a noisy matrix will
//! trip it as readily as a grid of earthworks.

use serde::Serialize;

use strata_types::{PatternMatrix, clamp_unit};

use crate::config::DetectorConfig;

/// Label of the only pattern the heuristic currently emits.
pub const GEOMETRIC_GRID: &str = "geometric_grid";

/// One pattern found in a pattern matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricPattern {
    /// Pattern label (e.g. [`GEOMETRIC_GRID`]).
    pub pattern_type: &'static str,
    /// Pattern strength in `[0, 1]`.
    pub strength: f64,
    /// Raw edge density that produced the pattern (may exceed 1).
    pub edge_density: f64,
}

/// Result of running the geometric detector over one matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometricDetection {
    /// Whether any pattern was flagged.
    pub flagged: bool,
    /// Strength of the strongest pattern.
    pub strength: f64,
    /// Every pattern found.
    pub patterns: Vec<GeometricPattern>,
}

/// Count first differences along both axes whose magnitude exceeds
/// `threshold`.
///
/// Differences involving `NaN` never count.
pub fn count_edges(matrix: &PatternMatrix, threshold: f64) -> usize {
    let mut edges: usize = 0;
    let mut previous: Option<&[f64]> = None;

    for row in matrix.row_slices() {
        // Along columns (axis 1): neighbours within the row.
        for pair in row.windows(2) {
            if let [a, b] = pair
                && (b - a).abs() > threshold
            {
                edges = edges.saturating_add(1);
            }
        }
        // Along rows (axis 0): same column in the previous row.
        if let Some(above) = previous {
            for (a, b) in above.iter().zip(row) {
                if (b - a).abs() > threshold {
                    edges = edges.saturating_add(1);
                }
            }
        }
        previous = Some(row);
    }

    edges
}

/// Edge count normalized by total sample count.
///
/// Returns `0.0` for an empty matrix.
#[allow(clippy::cast_precision_loss)]
pub fn edge_density(matrix: &PatternMatrix, threshold: f64) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    count_edges(matrix, threshold) as f64 / matrix.len() as f64
}

/// Run the geometric detector.
///
/// Matrices smaller than `min_matrix_dim` in either dimension are skipped
/// and reported as not flagged.
pub fn detect(matrix: &PatternMatrix, config: &DetectorConfig) -> GeometricDetection {
    if matrix.rows() < config.min_matrix_dim || matrix.cols() < config.min_matrix_dim {
        return GeometricDetection::default();
    }

    let density = edge_density(matrix, config.edge_threshold);
    if density > config.edge_density_threshold {
        let strength = clamp_unit(density);
        GeometricDetection {
            flagged: true,
            strength,
            patterns: vec![GeometricPattern {
                pattern_type: GEOMETRIC_GRID,
                strength,
                edge_density: density,
            }],
        }
    } else {
        GeometricDetection::default()
    }
}
