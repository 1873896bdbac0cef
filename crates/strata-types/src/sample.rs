//! Per-cell environmental input records.
//!
//! An [`EnvironmentalSample`] is produced by the environmental-data layer
//! (outside this workspace) and handed to the detector unchanged. Every
//! measurement is optional because upstream extraction can fail per band;
//! the detector decides what is required.

use serde::{Deserialize, Serialize};

use crate::geometry::GeoPoint;
use crate::ids::CellId;

// ---------------------------------------------------------------------------
// Pattern matrix
// ---------------------------------------------------------------------------

/// Error raised when nested rows do not form a rectangle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pattern matrix row {row} has {found} columns, expected {expected}")]
pub struct RaggedMatrixError {
    /// Index of the first offending row.
    pub row: usize,
    /// Column count of the first row.
    pub expected: usize,
    /// Column count of the offending row.
    pub found: usize,
}

/// A rectangular grid of fine-grained vegetation density samples covering a
/// single cell footprint, stored row-major.
///
/// Deserializes from (and serializes to) nested rows. Ragged input is
/// rejected at the boundary so downstream code can rely on the shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PatternMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl PatternMatrix {
    /// Build a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`RaggedMatrixError`] if any row length differs from the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, RaggedMatrixError> {
        let cols = rows.first().map_or(0, Vec::len);
        let row_count = rows.len();
        let mut values = Vec::with_capacity(row_count.saturating_mul(cols));
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(RaggedMatrixError {
                    row: index,
                    expected: cols,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Self {
            rows: if cols == 0 { 0 } else { row_count },
            cols,
            values,
        })
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of samples (`rows * cols`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix holds no samples.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let index = row.checked_mul(self.cols)?.checked_add(col)?;
        self.values.get(index).copied()
    }

    /// Iterate over rows as slices.
    pub fn row_slices(&self) -> impl Iterator<Item = &[f64]> {
        // `chunks_exact` panics on zero; an empty matrix has no rows anyway.
        self.values.chunks_exact(self.cols.max(1))
    }
}

impl TryFrom<Vec<Vec<f64>>> for PatternMatrix {
    type Error = RaggedMatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<PatternMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PatternMatrix) -> Self {
        matrix.row_slices().map(<[f64]>::to_vec).collect()
    }
}

// ---------------------------------------------------------------------------
// Environmental sample
// ---------------------------------------------------------------------------

/// Environmental measurements aggregated over one grid cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalSample {
    /// The cell these measurements describe.
    pub cell_id: CellId,
    /// Mean vegetation density (NDVI) over the cell.
    #[serde(default)]
    pub ndvi_mean: Option<f64>,
    /// Standard deviation of vegetation density over the cell.
    #[serde(default)]
    pub ndvi_std: Option<f64>,
    /// Mean canopy height in metres.
    #[serde(default)]
    pub canopy_height_mean: Option<f64>,
    /// Standard deviation of canopy height in metres.
    #[serde(default)]
    pub canopy_height_std: Option<f64>,
    /// Mean terrain elevation in metres.
    #[serde(default)]
    pub elevation_mean: Option<f64>,
    /// Standard deviation of terrain elevation in metres.
    #[serde(default)]
    pub elevation_std: Option<f64>,
    /// Mean terrain slope in degrees.
    #[serde(default)]
    pub slope_mean: Option<f64>,
    /// Standard deviation of terrain slope in degrees.
    #[serde(default)]
    pub slope_std: Option<f64>,
    /// Distance to the nearest permanent water body, in metres.
    #[serde(default)]
    pub water_proximity: Option<f64>,
    /// Optional fine-grained vegetation density grid for the cell footprint.
    #[serde(default)]
    pub pattern_matrix: Option<PatternMatrix>,
}

/// The five measurements contradiction detection cannot run without.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequiredMeasurements {
    /// Mean vegetation density.
    pub ndvi_mean: f64,
    /// Mean canopy height.
    pub canopy_height_mean: f64,
    /// Distance to water.
    pub water_proximity: f64,
    /// Mean elevation.
    pub elevation_mean: f64,
    /// Mean slope.
    pub slope_mean: f64,
}

impl EnvironmentalSample {
    /// Create a sample for a cell with no measurements filled in.
    pub fn new(cell_id: impl Into<CellId>) -> Self {
        Self {
            cell_id: cell_id.into(),
            ..Self::default()
        }
    }

    /// Names of required measurements that are absent or non-finite.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("ndvi_mean", self.ndvi_mean),
            ("canopy_height_mean", self.canopy_height_mean),
            ("water_proximity", self.water_proximity),
            ("elevation_mean", self.elevation_mean),
            ("slope_mean", self.slope_mean),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_some_and(f64::is_finite))
        .map(|(name, _)| name)
        .collect()
    }

    /// The required measurements, if all are present and finite.
    pub fn required(&self) -> Option<RequiredMeasurements> {
        Some(RequiredMeasurements {
            ndvi_mean: self.ndvi_mean.filter(|v| v.is_finite())?,
            canopy_height_mean: self.canopy_height_mean.filter(|v| v.is_finite())?,
            water_proximity: self.water_proximity.filter(|v| v.is_finite())?,
            elevation_mean: self.elevation_mean.filter(|v| v.is_finite())?,
            slope_mean: self.slope_mean.filter(|v| v.is_finite())?,
        })
    }
}

/// One unit of work for the scoring pipeline: a sample plus the cell centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInput {
    /// Environmental measurements for the cell.
    #[serde(flatten)]
    pub sample: EnvironmentalSample,
    /// Centroid of the cell footprint.
    pub centroid: GeoPoint,
}
