//! Sparse hash grid over attractor positions.
//!
//! The grid cell size is chosen just above the largest influence radius, so
//! any attractor that can reach a point sits in the point's cell or one of
//! its eight neighbours. Queries return candidate indices into the snapshot's
//! attractor list sorted ascending, which keeps summation order identical to
//! a linear scan.

use ahash::AHashMap;

use strata_types::{Attractor, GeoPoint};

/// Cell size multiplier over the largest radius; absorbs rounding at cell
/// boundaries.
const CELL_PADDING: f64 = 1.000_001;

/// Sparse grid mapping cell coordinates to attractor indices.
#[derive(Debug, Clone)]
pub struct SparseGrid {
    cell_size: f64,
    cells: AHashMap<(i64, i64), Vec<usize>>,
}

impl SparseGrid {
    /// Build a grid over `attractors`.
    ///
    /// Returns `None` when no attractor has a positive finite radius, since
    /// a grid cannot be sized; callers fall back to a linear scan.
    pub fn build(attractors: &[Attractor]) -> Option<Self> {
        let max_radius = attractors
            .iter()
            .map(|a| a.influence_radius)
            .fold(0.0_f64, f64::max);
        if !(max_radius.is_finite() && max_radius > 0.0) {
            return None;
        }

        let mut grid = Self {
            cell_size: max_radius * CELL_PADDING,
            cells: AHashMap::new(),
        };
        for (index, attractor) in attractors.iter().enumerate() {
            let coord = grid.cell_coord(attractor.position);
            grid.cells.entry(coord).or_default().push(index);
        }
        Some(grid)
    }

    /// Side length of one grid cell.
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn cell_coord(&self, pos: GeoPoint) -> (i64, i64) {
        (
            (pos.lon / self.cell_size).floor() as i64,
            (pos.lat / self.cell_size).floor() as i64,
        )
    }

    /// Indices of attractors in the 3x3 neighbourhood of `point`, ascending.
    pub fn candidates(&self, point: GeoPoint) -> Vec<usize> {
        let (cx, cy) = self.cell_coord(point);
        let mut found: Vec<usize> = (-1_i64..=1)
            .flat_map(|dx| (-1_i64..=1).map(move |dy| (dx, dy)))
            .filter_map(|(dx, dy)| {
                self.cells
                    .get(&(cx.saturating_add(dx), cy.saturating_add(dy)))
            })
            .flatten()
            .copied()
            .collect();
        found.sort_unstable();
        found
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use strata_types::{AttractorCategory, AttractorId};

    use super::*;

    fn attractor(lon: f64, lat: f64, radius: f64) -> Attractor {
        Attractor {
            id: AttractorId::new(),
            name: "grid".to_owned(),
            category: AttractorCategory::Geological,
            strength: 0.5,
            influence_radius: radius,
            position: GeoPoint::new(lon, lat),
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn zero_radius_collection_has_no_grid() {
        assert!(SparseGrid::build(&[attractor(0.0, 0.0, 0.0)]).is_none());
        assert!(SparseGrid::build(&[]).is_none());
    }

    #[test]
    fn cell_size_exceeds_max_radius() {
        let grid = SparseGrid::build(&[attractor(0.0, 0.0, 0.1), attractor(1.0, 1.0, 0.3)]);
        let size = grid.map(|g| g.cell_size()).unwrap_or_default();
        assert!(size > 0.3);
    }

    #[test]
    fn candidates_include_neighbours_and_are_sorted() {
        let attractors = vec![
            attractor(0.95, 0.0, 1.0),
            attractor(-0.95, 0.0, 1.0),
            attractor(10.0, 10.0, 1.0),
            attractor(0.0, 0.5, 1.0),
        ];
        let Some(grid) = SparseGrid::build(&attractors) else {
            return;
        };
        assert_eq!(grid.candidates(GeoPoint::new(0.0, 0.0)), vec![0, 1, 3]);
    }

    #[test]
    fn far_point_has_no_candidates() {
        let Some(grid) = SparseGrid::build(&[attractor(0.0, 0.0, 0.1)]) else {
            return;
        };
        assert!(grid.candidates(GeoPoint::new(5.0, 5.0)).is_empty());
    }
}
