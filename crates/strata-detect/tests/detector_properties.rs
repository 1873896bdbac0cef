//! Property tests for the contradiction detectors.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use proptest::prelude::*;
use strata_detect::ContradictionDetector;
use strata_types::{EnvironmentalSample, PatternMatrix};

fn arb_matrix() -> impl Strategy<Value = PatternMatrix> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(-1.0f64..1.0, cols), rows)
            .prop_map(|rows| PatternMatrix::from_rows(rows).unwrap())
    })
}

fn arb_sample() -> impl Strategy<Value = EnvironmentalSample> {
    (
        -1.0f64..1.5,
        -5.0f64..60.0,
        -100.0f64..1000.0,
        -10.0f64..200.0,
        -5.0f64..45.0,
        prop::option::of(arb_matrix()),
    )
        .prop_map(|(ndvi, canopy, water, elevation, slope, matrix)| EnvironmentalSample {
            ndvi_mean: Some(ndvi),
            canopy_height_mean: Some(canopy),
            water_proximity: Some(water),
            elevation_mean: Some(elevation),
            slope_mean: Some(slope),
            pattern_matrix: matrix,
            ..EnvironmentalSample::new("prop")
        })
}

proptest! {
    #[test]
    fn strengths_stay_in_unit_range(sample in arb_sample()) {
        let summary = ContradictionDetector::default().detect_all(&sample);
        prop_assert!((0.0..=1.0).contains(&summary.overall_strength));
        for record in &summary.contradictions {
            prop_assert!((0.0..=1.0).contains(&record.strength));
        }
    }

    #[test]
    fn overall_strength_is_max_of_records(sample in arb_sample()) {
        let summary = ContradictionDetector::default().detect_all(&sample);
        let max = summary
            .contradictions
            .iter()
            .map(|c| c.strength)
            .fold(0.0_f64, f64::max);
        prop_assert!((summary.overall_strength - max).abs() < f64::EPSILON);
    }

    #[test]
    fn detect_all_is_deterministic(sample in arb_sample()) {
        let detector = ContradictionDetector::default();
        prop_assert_eq!(detector.detect_all(&sample), detector.detect_all(&sample));
    }

    #[test]
    fn matrices_below_three_rows_never_flag(
        cols in 1usize..10,
        values in prop::collection::vec(0.0f64..1.0, 20),
    ) {
        let row: Vec<f64> = values.iter().copied().cycle().take(cols).collect();
        let matrix = PatternMatrix::from_rows(vec![row.clone(), row]).unwrap();
        let result = ContradictionDetector::default().detect_geometric_pattern(&matrix);
        prop_assert!(!result.flagged);
    }
}
