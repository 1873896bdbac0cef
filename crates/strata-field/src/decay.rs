//! Distance decay of attractor influence.
//!
//! Influence falls off linearly from the attractor's full strength at its
//! position to exactly zero at its radius, and is zero beyond it. The hard
//! cutoff gives influence fields sharp edges at each radius; that is the
//! contract downstream scores were calibrated against, so smoother kernels
//! are deliberately not offered.

use strata_types::{Attractor, AttractorContribution, GeoPoint, InfluenceResult, clamp_unit};

/// Linear decay factor in `[0, 1]` at `distance` for an attractor of
/// `radius`, or `None` when the point is out of range.
///
/// A zero radius yields full strength at distance zero only. `NaN`
/// distances are out of range.
pub const fn linear_decay(distance: f64, radius: f64) -> Option<f64> {
    if !(distance <= radius) {
        return None;
    }
    if radius > 0.0 {
        Some(1.0 - distance / radius)
    } else {
        Some(1.0)
    }
}

/// The contribution of one attractor at `point`, if it is within range.
pub fn contribution(attractor: &Attractor, point: GeoPoint) -> Option<AttractorContribution> {
    let distance = attractor.position.distance(point);
    let decay = linear_decay(distance, attractor.influence_radius)?;
    Some(AttractorContribution {
        attractor_id: attractor.id,
        attractor_name: attractor.name.clone(),
        category: attractor.category,
        influence: clamp_unit(attractor.strength * decay),
        distance,
    })
}

/// Sum contributions of `attractors` at `point`, in iteration order.
///
/// The total is capped at 1.0. Callers that pre-filter candidates must
/// preserve collection order so totals stay bit-identical.
pub fn accumulate<'a>(
    attractors: impl IntoIterator<Item = &'a Attractor>,
    point: GeoPoint,
) -> InfluenceResult {
    let mut contributions = Vec::new();
    let mut sum = 0.0_f64;
    for attractor in attractors {
        if let Some(c) = contribution(attractor, point) {
            sum += c.influence;
            contributions.push(c);
        }
    }
    InfluenceResult {
        contributions,
        total: clamp_unit(sum),
    }
}
