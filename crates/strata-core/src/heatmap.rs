//! Ranking and heatmap projection of scored cells.

use std::cmp::Ordering;

use serde::Deserialize;

use strata_types::{BoundingBox, CellScore, HeatmapPoint, SiteType};

/// Criteria for selecting scored cells.
///
/// Every criterion left as `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResultFilter {
    /// Minimum score, inclusive.
    pub min_score: Option<f64>,
    /// Required site type.
    pub site_type: Option<SiteType>,
    /// Region the centroid must lie in.
    pub bbox: Option<BoundingBox>,
}

impl ResultFilter {
    /// Whether a scored cell satisfies every criterion.
    pub fn matches(&self, scored: &CellScore) -> bool {
        let r = &scored.resonance;
        self.min_score.is_none_or(|min| r.score >= min)
            && self.site_type.is_none_or(|t| r.site_type == t)
            && self.bbox.is_none_or(|b| b.contains(scored.centroid))
    }
}

fn by_rank(a: &CellScore, b: &CellScore) -> Ordering {
    b.resonance
        .score
        .total_cmp(&a.resonance.score)
        .then_with(|| a.resonance.cell_id.cmp(&b.resonance.cell_id))
}

/// Matching cells, highest score first. Equal scores order by cell id.
pub fn rank<'a>(results: &'a [CellScore], filter: &ResultFilter) -> Vec<&'a CellScore> {
    let mut ranked: Vec<&CellScore> = results.iter().filter(|s| filter.matches(s)).collect();
    ranked.sort_by(|a, b| by_rank(a, b));
    ranked
}

/// Heatmap points for matching cells, in rank order. Weight is the score.
pub fn heatmap(results: &[CellScore], filter: &ResultFilter) -> Vec<HeatmapPoint> {
    rank(results, filter)
        .into_iter()
        .map(|s| HeatmapPoint {
            cell_id: s.resonance.cell_id.clone(),
            score: s.resonance.score,
            lat: s.centroid.lat,
            lng: s.centroid.lon,
            weight: s.resonance.score,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use strata_types::{CellId, ContradictionSummary, GeoPoint, ResonanceMetadata, ResonanceResult};

    use super::*;

    fn scored(id: &str, score: f64, site_type: SiteType, lon: f64, lat: f64) -> CellScore {
        CellScore {
            centroid: GeoPoint::new(lon, lat),
            contradictions: ContradictionSummary::empty(CellId::new(id)),
            resonance: ResonanceResult {
                cell_id: CellId::new(id),
                score,
                confidence_interval: 0.2,
                site_type,
                metadata: ResonanceMetadata::default(),
            },
        }
    }

    fn results() -> Vec<CellScore> {
        vec![
            scored("b", 0.6, SiteType::MinorSettlement, 1.0, 1.0),
            scored("a", 0.6, SiteType::MinorSettlement, 2.0, 2.0),
            scored("c", 0.9, SiteType::Settlement, 5.0, 5.0),
            scored("d", 0.1, SiteType::Unlikely, 0.0, 0.0),
        ]
    }

    fn ids(ranked: &[&CellScore]) -> Vec<String> {
        ranked.iter().map(|s| s.resonance.cell_id.to_string()).collect()
    }

    #[test]
    fn rank_orders_by_score_then_id() {
        let data = results();
        assert_eq!(ids(&rank(&data, &ResultFilter::default())), ["c", "a", "b", "d"]);
    }

    #[test]
    fn filters_combine() {
        let data = results();
        let filter = ResultFilter {
            min_score: Some(0.5),
            site_type: Some(SiteType::MinorSettlement),
            bbox: Some(BoundingBox::new(0.0, 0.0, 1.5, 1.5)),
        };
        assert_eq!(ids(&rank(&data, &filter)), ["b"]);

        let min_only = ResultFilter {
            min_score: Some(0.6),
            ..ResultFilter::default()
        };
        assert_eq!(rank(&data, &min_only).len(), 3);
    }

    #[test]
    fn heatmap_projects_points() {
        let data = results();
        let points = heatmap(&data, &ResultFilter::default());
        assert_eq!(points.len(), 4);
        assert_eq!(points[0].cell_id, CellId::new("c"));
        assert_eq!(points[0].lat, 5.0);
        assert_eq!(points[0].lng, 5.0);
        assert_eq!(points[0].weight, points[0].score);
    }

    #[test]
    fn filter_deserializes_snake_case_site_type() {
        let filter: ResultFilter =
            serde_json::from_str(r#"{ "site_type": "ceremonial_center" }"#).unwrap_or_default();
        assert_eq!(filter.site_type, Some(SiteType::CeremonialCenter));
        assert!(filter.min_score.is_none());
    }
}
