//! Symbolic knowledge sources used to seed attractors.
//!
//! Historical accounts and geological surveys arrive as loosely structured
//! records. Each record with coordinates becomes one attractor; records
//! without coordinates cannot be placed and are skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use strata_types::{AttractorCategory, GeoPoint, NewAttractor};

use crate::config::FieldConfig;

/// A reference to a place in a historical or ethnographic account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReference {
    /// Place name.
    pub name: String,
    /// Position as `[lon, lat]`, if the account can be located.
    #[serde(default)]
    pub coordinates: Option<(f64, f64)>,
    /// How trustworthy the account is, in `[0, 1]`.
    #[serde(default)]
    pub reliability: Option<f64>,
    /// How relevant it is to settlement, in `[0, 1]`.
    #[serde(default)]
    pub relevance: Option<f64>,
    /// Influence radius override in degrees.
    #[serde(default)]
    pub influence_radius: Option<f64>,
    /// Citation for the account.
    #[serde(default)]
    pub source: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Year of the account (number or text such as "c. 1542").
    #[serde(default)]
    pub year: Option<Value>,
    /// Symbolic reading of the reference.
    #[serde(default)]
    pub symbolism: Option<String>,
}

/// A surveyed geological or landscape feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeologicalFeature {
    /// Feature name.
    pub name: String,
    /// Position as `[lon, lat]`.
    #[serde(default)]
    pub coordinates: Option<(f64, f64)>,
    /// Importance for settlement, in `[0, 1]`.
    #[serde(default)]
    pub importance: Option<f64>,
    /// How anomalous the feature is relative to its surroundings, in `[0, 1]`.
    #[serde(default)]
    pub anomaly_level: Option<f64>,
    /// Influence radius override in degrees.
    #[serde(default)]
    pub influence_radius: Option<f64>,
    /// Feature classification (e.g. `terra_preta`, `bluff`).
    #[serde(default)]
    pub feature_type: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub description: Option<String>,
    /// Analysis notes.
    #[serde(default)]
    pub analysis: Option<String>,
}

/// A bundle of knowledge records to seed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSource {
    /// Historical references.
    #[serde(default)]
    pub historical_references: Vec<HistoricalReference>,
    /// Geological features.
    #[serde(default)]
    pub geological_features: Vec<GeologicalFeature>,
}

fn text(value: Option<&String>) -> Value {
    value.map_or(Value::Null, |s| Value::String(s.clone()))
}

fn average(a: Option<f64>, b: Option<f64>, fallback: f64) -> f64 {
    (a.unwrap_or(fallback) + b.unwrap_or(fallback)) / 2.0
}

impl HistoricalReference {
    /// The attractor this reference describes, or `None` without coordinates.
    pub fn to_new_attractor(&self, config: &FieldConfig) -> Option<NewAttractor> {
        let coordinates = self.coordinates?;
        Some(NewAttractor {
            name: self.name.clone(),
            category: AttractorCategory::Historical,
            position: GeoPoint::from(coordinates),
            strength: average(self.reliability, self.relevance, config.default_confidence),
            influence_radius: self.influence_radius.unwrap_or(config.historical_radius),
            metadata: BTreeMap::from([
                ("source".to_owned(), text(self.source.as_ref())),
                ("description".to_owned(), text(self.description.as_ref())),
                ("year".to_owned(), self.year.clone().unwrap_or(Value::Null)),
                ("symbolism".to_owned(), text(self.symbolism.as_ref())),
            ]),
        })
    }
}

impl GeologicalFeature {
    /// The attractor this feature describes, or `None` without coordinates.
    pub fn to_new_attractor(&self, config: &FieldConfig) -> Option<NewAttractor> {
        let coordinates = self.coordinates?;
        Some(NewAttractor {
            name: self.name.clone(),
            category: AttractorCategory::Geological,
            position: GeoPoint::from(coordinates),
            strength: average(self.importance, self.anomaly_level, config.default_confidence),
            influence_radius: self.influence_radius.unwrap_or(config.geological_radius),
            metadata: BTreeMap::from([
                ("feature_type".to_owned(), text(self.feature_type.as_ref())),
                ("description".to_owned(), text(self.description.as_ref())),
                ("analysis".to_owned(), text(self.analysis.as_ref())),
            ]),
        })
    }
}
