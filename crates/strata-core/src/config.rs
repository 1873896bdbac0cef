//! Configuration loading and typed config structures for Strata.
//!
//! The canonical configuration lives in `strata-config.yaml` at the project
//! root. Every section and every field is optional; omitted values take the
//! calibrated defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use strata_detect::DetectorConfig;
use strata_field::FieldConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of its allowed range.
    #[error("invalid config value for {key}: {reason}")]
    Invalid {
        /// Dotted path of the offending key.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Strata configuration.
///
/// Mirrors the structure of `strata-config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StrataConfig {
    /// Contradiction detector thresholds.
    #[serde(default)]
    pub detector: DetectorConfig,

    /// Attractor field and seeding settings.
    #[serde(default)]
    pub field: FieldConfig,

    /// Resonance weights, modifiers, and interval constants.
    #[serde(default)]
    pub resonance: ResonanceConfig,

    /// Site-type classification bands.
    #[serde(default)]
    pub classification: ClassificationConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Input file locations for the batch engine.
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Where the batch engine writes scored cells.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl StrataConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for file locations:
    /// - `STRATA_ATTRACTORS` overrides `inputs.attractors`
    /// - `STRATA_KNOWLEDGE` overrides `inputs.knowledge`
    /// - `STRATA_CELLS` overrides `inputs.cells`
    /// - `STRATA_OUTPUT` overrides `output_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Environment variables are not consulted; see [`Self::from_file`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Override file locations with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("STRATA_ATTRACTORS") {
            self.inputs.attractors = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("STRATA_KNOWLEDGE") {
            self.inputs.knowledge = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("STRATA_CELLS") {
            self.inputs.cells = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("STRATA_OUTPUT") {
            self.output_path = PathBuf::from(val);
        }
    }

    /// Check every range constraint across sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(key) = self.detector.invalid_key() {
            return Err(ConfigError::Invalid {
                key,
                reason: "must be a positive finite number",
            });
        }

        let f = &self.field;
        for (key, value) in [
            ("field.historical_radius", f.historical_radius),
            ("field.geological_radius", f.geological_radius),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be a non-negative finite number",
                });
            }
        }

        let r = &self.resonance;
        for (key, value) in [
            ("field.default_confidence", f.default_confidence),
            ("resonance.contradiction_weight", r.contradiction_weight),
            ("resonance.attractor_weight", r.attractor_weight),
            ("resonance.geometric_modifier", r.geometric_modifier),
            ("resonance.water_modifier", r.water_modifier),
            ("resonance.vegetation_modifier", r.vegetation_modifier),
            ("resonance.interval_base", r.interval_base),
            ("resonance.evidence_cap", r.evidence_cap),
            ("resonance.interval_strength_weight", r.interval_strength_weight),
            ("resonance.interval_influence_weight", r.interval_influence_weight),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be within [0, 1]",
                });
            }
        }
        if !(r.evidence_divisor.is_finite() && r.evidence_divisor > 0.0) {
            return Err(ConfigError::Invalid {
                key: "resonance.evidence_divisor",
                reason: "must be a positive finite number",
            });
        }

        self.classification.validate()
    }
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            field: FieldConfig::default(),
            resonance: ResonanceConfig::default(),
            classification: ClassificationConfig::default(),
            logging: LoggingConfig::default(),
            inputs: InputsConfig::default(),
            output_path: default_output_path(),
        }
    }
}

/// Weights and constants of the resonance calculation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResonanceConfig {
    /// Weight of the overall contradiction strength (default: 0.7).
    pub contradiction_weight: f64,
    /// Weight of the attractor influence (default: 0.3).
    pub attractor_weight: f64,
    /// Bonus when a geometric pattern is present (default: 0.15).
    pub geometric_modifier: f64,
    /// Bonus when a water-proximity pattern is present (default: 0.10).
    pub water_modifier: f64,
    /// Bonus when a vegetation-canopy mismatch is present (default: 0).
    pub vegetation_modifier: f64,
    /// Widest possible confidence interval (default: 0.4).
    pub interval_base: f64,
    /// Contradiction count at which evidence counts fully (default: 10).
    pub evidence_divisor: f64,
    /// Cap on the evidence narrowing factor (default: 0.8).
    pub evidence_cap: f64,
    /// How much contradiction strength narrows the interval (default: 0.3).
    pub interval_strength_weight: f64,
    /// How much attractor influence narrows the interval (default: 0.2).
    pub interval_influence_weight: f64,
}

impl Default for ResonanceConfig {
    fn default() -> Self {
        Self {
            contradiction_weight: 0.7,
            attractor_weight: 0.3,
            geometric_modifier: 0.15,
            water_modifier: 0.10,
            vegetation_modifier: 0.0,
            interval_base: 0.4,
            evidence_divisor: 10.0,
            evidence_cap: 0.8,
            interval_strength_weight: 0.3,
            interval_influence_weight: 0.2,
        }
    }
}

/// Score bands and strength thresholds for site-type classification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Scores below this are `unlikely` (default: 0.3).
    pub unlikely_below: f64,
    /// Geometric strength above which a cell is a `settlement` (default: 0.7).
    pub settlement_geometric_strength: f64,
    /// Water-proximity strength above which a cell is a `ceremonial_center`
    /// (default: 0.8).
    pub ceremonial_water_strength: f64,
    /// Minimum score of a `major_settlement` (default: 0.7).
    pub major_settlement_min: f64,
    /// Minimum score of a `minor_settlement` (default: 0.5).
    pub minor_settlement_min: f64,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            unlikely_below: 0.3,
            settlement_geometric_strength: 0.7,
            ceremonial_water_strength: 0.8,
            major_settlement_min: 0.7,
            minor_settlement_min: 0.5,
        }
    }
}

impl ClassificationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("classification.unlikely_below", self.unlikely_below),
            (
                "classification.settlement_geometric_strength",
                self.settlement_geometric_strength,
            ),
            (
                "classification.ceremonial_water_strength",
                self.ceremonial_water_strength,
            ),
            ("classification.major_settlement_min", self.major_settlement_min),
            ("classification.minor_settlement_min", self.minor_settlement_min),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    key,
                    reason: "must be within [0, 1]",
                });
            }
        }
        if self.unlikely_below > self.minor_settlement_min {
            return Err(ConfigError::Invalid {
                key: "classification.unlikely_below",
                reason: "must not exceed minor_settlement_min",
            });
        }
        if self.minor_settlement_min > self.major_settlement_min {
            return Err(ConfigError::Invalid {
                key: "classification.minor_settlement_min",
                reason: "must not exceed major_settlement_min",
            });
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Input file locations for the batch engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputsConfig {
    /// JSON array of stored attractors.
    #[serde(default = "default_attractors_path")]
    pub attractors: PathBuf,

    /// Optional JSON knowledge source to seed symbolic attractors from.
    #[serde(default)]
    pub knowledge: Option<PathBuf>,

    /// JSON array of cell inputs to score.
    #[serde(default = "default_cells_path")]
    pub cells: PathBuf,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            attractors: default_attractors_path(),
            knowledge: None,
            cells: default_cells_path(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_attractors_path() -> PathBuf {
    PathBuf::from("data/attractors.json")
}

fn default_cells_path() -> PathBuf {
    PathBuf::from("data/cells.json")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("data/resonance.json")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = StrataConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resonance.contradiction_weight, 0.7);
        assert_eq!(config.classification.minor_settlement_min, 0.5);
        assert_eq!(config.field.index_threshold, 256);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_yaml_uses_defaults() {
        let config: StrataConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config.detector, DetectorConfig::default());
        assert_eq!(config.output_path, PathBuf::from("data/resonance.json"));
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
detector:
  vegetation_high: 0.75
field:
  index_threshold: 64
resonance:
  geometric_modifier: 0.2
classification:
  major_settlement_min: 0.8
logging:
  level: debug
";
        let config: StrataConfig = serde_yml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.detector.vegetation_high, 0.75);
        assert_eq!(config.detector.canopy_low, 10.0);
        assert_eq!(config.field.index_threshold, 64);
        assert_eq!(config.field.historical_radius, 0.1);
        assert_eq!(config.resonance.geometric_modifier, 0.2);
        assert_eq!(config.resonance.water_modifier, 0.10);
        assert_eq!(config.classification.major_settlement_min, 0.8);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn parse_input_paths() {
        let yaml = r"
inputs:
  attractors: /srv/strata/attractors.json
  knowledge: /srv/strata/knowledge.json
output_path: /srv/strata/out.json
";
        let config: StrataConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.inputs.attractors, PathBuf::from("/srv/strata/attractors.json"));
        assert_eq!(
            config.inputs.knowledge,
            Some(PathBuf::from("/srv/strata/knowledge.json"))
        );
        assert_eq!(config.inputs.cells, PathBuf::from("data/cells.json"));
        assert_eq!(config.output_path, PathBuf::from("/srv/strata/out.json"));
    }

    #[test]
    fn parse_reads_paths_from_yaml_only() {
        let yaml = "inputs:\n  cells: /srv/strata/cells.json\noutput_path: /srv/strata/out.json\n";
        let config = StrataConfig::parse(yaml).unwrap();
        assert_eq!(config.inputs.cells, PathBuf::from("/srv/strata/cells.json"));
        assert_eq!(config.inputs.attractors, PathBuf::from("data/attractors.json"));
        assert_eq!(config.inputs.knowledge, None);
        assert_eq!(config.output_path, PathBuf::from("/srv/strata/out.json"));
    }

    #[test]
    fn weight_out_of_range_is_rejected() {
        let config = StrataConfig {
            resonance: ResonanceConfig {
                attractor_weight: 1.2,
                ..ResonanceConfig::default()
            },
            ..StrataConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "resonance.attractor_weight", .. })
        ));
    }

    #[test]
    fn non_positive_divisor_is_rejected() {
        let config = StrataConfig {
            detector: DetectorConfig {
                water_max_distance: 0.0,
                ..DetectorConfig::default()
            },
            ..StrataConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "detector.water_max_distance", .. })
        ));

        let config = StrataConfig {
            resonance: ResonanceConfig {
                evidence_divisor: 0.0,
                ..ResonanceConfig::default()
            },
            ..StrataConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bands_out_of_order_are_rejected() {
        let config = StrataConfig {
            classification: ClassificationConfig {
                minor_settlement_min: 0.75,
                ..ClassificationConfig::default()
            },
            ..StrataConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "classification.minor_settlement_min", .. })
        ));
    }

    #[test]
    fn invalid_yaml_is_a_yaml_error() {
        let result = StrataConfig::parse("detector: [1, 2");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = StrataConfig::from_file(Path::new("/nonexistent/strata-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
