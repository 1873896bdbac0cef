//! Batch scoring binary for the Strata site-resonance pipeline.
//!
//! Loads configuration, builds the attractor field from its JSON store,
//! optionally seeds symbolic attractors from a knowledge source, scores
//! every cell input in parallel against one field snapshot, and writes the
//! scored cells as JSON.
//!
//! # Run Sequence
//!
//! 1. Load configuration from `strata-config.yaml` (or `STRATA_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the attractor field from `inputs.attractors`
//! 4. Seed symbolic attractors from `inputs.knowledge`, if set
//! 5. Freeze a field snapshot
//! 6. Read and score `inputs.cells`
//! 7. Write results to `output_path`

mod error;
mod files;

use std::collections::BTreeMap;
use std::path::PathBuf;

use strata_core::{ResultFilter, ScoringPipeline, StrataConfig, rank};
use strata_field::{AttractorField, KnowledgeSource};
use strata_types::{CellInput, SiteType};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::files::JsonFileRepository;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "strata-config.yaml";

/// Application entry point for the batch engine.
///
/// # Errors
///
/// Returns an error if configuration, any input file, or the output file
/// cannot be handled.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration; logging depends on it.
    let (config_path, config, from_file) = load_config()?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        config = %config_path.display(),
        from_file,
        "strata-engine starting"
    );

    run(&config)?;
    Ok(())
}

fn run(config: &StrataConfig) -> Result<(), EngineError> {
    // 3. Attractor field.
    let repository = JsonFileRepository::open(&config.inputs.attractors)?;
    let mut field = AttractorField::from_repository(&repository, config.field.clone())?;

    // 4. Symbolic seeding.
    if let Some(path) = &config.inputs.knowledge {
        let source: KnowledgeSource = files::read_json(path)?;
        let seeded = field.seed_symbolic_attractors(&source);
        info!(
            path = %path.display(),
            seeded = seeded.len(),
            "knowledge source applied"
        );
    }

    // 5. Snapshot.
    let snapshot = field.snapshot();
    info!(
        attractors = snapshot.len(),
        generation = snapshot.generation(),
        indexed = snapshot.is_indexed(),
        loaded_at = %snapshot.loaded_at(),
        "field snapshot taken"
    );

    // 6. Score.
    let cells: Vec<CellInput> = files::read_json(&config.inputs.cells)?;
    info!(path = %config.inputs.cells.display(), cells = cells.len(), "cell inputs loaded");

    let pipeline = ScoringPipeline::from_config(config);
    let results = pipeline.score_batch(&cells, &snapshot);

    let mut by_type: BTreeMap<SiteType, usize> = BTreeMap::new();
    for scored in &results {
        let count = by_type.entry(scored.resonance.site_type).or_default();
        *count = count.saturating_add(1);
    }
    for (site_type, count) in &by_type {
        info!(site_type = %site_type, count, "site type tally");
    }
    if let Some(top) = rank(&results, &ResultFilter::default()).first() {
        info!(
            cell_id = %top.resonance.cell_id,
            score = top.resonance.score,
            site_type = %top.resonance.site_type,
            "highest resonance"
        );
    }

    // 7. Write.
    files::write_json(&config.output_path, &results)?;
    info!(
        path = %config.output_path.display(),
        scored = results.len(),
        "results written"
    );
    Ok(())
}

/// Resolve and load the configuration file.
///
/// `STRATA_CONFIG` overrides the default path. A missing file means
/// defaults; env overrides and validation apply either way.
fn load_config() -> Result<(PathBuf, StrataConfig, bool), EngineError> {
    let path = std::env::var("STRATA_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = StrataConfig::from_file(&path)?;
        Ok((path, config, true))
    } else {
        let mut config = StrataConfig::parse("")?;
        config.apply_env_overrides();
        Ok((path, config, false))
    }
}
