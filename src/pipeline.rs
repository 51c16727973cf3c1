//! Build orchestration.
//!
//! Stages run once, in order: scan → tracking metadata → index levels →
//! write. Each stage takes the document set from the previous one; nothing
//! is kept between runs and the result database is always rebuilt.

use anyhow::Result;

use crate::classify;
use crate::config::Config;
use crate::materialize;
use crate::models::{DocumentSet, LevelPolicy};
use crate::pdf::LopdfInspector;
use crate::reconcile;
use crate::scanner;
use crate::stats::Summary;
use crate::tracking;
use crate::warnings::Warnings;

/// Full build: prepare the documents and write the viewer database.
pub async fn run_build(config: &Config) -> Result<Summary> {
    let warnings = Warnings::new(config.warnings.clone());
    let documents = prepare(config, &warnings).await?;

    let rows = materialize::materialize(&documents, &config.paths.result_db, &warnings).await?;
    let output_bytes = std::fs::metadata(&config.paths.result_db)
        .map(|m| m.len())
        .ok();

    println!("ok");
    Ok(Summary::collect(&documents, &warnings, Some(rows), output_bytes))
}

/// Everything except writing: useful to check the data and the policy.
pub async fn run_scan(config: &Config) -> Result<Summary> {
    let warnings = Warnings::new(config.warnings.clone());
    let documents = prepare(config, &warnings).await?;
    Ok(Summary::collect(&documents, &warnings, None, None))
}

async fn prepare(config: &Config, warnings: &Warnings) -> Result<DocumentSet> {
    // Level names are checked before anything is read or written.
    let policy = LevelPolicy::from_config(&config.labels)?;

    let mut documents =
        scanner::scan_data_dir(&config.paths.papers_data_dir, &LopdfInspector, warnings)?;

    let records = tracking::load_records(&config.paths.papers_metadata_db).await?;
    reconcile::reconcile(&mut documents, &records)?;
    tracing::debug!(records = records.len(), "reconciled tracking metadata");

    println!("Defining index levels");
    classify::assign_index_levels(&mut documents, &policy);

    Ok(documents)
}
