//! End-of-run summary.
//!
//! Counts documents per index level, rows written and warnings raised, so
//! a build can be checked at a glance (or from a script with `--json`).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::materialize::MaterializeStats;
use crate::models::{DocumentSet, IndexLevel};
use crate::warnings::{WarningKind, Warnings};

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub documents: u64,
    /// Directories without a dated name.
    pub inert: u64,
    pub by_level: BTreeMap<IndexLevel, u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<MaterializeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_bytes: Option<u64>,
    pub warnings: BTreeMap<WarningKind, u64>,
}

impl Summary {
    pub fn collect(
        documents: &DocumentSet,
        warnings: &Warnings,
        rows: Option<MaterializeStats>,
        output_bytes: Option<u64>,
    ) -> Self {
        let mut by_level: BTreeMap<IndexLevel, u64> =
            IndexLevel::ALL.iter().map(|level| (*level, 0)).collect();
        let mut inert = 0;
        for doc in documents.values() {
            if doc.inert {
                inert += 1;
            } else {
                *by_level.entry(doc.index_level).or_insert(0) += 1;
            }
        }

        Self {
            documents: documents.len() as u64 - inert,
            inert,
            by_level,
            rows,
            output_bytes,
            warnings: warnings.counts(),
        }
    }

    pub fn print(&self) {
        println!();
        println!("Summary");
        println!("=======");
        println!("  Documents:   {}", self.documents);
        if self.inert > 0 {
            println!("  Skipped dirs: {}", self.inert);
        }
        for (level, count) in &self.by_level {
            println!("    {:<10} {:>6}", level.as_str(), count);
        }

        if let Some(rows) = &self.rows {
            println!();
            println!("  Rows written:");
            println!("    {:<14} {:>6}", "Document", rows.documents);
            println!("    {:<14} {:>6}", "Part", rows.parts);
            println!("    {:<14} {:>6}", "Label", rows.labels);
            println!("    {:<14} {:>6}", "DocumentFts", rows.fts_entries);
            println!("    {:<14} {:>6}", "DocumentText", rows.content_rows);
        }

        if let Some(bytes) = self.output_bytes {
            println!();
            println!("  Size:        {}", format_bytes(bytes));
        }

        if !self.warnings.is_empty() {
            println!();
            println!("  Warnings:");
            for (kind, count) in &self.warnings {
                println!("    {:<24} {:>6}", kind.as_str(), count);
            }
        }
        println!();
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
