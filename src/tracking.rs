//! Read-only access to the document tracking database.
//!
//! The tracking database belongs to the scanning application; this module
//! never creates or writes it.

use anyhow::{bail, Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

use crate::models::TrackingRecord;

/// Load every tracked document, oldest modification first.
pub async fn load_records(path: &Path) -> Result<Vec<TrackingRecord>> {
    println!("Adding metadata from {}", path.display());

    if !path.is_file() {
        bail!("Tracking database does not exist: {}", path.display());
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open tracking database: {}", path.display()))?;

    let rows = sqlx::query("SELECT DOC_ID, TEXT, MTIME FROM DOCUMENTS ORDER BY MTIME")
        .fetch_all(&pool)
        .await
        .with_context(|| "Failed to read DOCUMENTS from tracking database")?;

    let records = rows
        .iter()
        .map(|row| -> Result<TrackingRecord> {
            let text: Option<String> = row.try_get("TEXT")?;
            Ok(TrackingRecord {
                doc_id: row.try_get("DOC_ID")?,
                text: text.unwrap_or_default(),
                mtime_secs: row.try_get("MTIME")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    pool.close().await;
    Ok(records)
}
