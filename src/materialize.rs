//! Write the viewer database.
//!
//! Documents are numbered newest first, so `ORDER BY rowid` is the
//! viewer's default date order. What gets written for a document depends
//! on its [`IndexLevel`]:
//!
//! | Level | Document / Part / Label | DocumentFts | DocumentText |
//! |-------|-------------------------|-------------|--------------|
//! | ignored | | | |
//! | data | yes | | |
//! | index | yes | yes | |
//! | full | yes | yes | yes |
//!
//! The database is built next to its destination and only renamed into
//! place once complete, so a failed run never leaves a partial file.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::db;
use crate::migrate;
use crate::models::{Document, DocumentSet, IndexLevel};
use crate::warnings::{WarningKind, Warnings};

/// Rows written per table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeStats {
    pub documents: u64,
    pub parts: u64,
    pub labels: u64,
    pub fts_entries: u64,
    pub content_rows: u64,
    /// Ignored or undated documents that were not written.
    pub skipped: u64,
}

/// Documents in row-id order: newest first, ties by directory name.
pub fn order_documents(documents: &DocumentSet) -> Vec<&Document> {
    let mut ordered: Vec<&Document> = documents.values().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.name.cmp(&b.name)));
    ordered
}

/// Build the viewer database at `result_db`, replacing any previous one.
pub async fn materialize(
    documents: &DocumentSet,
    result_db: &Path,
    warnings: &Warnings,
) -> Result<MaterializeStats> {
    println!("Saving in {}", result_db.display());

    let tmp_path = temp_path(result_db);
    remove_if_exists(&tmp_path)?;

    let pool = db::connect(&tmp_path)
        .await
        .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
    let outcome = populate(&pool, documents, warnings).await;
    pool.close().await;

    let stats = match outcome {
        Ok(stats) => stats,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    remove_if_exists(result_db)?;
    std::fs::rename(&tmp_path, result_db).with_context(|| {
        format!(
            "Failed to move {} to {}",
            tmp_path.display(),
            result_db.display()
        )
    })?;

    Ok(stats)
}

async fn populate(
    pool: &SqlitePool,
    documents: &DocumentSet,
    warnings: &Warnings,
) -> Result<MaterializeStats> {
    println!("  creating schema");
    migrate::create_schema(pool).await?;

    println!("  writing documents");
    let mut stats = MaterializeStats::default();
    let mut tx = pool.begin().await?;
    for (idx, doc) in order_documents(documents).into_iter().enumerate() {
        let row_id = idx as i64;
        if doc.inert || doc.index_level < IndexLevel::Data {
            stats.skipped += 1;
            continue;
        }
        write_document(&mut tx, row_id, doc, warnings, &mut stats)
            .await
            .with_context(|| format!("Failed to write document {}", doc.name))?;
    }

    println!("  optimizing full-text index");
    sqlx::query("INSERT INTO DocumentFts(DocumentFts) VALUES('optimize')")
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    println!("  compacting");
    sqlx::query("VACUUM").execute(pool).await?;

    println!("  analyzing");
    sqlx::query("PRAGMA optimize").execute(pool).await?;
    sqlx::query("ANALYZE").execute(pool).await?;

    Ok(stats)
}

async fn write_document(
    tx: &mut Transaction<'_, Sqlite>,
    row_id: i64,
    doc: &Document,
    warnings: &Warnings,
    stats: &mut MaterializeStats,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO Document (documentId, name, title, thumb, pageCount, date, mtime, size)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(row_id)
    .bind(&doc.name)
    .bind(&doc.title)
    .bind(&doc.thumbnail)
    .bind(i64::from(doc.page_count))
    .bind(doc.date)
    .bind(doc.mtime)
    .bind(i64::try_from(doc.size).unwrap_or(i64::MAX))
    .execute(&mut **tx)
    .await?;
    stats.documents += 1;

    for part in &doc.parts {
        sqlx::query("INSERT INTO Part (documentId, name) VALUES (?, ?)")
            .bind(row_id)
            .bind(part)
            .execute(&mut **tx)
            .await?;
        stats.parts += 1;
    }

    for label in &doc.labels {
        let Some(color) = &label.color else {
            warnings.emit(
                WarningKind::BadLabel,
                format!("unexpected label {:?} for document {}", label.name, doc.name),
            );
            continue;
        };
        sqlx::query("INSERT INTO Label (documentId, name, color) VALUES (?, ?, ?)")
            .bind(row_id)
            .bind(&label.name)
            .bind(color)
            .execute(&mut **tx)
            .await?;
        stats.labels += 1;
    }

    if doc.index_level >= IndexLevel::Index {
        sqlx::query("INSERT INTO DocumentFts (rowid, main, additional) VALUES (?, ?, ?)")
            .bind(row_id)
            .bind(&doc.text)
            .bind(doc.fts_title())
            .execute(&mut **tx)
            .await?;
        stats.fts_entries += 1;
    }

    if doc.index_level >= IndexLevel::Full {
        sqlx::query("INSERT INTO DocumentText (documentId, main, additional) VALUES (?, ?, ?)")
            .bind(row_id)
            .bind(&doc.text)
            .bind(&doc.title)
            .execute(&mut **tx)
            .await?;
        stats.content_rows += 1;
    }

    Ok(())
}

/// `<result_db>.tmp`, in the same directory so the final rename is atomic.
fn temp_path(result_db: &Path) -> PathBuf {
    let mut name = OsString::from(result_db.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(name: &str, date: i64) -> Document {
        let mut doc = Document::new(name);
        doc.date = date;
        doc
    }

    #[test]
    fn newest_first_then_by_name() {
        let mut docs = DocumentSet::new();
        for doc in [
            dated("20200101_0000", 100),
            dated("20220101_0000", 300),
            dated("20210101_0000_b", 200),
            dated("20210101_0000_a", 200),
        ] {
            docs.insert(doc.name.clone(), doc);
        }
        let names: Vec<&str> = order_documents(&docs)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "20220101_0000",
                "20210101_0000_a",
                "20210101_0000_b",
                "20200101_0000"
            ]
        );
    }

    #[test]
    fn temp_path_is_a_sibling() {
        assert_eq!(
            temp_path(Path::new("/out/viewer.sqlite")),
            PathBuf::from("/out/viewer.sqlite.tmp")
        );
    }
}
