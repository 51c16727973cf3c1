//! Schema of the viewer database.
//!
//! Table and column names are fixed by the viewer, which opens the file
//! with its own persistence layer and checks `user_version`.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

/// Value stamped into `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// `Part.downloadStatus` for a part that has not been fetched yet.
pub const DOWNLOAD_STATUS_NONE: i64 = 100;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE Document (
        documentId INTEGER NOT NULL PRIMARY KEY,
        name TEXT NOT NULL,
        title TEXT NULL,
        thumb TEXT NULL,
        pageCount INTEGER NOT NULL,
        date INTEGER NOT NULL,
        mtime INTEGER NOT NULL,
        size INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE Part (
        partId INTEGER NOT NULL PRIMARY KEY,
        documentId INTEGER NOT NULL,
        name TEXT NOT NULL,
        downloadStatus INTEGER NOT NULL DEFAULT 100,
        downloadError TEXT NULL,
        CONSTRAINT fkDocument FOREIGN KEY (documentId) REFERENCES Document(documentId)
    )
    "#,
    "CREATE INDEX Part_documentId ON Part(documentId)",
    "CREATE INDEX Part_downloadStatus ON Part(downloadStatus)",
    r#"
    CREATE TABLE Label (
        labelId INTEGER NOT NULL PRIMARY KEY,
        documentId INTEGER NOT NULL,
        name TEXT NOT NULL,
        color TEXT,
        CONSTRAINT fkDocument FOREIGN KEY (documentId) REFERENCES Document(documentId)
    )
    "#,
    "CREATE INDEX Label_documentId ON Label(documentId)",
    "CREATE INDEX Label_name ON Label(name)",
    r#"
    CREATE TABLE DocumentText (
        documentId INTEGER NOT NULL PRIMARY KEY,
        main TEXT NOT NULL,
        additional TEXT NULL,
        CONSTRAINT fkDocument FOREIGN KEY (documentId) REFERENCES Document(documentId)
    )
    "#,
    // External content: the index may hold rows whose text is not stored.
    r#"
    CREATE VIRTUAL TABLE DocumentFts USING fts4(
        tokenize=unicode61,
        content=`DocumentText`,
        main,
        additional
    )
    "#,
];

/// Create every table and index on an empty database.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create schema: {}", statement.trim()))?;
    }

    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
