#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use paper_index::config::{Config, PathsConfig};
use paper_index::warnings::WarningsConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

/// PDF with `pages` empty pages and an optional `/Title` in its info
/// dictionary. Offsets in the xref table are computed so `lopdf` can parse it.
pub fn pdf_with_pages(pages: usize, title: Option<&str>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut offsets = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");

    offsets.push(out.len());
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");

    let kids = (0..pages)
        .map(|i| format!("{} 0 R", i + 3))
        .collect::<Vec<_>>()
        .join(" ");
    offsets.push(out.len());
    out.extend_from_slice(
        format!(
            "2 0 obj << /Type /Pages /Kids [{}] /Count {} >> endobj\n",
            kids, pages
        )
        .as_bytes(),
    );

    for i in 0..pages {
        offsets.push(out.len());
        out.extend_from_slice(
            format!(
                "{} 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] >> endobj\n",
                i + 3
            )
            .as_bytes(),
        );
    }

    let info_id = pages + 3;
    offsets.push(out.len());
    let info = match title {
        Some(t) => format!("{} 0 obj << /Title ({}) >> endobj\n", info_id, t),
        None => format!("{} 0 obj << /Producer (test) >> endobj\n", info_id),
    };
    out.extend_from_slice(info.as_bytes());

    let xref_start = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    for offset in &offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer << /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            offsets.len() + 1,
            info_id,
            xref_start
        )
        .as_bytes(),
    );
    out
}

/// Scratch layout: `papers/` data dir, tracking db, output path.
pub struct Fixture {
    pub tmp: TempDir,
    pub papers: PathBuf,
    pub tracking_db: PathBuf,
    pub result_db: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let papers = tmp.path().join("papers");
        fs::create_dir_all(&papers).unwrap();
        let tracking_db = tmp.path().join("doc_tracking.db");
        let result_db = tmp.path().join("out").join("viewer.sqlite");
        Self {
            tmp,
            papers,
            tracking_db,
            result_db,
        }
    }

    /// Create a document directory with the given files.
    pub fn doc(&self, name: &str, files: Vec<(&str, Vec<u8>)>) -> PathBuf {
        let dir = self.papers.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            fs::write(dir.join(file), content).unwrap();
        }
        dir
    }

    pub fn config(&self, labels: &[(&str, &str)]) -> Config {
        Config {
            paths: PathsConfig {
                papers_data_dir: self.papers.clone(),
                papers_metadata_db: self.tracking_db.clone(),
                result_db: self.result_db.clone(),
            },
            warnings: WarningsConfig::default(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    /// Same settings as [`Fixture::config`], as a TOML file.
    pub fn write_config_file(&self, labels: &[(&str, &str)]) -> PathBuf {
        let mut content = format!(
            "[paths]\npapers_data_dir = {:?}\npapers_metadata_db = {:?}\nresult_db = {:?}\n\n[warnings]\nmissing_title = false\n\n[labels]\n",
            self.papers.display().to_string(),
            self.tracking_db.display().to_string(),
            self.result_db.display().to_string(),
        );
        for (label, level) in labels {
            content.push_str(&format!("{:?} = {:?}\n", label, level));
        }
        let path = self.tmp.path().join("paper-index.toml");
        fs::write(&path, content).unwrap();
        path
    }

    /// Write the tracking database with `(doc_id, text, mtime_secs)` rows.
    pub async fn tracking(&self, rows: &[(&str, &str, i64)]) {
        let options = SqliteConnectOptions::new()
            .filename(&self.tracking_db)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE DOCUMENTS (DOC_ID TEXT PRIMARY KEY, TEXT TEXT, MTIME INTEGER)")
            .execute(&pool)
            .await
            .unwrap();
        for (id, text, mtime) in rows {
            sqlx::query("INSERT INTO DOCUMENTS (DOC_ID, TEXT, MTIME) VALUES (?, ?, ?)")
                .bind(id)
                .bind(text)
                .bind(mtime)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool.close().await;
    }
}

pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}
