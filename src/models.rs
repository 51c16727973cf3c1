//! Core data models that flow through the build pipeline.
//!
//! A [`Document`] is created by the scanner, gets its text and mtime from
//! the reconciler, its [`IndexLevel`] from the classifier, and is then only
//! read by the materializer.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::BuildError;

/// How much of a document ends up in the result database.
///
/// Levels are ordered: each one includes everything the lower ones write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexLevel {
    /// Not written at all.
    Ignored,
    /// Document, Part and Label rows.
    Data,
    /// Plus a full-text index entry.
    Index,
    /// Plus the text itself, for snippets.
    Full,
}

impl IndexLevel {
    pub const ALL: [IndexLevel; 4] = [
        IndexLevel::Ignored,
        IndexLevel::Data,
        IndexLevel::Index,
        IndexLevel::Full,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexLevel::Ignored => "ignored",
            IndexLevel::Data => "data",
            IndexLevel::Index => "index",
            IndexLevel::Full => "full",
        }
    }
}

impl fmt::Display for IndexLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignored" => Ok(IndexLevel::Ignored),
            "data" => Ok(IndexLevel::Data),
            "index" => Ok(IndexLevel::Index),
            "full" => Ok(IndexLevel::Full),
            _ => Err(()),
        }
    }
}

/// One line of a `labels` file, split on its first comma.
///
/// A line without a comma still names a label (it counts for the index
/// level) but has no color, and no Label row can be written for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub name: String,
    pub color: Option<String>,
}

impl Label {
    pub fn parse(raw: &str) -> Label {
        match raw.split_once(',') {
            Some((name, color)) => Label {
                name: name.to_string(),
                color: Some(color.to_string()),
            },
            None => Label {
                name: raw.to_string(),
                color: None,
            },
        }
    }
}

/// One scanned document, keyed by its directory name.
#[derive(Debug, Clone)]
pub struct Document {
    /// Directory name, also the id used by the tracking database.
    pub name: String,
    /// Title from the first `#` line of `extra.txt`.
    pub title: Option<String>,
    /// Title read from the PDF metadata, only used for the full-text index.
    pub pdf_title: Option<String>,
    pub thumbnail: Option<String>,
    /// Either one PDF or the page images in page order.
    pub parts: Vec<String>,
    pub original_images: BTreeMap<u32, String>,
    pub edited_images: BTreeMap<u32, String>,
    pub image_sizes: BTreeMap<String, u64>,
    /// Lines of the `labels` file, in file order.
    pub labels: Vec<Label>,
    /// Epoch milliseconds, from the directory name.
    pub date: i64,
    /// Epoch milliseconds, from the tracking database.
    pub mtime: i64,
    pub page_count: u32,
    pub size: u64,
    pub text: String,
    pub extra_keywords: Option<String>,
    /// Untouched content of `extra.txt`.
    pub original_extra: Option<String>,
    pub index_level: IndexLevel,
    /// Set when the directory name did not carry a date. Inert documents
    /// are never checked for parts and never written.
    pub inert: bool,
}

impl Document {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            pdf_title: None,
            thumbnail: None,
            parts: Vec::new(),
            original_images: BTreeMap::new(),
            edited_images: BTreeMap::new(),
            image_sizes: BTreeMap::new(),
            labels: Vec::new(),
            date: 0,
            mtime: 0,
            page_count: 0,
            size: 0,
            text: String::new(),
            extra_keywords: None,
            original_extra: None,
            index_level: IndexLevel::Full,
            inert: false,
        }
    }

    /// Title stored in the full-text index: the user title, else the PDF one.
    pub fn fts_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.pdf_title.as_deref())
    }
}

/// All scanned documents, by directory name.
pub type DocumentSet = BTreeMap<String, Document>;

/// One row of the tracking database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingRecord {
    pub doc_id: String,
    pub text: String,
    /// Seconds since the epoch.
    pub mtime_secs: i64,
}

/// Label name to level, as configured in `[labels]`.
#[derive(Debug, Clone, Default)]
pub struct LevelPolicy {
    levels: BTreeMap<String, IndexLevel>,
}

impl LevelPolicy {
    /// Build the policy, rejecting any level name that does not exist.
    pub fn from_config(labels: &BTreeMap<String, String>) -> Result<Self, BuildError> {
        let mut levels = BTreeMap::new();
        for (label, level) in labels {
            let parsed = level
                .parse::<IndexLevel>()
                .map_err(|_| BuildError::UnknownLevel {
                    label: label.clone(),
                    level: level.clone(),
                })?;
            levels.insert(label.clone(), parsed);
        }
        Ok(Self { levels })
    }

    /// Level for a label name; unknown labels get [`IndexLevel::Full`].
    pub fn level_for(&self, label_name: &str) -> IndexLevel {
        self.levels
            .get(label_name)
            .copied()
            .unwrap_or(IndexLevel::Full)
    }
}
