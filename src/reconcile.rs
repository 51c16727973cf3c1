//! Merge tracking-database text and mtimes into the scanned documents.
//!
//! The scanning application appends the content of `extra.txt` (title
//! line included) to the OCR text it stores. That tail is replaced by the
//! keywords alone, so the title is not indexed twice.

use crate::error::BuildError;
use crate::models::{DocumentSet, TrackingRecord};

/// Runs of this many identical characters (or more) are OCR noise.
const REPEAT_THRESHOLD: usize = 5;

pub fn reconcile(documents: &mut DocumentSet, records: &[TrackingRecord]) -> Result<(), BuildError> {
    for record in records {
        let doc = documents
            .get_mut(&record.doc_id)
            .ok_or_else(|| BuildError::UnknownDocument {
                id: record.doc_id.clone(),
            })?;

        let mut text = record.text.as_str();
        let rebuilt;
        if let Some(extra) = doc.original_extra.as_deref().filter(|e| !e.is_empty()) {
            if let Some(body) = text.strip_suffix(extra) {
                rebuilt = format!(
                    "{} {}",
                    doc.extra_keywords.as_deref().unwrap_or_default(),
                    body
                );
                text = &rebuilt;
            }
        }

        doc.text = clean_text(text);
        doc.mtime = record.mtime_secs.saturating_mul(1000);
    }
    Ok(())
}

/// Replace runs of 5+ identical characters with a space, then collapse
/// whitespace. Idempotent.
pub fn clean_text(text: &str) -> String {
    let mut squeezed = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        if run >= REPEAT_THRESHOLD && c != '\n' {
            squeezed.push(' ');
        } else {
            squeezed.extend(std::iter::repeat(c).take(run));
        }
    }

    squeezed.split_whitespace().collect::<Vec<_>>().join(" ")
}
