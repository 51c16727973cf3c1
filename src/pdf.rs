//! PDF page count and title lookup.
//!
//! The scanner only needs two facts from a PDF, so this is a narrow
//! [`PdfInspector`] seam with a `lopdf` implementation. Decode failures and
//! empty page trees are returned as [`PdfError`] and never abort a build.

use lopdf::{Dictionary, Object};
use std::path::Path;
use thiserror::Error;

/// What the scanner learns from a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PdfInfo {
    pub page_count: u32,
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("{0}")]
    Decode(#[from] lopdf::Error),
    #[error("no pages found")]
    NoPages,
}

pub trait PdfInspector {
    fn inspect(&self, path: &Path) -> Result<PdfInfo, PdfError>;
}

/// [`PdfInspector`] backed by `lopdf`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfInspector;

impl PdfInspector for LopdfInspector {
    fn inspect(&self, path: &Path) -> Result<PdfInfo, PdfError> {
        let doc = lopdf::Document::load(path)?;
        let page_count = doc.get_pages().len() as u32;
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }
        let title = info_dictionary(&doc).and_then(title_from_info);
        Ok(PdfInfo { page_count, title })
    }
}

fn info_dictionary(doc: &lopdf::Document) -> Option<&Dictionary> {
    let info = doc.trailer.get(b"Info").ok()?;
    let (_, object) = doc.dereference(info).ok()?;
    object.as_dict().ok()
}

/// `Title`, else `Subject`, ignoring empty values and the placeholders
/// some scanner software writes.
fn title_from_info(info: &Dictionary) -> Option<String> {
    let title = info_string(info, b"Title");
    if !is_placeholder(title.as_deref(), "Title") {
        return title;
    }
    let subject = info_string(info, b"Subject");
    if !is_placeholder(subject.as_deref(), "Subject") {
        return subject;
    }
    None
}

fn is_placeholder(value: Option<&str>, field: &str) -> bool {
    match value {
        None => true,
        Some(v) => v.is_empty() || v == field || v == field.to_lowercase(),
    }
}

fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    match info.get(key).ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with a byte order mark, otherwise
/// one byte per character.
fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
