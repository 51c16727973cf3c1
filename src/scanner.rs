//! Document directory scanner.
//!
//! Every immediate subdirectory of the data directory is one document. Its
//! name carries the scan date (`YYYYMMDD_HHMM[_anything]`) and its files are
//! recognised by name:
//!
//! | File | Meaning |
//! |------|---------|
//! | `labels` | one `name,color` label per line |
//! | `extra.txt` | optional `#title` first line, then keywords |
//! | `doc.pdf` | the document, as a single PDF |
//! | `paper.N.jpg` / `paper.N.png` | original page image N |
//! | `paper.N.edited.jpg` / `.png` | edited page image N, wins over the original |
//! | `paper.N.thumb.jpg` | thumbnail candidate |
//! | `paper.N.words` | OCR boxes, ignored |

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, TimeZone};
use regex::Regex;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

use crate::error::BuildError;
use crate::models::{Document, DocumentSet, Label};
use crate::pdf::PdfInspector;
use crate::warnings::{WarningKind, Warnings};

static DIR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{8}_[0-9]{4})(?:_.*)?$").expect("valid regex"));
static ORIGINAL_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^paper\.([0-9]+)\.(?:jpg|png)$").expect("valid regex"));
static EDITED_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^paper\.([0-9]+)\.edited\.(?:jpg|png)$").expect("valid regex"));
static THUMBNAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^paper\.([0-9]+)\.thumb\.jpg$").expect("valid regex"));
static WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^paper\.[0-9]+\.words$").expect("valid regex"));

/// What a file in a document directory is, judged by its name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Labels,
    Extra,
    Pdf,
    Original(u32),
    Edited(u32),
    Thumbnail(u32),
    Words,
    Unknown,
}

pub fn classify_file(name: &str) -> FileKind {
    fn page(re: &Regex, name: &str) -> Option<u32> {
        re.captures(name)?.get(1)?.as_str().parse().ok()
    }

    match name {
        "labels" => return FileKind::Labels,
        "extra.txt" => return FileKind::Extra,
        "doc.pdf" => return FileKind::Pdf,
        _ => {}
    }
    if let Some(n) = page(&ORIGINAL_IMAGE, name) {
        FileKind::Original(n)
    } else if let Some(n) = page(&EDITED_IMAGE, name) {
        FileKind::Edited(n)
    } else if let Some(n) = page(&THUMBNAIL, name) {
        FileKind::Thumbnail(n)
    } else if WORDS.is_match(name) {
        FileKind::Words
    } else {
        FileKind::Unknown
    }
}

/// Epoch milliseconds of the date encoded in a directory name, read as
/// local time. `None` when the name does not start with a valid date.
pub fn parse_dir_date(name: &str) -> Option<i64> {
    let stamp = DIR_NAME.captures(name)?.get(1)?.as_str();
    let naive = NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M").ok()?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        // Skipped by a DST jump: no such local time, keep the wall clock.
        .unwrap_or_else(|| naive.and_utc().timestamp_millis());
    Some(local)
}

/// Scan every document directory under `root`.
pub fn scan_data_dir(
    root: &Path,
    pdf: &dyn PdfInspector,
    warnings: &Warnings,
) -> Result<DocumentSet> {
    println!("Scanning {}", root.display());

    let mut documents = DocumentSet::new();
    for entry in list_dir(root)? {
        if !entry.file_type().is_dir() {
            continue;
        }
        let doc = scan_doc_dir(entry.path(), pdf, warnings)?;
        documents.insert(doc.name.clone(), doc);
    }

    println!("Found {} documents", documents.len());
    Ok(documents)
}

/// Build the [`Document`] for one directory.
///
/// A directory without a dated name yields an inert document. A dated
/// directory with neither PDF nor images is a [`BuildError::NoParts`].
pub fn scan_doc_dir(dir: &Path, pdf: &dyn PdfInspector, warnings: &Warnings) -> Result<Document> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let mut doc = Document::new(name);

    match parse_dir_date(&doc.name) {
        Some(date) => doc.date = date,
        None => {
            warnings.emit(WarningKind::UnexpectedDirectory, &doc.name);
            doc.inert = true;
            return Ok(doc);
        }
    }

    let mut thumbs: Vec<(u32, String)> = Vec::new();

    for entry in list_dir(dir)? {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        match classify_file(&file_name) {
            FileKind::Labels => {
                doc.labels = read_text(path)?
                    .lines()
                    .filter(|l| !l.is_empty())
                    .map(Label::parse)
                    .collect();
            }
            FileKind::Extra => {
                let original = read_text(path)?;
                let mut extras: Vec<&str> = original.lines().collect();
                let title = extras
                    .first()
                    .and_then(|l| l.strip_prefix('#'))
                    .map(|t| t.trim().to_string());
                if title.is_some() {
                    doc.title = title;
                    extras.remove(0);
                }
                doc.extra_keywords = Some(extras.join(" "));
                doc.original_extra = Some(original);
            }
            FileKind::Pdf => {
                doc.size = file_size(&entry)?;
                doc.parts.push(file_name);
                match pdf.inspect(path) {
                    Ok(info) => {
                        doc.page_count = info.page_count;
                        doc.pdf_title = info.title;
                    }
                    Err(e) => {
                        warnings.emit(
                            WarningKind::PdfError,
                            format!("Error '{}' : {}", path.display(), e),
                        );
                        doc.page_count = 0;
                        doc.pdf_title = None;
                    }
                }
            }
            FileKind::Original(n) => {
                doc.image_sizes.insert(file_name.clone(), file_size(&entry)?);
                doc.original_images.insert(n, file_name);
            }
            FileKind::Edited(n) => {
                doc.image_sizes.insert(file_name.clone(), file_size(&entry)?);
                doc.edited_images.insert(n, file_name);
            }
            FileKind::Thumbnail(n) => thumbs.push((n, file_name)),
            FileKind::Words => {}
            FileKind::Unknown => warnings.emit(
                WarningKind::UnknownFileType,
                format!("unknown file type in {}: \"{}\"", dir.display(), file_name),
            ),
        }
    }

    resolve_parts(&mut doc, dir, warnings);

    thumbs.sort();
    doc.thumbnail = thumbs.into_iter().next().map(|(_, name)| name);

    if doc.title.as_deref().map_or(true, str::is_empty) {
        warnings.emit(
            WarningKind::MissingTitle,
            format!("Missing title : '{}'", dir.display()),
        );
    }

    if doc.parts.is_empty() {
        return Err(BuildError::NoParts {
            dir: dir.to_path_buf(),
        }
        .into());
    }

    Ok(doc)
}

/// A PDF is the only part when present. Otherwise the parts are the page
/// images in page order, the edited image replacing the original.
fn resolve_parts(doc: &mut Document, dir: &Path, warnings: &Warnings) {
    if !doc.parts.is_empty() {
        if !doc.original_images.is_empty() {
            warnings.emit(
                WarningKind::MultipleTypes,
                format!("both PDF and images for '{}', images ignored", dir.display()),
            );
        } else if !doc.edited_images.is_empty() {
            warnings.emit(
                WarningKind::PdfWithEditedImages,
                format!(
                    "Ignoring {} edited images for PDF '{}'",
                    doc.edited_images.len(),
                    dir.display()
                ),
            );
        }
        return;
    }

    let mut pages = doc.original_images.clone();
    pages.extend(doc.edited_images.clone());
    doc.parts = pages.into_values().collect();
    doc.size = doc
        .parts
        .iter()
        .map(|p| doc.image_sizes.get(p).copied().unwrap_or(0))
        .sum();
    doc.page_count = doc.parts.len() as u32;
}

/// Entries directly under `dir`, sorted by name, with symlinks followed.
/// Links whose target no longer exists are skipped.
fn list_dir(dir: &Path) -> Result<Vec<DirEntry>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) if is_dangling_link(&e) => {
                tracing::debug!(path = ?e.path(), "skipping dangling symlink");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list {}", dir.display()));
            }
        }
    }
    Ok(entries)
}

fn is_dangling_link(err: &walkdir::Error) -> bool {
    let not_found = err.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound);
    not_found
        && err
            .path()
            .and_then(|p| p.symlink_metadata().ok())
            .is_some_and(|m| m.file_type().is_symlink())
}

fn file_size(entry: &DirEntry) -> Result<u64> {
    let metadata = entry
        .metadata()
        .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
    Ok(metadata.len())
}

/// Read a text file with all line endings normalised to `\n`.
fn read_text(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(raw.replace("\r\n", "\n").replace('\r', "\n"))
}
