//! Fatal conditions that abort a build.
//!
//! Anything listed here stops the run before a result database is put in
//! place. Non-fatal problems go through [`crate::warnings`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// A dated document directory produced neither a PDF nor any page image.
    #[error("document {} has no parts", dir.display())]
    NoParts { dir: PathBuf },

    /// The `[labels]` policy names a level that does not exist.
    #[error("the level '{level}' (for label '{label}') does not exist")]
    UnknownLevel { label: String, level: String },

    /// The tracking database references a directory that was not scanned.
    #[error("tracking database references unknown document '{id}'")]
    UnknownDocument { id: String },
}
