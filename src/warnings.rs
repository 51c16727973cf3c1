//! Configurable, non-fatal data warnings.
//!
//! Each category can be switched off in the `[warnings]` section of the
//! config file. Enabled warnings become `tracing` events with the category
//! attached as a field; all warnings, enabled or not, are counted so the
//! run summary can report them.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

/// Every warning the builder can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnexpectedDirectory,
    UnknownFileType,
    MultipleTypes,
    PdfWithEditedImages,
    MissingTitle,
    PdfError,
    BadLabel,
}

impl WarningKind {
    pub const ALL: [WarningKind; 7] = [
        WarningKind::UnexpectedDirectory,
        WarningKind::UnknownFileType,
        WarningKind::MultipleTypes,
        WarningKind::PdfWithEditedImages,
        WarningKind::MissingTitle,
        WarningKind::PdfError,
        WarningKind::BadLabel,
    ];

    /// Key used in the `[warnings]` config section.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::UnexpectedDirectory => "unexpected_directory",
            WarningKind::UnknownFileType => "unknown_file_type",
            WarningKind::MultipleTypes => "multiple_types",
            WarningKind::PdfWithEditedImages => "pdf_with_edited_images",
            WarningKind::MissingTitle => "missing_title",
            WarningKind::PdfError => "pdf_error",
            WarningKind::BadLabel => "bad_label",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `[warnings]` config section. A missing key leaves the category on.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct WarningsConfig {
    #[serde(default = "enabled")]
    pub unexpected_directory: bool,
    #[serde(default = "enabled")]
    pub unknown_file_type: bool,
    #[serde(default = "enabled")]
    pub multiple_types: bool,
    #[serde(default = "enabled")]
    pub pdf_with_edited_images: bool,
    #[serde(default = "enabled")]
    pub missing_title: bool,
    #[serde(default = "enabled")]
    pub pdf_error: bool,
    #[serde(default = "enabled")]
    pub bad_label: bool,
}

fn enabled() -> bool {
    true
}

impl Default for WarningsConfig {
    fn default() -> Self {
        Self {
            unexpected_directory: true,
            unknown_file_type: true,
            multiple_types: true,
            pdf_with_edited_images: true,
            missing_title: true,
            pdf_error: true,
            bad_label: true,
        }
    }
}

impl WarningsConfig {
    pub fn is_enabled(&self, kind: WarningKind) -> bool {
        match kind {
            WarningKind::UnexpectedDirectory => self.unexpected_directory,
            WarningKind::UnknownFileType => self.unknown_file_type,
            WarningKind::MultipleTypes => self.multiple_types,
            WarningKind::PdfWithEditedImages => self.pdf_with_edited_images,
            WarningKind::MissingTitle => self.missing_title,
            WarningKind::PdfError => self.pdf_error,
            WarningKind::BadLabel => self.bad_label,
        }
    }
}

/// Warning sink shared by the pipeline stages.
///
/// The pipeline is single-threaded, so the counters live in a `RefCell`
/// and stages only need `&Warnings`.
#[derive(Debug, Default)]
pub struct Warnings {
    config: WarningsConfig,
    counts: RefCell<BTreeMap<WarningKind, u64>>,
}

impl Warnings {
    pub fn new(config: WarningsConfig) -> Self {
        Self {
            config,
            counts: RefCell::new(BTreeMap::new()),
        }
    }

    /// Record a warning and log it if its category is enabled.
    pub fn emit(&self, kind: WarningKind, message: impl AsRef<str>) {
        *self.counts.borrow_mut().entry(kind).or_insert(0) += 1;
        if self.config.is_enabled(kind) {
            tracing::warn!(category = kind.as_str(), "{}", message.as_ref());
        }
    }

    pub fn count(&self, kind: WarningKind) -> u64 {
        self.counts.borrow().get(&kind).copied().unwrap_or(0)
    }

    /// Non-zero counts, ordered by category.
    pub fn counts(&self) -> BTreeMap<WarningKind, u64> {
        self.counts.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_default_to_enabled() {
        let cfg: WarningsConfig = toml::from_str("missing_title = false").unwrap();
        assert!(!cfg.missing_title);
        assert!(cfg.bad_label);
        assert!(cfg.pdf_error);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let res: Result<WarningsConfig, _> = toml::from_str("no_such_warning = true");
        assert!(res.is_err());
    }

    #[test]
    fn disabled_warnings_are_still_counted() {
        let cfg = WarningsConfig {
            unknown_file_type: false,
            ..WarningsConfig::default()
        };
        let warnings = Warnings::new(cfg);
        warnings.emit(WarningKind::UnknownFileType, "a");
        warnings.emit(WarningKind::UnknownFileType, "b");
        warnings.emit(WarningKind::MissingTitle, "c");
        assert_eq!(warnings.count(WarningKind::UnknownFileType), 2);
        assert_eq!(warnings.count(WarningKind::MissingTitle), 1);
        assert_eq!(warnings.count(WarningKind::BadLabel), 0);
    }

    #[test]
    fn config_keys_match_display() {
        for kind in WarningKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }
}
