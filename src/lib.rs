//! # Paper Index
//!
//! Builds the database read by the offline document viewer from a tree of
//! scanned documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌────────────┐   ┌──────────────┐
//! │   Scanner   │──▶│  Reconciler  │──▶│ Classifier │──▶│ Materializer │
//! │ doc folders │   │ tracking db  │   │  labels    │   │ SQLite+FTS4  │
//! └─────────────┘   └──────────────┘   └────────────┘   └──────────────┘
//! ```
//!
//! Every run rebuilds the output from scratch. The document set is built by
//! the scanner and handed from stage to stage; no stage touches the fields
//! owned by an earlier one.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`warnings`] | Configurable data warnings |
//! | [`error`] | Fatal build errors |
//! | [`models`] | Documents, labels, index levels |
//! | [`pdf`] | PDF page count and title |
//! | [`scanner`] | Document directory scanning |
//! | [`tracking`] | Tracking database access |
//! | [`reconcile`] | Text and mtime merge, text cleanup |
//! | [`classify`] | Index level per document |
//! | [`db`] | Output database connection |
//! | [`migrate`] | Output schema |
//! | [`materialize`] | Output rows and finalization |
//! | [`stats`] | Run summary |
//! | [`pipeline`] | Stage orchestration |

pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod materialize;
pub mod migrate;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod reconcile;
pub mod scanner;
pub mod stats;
pub mod tracking;
pub mod warnings;
