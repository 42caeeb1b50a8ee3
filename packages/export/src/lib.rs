#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistence for crawled inmate records.
//!
//! A crawl is saved as a JSON [`checkpoint::Checkpoint`] holding every merged
//! record, so the CSV export ([`csv_export`]) can be rerun later without
//! crawling again. The CSV is a lossy flattening; the checkpoint keeps
//! everything.

pub mod checkpoint;
pub mod csv_export;

/// Errors that can occur while saving or loading exports.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
