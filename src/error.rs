//! Error types for configuration loading and timetable builds.
//!
//! Allocation itself never fails (see the tier fallback in
//! [`crate::scheduler::SlotAllocator`]); errors only arise before a build
//! starts, from bad configuration or an unusable teacher pool.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading or checking a [`crate::models::Catalog`].
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid boundary table: {0}")]
    InvalidTable(String),

    #[error("catalog failed validation: {}", summarize(.0))]
    Invalid(Vec<ValidationError>),
}

/// Reasons a timetable build is refused before any cell is written.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("teacher pool is empty")]
    EmptyPool,

    #[error("catalog has no subjects to allocate")]
    NoSubjects,

    #[error("build inputs failed validation: {}", summarize(.0))]
    Invalid(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
