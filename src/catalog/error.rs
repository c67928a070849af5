//! Error taxonomy for catalog loading.
//!
//! `LoadError` aborts a whole catalog; `RowError` only costs the offending row
//! and is kept on the loaded `Catalog` for diagnostics.

use crate::catalog::identity::{CatalogKind, RecordId};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read {kind} catalog at {}: {source}", path.display())]
    Unreadable {
        kind: CatalogKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind} catalog source is empty")]
    EmptySource { kind: CatalogKind },

    #[error("{kind} catalog is missing required columns: {}", missing.join(", "))]
    MissingColumns {
        kind: CatalogKind,
        missing: Vec<String>,
    },

    #[error("{kind} catalog produced no valid rows ({skipped} skipped)")]
    NoValidRows { kind: CatalogKind, skipped: usize },
}

impl LoadError {
    pub fn kind(&self) -> CatalogKind {
        match self {
            LoadError::Unreadable { kind, .. }
            | LoadError::EmptySource { kind }
            | LoadError::MissingColumns { kind, .. }
            | LoadError::NoValidRows { kind, .. } => *kind,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RowError {
    #[error("expected {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("missing essential field '{field}'")]
    MissingField { field: String },

    #[error("duplicate id '{id}'")]
    DuplicateId { id: RecordId },
}

/// A row the loader skipped, with its 1-based source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    #[serde(flatten)]
    pub error: RowError,
}
