//! Error taxonomy for the catalog core.
//!
//! Only conditions that must stop a run live here. Routine discards (bad dates,
//! excluded or over-cap entries) are not errors and never surface as `Err`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog header lacks a channel or url column.
    #[error("unresolvable catalog header in {path}: missing {missing} column (found {found:?})")]
    Header {
        path: PathBuf,
        missing: &'static str,
        found: Vec<String>,
    },

    /// Malformed catalog table.
    #[error("catalog table error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Persistence failure while reading or writing artifacts.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Convenience Result type for the catalog core.
pub type Result<T> = std::result::Result<T, CatalogError>;
