//! Error types for output writing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing notebooks, artifacts or the book.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Output directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV encoding failed.
    #[error("failed to encode CSV for {name}: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },

    /// JSON encoding failed.
    #[error("failed to encode JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// YAML encoding failed.
    #[error("failed to encode YAML for {name}: {source}")]
    Yaml {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, ReportError>;

pub(crate) fn create_dir(path: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| ReportError::CreateDir {
        path: path.to_path_buf(),
        source: e,
    })
}

pub(crate) fn write_file(path: &std::path::Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).map_err(|e| ReportError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}
