//! Error types for dataset indexing.

use std::path::PathBuf;

use flux_model::{DatasetKind, Dimension};
use thiserror::Error;

/// Errors that can occur while building or querying a dataset index.
#[derive(Debug, Error)]
pub enum IndexError {
    // === Dataset Errors ===
    /// Root path missing, not a directory, or not readable.
    #[error("dataset unreadable at {path}: {reason}")]
    DatasetUnreadable { path: PathBuf, reason: String },

    /// A query used a dimension the dataset kind does not declare.
    #[error("dimension '{dimension}' is not supported for {kind} datasets")]
    DimensionUnsupported {
        dimension: Dimension,
        kind: DatasetKind,
    },

    // === File System Errors ===
    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Metadata Errors ===
    /// Sidecar, description or participants file could not be parsed.
    #[error("malformed metadata in {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },
}

/// Result type for indexing operations.
pub type Result<T> = std::result::Result<T, IndexError>;
