//! Error types for the section registry and pipeline.

use flux_ingest::IndexError;
use flux_model::DatasetKind;
use flux_report::ReportError;
use thiserror::Error;

use crate::context::ContextKey;

/// Errors raised while populating a section registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("section '{name}' is already registered")]
    DuplicateSection { name: String },
}

/// Errors raised by a section's production function.
#[derive(Debug, Error)]
pub enum SectionError {
    /// Index query failed (unsupported dimension, unreadable file).
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A declared context read was not populated.
    #[error("context key '{key}' has not been set")]
    MissingContext { key: ContextKey },

    #[error("{message}")]
    Failed { message: String },
}

impl SectionError {
    pub fn failed(message: impl Into<String>) -> Self {
        SectionError::Failed {
            message: message.into(),
        }
    }
}

/// Result type for section production.
pub type SectionResult<T> = std::result::Result<T, SectionError>;

/// Errors that abort a single-dataset pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("section '{section_name}' failed: {cause}")]
    Section {
        section_name: String,
        #[source]
        cause: SectionError,
    },

    #[error("artifact '{name}' was produced more than once")]
    DuplicateArtifactName { name: String },

    #[error("section '{section}' reads '{key}' but no earlier section writes it")]
    MissingContextDependency { section: String, key: ContextKey },

    #[error("section '{section}' does not apply to {kind} datasets")]
    UnsupportedKind { section: String, kind: DatasetKind },

    #[error("no section named '{name}' is registered")]
    UnknownSection { name: String },

    #[error("no sections apply to {kind} datasets")]
    NoApplicableSections { kind: DatasetKind },

    #[error(transparent)]
    Write(#[from] ReportError),
}

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;
