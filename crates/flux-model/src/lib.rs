//! Data model for dataset summary notebooks.
//!
//! Shared by the index, the section pipeline, the writers and the CLI.

pub mod artifact;
pub mod error;
pub mod kind;
pub mod manifest;
pub mod notebook;
pub mod options;
pub mod record;
pub mod table;

pub use artifact::{ArtifactSummary, TabularArtifact};
pub use error::{ModelError, Result};
pub use kind::{DatasetKind, Dimension};
pub use manifest::{BookManifest, BookOutcome, Chapter, ChapterGroup, Diagnostic};
pub use notebook::{ContentBlock, NotebookDocument, NotebookDraft, NotebookMetadata};
pub use options::{DEFAULT_KERNEL, PipelineOptions};
pub use record::{RecordOutcome, SubdatasetRecord};
pub use table::Table;
