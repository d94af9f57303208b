//! Book manifest: the ordered table of contents consumed by the book builder.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::DatasetKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookManifest {
    pub title: String,
    pub generated: DateTime<Utc>,
    /// Chapter groups in table-of-contents order.
    pub groups: Vec<ChapterGroup>,
    /// Records that did not produce a notebook.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterGroup {
    pub kind: DatasetKind,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub label: String,
    /// Subdataset path relative to the superdataset root.
    pub dataset: String,
    /// Notebook path relative to the book directory.
    pub notebook: PathBuf,
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub dataset: String,
    pub kind: DatasetKind,
    pub status: String,
    pub reason: String,
}

/// Overall walk outcome derived from a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOutcome {
    AllSucceeded,
    /// At least one notebook was built and at least one record was not.
    PartialSuccess,
    NothingBuilt,
}

impl BookManifest {
    pub fn chapter_count(&self) -> usize {
        self.groups.iter().map(|group| group.chapters.len()).sum()
    }

    pub fn outcome(&self) -> BookOutcome {
        match (self.chapter_count(), self.diagnostics.len()) {
            (0, _) => BookOutcome::NothingBuilt,
            (_, 0) => BookOutcome::AllSucceeded,
            _ => BookOutcome::PartialSuccess,
        }
    }
}
