//! Notebook content blocks and the finalized notebook document.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::DatasetKind;
use crate::table::Table;

/// One unit of notebook content. Order is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "lowercase")]
pub enum ContentBlock {
    Markdown {
        text: String,
    },
    Code {
        source: String,
        /// Pre-computed table shown as the cell's output.
        display: Option<Table>,
    },
}

impl ContentBlock {
    pub fn markdown(text: impl Into<String>) -> Self {
        ContentBlock::Markdown { text: text.into() }
    }

    pub fn code(source: impl Into<String>) -> Self {
        ContentBlock::Code {
            source: source.into(),
            display: None,
        }
    }

    pub fn code_with_table(source: impl Into<String>, table: Table) -> Self {
        ContentBlock::Code {
            source: source.into(),
            display: Some(table),
        }
    }

    /// The displayed table, if this is a code block carrying one.
    pub fn table(&self) -> Option<&Table> {
        match self {
            ContentBlock::Code {
                display: Some(table),
                ..
            } => Some(table),
            _ => None,
        }
    }

    pub fn markdown_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Markdown { text } => Some(text),
            ContentBlock::Code { .. } => None,
        }
    }
}

/// Document-level metadata, fixed when the document is finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookMetadata {
    pub title: String,
    pub generated: DateTime<Utc>,
    pub dataset: PathBuf,
    pub kind: DatasetKind,
    pub kernel: String,
}

/// Blocks accumulated during a pipeline run.
#[derive(Debug, Default)]
pub struct NotebookDraft {
    blocks: Vec<ContentBlock>,
}

impl NotebookDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = ContentBlock>) {
        self.blocks.extend(blocks);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Seals the draft. The title is derived from the kind and dataset root.
    pub fn finalize(
        self,
        kind: DatasetKind,
        dataset: &Path,
        generated: DateTime<Utc>,
        kernel: impl Into<String>,
    ) -> NotebookDocument {
        NotebookDocument {
            metadata: NotebookMetadata {
                title: format!("{} summary: {}", kind.label(), dataset.display()),
                generated,
                dataset: dataset.to_path_buf(),
                kind,
                kernel: kernel.into(),
            },
            blocks: self.blocks,
        }
    }
}

/// A finalized notebook. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotebookDocument {
    metadata: NotebookMetadata,
    blocks: Vec<ContentBlock>,
}

impl NotebookDocument {
    pub fn metadata(&self) -> &NotebookMetadata {
        &self.metadata
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// All tables displayed by code blocks, in document order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(ContentBlock::table)
    }
}
