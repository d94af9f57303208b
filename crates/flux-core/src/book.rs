//! Book aggregation: ordered chapters from walk records.

use std::path::Path;

use chrono::{DateTime, Utc};
use flux_model::{BookManifest, Chapter, ChapterGroup, Diagnostic, RecordOutcome, SubdatasetRecord};

pub const DEFAULT_BOOK_TITLE: &str = "Flux Notebooks";

/// Options for [`aggregate`].
#[derive(Debug, Clone)]
pub struct BookOptions {
    pub title: String,
    /// Fixed timestamp; `None` uses the current time.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_BOOK_TITLE.to_string(),
            generated_at: None,
        }
    }
}

impl BookOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }
}

/// Human label for a subdataset path: `derivatives/mriqc` -> `Derivatives Mriqc`.
pub fn chapter_label(path: &str) -> String {
    path.replace('/', "_")
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Groups built records into chapters by kind and lists the rest as
/// diagnostics.
///
/// Groups appear in order of their kind's first built record; chapters keep
/// record order. Notebook paths are made relative to `book_dir` when they
/// live below it.
pub fn aggregate(records: &[SubdatasetRecord], book_dir: &Path, options: &BookOptions) -> BookManifest {
    let mut groups: Vec<ChapterGroup> = Vec::new();
    let mut diagnostics = Vec::new();

    for record in records {
        match &record.outcome {
            RecordOutcome::Built {
                notebook,
                artifacts,
                ..
            } => {
                let chapter = Chapter {
                    label: chapter_label(&record.path),
                    dataset: record.path.clone(),
                    notebook: notebook
                        .strip_prefix(book_dir)
                        .unwrap_or(notebook)
                        .to_path_buf(),
                    artifacts: artifacts.iter().map(|a| a.name.clone()).collect(),
                };
                match groups.iter_mut().find(|group| group.kind == record.kind) {
                    Some(group) => group.chapters.push(chapter),
                    None => groups.push(ChapterGroup {
                        kind: record.kind,
                        chapters: vec![chapter],
                    }),
                }
            }
            RecordOutcome::Skipped { reason } | RecordOutcome::Failed { reason } => {
                diagnostics.push(Diagnostic {
                    dataset: record.path.clone(),
                    kind: record.kind,
                    status: record.status().to_string(),
                    reason: reason.clone(),
                });
            }
        }
    }

    BookManifest {
        title: options.title.clone(),
        generated: options.generated_at.unwrap_or_else(Utc::now),
        groups,
        diagnostics,
    }
}
