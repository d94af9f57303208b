//! A notebook and its artifacts written as one unit.

use std::path::{Path, PathBuf};

use flux_model::{ArtifactSummary, NotebookDocument, TabularArtifact};
use tracing::{debug, info, warn};

use crate::csv_out::encode_artifact;
use crate::error::{Result, create_dir, write_file};
use crate::notebook::encode_notebook;

/// Paths and summaries of a written bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenBundle {
    pub notebook: PathBuf,
    pub artifacts: Vec<ArtifactSummary>,
}

/// Writes every artifact CSV and then the notebook into `dir`.
///
/// All content is encoded before anything touches the disk. If a write
/// fails, files already written by this call are removed, and so is `dir`
/// when this call created it.
pub fn write_bundle(
    dir: &Path,
    document: &NotebookDocument,
    artifacts: &[TabularArtifact],
) -> Result<WrittenBundle> {
    let mut summaries = Vec::with_capacity(artifacts.len());
    let mut files = Vec::with_capacity(artifacts.len() + 1);
    for artifact in artifacts {
        let (summary, bytes) = encode_artifact(dir, artifact)?;
        files.push((summary.path.clone(), bytes));
        summaries.push(summary);
    }
    let (notebook, bytes) = encode_notebook(dir, document)?;
    files.push((notebook.clone(), bytes));

    let created = !dir.exists();
    create_dir(dir)?;
    let mut written: Vec<&Path> = Vec::with_capacity(files.len());
    for (path, bytes) in &files {
        if let Err(e) = write_file(path, bytes) {
            roll_back(&written, created.then_some(dir));
            return Err(e);
        }
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
        written.push(path);
    }

    info!(
        dir = %dir.display(),
        artifacts = summaries.len(),
        notebook = %notebook.display(),
        "Wrote notebook bundle"
    );
    Ok(WrittenBundle {
        notebook,
        artifacts: summaries,
    })
}

fn roll_back(written: &[&Path], created_dir: Option<&Path>) {
    for path in written {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Could not remove partial output");
        }
    }
    if let Some(dir) = created_dir
        && let Err(e) = std::fs::remove_dir(dir)
    {
        warn!(dir = %dir.display(), error = %e, "Could not remove output directory");
    }
}
