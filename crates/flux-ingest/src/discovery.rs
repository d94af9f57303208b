//! Subdataset discovery below a superdataset root.

use std::path::{Path, PathBuf};

use flux_model::DatasetKind;
use tracing::debug;

use crate::classify::classify;
use crate::error::{IndexError, Result};
use crate::layout::{file_name, list_dirs};

/// A directory found below a superdataset root, with its detected kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute (or root-joined) path to the subdataset.
    pub path: PathBuf,
    /// Path relative to the superdataset root, `/`-separated.
    pub relative: String,
    pub kind: DatasetKind,
}

impl Candidate {
    /// Directory name for this candidate's outputs (`derivatives/mriqc`
    /// becomes `derivatives_mriqc`).
    pub fn output_name(&self) -> String {
        self.relative.replace('/', "_")
    }
}

/// Lists subdatasets in discovery order.
///
/// Immediate children are classified in lexical order. A child that is not
/// recognised but holds subdirectories is treated as a grouping directory
/// and its own children are classified instead; nesting stops there.
pub fn discover_subdatasets(root: &Path) -> Result<Vec<Candidate>> {
    if !root.is_dir() {
        return Err(IndexError::DatasetUnreadable {
            path: root.to_path_buf(),
            reason: "superdataset root is not a directory".to_string(),
        });
    }

    let mut candidates = Vec::new();
    for child in list_dirs(root)? {
        let name = file_name(&child).to_string();
        let kind = classify(&child);
        if kind == DatasetKind::Unknown {
            let grandchildren = list_dirs(&child)?;
            if !grandchildren.is_empty() {
                debug!(path = %name, "Treating unrecognised directory as grouping directory");
                for grandchild in grandchildren {
                    let relative = format!("{}/{}", name, file_name(&grandchild));
                    let kind = classify(&grandchild);
                    candidates.push(Candidate {
                        path: grandchild,
                        relative,
                        kind,
                    });
                }
                continue;
            }
        }
        candidates.push(Candidate {
            path: child,
            relative: name,
            kind,
        });
    }
    Ok(candidates)
}
