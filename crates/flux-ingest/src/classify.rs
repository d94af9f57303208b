//! Dataset kind classification.
//!
//! Classifiers run in a fixed priority order and the first match wins.
//! Derivative datasets also carry `dataset_description.json`, so the
//! generic BIDS check comes last.

use std::path::Path;

use flux_model::DatasetKind;
use tracing::warn;

use crate::layout::{file_name, is_present_file, labelled_dirs, list_files};
use crate::metadata::{DESCRIPTION_FILE, JsonObject, generated_by, read_description};

type Classifier = fn(&Path, Option<&JsonObject>) -> bool;

const CLASSIFIERS: [(DatasetKind, Classifier); 3] = [
    (DatasetKind::Mriqc, is_mriqc),
    (DatasetKind::Freesurfer, is_freesurfer),
    (DatasetKind::Bids, is_bids),
];

/// Decides the kind of the dataset rooted at `root`.
///
/// Unreadable descriptions are treated as absent; unreadable directories
/// classify as [`DatasetKind::Unknown`].
pub fn classify(root: &Path) -> DatasetKind {
    if !root.is_dir() {
        return DatasetKind::Unknown;
    }
    let description = match read_description(root) {
        Ok(description) => description,
        Err(e) => {
            warn!(path = %root.display(), error = %e, "Ignoring unreadable dataset description");
            None
        }
    };

    CLASSIFIERS
        .iter()
        .find(|(_, matches)| matches(root, description.as_ref()))
        .map(|(kind, _)| *kind)
        .unwrap_or(DatasetKind::Unknown)
}

fn generated_by_contains(description: Option<&JsonObject>, pipeline: &str) -> bool {
    description
        .map(|description| {
            generated_by(description)
                .iter()
                .any(|name| name.eq_ignore_ascii_case(pipeline))
        })
        .unwrap_or(false)
}

fn is_mriqc(root: &Path, description: Option<&JsonObject>) -> bool {
    if generated_by_contains(description, "mriqc") {
        return true;
    }
    list_files(root)
        .map(|files| {
            files.iter().any(|path| {
                let name = file_name(path);
                name.starts_with("group_") && name.ends_with(".html")
            })
        })
        .unwrap_or(false)
}

fn is_freesurfer(root: &Path, description: Option<&JsonObject>) -> bool {
    if generated_by_contains(description, "freesurfer") {
        return true;
    }
    labelled_dirs(root, "sub")
        .map(|subjects| {
            subjects
                .iter()
                .any(|(_, dir)| is_present_file(&dir.join("stats").join("aseg.stats")))
        })
        .unwrap_or(false)
}

fn is_bids(root: &Path, _description: Option<&JsonObject>) -> bool {
    is_present_file(&root.join(DESCRIPTION_FILE))
}
