//! Built-in notebook sections.
//!
//! Each family module exposes plain production functions; this module binds
//! them to names, kinds and context dependencies.

mod bids;
mod common;
mod freesurfer;
mod mriqc;

use flux_model::DatasetKind;

use crate::context::ContextKey;
use crate::section::FnSection;

const BIDS: &[DatasetKind] = &[DatasetKind::Bids];
const MRIQC: &[DatasetKind] = &[DatasetKind::Mriqc];
const FREESURFER: &[DatasetKind] = &[DatasetKind::Freesurfer];
const ALL_KINDS: &[DatasetKind] = &DatasetKind::SUPPORTED;

/// Built-in sections in registration order.
pub static BUILTIN_SECTIONS: [FnSection; 14] = [
    FnSection {
        name: "bids:overview",
        description: "Dataset description and structural counts",
        kinds: BIDS,
        reads: &[],
        writes: &[
            ContextKey::Subjects,
            ContextKey::Sessions,
            ContextKey::Tasks,
            ContextKey::Datatypes,
        ],
        produce: bids::overview,
    },
    FnSection {
        name: "bids:metadata",
        description: "Participant demographics from participants.tsv",
        kinds: BIDS,
        reads: &[],
        writes: &[],
        produce: bids::participants,
    },
    FnSection {
        name: "bids:availability",
        description: "File counts per subject and datatype",
        kinds: BIDS,
        reads: &[ContextKey::Subjects, ContextKey::Datatypes],
        writes: &[],
        produce: bids::availability,
    },
    FnSection {
        name: "bids:func_runs",
        description: "BOLD runs per subject and task",
        kinds: BIDS,
        reads: &[ContextKey::Subjects],
        writes: &[],
        produce: bids::func_runs,
    },
    FnSection {
        name: "bids:tr",
        description: "Repetition time consistency per task",
        kinds: BIDS,
        reads: &[ContextKey::Tasks],
        writes: &[],
        produce: bids::repetition_time,
    },
    FnSection {
        name: "bids:suffixes",
        description: "File counts per datatype and suffix",
        kinds: BIDS,
        reads: &[],
        writes: &[],
        produce: bids::suffixes,
    },
    FnSection {
        name: "bids:sizes",
        description: "Total file size per datatype",
        kinds: BIDS,
        reads: &[ContextKey::Datatypes],
        writes: &[],
        produce: bids::sizes,
    },
    FnSection {
        name: "mriqc:overview",
        description: "MRIQC run summary",
        kinds: MRIQC,
        reads: &[],
        writes: &[ContextKey::Subjects],
        produce: mriqc::overview,
    },
    FnSection {
        name: "mriqc:group_reports",
        description: "Links to MRIQC group reports",
        kinds: MRIQC,
        reads: &[],
        writes: &[],
        produce: mriqc::group_reports,
    },
    FnSection {
        name: "mriqc:metrics",
        description: "Image quality metrics per scan",
        kinds: MRIQC,
        reads: &[ContextKey::Subjects],
        writes: &[],
        produce: mriqc::metrics,
    },
    FnSection {
        name: "freesurfer:overview",
        description: "FreeSurfer subjects directory summary",
        kinds: FREESURFER,
        reads: &[],
        writes: &[ContextKey::Subjects],
        produce: freesurfer::overview,
    },
    FnSection {
        name: "freesurfer:subjects",
        description: "Stats files per subject",
        kinds: FREESURFER,
        reads: &[ContextKey::Subjects],
        writes: &[],
        produce: freesurfer::subjects,
    },
    FnSection {
        name: "freesurfer:aseg",
        description: "Whole-brain volumes from aseg.stats",
        kinds: FREESURFER,
        reads: &[ContextKey::Subjects],
        writes: &[],
        produce: freesurfer::aseg,
    },
    FnSection {
        name: "common:explorer",
        description: "Loads every CSV artifact for interactive use",
        kinds: ALL_KINDS,
        reads: &[],
        writes: &[],
        produce: common::explorer,
    },
];

/// Joins values for prose, or `none`.
pub(crate) fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

/// Formats a JSON-derived number without trailing noise (`2.0`, `0.41`).
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
