use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactSummary;
use crate::kind::DatasetKind;

/// Result of processing one discovered subdataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubdatasetRecord {
    /// Path relative to the superdataset root, `/`-separated.
    pub path: String,
    pub kind: DatasetKind,
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RecordOutcome {
    Built {
        notebook: PathBuf,
        artifact_dir: PathBuf,
        artifacts: Vec<ArtifactSummary>,
    },
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

impl SubdatasetRecord {
    pub fn is_built(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Built { .. })
    }

    pub fn status(&self) -> &'static str {
        match self.outcome {
            RecordOutcome::Built { .. } => "built",
            RecordOutcome::Skipped { .. } => "skipped",
            RecordOutcome::Failed { .. } => "failed",
        }
    }

    /// Reason text for skipped or failed records.
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            RecordOutcome::Built { .. } => None,
            RecordOutcome::Skipped { reason } | RecordOutcome::Failed { reason } => Some(reason),
        }
    }
}
