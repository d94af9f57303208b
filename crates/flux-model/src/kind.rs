//! Dataset kinds and the structural dimensions each kind can be queried on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Kind of dataset found at a root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Raw BIDS dataset.
    Bids,
    /// FreeSurfer derivatives (`sub-*/stats/*.stats`).
    Freesurfer,
    /// MRIQC derivatives (IQM JSON files and HTML reports).
    Mriqc,
    /// No recognizable signature.
    Unknown,
}

impl DatasetKind {
    /// Kinds that have a pipeline, in a stable order.
    pub const SUPPORTED: [DatasetKind; 3] =
        [DatasetKind::Bids, DatasetKind::Freesurfer, DatasetKind::Mriqc];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Bids => "bids",
            DatasetKind::Freesurfer => "freesurfer",
            DatasetKind::Mriqc => "mriqc",
            DatasetKind::Unknown => "unknown",
        }
    }

    /// Human-readable label used in notebook titles.
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Bids => "BIDS",
            DatasetKind::Freesurfer => "FreeSurfer",
            DatasetKind::Mriqc => "MRIQC",
            DatasetKind::Unknown => "Unknown",
        }
    }

    /// Dimensions an index of this kind can answer queries on.
    pub fn dimensions(self) -> &'static [Dimension] {
        match self {
            DatasetKind::Bids => &[
                Dimension::Subject,
                Dimension::Session,
                Dimension::Datatype,
                Dimension::Task,
                Dimension::Suffix,
            ],
            DatasetKind::Mriqc => &[
                Dimension::Subject,
                Dimension::Session,
                Dimension::Task,
                Dimension::Suffix,
            ],
            DatasetKind::Freesurfer => &[Dimension::Subject, Dimension::Suffix],
            DatasetKind::Unknown => &[],
        }
    }

    pub fn supports(self, dimension: Dimension) -> bool {
        self.dimensions().contains(&dimension)
    }

    /// Fixed notebook filename for this kind's pipeline.
    pub fn notebook_filename(self) -> String {
        format!("{}_summary.ipynb", self.as_str())
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bids" => Ok(DatasetKind::Bids),
            "freesurfer" | "fs" => Ok(DatasetKind::Freesurfer),
            "mriqc" => Ok(DatasetKind::Mriqc),
            "unknown" => Ok(DatasetKind::Unknown),
            other => Err(ModelError::UnknownKind(other.to_string())),
        }
    }
}

/// A structural dimension of a dataset index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Subject,
    Session,
    Datatype,
    Task,
    /// BIDS filename suffix (`bold`, `T1w`) or FreeSurfer stats stem (`aseg`).
    Suffix,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Subject => "subject",
            Dimension::Session => "session",
            Dimension::Datatype => "datatype",
            Dimension::Task => "task",
            Dimension::Suffix => "suffix",
        }
    }

    /// BIDS filename entity key for this dimension, if it is encoded in names.
    pub fn entity_key(self) -> Option<&'static str> {
        match self {
            Dimension::Subject => Some("sub"),
            Dimension::Session => Some("ses"),
            Dimension::Task => Some("task"),
            Dimension::Datatype | Dimension::Suffix => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "subject" | "sub" => Ok(Dimension::Subject),
            "session" | "ses" => Ok(Dimension::Session),
            "datatype" => Ok(Dimension::Datatype),
            "task" => Ok(Dimension::Task),
            "suffix" => Ok(Dimension::Suffix),
            other => Err(ModelError::UnknownDimension(other.to_string())),
        }
    }
}
