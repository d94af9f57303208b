use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A named table written as `<name>.csv` next to the notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularArtifact {
    pub name: String,
    pub table: Table,
}

impl TabularArtifact {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }

    /// Stable target filename relative to the output directory.
    pub fn filename(&self) -> String {
        format!("{}.csv", self.name)
    }
}

/// What was written for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSummary {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
}
