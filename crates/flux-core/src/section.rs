//! Section trait and section output.
//!
//! A section is one self-contained piece of notebook content: it queries
//! the dataset index, may read or publish shared context, and emits
//! content blocks plus optional tabular artifacts.
//!
//! # Example
//!
//! ```ignore
//! use flux_core::{FnSection, SectionOutput, SectionRegistry};
//!
//! fn file_total(index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
//!     Ok(SectionOutput::new().markdown(format!("{} files", index.len())))
//! }
//!
//! let mut registry = SectionRegistry::new();
//! registry.register(Box::new(FnSection {
//!     name: "bids:total",
//!     description: "Total file count",
//!     kinds: &[DatasetKind::Bids],
//!     reads: &[],
//!     writes: &[],
//!     produce: file_total,
//! }))?;
//! ```

use flux_ingest::DatasetIndex;
use flux_model::{ContentBlock, DatasetKind, Table, TabularArtifact};

use crate::context::{ContextKey, SharedContext};
use crate::error::SectionResult;

/// Notebook content produced by one section.
pub trait Section: Send + Sync {
    /// Unique `<family>:<topic>` name (e.g. `bids:availability`).
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        "Notebook section"
    }

    /// Dataset kinds this section can run on.
    fn kinds(&self) -> &'static [DatasetKind];

    /// Context keys read; each must be written by an earlier section.
    fn reads(&self) -> &'static [ContextKey] {
        &[]
    }

    /// Context keys this section publishes.
    fn writes(&self) -> &'static [ContextKey] {
        &[]
    }

    /// Produces the section's blocks and artifacts.
    ///
    /// # Errors
    ///
    /// Index queries on unsupported dimensions, unreadable files, and unset
    /// context reads.
    fn produce(&self, index: &DatasetIndex, context: &mut SharedContext) -> SectionResult<SectionOutput>;

    fn applies_to(&self, kind: DatasetKind) -> bool {
        self.kinds().contains(&kind)
    }
}

/// Production function signature used by [`FnSection`].
pub type ProduceFn = fn(&DatasetIndex, &mut SharedContext) -> SectionResult<SectionOutput>;

/// Adapts a plain function and static metadata to the [`Section`] trait.
#[derive(Debug, Clone, Copy)]
pub struct FnSection {
    pub name: &'static str,
    pub description: &'static str,
    pub kinds: &'static [DatasetKind],
    pub reads: &'static [ContextKey],
    pub writes: &'static [ContextKey],
    pub produce: ProduceFn,
}

impl Section for FnSection {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn kinds(&self) -> &'static [DatasetKind] {
        self.kinds
    }

    fn reads(&self) -> &'static [ContextKey] {
        self.reads
    }

    fn writes(&self) -> &'static [ContextKey] {
        self.writes
    }

    fn produce(&self, index: &DatasetIndex, context: &mut SharedContext) -> SectionResult<SectionOutput> {
        (self.produce)(index, context)
    }
}

/// Ordered blocks plus the artifacts backing any displayed tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionOutput {
    pub blocks: Vec<ContentBlock>,
    pub artifacts: Vec<TabularArtifact>,
}

impl SectionOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markdown(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(ContentBlock::markdown(text));
        self
    }

    /// Code block without a pre-computed output.
    pub fn code(mut self, source: impl Into<String>) -> Self {
        self.blocks.push(ContentBlock::code(source));
        self
    }

    /// Displays `table` and records it as artifact `<artifact_name>.csv`.
    ///
    /// The displayed rows and the artifact rows are the same value.
    pub fn table(mut self, artifact_name: &str, source: impl Into<String>, table: Table) -> Self {
        self.blocks.push(ContentBlock::code_with_table(source, table.clone()));
        self.artifacts.push(TabularArtifact::new(artifact_name, table));
        self
    }

    /// Displays `table` with the standard reload-from-CSV source.
    pub fn reloaded_table(self, artifact_name: &str, table: Table) -> Self {
        let source = reload_source(artifact_name);
        self.table(artifact_name, source, table)
    }
}

/// Python that reloads an artifact next to the notebook and displays it.
pub fn reload_source(artifact_name: &str) -> String {
    format!("{artifact_name} = pd.read_csv('{artifact_name}.csv')\n{artifact_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_output_shares_rows_with_artifact() {
        let mut table = Table::new(["subject", "anat"]);
        table.push_row(["01", "2"]).unwrap();
        let output = SectionOutput::new()
            .markdown("## Availability")
            .reloaded_table("avail", table);

        assert_eq!(output.blocks.len(), 2);
        assert_eq!(output.artifacts.len(), 1);
        assert_eq!(output.blocks[1].table(), Some(&output.artifacts[0].table));
    }

    #[test]
    fn reload_source_reads_csv() {
        assert_eq!(
            reload_source("avail"),
            "avail = pd.read_csv('avail.csv')\navail"
        );
    }
}
