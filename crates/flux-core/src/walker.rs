//! Superdataset walker: one pipeline run per discovered subdataset.
//!
//! Failures are recorded per subdataset and never stop the walk.

use std::path::{Path, PathBuf};

use flux_ingest::{Candidate, DatasetIndex, IndexError, discover_subdatasets};
use flux_model::{DatasetKind, PipelineOptions, RecordOutcome, SubdatasetRecord};
use tracing::{info, info_span, warn};

use crate::pipeline::PipelineBuilder;
use crate::registry::SectionRegistry;

/// Reason recorded for subdatasets no classifier recognised.
pub const UNRECOGNISED_REASON: &str = "no recognizable dataset markers";

/// Walks a superdataset and builds a notebook for each subdataset.
pub struct SuperdatasetWalker<'a> {
    registry: &'a SectionRegistry,
    out_root: PathBuf,
    options: PipelineOptions,
}

impl<'a> SuperdatasetWalker<'a> {
    /// Outputs land in `<out_root>/<subdataset path with '/' as '_'>`.
    pub fn new(registry: &'a SectionRegistry, out_root: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            out_root: out_root.into(),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Discovers subdatasets below `root`.
    ///
    /// Discovery happens now; each subdataset is processed when the returned
    /// iterator reaches it.
    pub fn walk(&self, root: &Path) -> Result<Walk<'a>, IndexError> {
        let candidates = discover_subdatasets(root)?;
        info!(
            root = %root.display(),
            subdatasets = candidates.len(),
            "Discovered subdatasets"
        );
        Ok(Walk {
            builder: PipelineBuilder::new(self.registry).with_options(self.options.clone()),
            out_root: self.out_root.clone(),
            candidates: candidates.into_iter(),
        })
    }
}

/// Lazy, single-pass sequence of subdataset records in discovery order.
pub struct Walk<'a> {
    builder: PipelineBuilder<'a>,
    out_root: PathBuf,
    candidates: std::vec::IntoIter<Candidate>,
}

impl Walk<'_> {
    /// Subdatasets not yet processed.
    pub fn remaining(&self) -> usize {
        self.candidates.len()
    }

    fn process(&self, candidate: Candidate) -> SubdatasetRecord {
        let span = info_span!("subdataset", path = %candidate.relative, kind = %candidate.kind);
        let _guard = span.enter();

        let outcome = if candidate.kind == DatasetKind::Unknown {
            info!("Skipping unrecognised directory");
            RecordOutcome::Skipped {
                reason: UNRECOGNISED_REASON.to_string(),
            }
        } else {
            let out_dir = self.out_root.join(candidate.output_name());
            match self.build(&candidate, &out_dir) {
                Ok(outcome) => outcome,
                Err(reason) => {
                    warn!(error = %reason, "Subdataset failed");
                    RecordOutcome::Failed { reason }
                }
            }
        };

        SubdatasetRecord {
            path: candidate.relative,
            kind: candidate.kind,
            outcome,
        }
    }

    fn build(&self, candidate: &Candidate, out_dir: &Path) -> Result<RecordOutcome, String> {
        let index = DatasetIndex::build_as(&candidate.path, candidate.kind).map_err(|e| e.to_string())?;
        let result = self
            .builder
            .build(&index, out_dir)
            .map_err(|e| e.to_string())?;
        Ok(RecordOutcome::Built {
            notebook: result.notebook,
            artifact_dir: result.output_dir,
            artifacts: result.artifacts,
        })
    }
}

impl Iterator for Walk<'_> {
    type Item = SubdatasetRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.candidates.next()?;
        Some(self.process(candidate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.candidates.size_hint()
    }
}

impl ExactSizeIterator for Walk<'_> {}
