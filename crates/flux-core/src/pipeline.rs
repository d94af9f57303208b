//! Single-dataset pipeline: run sections, then write artifacts and notebook.
//!
//! # Execution Order
//!
//! 1. Resolve sections for the index kind (or the explicit selection)
//! 2. Check declared context reads against earlier writes
//! 3. Run sections in order against one fresh [`SharedContext`]
//! 4. Write `<artifact>.csv` files, then `<kind>_summary.ipynb`
//!
//! Nothing is written unless every section succeeds.
//!
//! # Example
//!
//! ```ignore
//! use flux_core::{PipelineBuilder, builtin_registry};
//! use flux_ingest::DatasetIndex;
//!
//! let index = DatasetIndex::build("data/ds000001")?;
//! let result = PipelineBuilder::new(builtin_registry()).build(&index, "reports/ds000001".as_ref())?;
//! println!("{}", result.notebook.display());
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use flux_ingest::DatasetIndex;
use flux_model::{ArtifactSummary, NotebookDocument, NotebookDraft, PipelineOptions, TabularArtifact};
use flux_report::WrittenBundle;
use tracing::{debug, info, info_span};

use crate::context::{ContextKey, SharedContext};
use crate::error::{PipelineError, Result};
use crate::registry::SectionRegistry;
use crate::section::Section;

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub notebook: PathBuf,
    pub output_dir: PathBuf,
    pub document: NotebookDocument,
    pub artifacts: Vec<ArtifactSummary>,
    /// Names of the sections that ran, in order.
    pub sections: Vec<&'static str>,
}

/// Builds one notebook per dataset from a section registry.
#[derive(Clone)]
pub struct PipelineBuilder<'a> {
    registry: &'a SectionRegistry,
    options: PipelineOptions,
    selection: Option<Vec<String>>,
}

impl<'a> PipelineBuilder<'a> {
    pub fn new(registry: &'a SectionRegistry) -> Self {
        Self {
            registry,
            options: PipelineOptions::default(),
            selection: None,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs only the named sections, in the given order.
    ///
    /// Selected sections must still apply to the dataset kind.
    pub fn with_sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selection = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Sections to run for `index`, in execution order.
    pub fn plan(&self, index: &DatasetIndex) -> Result<Vec<&'a dyn Section>> {
        let kind = index.kind();
        let sections = match &self.selection {
            None => self.registry.applicable(kind),
            Some(names) => names
                .iter()
                .map(|name| {
                    self.registry
                        .get(name)
                        .ok_or_else(|| PipelineError::UnknownSection { name: name.clone() })
                })
                .collect::<Result<Vec<_>>>()?,
        };
        if sections.is_empty() {
            return Err(PipelineError::NoApplicableSections { kind });
        }
        for section in &sections {
            if !section.applies_to(kind) {
                return Err(PipelineError::UnsupportedKind {
                    section: section.name().to_string(),
                    kind,
                });
            }
        }
        if self.options.validate_context {
            check_context_dependencies(&sections)?;
        }
        Ok(sections)
    }

    /// Runs the pipeline for `index` and writes outputs into `output_dir`.
    pub fn build(&self, index: &DatasetIndex, output_dir: &Path) -> Result<PipelineResult> {
        let kind = index.kind();
        let span = info_span!("pipeline", kind = %kind, root = %index.root().display());
        let _guard = span.enter();

        let sections = self.plan(index)?;
        let mut context = SharedContext::new();
        let mut draft = NotebookDraft::new();
        let mut artifacts: Vec<TabularArtifact> = Vec::new();
        let mut artifact_names = BTreeSet::new();

        for section in &sections {
            debug!(section = section.name(), "Running section");
            let output = section
                .produce(index, &mut context)
                .map_err(|cause| PipelineError::Section {
                    section_name: section.name().to_string(),
                    cause,
                })?;
            for artifact in output.artifacts {
                if !artifact_names.insert(artifact.name.clone()) {
                    return Err(PipelineError::DuplicateArtifactName {
                        name: artifact.name,
                    });
                }
                artifacts.push(artifact);
            }
            draft.extend(output.blocks);
        }

        let document = draft.finalize(
            kind,
            index.root(),
            self.options.timestamp(),
            self.options.kernel.clone(),
        );

        let WrittenBundle {
            notebook,
            artifacts: summaries,
        } = flux_report::write_bundle(output_dir, &document, &artifacts)?;

        info!(
            sections = sections.len(),
            artifacts = summaries.len(),
            notebook = %notebook.display(),
            "Pipeline complete"
        );

        Ok(PipelineResult {
            notebook,
            output_dir: output_dir.to_path_buf(),
            document,
            artifacts: summaries,
            sections: sections.iter().map(|section| section.name()).collect(),
        })
    }
}

/// Every declared read must be written by a section earlier in the plan.
fn check_context_dependencies(sections: &[&dyn Section]) -> Result<()> {
    let mut written: BTreeSet<ContextKey> = BTreeSet::new();
    for section in sections {
        if let Some(key) = section.reads().iter().find(|key| !written.contains(*key)) {
            return Err(PipelineError::MissingContextDependency {
                section: section.name().to_string(),
                key: *key,
            });
        }
        written.extend(section.writes().iter().copied());
    }
    Ok(())
}
