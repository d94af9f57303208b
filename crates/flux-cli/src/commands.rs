//! Command runners behind `flux generate` and `flux book`.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use flux_core::{BookOptions, PipelineBuilder, PipelineResult, SuperdatasetWalker, aggregate, builtin_registry};
use flux_ingest::DatasetIndex;
use flux_model::{BookManifest, DatasetKind, PipelineOptions, SubdatasetRecord};
use flux_report::BookFiles;
use tracing::{info, info_span};

use crate::config::{BookSettings, GenerateSettings};

/// Outcome of a single-dataset build.
#[derive(Debug)]
pub struct GenerateRun {
    pub dataset: PathBuf,
    pub kind: DatasetKind,
    pub result: PipelineResult,
}

/// Outcome of a superdataset build.
#[derive(Debug)]
pub struct BookRun {
    pub records: Vec<SubdatasetRecord>,
    pub manifest: BookManifest,
    pub files: BookFiles,
}

impl BookRun {
    /// True when at least one subdataset produced a notebook.
    pub fn any_built(&self) -> bool {
        self.records.iter().any(SubdatasetRecord::is_built)
    }
}

pub fn run_generate(settings: &GenerateSettings, options: PipelineOptions) -> Result<GenerateRun> {
    let span = info_span!("generate", dataset = %settings.dataset.display());
    let _guard = span.enter();

    let index = match settings.template {
        Some(kind) => DatasetIndex::build_as(&settings.dataset, kind),
        None => DatasetIndex::build(&settings.dataset),
    }
    .with_context(|| format!("index dataset {}", settings.dataset.display()))?;

    let kind = index.kind();
    if kind == DatasetKind::Unknown {
        bail!(
            "{} has no recognizable dataset markers; pass --template to choose a kind",
            settings.dataset.display()
        );
    }

    let mut builder = PipelineBuilder::new(builtin_registry()).with_options(options);
    if !settings.sections.is_empty() {
        builder = builder.with_sections(settings.sections.iter().cloned());
    }
    let result = builder
        .build(&index, &settings.outdir)
        .with_context(|| format!("build {kind} notebook for {}", settings.dataset.display()))?;

    Ok(GenerateRun {
        dataset: settings.dataset.clone(),
        kind,
        result,
    })
}

pub fn run_book(settings: &BookSettings, options: PipelineOptions) -> Result<BookRun> {
    let span = info_span!("book", superdataset = %settings.superdataset.display());
    let _guard = span.enter();

    let generated = options.timestamp();
    let options = options.with_generated_at(generated);
    let walk = SuperdatasetWalker::new(builtin_registry(), &settings.notebooks_dir)
        .with_options(options)
        .walk(&settings.superdataset)
        .with_context(|| format!("discover subdatasets in {}", settings.superdataset.display()))?;

    let total = walk.len();
    let mut records = Vec::with_capacity(total);
    for (position, record) in walk.enumerate() {
        info!(
            position = position + 1,
            total,
            path = %record.path,
            status = record.status(),
            "Processed subdataset"
        );
        records.push(record);
    }

    let book_options = BookOptions::default()
        .with_title(settings.title.clone())
        .with_generated_at(generated);
    let manifest = aggregate(&records, &settings.book_dir, &book_options);
    let files = flux_report::write_book(&settings.book_dir, &manifest)
        .with_context(|| format!("write book to {}", settings.book_dir.display()))?;

    Ok(BookRun {
        records,
        manifest,
        files,
    })
}
