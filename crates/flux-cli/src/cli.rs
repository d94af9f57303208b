//! CLI argument definitions for `flux`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use flux_cli::config::{DATASET_ROOT_ENV, DEFAULT_OUTDIR, OUTDIR_ENV};
use flux_model::{DEFAULT_KERNEL, DatasetKind};

#[derive(Parser)]
#[command(
    name = "flux",
    version,
    about = "Build summary notebooks for neuroimaging datasets",
    long_about = "Build summary notebooks for neuroimaging datasets.\n\n\
                  Supports raw BIDS datasets, MRIQC derivatives and FreeSurfer\n\
                  subjects directories. Superdatasets are rendered as a book."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build one notebook and its CSV tables for a dataset.
    Generate(GenerateArgs),

    /// Build a notebook per subdataset and assemble them into a book.
    Book(BookArgs),

    /// List the registered notebook sections.
    Sections,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Dataset root.
    #[arg(long = "dataset", value_name = "PATH", env = DATASET_ROOT_ENV)]
    pub dataset: PathBuf,

    /// Output directory.
    #[arg(long = "outdir", value_name = "DIR", env = OUTDIR_ENV, default_value = DEFAULT_OUTDIR)]
    pub outdir: PathBuf,

    /// Treat the dataset as this kind instead of detecting it.
    #[arg(long = "template", value_enum, value_name = "KIND")]
    pub template: Option<TemplateArg>,

    /// Run only these sections, in order (repeatable).
    #[arg(long = "section", value_name = "NAME")]
    pub sections: Vec<String>,

    /// Kernel name recorded in the notebook.
    #[arg(long = "kernel", default_value = DEFAULT_KERNEL)]
    pub kernel: String,
}

#[derive(Parser)]
pub struct BookArgs {
    /// Superdataset root holding one subdataset per directory.
    #[arg(long = "super", value_name = "PATH")]
    pub superdataset: PathBuf,

    /// Book directory for manifest.json, _toc.yml and intro.md.
    #[arg(long = "book", value_name = "DIR")]
    pub book: PathBuf,

    /// Directory for per-subdataset outputs (default: <BOOK>/notebooks).
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Book title.
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Kernel name recorded in each notebook.
    #[arg(long = "kernel", default_value = DEFAULT_KERNEL)]
    pub kernel: String,
}

/// Dataset kinds selectable with `--template`.
#[derive(Clone, Copy, ValueEnum)]
pub enum TemplateArg {
    Bids,
    Mriqc,
    Freesurfer,
}

impl From<TemplateArg> for DatasetKind {
    fn from(arg: TemplateArg) -> Self {
        match arg {
            TemplateArg::Bids => DatasetKind::Bids,
            TemplateArg::Mriqc => DatasetKind::Mriqc,
            TemplateArg::Freesurfer => DatasetKind::Freesurfer,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
