//! Resolved command settings and the environment variables behind them.

use std::path::PathBuf;

use flux_core::DEFAULT_BOOK_TITLE;
use flux_model::DatasetKind;

/// Dataset root used when `--dataset` is absent.
pub const DATASET_ROOT_ENV: &str = "FLUX_DATASET_ROOT";
/// Output directory used when `--outdir` is absent.
pub const OUTDIR_ENV: &str = "FLUX_OUTDIR";
pub const DEFAULT_OUTDIR: &str = "reports";
/// Notebook directory below the book directory when `--out` is absent.
pub const NOTEBOOKS_DIR: &str = "notebooks";

/// Settings for `flux generate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSettings {
    pub dataset: PathBuf,
    pub outdir: PathBuf,
    /// Forces the dataset kind instead of classifying the directory.
    pub template: Option<DatasetKind>,
    /// Explicit section selection; empty runs every applicable section.
    pub sections: Vec<String>,
}

/// Settings for `flux book`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSettings {
    pub superdataset: PathBuf,
    pub book_dir: PathBuf,
    /// Where per-subdataset outputs go; defaults to `<book>/notebooks`.
    pub notebooks_dir: PathBuf,
    pub title: String,
}

impl BookSettings {
    pub fn resolve(
        superdataset: PathBuf,
        book_dir: PathBuf,
        notebooks_dir: Option<PathBuf>,
        title: Option<String>,
    ) -> Self {
        let notebooks_dir = notebooks_dir.unwrap_or_else(|| book_dir.join(NOTEBOOKS_DIR));
        Self {
            superdataset,
            book_dir,
            notebooks_dir,
            title: title.unwrap_or_else(|| DEFAULT_BOOK_TITLE.to_string()),
        }
    }
}
