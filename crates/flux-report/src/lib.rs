//! Output writers for dataset summaries.
//!
//! Serializes [`flux_model::NotebookDocument`]s as nbformat 4.5 notebooks,
//! tabular artifacts as CSV, and book manifests with a jupyter-book scaffold.

mod book;
mod bundle;
mod csv_out;
mod error;
mod hash;
mod notebook;
mod render;

pub use book::{BookFiles, INTRO_FILE, MANIFEST_FILE, TOC_FILE, render_intro, render_toc, write_book, write_manifest};
pub use bundle::{WrittenBundle, write_bundle};
pub use csv_out::table_to_csv;
pub use error::{ReportError, Result};
pub use hash::sha256_hex;
pub use notebook::{NBFORMAT, NBFORMAT_MINOR, render_notebook};
pub use render::{markdown_table, plain_table};
