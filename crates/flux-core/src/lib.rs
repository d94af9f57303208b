//! Notebook assembly for neuroimaging datasets.
//!
//! This crate turns a [`flux_ingest::DatasetIndex`] into a summary notebook
//! and, for superdatasets, into a book of notebooks.
//!
//! # Features
//!
//! - **Sections**: Named, kind-scoped content producers with declared context dependencies
//! - **Registry**: Ordered, duplicate-free section registry with built-in BIDS/MRIQC/FreeSurfer sections
//! - **Pipeline**: Runs applicable sections and writes the notebook plus CSV artifacts
//! - **Walker**: Classifies and builds every subdataset of a superdataset
//! - **Book**: Aggregates walk records into a grouped manifest

mod book;
mod context;
mod error;
mod pipeline;
mod registry;
mod section;
mod sections;
mod walker;

// === Error Types ===
pub use error::{PipelineError, RegistryError, Result, SectionError, SectionResult};

// === Sections ===
pub use context::{ContextKey, SharedContext};
pub use registry::{SectionRegistry, builtin_registry};
pub use section::{FnSection, ProduceFn, Section, SectionOutput, reload_source};

// === Pipeline ===
pub use pipeline::{PipelineBuilder, PipelineResult};

// === Superdataset ===
pub use book::{BookOptions, DEFAULT_BOOK_TITLE, aggregate, chapter_label};
pub use walker::{SuperdatasetWalker, UNRECOGNISED_REASON, Walk};
