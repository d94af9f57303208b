//! Dataset indexing for neuroimaging datasets.
//!
//! This crate scans BIDS raw datasets and MRIQC/FreeSurfer derivatives into
//! a read-only [`DatasetIndex`] that the section pipeline queries.
//!
//! # Features
//!
//! - **Indexing**: Per-kind layout scanners with entity extraction and sidecar metadata
//! - **Queries**: Distinct dimension values and grouped counts, kind-checked
//! - **Classification**: Fixed-priority kind detection from on-disk markers
//! - **Discovery**: Subdataset listing below a superdataset root
//!
//! # Example
//!
//! ```ignore
//! use flux_ingest::DatasetIndex;
//! use flux_model::Dimension;
//!
//! let index = DatasetIndex::build("data/ds000001")?;
//! let per_subject = index.count(&[Dimension::Subject])?;
//! let tasks = index.dimension_values(Dimension::Task)?;
//! ```

mod classify;
mod discovery;
mod entities;
mod error;
mod index;
mod layout;
mod metadata;

// === Error Types ===
pub use error::{IndexError, Result};

// === Index ===
pub use index::{Counts, DatasetIndex, IndexEntry};

// === Classification & Discovery ===
pub use classify::classify;
pub use discovery::{Candidate, discover_subdatasets};

// === Names & Metadata ===
pub use entities::{ParsedName, label_of, parse_filename};
pub use metadata::{
    DESCRIPTION_FILE, JsonObject, PARTICIPANTS_FILE, ParticipantRow, generated_by, number_field,
    read_json_object,
};
