//! The dataset index: a read-only view of a dataset's files and entities.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use flux_model::{DatasetKind, Dimension};
use serde_json::Map;
use tracing::{debug, info, warn};

use crate::classify::classify;
use crate::entities::{ParsedName, label_of, parse_filename};
use crate::error::{IndexError, Result};
use crate::layout::{file_name, labelled_dirs, list_dirs, list_files, walk_files};
use crate::metadata::{
    JsonObject, PARTICIPANTS_FILE, ParticipantRow, read_description, read_json_object,
    read_participants,
};

/// One counted file in a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Path relative to the dataset root.
    pub path: PathBuf,
    entities: BTreeMap<Dimension, String>,
    /// File size in bytes.
    pub size: u64,
    /// Sidecar JSON for BIDS files, the file content for MRIQC IQM files.
    pub metadata: Option<JsonObject>,
}

impl IndexEntry {
    pub fn entity(&self, dimension: Dimension) -> Option<&str> {
        self.entities.get(&dimension).map(String::as_str)
    }

    pub fn entities(&self) -> &BTreeMap<Dimension, String> {
        &self.entities
    }

    fn matches(&self, filters: &[(Dimension, &str)]) -> bool {
        filters
            .iter()
            .all(|(dimension, value)| self.entity(*dimension) == Some(*value))
    }
}

/// Count of entries per group key, ordered by key.
pub type Counts = BTreeMap<Vec<String>, usize>;

/// Indexed view of one dataset.
///
/// Built once per dataset and never mutated. Queries are restricted to the
/// dimensions the dataset's kind supports.
#[derive(Debug, Clone)]
pub struct DatasetIndex {
    root: PathBuf,
    kind: DatasetKind,
    entries: Vec<IndexEntry>,
    subject_dirs: BTreeSet<String>,
    session_dirs: BTreeSet<String>,
    description: Option<JsonObject>,
    participants: Vec<ParticipantRow>,
    reports: Vec<PathBuf>,
}

impl DatasetIndex {
    /// Indexes `root`, classifying its kind from on-disk markers.
    pub fn build(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        ensure_readable(root)?;
        Self::build_as(root, classify(root))
    }

    /// Indexes `root` with an explicit kind, skipping classification.
    pub fn build_as(root: impl AsRef<Path>, kind: DatasetKind) -> Result<Self> {
        let root = root.as_ref();
        ensure_readable(root)?;

        let mut index = DatasetIndex {
            root: root.to_path_buf(),
            kind,
            entries: Vec::new(),
            subject_dirs: BTreeSet::new(),
            session_dirs: BTreeSet::new(),
            description: optional_metadata(read_description(root), root),
            participants: Vec::new(),
            reports: Vec::new(),
        };

        match kind {
            DatasetKind::Bids => index.scan_bids()?,
            DatasetKind::Mriqc => index.scan_mriqc()?,
            DatasetKind::Freesurfer => index.scan_freesurfer()?,
            DatasetKind::Unknown => {}
        }
        index.entries.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            root = %root.display(),
            kind = %kind,
            entries = index.entries.len(),
            subjects = index.subject_dirs.len(),
            "Indexed dataset"
        );
        Ok(index)
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries sorted by relative path.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn description(&self) -> Option<&JsonObject> {
        self.description.as_ref()
    }

    /// Rows of `participants.tsv` (BIDS only, empty when absent).
    pub fn participants(&self) -> &[ParticipantRow] {
        &self.participants
    }

    /// HTML report files relative to the root (MRIQC only).
    pub fn reports(&self) -> &[PathBuf] {
        &self.reports
    }

    /// Absolute location of an entry's file.
    pub fn absolute_path(&self, entry: &IndexEntry) -> PathBuf {
        self.root.join(&entry.path)
    }

    fn check(&self, dimension: Dimension) -> Result<()> {
        if self.kind.supports(dimension) {
            Ok(())
        } else {
            Err(IndexError::DimensionUnsupported {
                dimension,
                kind: self.kind,
            })
        }
    }

    /// Distinct values of `dimension`.
    ///
    /// Subjects include subject directories without counted files, and
    /// sessions include session directories.
    pub fn dimension_values(&self, dimension: Dimension) -> Result<BTreeSet<String>> {
        self.check(dimension)?;
        let mut values: BTreeSet<String> = self
            .entries
            .iter()
            .filter_map(|entry| entry.entity(dimension))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        match dimension {
            Dimension::Subject => values.extend(self.subject_dirs.iter().cloned()),
            Dimension::Session => values.extend(self.session_dirs.iter().cloned()),
            _ => {}
        }
        Ok(values)
    }

    /// Entry counts grouped by `group_by`.
    ///
    /// An empty `group_by` yields a single `[] -> total` row, present even
    /// when the dataset has no entries.
    pub fn count(&self, group_by: &[Dimension]) -> Result<Counts> {
        self.count_where(&[], group_by)
    }

    /// Like [`count`](Self::count), restricted to entries matching every filter.
    ///
    /// Entries missing a grouped entity are counted under `""`.
    pub fn count_where(&self, filters: &[(Dimension, &str)], group_by: &[Dimension]) -> Result<Counts> {
        for dimension in filters.iter().map(|(d, _)| d).chain(group_by) {
            self.check(*dimension)?;
        }

        let mut counts = Counts::new();
        if group_by.is_empty() {
            counts.insert(Vec::new(), 0);
        }
        for entry in self.entries.iter().filter(|entry| entry.matches(filters)) {
            let key = group_by
                .iter()
                .map(|dimension| entry.entity(*dimension).unwrap_or("").to_string())
                .collect();
            *counts.entry(key).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Entries matching every filter, in path order.
    pub fn select(&self, filters: &[(Dimension, &str)]) -> Result<Vec<&IndexEntry>> {
        for (dimension, _) in filters {
            self.check(*dimension)?;
        }
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.matches(filters))
            .collect())
    }

    // === Layout scanners ===

    fn scan_bids(&mut self) -> Result<()> {
        let root = self.root.clone();
        let mut sidecars = SidecarCache::default();

        for (subject, subject_dir) in labelled_dirs(&root, "sub")? {
            self.subject_dirs.insert(subject.clone());

            let mut containers = vec![(None, subject_dir.clone())];
            for (session, session_dir) in labelled_dirs(&subject_dir, "ses")? {
                self.session_dirs.insert(session.clone());
                containers.push((Some(session), session_dir));
            }

            for (session, container) in containers {
                for datatype_dir in list_dirs(&container)? {
                    let datatype = file_name(&datatype_dir).to_string();
                    if label_of(&datatype, "ses").is_some() {
                        continue;
                    }
                    for file in list_files(&datatype_dir)? {
                        let parsed = parse_filename(file_name(&file));
                        if parsed.extension == ".json" {
                            continue;
                        }
                        let mut entities = BTreeMap::new();
                        entities.insert(
                            Dimension::Subject,
                            parsed.entity("sub").unwrap_or(&subject).to_string(),
                        );
                        if let Some(session) = parsed.entity("ses").or(session.as_deref()) {
                            entities.insert(Dimension::Session, session.to_string());
                        }
                        entities.insert(Dimension::Datatype, datatype.clone());
                        let mut chain = vec![root.as_path(), subject_dir.as_path()];
                        if session.is_some() {
                            chain.push(container.as_path());
                        }
                        chain.push(datatype_dir.as_path());
                        let metadata = sidecars.sidecar(&chain, &parsed)?;
                        let entry = self.make_entry(&file, &parsed, entities, metadata)?;
                        self.entries.push(entry);
                    }
                }
            }
        }

        let participants = root.join(PARTICIPANTS_FILE);
        if participants.is_file() {
            self.participants =
                optional_metadata(read_participants(&participants).map(Some), &participants)
                    .unwrap_or_default();
        }
        Ok(())
    }

    fn scan_mriqc(&mut self) -> Result<()> {
        let root = self.root.clone();
        for (subject, subject_dir) in labelled_dirs(&root, "sub")? {
            self.subject_dirs.insert(subject);
            for (session, _) in labelled_dirs(&subject_dir, "ses")? {
                self.session_dirs.insert(session);
            }
        }

        for file in walk_files(&root)? {
            let name = file_name(&file);
            if name.ends_with(".html") {
                self.reports.push(relative_to(&root, &file));
                continue;
            }
            if !(name.starts_with("sub-") && name.ends_with(".json")) {
                continue;
            }
            let parsed = parse_filename(name);
            let metadata = load_optional(&file);
            let entry = self.make_entry(&file, &parsed, BTreeMap::new(), metadata)?;
            self.entries.push(entry);
        }
        Ok(())
    }

    fn scan_freesurfer(&mut self) -> Result<()> {
        let root = self.root.clone();
        for (subject, subject_dir) in labelled_dirs(&root, "sub")? {
            self.subject_dirs.insert(subject.clone());
            let stats_dir = subject_dir.join("stats");
            if !stats_dir.is_dir() {
                debug!(subject = %subject, "No stats directory");
                continue;
            }
            for file in list_files(&stats_dir)? {
                let Some(stem) = file_name(&file).strip_suffix(".stats") else {
                    continue;
                };
                let mut entities = BTreeMap::new();
                entities.insert(Dimension::Subject, subject.clone());
                entities.insert(Dimension::Suffix, stem.to_string());
                let entry = IndexEntry {
                    path: relative_to(&root, &file),
                    entities,
                    size: file_size(&file)?,
                    metadata: None,
                };
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    /// Builds an entry from a parsed BIDS-style name. Entities already in
    /// `entities` take precedence over those parsed from the name.
    fn make_entry(
        &self,
        file: &Path,
        parsed: &ParsedName,
        mut entities: BTreeMap<Dimension, String>,
        metadata: Option<JsonObject>,
    ) -> Result<IndexEntry> {
        for &dimension in self.kind.dimensions() {
            let label = dimension.entity_key().and_then(|key| parsed.entities.get(key));
            if let Some(label) = label {
                entities.entry(dimension).or_insert_with(|| label.clone());
            }
        }
        if let Some(suffix) = &parsed.suffix {
            entities.entry(Dimension::Suffix).or_insert_with(|| suffix.clone());
        }

        Ok(IndexEntry {
            path: relative_to(&self.root, file),
            entities,
            size: file_size(file)?,
            metadata,
        })
    }
}

fn ensure_readable(root: &Path) -> Result<()> {
    let unreadable = |reason: String| IndexError::DatasetUnreadable {
        path: root.to_path_buf(),
        reason,
    };
    let meta = std::fs::metadata(root).map_err(|e| unreadable(e.to_string()))?;
    if !meta.is_dir() {
        return Err(unreadable("not a directory".to_string()));
    }
    std::fs::read_dir(root).map_err(|e| unreadable(e.to_string()))?;
    Ok(())
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}

/// Size of the file content, or of the link itself when the content is
/// not present locally.
fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .or_else(|_| std::fs::symlink_metadata(path))
        .map(|meta| meta.len())
        .map_err(|e| IndexError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Optional metadata is logged and dropped when malformed.
fn optional_metadata<T>(result: Result<Option<T>>, path: &Path) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable metadata");
            None
        }
    }
}

fn load_optional(path: &Path) -> Option<JsonObject> {
    if !path.is_file() {
        return None;
    }
    optional_metadata(read_json_object(path).map(Some), path)
}

/// A parsed `.json` sidecar candidate.
struct Sidecar {
    name: ParsedName,
    content: Option<JsonObject>,
}

impl Sidecar {
    /// Same suffix, and every entity of the sidecar appears in the data
    /// file with the same label.
    fn applies_to(&self, file: &ParsedName) -> bool {
        self.name.suffix.is_some()
            && self.name.suffix == file.suffix
            && self
                .name
                .entities
                .iter()
                .all(|(key, label)| file.entities.get(key) == Some(label))
    }
}

/// JSON sidecars per directory, listed and parsed once per build.
#[derive(Default)]
struct SidecarCache {
    dirs: BTreeMap<PathBuf, Vec<Sidecar>>,
}

impl SidecarCache {
    /// Merges every applicable sidecar along `chain` (dataset root down to
    /// the file's own directory). Deeper directories override shallower
    /// ones; within a directory, names with more entities override fewer.
    fn sidecar(&mut self, chain: &[&Path], file: &ParsedName) -> Result<Option<JsonObject>> {
        let mut merged: Option<JsonObject> = None;
        for dir in chain {
            let mut applicable: Vec<&Sidecar> = self
                .load(dir)?
                .iter()
                .filter(|sidecar| sidecar.applies_to(file))
                .collect();
            applicable.sort_by_key(|sidecar| sidecar.name.entities.len());
            for content in applicable.into_iter().filter_map(|sidecar| sidecar.content.as_ref()) {
                merged
                    .get_or_insert_with(Map::new)
                    .extend(content.iter().map(|(key, value)| (key.clone(), value.clone())));
            }
        }
        Ok(merged)
    }

    fn load(&mut self, dir: &Path) -> Result<&[Sidecar]> {
        if !self.dirs.contains_key(dir) {
            let mut sidecars = Vec::new();
            for path in list_files(dir)? {
                let name = parse_filename(file_name(&path));
                if name.extension != ".json" || name.suffix.is_none() {
                    continue;
                }
                let content = load_optional(&path);
                sidecars.push(Sidecar { name, content });
            }
            self.dirs.insert(dir.to_path_buf(), sidecars);
        }
        Ok(self.dirs.get(dir).map(Vec::as_slice).unwrap_or_default())
    }
}
