//! Directory listing helpers shared by the indexer and the classifiers.
//!
//! All listings skip hidden names (`.git`, `.datalad`, ...) and are sorted
//! by file name so every scan is deterministic.

use std::path::{Path, PathBuf};

use crate::error::{IndexError, Result};

/// Returns true for names starting with `.`.
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// File name as UTF-8, or empty when not representable.
pub fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

/// What a directory entry is, without requiring symlink targets to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Other,
}

/// Classifies `path` from its own metadata. Symlinks to directories are
/// directories; every other symlink, dangling ones included, is a file.
/// Unfetched annex content is a dangling symlink and still counts.
fn entry_kind(path: &Path, file_type: std::fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Dir
    } else if file_type.is_symlink() {
        if path.is_dir() { EntryKind::Dir } else { EntryKind::File }
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn read_children(dir: &Path) -> Result<Vec<(PathBuf, EntryKind)>> {
    let entries = std::fs::read_dir(dir).map_err(|e| IndexError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut children = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IndexError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if is_hidden(&path) {
            continue;
        }
        let file_type = entry.file_type().map_err(|e| IndexError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let kind = entry_kind(&path, file_type);
        children.push((path, kind));
    }

    children.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(children)
}

fn children_of(dir: &Path, wanted: EntryKind) -> Result<Vec<PathBuf>> {
    Ok(read_children(dir)?
        .into_iter()
        .filter(|(_, kind)| *kind == wanted)
        .map(|(path, _)| path)
        .collect())
}

/// True when `path` is a file or a symlink that does not lead to a directory.
pub fn is_present_file(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(meta) => entry_kind(path, meta.file_type()) == EntryKind::File,
        Err(_) => false,
    }
}

/// Lists immediate subdirectories of `dir`.
pub fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    children_of(dir, EntryKind::Dir)
}

/// Lists files directly inside `dir`, including dangling symlinks.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    children_of(dir, EntryKind::File)
}

/// Lists every file below `dir`, depth first.
pub fn walk_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for (child, kind) in read_children(dir)? {
        match kind {
            EntryKind::Dir => files.extend(walk_files(&child)?),
            EntryKind::File => files.push(child),
            EntryKind::Other => {}
        }
    }
    Ok(files)
}

/// Subdirectories of `dir` named `<key>-<label>`, paired with their label.
pub fn labelled_dirs(dir: &Path, key: &str) -> Result<Vec<(String, PathBuf)>> {
    Ok(list_dirs(dir)?
        .into_iter()
        .filter_map(|path| {
            crate::entities::label_of(file_name(&path), key).map(|label| (label.to_string(), path.clone()))
        })
        .collect())
}
