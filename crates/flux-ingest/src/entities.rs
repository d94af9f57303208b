//! BIDS filename entity parsing.
//!
//! Handles names like `sub-01_ses-1_task-rest_run-2_bold.nii.gz`:
//! `key-value` pairs joined by `_`, a trailing suffix, and an extension
//! starting at the first `.` after the suffix.

use std::collections::BTreeMap;

/// Components of a BIDS-style filename.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedName {
    /// Entity key to label (`sub` -> `01`), in filename order by key.
    pub entities: BTreeMap<String, String>,
    /// Last underscore-separated segment, without extension (`bold`).
    pub suffix: Option<String>,
    /// Extension including the leading dot (`.nii.gz`), empty if none.
    pub extension: String,
    /// Filename without extension.
    pub stem: String,
}

impl ParsedName {
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }
}

/// Parses a filename into entities, suffix and extension.
///
/// Segments without a `-` before the last one are ignored; the last segment
/// is the suffix when it is not itself a `key-value` pair.
pub fn parse_filename(name: &str) -> ParsedName {
    let (stem, extension) = split_extension(name);
    let mut parsed = ParsedName {
        stem: stem.to_string(),
        extension: extension.to_string(),
        ..ParsedName::default()
    };

    let parts: Vec<&str> = stem.split('_').filter(|part| !part.is_empty()).collect();
    let last = parts.len().saturating_sub(1);
    for (idx, part) in parts.iter().enumerate() {
        match part.split_once('-') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => {
                parsed.entities.insert(key.to_string(), value.to_string());
            }
            _ if idx == last => parsed.suffix = Some((*part).to_string()),
            _ => {}
        }
    }
    parsed
}

/// Splits `name` at the first `.` following the last `_`.
fn split_extension(name: &str) -> (&str, &str) {
    let search_from = name.rfind('_').map(|idx| idx + 1).unwrap_or(0);
    match name[search_from..].find('.') {
        Some(offset) => name.split_at(search_from + offset),
        None => (name, ""),
    }
}

/// Strips a `key-` prefix from a directory name (`sub-01` -> `01`).
pub fn label_of<'a>(dir_name: &'a str, key: &str) -> Option<&'a str> {
    dir_name
        .strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|label| !label.is_empty())
}
