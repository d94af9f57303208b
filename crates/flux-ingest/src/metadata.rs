//! Dataset-level metadata: `dataset_description.json`, `participants.tsv`
//! and JSON sidecars.

use std::collections::BTreeMap;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::{Map, Value};

use crate::error::{IndexError, Result};

pub const DESCRIPTION_FILE: &str = "dataset_description.json";
pub const PARTICIPANTS_FILE: &str = "participants.tsv";

/// JSON object as read from a sidecar or description file.
pub type JsonObject = Map<String, Value>;

/// One row of `participants.tsv`, keyed by column header.
pub type ParticipantRow = BTreeMap<String, String>;

/// Reads a file that must contain a top-level JSON object.
pub fn read_json_object(path: &Path) -> Result<JsonObject> {
    let text = std::fs::read_to_string(path).map_err(|e| IndexError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(IndexError::Metadata {
            path: path.to_path_buf(),
            reason: "expected a JSON object".to_string(),
        }),
        Err(e) => Err(IndexError::Metadata {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Reads `dataset_description.json` under `root`, if present.
pub fn read_description(root: &Path) -> Result<Option<JsonObject>> {
    let path = root.join(DESCRIPTION_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    read_json_object(&path).map(Some)
}

/// Names of the pipelines that generated a derivative dataset.
///
/// Reads `GeneratedBy[].Name` and the legacy `PipelineDescription.Name`.
pub fn generated_by(description: &JsonObject) -> Vec<String> {
    let mut names: Vec<String> = description
        .get("GeneratedBy")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("Name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();
    if let Some(name) = description
        .get("PipelineDescription")
        .and_then(|pipeline| pipeline.get("Name"))
        .and_then(Value::as_str)
    {
        names.push(name.to_string());
    }
    names
}

/// Reads a tab-separated participants table.
///
/// Header BOMs are stripped and values trimmed; `n/a` is kept verbatim.
pub fn read_participants(path: &Path) -> Result<Vec<ParticipantRow>> {
    let metadata_err = |reason: String| IndexError::Metadata {
        path: path.to_path_buf(),
        reason,
    };

    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| metadata_err(e.to_string()))?;

    let headers = reader
        .headers()
        .map_err(|e| metadata_err(e.to_string()))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| metadata_err(e.to_string()))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.trim().to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Numeric value of a sidecar field, accepting numbers and numeric strings.
pub fn number_field(object: &JsonObject, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
