//! Sections for FreeSurfer subjects directories.

use std::collections::BTreeMap;

use flux_ingest::{DatasetIndex, IndexError};
use flux_model::{Dimension, Table};
use tracing::debug;

use crate::context::{ContextKey, SharedContext};
use crate::error::{SectionError, SectionResult};
use crate::section::SectionOutput;

/// Measures reported from `aseg.stats`, in column order.
pub const ASEG_MEASURES: [&str; 6] = [
    "BrainSegVol",
    "BrainSegVolNotVent",
    "lhCortexVol",
    "rhCortexVol",
    "SubCortGrayVol",
    "eTIV",
];

/// Parses `# Measure` lines: `# Measure <struct>, <name>, <desc>, <value>, <unit>`.
pub fn parse_measures(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .filter(|line| line.starts_with("# Measure"))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [_, name, _, value, ..] => Some(((*name).to_string(), (*value).to_string())),
                _ => None,
            }
        })
        .collect()
}

pub(super) fn overview(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    ctx.set(ContextKey::Subjects, index.dimension_values(Dimension::Subject)?);
    let subjects = ctx.require(ContextKey::Subjects)?;
    let stats_kinds = index.dimension_values(Dimension::Suffix)?;

    let text = format!(
        "## FreeSurfer overview\n\n\
         - Subjects: {}\n\
         - Stats files: {}\n\
         - Stats tables: {}",
        subjects.len(),
        index.len(),
        stats_kinds.len(),
    );
    Ok(SectionOutput::new().markdown(text))
}

/// Stats files per subject, including subjects without a stats directory.
pub(super) fn subjects(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let files = index.count(&[Dimension::Subject])?;
    let aseg = index.count_where(&[(Dimension::Suffix, "aseg")], &[Dimension::Subject])?;
    let subjects = ctx.require(ContextKey::Subjects)?;

    let mut table = Table::new(["subject", "n_stats_files", "has_aseg"]);
    let mut incomplete = 0usize;
    for subject in subjects {
        let key = vec![subject.clone()];
        let n = files.get(&key).copied().unwrap_or(0);
        let has_aseg = aseg.contains_key(&key);
        if !has_aseg {
            incomplete += 1;
        }
        table
            .push_row([subject.clone(), n.to_string(), if has_aseg { "yes" } else { "no" }.to_string()])
            .map_err(|e| SectionError::failed(e.to_string()))?;
    }

    let text = format!(
        "## Subjects\n\n{} subjects, {incomplete} without aseg.stats.",
        subjects.len()
    );
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("fs_subjects", table))
}

/// Whole-brain and cortical volumes from each subject's `aseg.stats`.
pub(super) fn aseg(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let entries = index.select(&[(Dimension::Suffix, "aseg")])?;
    let subjects = ctx.require(ContextKey::Subjects)?;

    let mut table = Table::new(std::iter::once("subject").chain(ASEG_MEASURES));
    for subject in subjects {
        let Some(entry) = entries
            .iter()
            .find(|entry| entry.entity(Dimension::Subject) == Some(subject.as_str()))
        else {
            continue;
        };
        let path = index.absolute_path(entry);
        let text = std::fs::read_to_string(&path).map_err(|e| IndexError::FileRead {
            path: path.clone(),
            source: e,
        })?;
        let measures = parse_measures(&text);
        debug!(subject = %subject, measures = measures.len(), "Parsed aseg.stats");

        let mut row = vec![subject.clone()];
        row.extend(
            ASEG_MEASURES
                .iter()
                .map(|name| measures.get(*name).cloned().unwrap_or_default()),
        );
        table
            .push_row(row)
            .map_err(|e| SectionError::failed(e.to_string()))?;
    }

    let text = format!(
        "## Subcortical segmentation\n\n{} of {} subjects have aseg.stats. Volumes in mm^3.",
        table.row_count(),
        subjects.len()
    );
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("aseg_summary", table))
}
