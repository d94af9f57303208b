//! Sections for raw BIDS datasets.

use std::collections::BTreeMap;

use flux_ingest::{DatasetIndex, number_field};
use flux_model::{Dimension, Table};
use tracing::debug;

use super::{format_number, join_or_none};
use crate::context::{ContextKey, SharedContext};
use crate::error::{SectionError, SectionResult};
use crate::section::SectionOutput;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

const BOLD_RUNS: [(Dimension, &str); 2] = [(Dimension::Datatype, "func"), (Dimension::Suffix, "bold")];

fn row_error(e: flux_model::ModelError) -> SectionError {
    SectionError::failed(e.to_string())
}

fn description_str<'a>(index: &'a DatasetIndex, key: &str) -> Option<&'a str> {
    index.description()?.get(key)?.as_str()
}

/// Publishes the structural lists and summarises them.
pub(super) fn overview(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let lists = [
        (ContextKey::Subjects, Dimension::Subject),
        (ContextKey::Sessions, Dimension::Session),
        (ContextKey::Tasks, Dimension::Task),
        (ContextKey::Datatypes, Dimension::Datatype),
    ];
    for (key, dimension) in lists {
        ctx.set(key, index.dimension_values(dimension)?);
    }

    let name = description_str(index, "Name")
        .map(str::to_string)
        .or_else(|| {
            index
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    let version = description_str(index, "BIDSVersion").unwrap_or("unspecified");

    let subjects = ctx.require(ContextKey::Subjects)?;
    let sessions = ctx.require(ContextKey::Sessions)?;
    let tasks = ctx.require(ContextKey::Tasks)?;
    let datatypes = ctx.require(ContextKey::Datatypes)?;

    let text = format!(
        "## Overview\n\n\
         - Dataset: **{name}** (BIDS {version})\n\
         - Subjects: {}\n\
         - Sessions: {}\n\
         - Tasks: {}\n\
         - Datatypes: {}\n\
         - Files indexed: {}",
        subjects.len(),
        if sessions.is_empty() {
            "none".to_string()
        } else {
            sessions.len().to_string()
        },
        join_or_none(tasks),
        join_or_none(datatypes),
        index.len(),
    );
    Ok(SectionOutput::new().markdown(text))
}

/// Participant counts by sex, with an age summary.
pub(super) fn participants(index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let rows = index.participants();
    let mut by_sex: BTreeMap<String, usize> = BTreeMap::new();
    let mut ages = Vec::new();
    for row in rows {
        let sex = row
            .get("sex")
            .map(|value| value.trim().to_uppercase())
            .filter(|value| !value.is_empty() && value != "N/A")
            .unwrap_or_else(|| "n/a".to_string());
        *by_sex.entry(sex).or_insert(0) += 1;
        if let Some(age) = row.get("age").and_then(|value| value.trim().parse::<f64>().ok()) {
            ages.push(age);
        }
    }

    let mut table = Table::new(["sex", "n_participants"]);
    for (sex, count) in &by_sex {
        table.push_row([sex.clone(), count.to_string()]).map_err(row_error)?;
    }

    let mut text = String::from("## Participants\n\n");
    if rows.is_empty() {
        text.push_str("No participants.tsv rows found.");
    } else {
        text.push_str(&format!("{} participants listed in participants.tsv.", rows.len()));
        if !ages.is_empty() {
            let mean = ages.iter().sum::<f64>() / ages.len() as f64;
            let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
            let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            text.push_str(&format!(
                " Age: mean {mean:.1}, range {} to {} ({} with age).",
                format_number(min),
                format_number(max),
                ages.len()
            ));
        }
    }

    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("participants_by_sex", table))
}

/// Subject by datatype file counts over the full grid.
pub(super) fn availability(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let counts = index.count(&[Dimension::Subject, Dimension::Datatype])?;
    let subjects = ctx.require(ContextKey::Subjects)?;
    let datatypes = ctx.require(ContextKey::Datatypes)?;

    let mut table = Table::new(std::iter::once("subject").chain(datatypes.iter().map(String::as_str)));
    for subject in subjects {
        let mut row = vec![subject.clone()];
        for datatype in datatypes {
            let n = counts
                .get(&vec![subject.clone(), datatype.clone()])
                .copied()
                .unwrap_or(0);
            row.push(n.to_string());
        }
        table.push_row(row).map_err(row_error)?;
    }

    let text = if datatypes.is_empty() {
        format!(
            "## Data availability\n\nNo datatype directories found for {} subjects.",
            subjects.len()
        )
    } else {
        format!(
            "## Data availability\n\nFile counts for {} subjects across {} datatypes ({}). Zero marks a missing datatype.",
            subjects.len(),
            datatypes.len(),
            datatypes.join(", ")
        )
    };
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("avail", table))
}

/// BOLD run counts per subject and task.
pub(super) fn func_runs(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let counts = index.count_where(&BOLD_RUNS, &[Dimension::Subject, Dimension::Task])?;
    let subjects = ctx.require(ContextKey::Subjects)?;

    if counts.is_empty() {
        return Ok(SectionOutput::new()
            .markdown("## Functional runs\n\n0 functional runs found.")
            .reloaded_table("func_counts", Table::new(["subject"])));
    }

    let mut per_subject: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();
    for (key, n) in &counts {
        if let [subject, task] = key.as_slice() {
            per_subject
                .entry(subject.as_str())
                .or_default()
                .insert(task.as_str(), *n);
        }
    }
    let mut tasks: Vec<&str> = per_subject.values().flat_map(|t| t.keys().copied()).collect();
    tasks.sort_unstable();
    tasks.dedup();

    let mut table = Table::new(
        std::iter::once("subject").chain(tasks.iter().map(|task| if task.is_empty() { "(no task)" } else { *task })),
    );
    for subject in subjects {
        let Some(runs) = per_subject.get(subject.as_str()) else {
            continue;
        };
        let mut row = vec![subject.clone()];
        row.extend(tasks.iter().map(|task| runs.get(task).copied().unwrap_or(0).to_string()));
        table.push_row(row).map_err(row_error)?;
    }

    let total: usize = counts.values().sum();
    let text = format!(
        "## Functional runs\n\n{total} functional runs across {} subjects and {} tasks.",
        table.row_count(),
        tasks.len()
    );
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("func_counts", table))
}

/// Distinct repetition times per task, flagging inconsistencies.
pub(super) fn repetition_time(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let runs = index.select(&BOLD_RUNS)?;
    let tasks = ctx.require(ContextKey::Tasks)?;

    let mut by_task: BTreeMap<String, Vec<(f64, usize)>> = BTreeMap::new();
    let mut missing = 0usize;
    for entry in runs {
        let task = entry.entity(Dimension::Task).unwrap_or("").to_string();
        let tr = entry
            .metadata
            .as_ref()
            .and_then(|meta| number_field(meta, "RepetitionTime"));
        let Some(tr) = tr else {
            missing += 1;
            continue;
        };
        let seen = by_task.entry(task).or_default();
        match seen.iter_mut().find(|(value, _)| *value == tr) {
            Some((_, n)) => *n += 1,
            None => seen.push((tr, 1)),
        }
    }

    let mut table = Table::new(["task", "repetition_time", "n_runs"]);
    let mut inconsistent = Vec::new();
    for (task, values) in &mut by_task {
        values.sort_by(|a, b| a.0.total_cmp(&b.0));
        if values.len() > 1 {
            let listed: Vec<String> = values.iter().map(|(tr, _)| format_number(*tr)).collect();
            inconsistent.push(format!(
                "- **{task}**: inconsistent repetition times ({} s)",
                listed.join(", ")
            ));
        }
        for (tr, n) in values.iter() {
            table
                .push_row([task.clone(), format_number(*tr), n.to_string()])
                .map_err(row_error)?;
        }
    }

    let mut text = String::from("## Repetition time\n\n");
    if table.is_empty() {
        text.push_str("No BOLD runs with RepetitionTime metadata.");
    } else if inconsistent.is_empty() {
        text.push_str("Each task has a single repetition time.");
    } else {
        text.push_str(&inconsistent.join("\n"));
    }
    if missing > 0 {
        text.push_str(&format!("\n\n{missing} BOLD runs lack RepetitionTime metadata."));
    }
    let without_runs: Vec<String> = tasks
        .iter()
        .filter(|task| !by_task.contains_key(*task))
        .cloned()
        .collect();
    if !without_runs.is_empty() && !table.is_empty() {
        text.push_str(&format!(
            "\n\nTasks without timed BOLD runs: {}.",
            without_runs.join(", ")
        ));
    }
    debug!(tasks = by_task.len(), missing, "Collected repetition times");

    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("tr_by_task", table))
}

/// File counts per datatype and suffix.
pub(super) fn suffixes(index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let counts = index.count(&[Dimension::Datatype, Dimension::Suffix])?;
    let mut table = Table::new(["datatype", "suffix", "n_files"]);
    for (key, n) in &counts {
        let mut row: Vec<String> = key.clone();
        row.push(n.to_string());
        table.push_row(row).map_err(row_error)?;
    }
    let text = format!(
        "## Files by suffix\n\n{} distinct datatype and suffix combinations.",
        table.row_count()
    );
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("counts_by_suffix", table))
}

/// Total file size per datatype.
pub(super) fn sizes(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let datatypes = ctx.require(ContextKey::Datatypes)?;
    let mut totals: BTreeMap<&str, (usize, u64)> =
        datatypes.iter().map(|datatype| (datatype.as_str(), (0, 0))).collect();
    for entry in index.entries() {
        let Some(total) = entry
            .entity(Dimension::Datatype)
            .and_then(|datatype| totals.get_mut(datatype))
        else {
            continue;
        };
        total.0 += 1;
        total.1 += entry.size;
    }

    let mut table = Table::new(["datatype", "n_files", "bytes", "gb"]);
    for (datatype, (files, bytes)) in &totals {
        table
            .push_row([
                datatype.to_string(),
                files.to_string(),
                bytes.to_string(),
                format!("{:.6}", *bytes as f64 / BYTES_PER_GB),
            ])
            .map_err(row_error)?;
    }

    let bytes: u64 = totals.values().map(|(_, bytes)| bytes).sum();
    let text = format!(
        "## File sizes\n\n{} bytes ({:.3} GB) across {} datatypes.",
        bytes,
        bytes as f64 / BYTES_PER_GB,
        totals.len()
    );
    Ok(SectionOutput::new()
        .markdown(text)
        .reloaded_table("size_by_datatype", table))
}
