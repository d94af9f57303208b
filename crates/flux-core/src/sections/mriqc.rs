//! Sections for MRIQC derivative datasets.

use std::path::Path;

use flux_ingest::{DatasetIndex, number_field};
use flux_model::{Dimension, Table};

use super::format_number;
use crate::context::{ContextKey, SharedContext};
use crate::error::{SectionError, SectionResult};
use crate::section::SectionOutput;

/// Image quality metrics tabulated per scan; blank when a scan lacks one.
pub const IQM_COLUMNS: [&str; 8] = [
    "cjv",
    "cnr",
    "efc",
    "fber",
    "snr_total",
    "fd_mean",
    "tsnr",
    "dvars_std",
];

fn report_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or("")
}

fn report_link(index: &DatasetIndex, path: &Path) -> String {
    format!("[{}]({})", report_name(path), index.root().join(path).display())
}

fn mriqc_version(index: &DatasetIndex) -> Option<String> {
    index
        .description()?
        .get("GeneratedBy")?
        .as_array()?
        .iter()
        .find(|item| {
            item.get("Name")
                .and_then(|name| name.as_str())
                .is_some_and(|name| name.eq_ignore_ascii_case("mriqc"))
        })?
        .get("Version")?
        .as_str()
        .map(str::to_string)
}

pub(super) fn overview(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    ctx.set(ContextKey::Subjects, index.dimension_values(Dimension::Subject)?);
    let subjects = ctx.require(ContextKey::Subjects)?;
    let version = mriqc_version(index).unwrap_or_else(|| "unknown".to_string());

    let text = format!(
        "## MRIQC overview\n\n\
         - MRIQC version: {version}\n\
         - Subjects: {}\n\
         - IQM files: {}\n\
         - HTML reports: {}",
        subjects.len(),
        index.len(),
        index.reports().len(),
    );
    Ok(SectionOutput::new().markdown(text))
}

pub(super) fn group_reports(index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let links: Vec<String> = index
        .reports()
        .iter()
        .filter(|path| report_name(path).starts_with("group_"))
        .map(|path| format!("- {}", report_link(index, path)))
        .collect();

    let body = if links.is_empty() {
        "No group reports found.".to_string()
    } else {
        links.join("\n")
    };
    Ok(SectionOutput::new().markdown(format!("## Group reports\n\n{body}")))
}

/// IQM table per scan plus scan counts per modality.
pub(super) fn metrics(index: &DatasetIndex, ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let per_modality = index.count(&[Dimension::Suffix])?;
    let subjects = ctx.require(ContextKey::Subjects)?;

    let columns = ["subject", "session", "modality"].into_iter().chain(IQM_COLUMNS);
    let mut table = Table::new(columns);
    for entry in index.entries() {
        let mut row = vec![
            entry.entity(Dimension::Subject).unwrap_or("").to_string(),
            entry.entity(Dimension::Session).unwrap_or("").to_string(),
            entry.entity(Dimension::Suffix).unwrap_or("").to_string(),
        ];
        for iqm in IQM_COLUMNS {
            let value = entry
                .metadata
                .as_ref()
                .and_then(|meta| number_field(meta, iqm))
                .map(format_number)
                .unwrap_or_default();
            row.push(value);
        }
        table
            .push_row(row)
            .map_err(|e| SectionError::failed(e.to_string()))?;
    }

    let mut modalities = Table::new(["modality", "n_scans"]);
    for (key, n) in &per_modality {
        let modality = key.first().cloned().unwrap_or_default();
        modalities
            .push_row([modality, n.to_string()])
            .map_err(|e| SectionError::failed(e.to_string()))?;
    }

    let mut subject_links = Vec::new();
    for subject in subjects {
        let prefix = format!("sub-{subject}");
        let reports: Vec<String> = index
            .reports()
            .iter()
            .filter(|path| report_name(path).starts_with(&prefix))
            .map(|path| report_link(index, path))
            .collect();
        if !reports.is_empty() {
            subject_links.push(format!("- sub-{subject}: {}", reports.join(", ")));
        }
    }
    let links = if subject_links.is_empty() {
        "No subject-level reports found.".to_string()
    } else {
        subject_links.join("\n")
    };

    let intro = format!(
        "## Image quality metrics\n\n{} scans across {} subjects. Blank cells mark metrics not computed for that modality.",
        table.row_count(),
        subjects.len()
    );
    Ok(SectionOutput::new()
        .markdown(intro)
        .reloaded_table("mriqc_metrics", table)
        .markdown("### Scans per modality")
        .reloaded_table("mriqc_counts_by_modality", modalities)
        .markdown(format!("### Subject reports\n\n{links}")))
}
