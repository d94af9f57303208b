//! nbformat 4.5 serialization of notebook documents.

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use flux_model::{ContentBlock, NotebookDocument, Table};
use serde_json::{Value, json};

use crate::error::{ReportError, Result};
use crate::render::{markdown_table, plain_table};

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 5;

/// Python run before any section code; section sources assume `pd`.
const SETUP_SOURCE: &str = "import pandas as pd";

/// Splits cell text into nbformat's list-of-lines form.
fn source_lines(text: &str) -> Vec<&str> {
    text.split_inclusive('\n').collect()
}

fn markdown_cell(id: &str, text: &str) -> Value {
    json!({
        "cell_type": "markdown",
        "id": id,
        "metadata": {},
        "source": source_lines(text),
    })
}

fn code_cell(id: &str, source: &str, display: Option<&Table>) -> Value {
    let outputs: Vec<Value> = display.map(display_data).into_iter().collect();
    json!({
        "cell_type": "code",
        "execution_count": null,
        "id": id,
        "metadata": {},
        "outputs": outputs,
        "source": source_lines(source),
    })
}

fn display_data(table: &Table) -> Value {
    json!({
        "data": {
            "text/markdown": source_lines(&markdown_table(table)),
            "text/plain": source_lines(&plain_table(table)),
        },
        "metadata": {},
        "output_type": "display_data",
    })
}

/// Builds the nbformat JSON value for a document.
///
/// A title cell and a pandas import cell precede the section blocks.
pub fn render_notebook(document: &NotebookDocument) -> Value {
    let meta = document.metadata();
    let generated = meta.generated.to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut cells = Vec::with_capacity(document.blocks().len() + 2);
    cells.push(markdown_cell(
        "cell-0000",
        &format!(
            "# {}\n\nGenerated {} from `{}`.",
            meta.title,
            generated,
            meta.dataset.display()
        ),
    ));
    cells.push(code_cell("cell-0001", SETUP_SOURCE, None));

    for (idx, block) in document.blocks().iter().enumerate() {
        let id = format!("cell-{:04}", idx + 2);
        cells.push(match block {
            ContentBlock::Markdown { text } => markdown_cell(&id, text),
            ContentBlock::Code { source, display } => code_cell(&id, source, display.as_ref()),
        });
    }

    json!({
        "cells": cells,
        "metadata": {
            "kernelspec": {
                "display_name": "Python 3",
                "language": "python",
                "name": meta.kernel,
            },
            "language_info": { "name": "python" },
            "flux": {
                "title": meta.title,
                "generated": generated,
                "dataset": meta.dataset.display().to_string(),
                "kind": meta.kind.as_str(),
            },
        },
        "nbformat": NBFORMAT,
        "nbformat_minor": NBFORMAT_MINOR,
    })
}

/// Pretty-printed notebook JSON and its path under `dir`.
pub(crate) fn encode_notebook(dir: &Path, document: &NotebookDocument) -> Result<(PathBuf, Vec<u8>)> {
    let path = dir.join(document.metadata().kind.notebook_filename());
    let mut text = serde_json::to_string_pretty(&render_notebook(document)).map_err(|e| {
        ReportError::Json {
            path: path.clone(),
            source: e,
        }
    })?;
    text.push('\n');
    Ok((path, text.into_bytes()))
}
