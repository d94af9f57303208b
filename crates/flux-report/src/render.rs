//! Text renderings of tables for notebook display outputs.

use comfy_table::{Cell, Table as TextTable, presets};
use flux_model::Table;

const PLAIN_GUTTER: u16 = 2;

fn markdown_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn text_table(table: &Table, preset: &str, cell: fn(&str) -> String) -> TextTable {
    let mut out = TextTable::new();
    out.load_preset(preset)
        .set_header(table.columns.iter().map(|c| Cell::new(cell(c))));
    for row in &table.rows {
        out.add_row(row.iter().map(|c| Cell::new(cell(c))));
    }
    out
}

fn trimmed_lines(table: &TextTable) -> Vec<String> {
    table.lines().map(|line| line.trim_end().to_string()).collect()
}

/// Renders a GitHub-flavoured pipe table.
pub fn markdown_table(table: &Table) -> String {
    let out = text_table(table, presets::ASCII_MARKDOWN, markdown_cell);
    let mut text = trimmed_lines(&out).join("\n");
    text.push('\n');
    text
}

/// Renders a left-aligned plain-text table with two-space gutters.
pub fn plain_table(table: &Table) -> String {
    let mut out = text_table(table, presets::NOTHING, |c| c.replace('\n', " "));
    for column in out.column_iter_mut() {
        column.set_padding((0, PLAIN_GUTTER));
    }
    let mut lines = trimmed_lines(&out);
    if table.is_empty() {
        lines.push("(no rows)".to_string());
    }
    lines.join("\n")
}
