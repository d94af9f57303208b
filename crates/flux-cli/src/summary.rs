use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use flux_cli::commands::{BookRun, GenerateRun};
use flux_core::SectionRegistry;
use flux_model::{BookOutcome, RecordOutcome};

/// Digest characters shown in summaries.
const SHORT_DIGEST: usize = 12;

pub fn print_generate_summary(run: &GenerateRun) {
    println!("Dataset: {} ({})", run.dataset.display(), run.kind.label());
    println!("Notebook: {}", run.result.notebook.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Rows"),
        header_cell("SHA-256"),
        header_cell("Path"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let mut total_rows = 0usize;
    for artifact in &run.result.artifacts {
        total_rows += artifact.rows;
        table.add_row(vec![
            Cell::new(&artifact.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            count_cell(artifact.rows),
            dim_cell(short_digest(&artifact.sha256)),
            Cell::new(artifact.path.display()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(format!("{} sections", run.result.sections.len())).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_book_summary(run: &BookRun) {
    println!("Book: {}", run.manifest.title);
    println!("Manifest: {}", run.files.manifest.display());
    println!("Table of contents: {}", run.files.toc.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Subdataset"),
        header_cell("Kind"),
        header_cell("Status"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    for record in &run.records {
        let detail = match &record.outcome {
            RecordOutcome::Built { notebook, .. } => Cell::new(notebook.display()),
            RecordOutcome::Skipped { reason } => dim_cell(reason),
            RecordOutcome::Failed { reason } => Cell::new(reason).fg(Color::Red),
        };
        table.add_row(vec![
            Cell::new(&record.path)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(record.kind.label()),
            status_cell(&record.outcome),
            detail,
        ]);
    }
    println!("{table}");

    match run.manifest.outcome() {
        BookOutcome::AllSucceeded => println!("All {} subdatasets built.", run.manifest.chapter_count()),
        BookOutcome::PartialSuccess => println!(
            "{} built, {} with diagnostics.",
            run.manifest.chapter_count(),
            run.manifest.diagnostics.len()
        ),
        BookOutcome::NothingBuilt => eprintln!("No subdataset could be built."),
    }
}

pub fn print_sections(registry: &SectionRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Kinds"),
        header_cell("Reads"),
        header_cell("Writes"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    for section in registry.iter() {
        table.add_row(vec![
            Cell::new(section.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(join(section.kinds().iter().map(|kind| kind.as_str()))),
            list_cell(join(section.reads().iter().map(|key| key.as_str()))),
            list_cell(join(section.writes().iter().map(|key| key.as_str()))),
            Cell::new(section.description()),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(outcome: &RecordOutcome) -> Cell {
    match outcome {
        RecordOutcome::Built { .. } => Cell::new("built")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        RecordOutcome::Skipped { .. } => Cell::new("skipped").fg(Color::Yellow),
        RecordOutcome::Failed { .. } => Cell::new("failed")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn list_cell(value: String) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

fn short_digest(digest: &str) -> &str {
    digest.get(..SHORT_DIGEST).unwrap_or(digest)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
