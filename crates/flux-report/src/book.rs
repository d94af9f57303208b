//! Book outputs: `manifest.json`, `_toc.yml` and `intro.md`.

use std::path::{Path, PathBuf};

use chrono::SecondsFormat;
use flux_model::BookManifest;
use serde::Serialize;
use tracing::info;

use crate::error::{ReportError, Result, create_dir, write_file};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const TOC_FILE: &str = "_toc.yml";
pub const INTRO_FILE: &str = "intro.md";

/// Paths written by [`write_book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFiles {
    pub manifest: PathBuf,
    pub toc: PathBuf,
    pub intro: PathBuf,
}

/// Notebook path as a TOC `file:` entry: `/`-separated, no extension.
fn toc_file(notebook: &Path) -> String {
    notebook
        .with_extension("")
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// jupyter-book `_toc.yml` document.
#[derive(Debug, Serialize)]
struct Toc<'a> {
    format: &'static str,
    root: &'static str,
    parts: Vec<TocPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TocPart<'a> {
    caption: &'static str,
    chapters: Vec<TocChapter<'a>>,
}

#[derive(Debug, Serialize)]
struct TocChapter<'a> {
    file: String,
    title: &'a str,
}

/// Renders the jupyter-book table of contents: one part per kind.
pub fn render_toc(manifest: &BookManifest) -> Result<String> {
    let toc = Toc {
        format: "jb-book",
        root: "intro",
        parts: manifest
            .groups
            .iter()
            .map(|group| TocPart {
                caption: group.kind.label(),
                chapters: group
                    .chapters
                    .iter()
                    .map(|chapter| TocChapter {
                        file: toc_file(&chapter.notebook),
                        title: &chapter.label,
                    })
                    .collect(),
            })
            .collect(),
    };
    serde_yaml::to_string(&toc).map_err(|e| ReportError::Yaml {
        name: TOC_FILE.to_string(),
        source: e,
    })
}

/// Renders the book landing page.
pub fn render_intro(manifest: &BookManifest) -> String {
    let mut lines = vec![
        format!("# {}", manifest.title),
        String::new(),
        format!(
            "Generated {}.",
            manifest.generated.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
    ];

    if manifest.chapter_count() == 0 {
        lines.push(String::new());
        lines.push("_No datasets built._".to_string());
    }
    for group in &manifest.groups {
        lines.push(String::new());
        lines.push(format!("## {}", group.kind.label()));
        lines.push(String::new());
        for chapter in &group.chapters {
            lines.push(format!(
                "- [{}]({})",
                chapter.label,
                toc_file(&chapter.notebook) + ".ipynb"
            ));
        }
    }

    if !manifest.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("## Diagnostics".to_string());
        lines.push(String::new());
        for diagnostic in &manifest.diagnostics {
            lines.push(format!(
                "- `{}` ({}): {}, {}",
                diagnostic.dataset, diagnostic.kind, diagnostic.status, diagnostic.reason
            ));
        }
    }
    lines.join("\n") + "\n"
}

/// Writes `manifest.json` as pretty JSON into `book_dir`.
pub fn write_manifest(book_dir: &Path, manifest: &BookManifest) -> Result<PathBuf> {
    create_dir(book_dir)?;
    let path = book_dir.join(MANIFEST_FILE);
    let mut text = serde_json::to_string_pretty(manifest).map_err(|e| ReportError::Json {
        path: path.clone(),
        source: e,
    })?;
    text.push('\n');
    write_file(&path, text.as_bytes())?;
    Ok(path)
}

/// Writes the manifest, table of contents and landing page.
pub fn write_book(book_dir: &Path, manifest: &BookManifest) -> Result<BookFiles> {
    let toc_text = render_toc(manifest)?;
    let manifest_path = write_manifest(book_dir, manifest)?;

    let toc = book_dir.join(TOC_FILE);
    write_file(&toc, toc_text.as_bytes())?;
    let intro = book_dir.join(INTRO_FILE);
    write_file(&intro, render_intro(manifest).as_bytes())?;

    info!(
        book = %book_dir.display(),
        chapters = manifest.chapter_count(),
        diagnostics = manifest.diagnostics.len(),
        "Wrote book"
    );
    Ok(BookFiles {
        manifest: manifest_path,
        toc,
        intro,
    })
}
