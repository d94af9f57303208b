//! CSV encoding of tabular artifacts.

use std::path::Path;

use csv::{Terminator, WriterBuilder};
use flux_model::{ArtifactSummary, Table, TabularArtifact};

use crate::error::{ReportError, Result};
use crate::hash::sha256_hex;

/// Encodes a table as UTF-8 CSV: header row, one line per row, `\n` endings.
pub fn table_to_csv(table: &Table) -> csv::Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

/// Encodes an artifact and describes where it belongs under `dir`.
pub(crate) fn encode_artifact(dir: &Path, artifact: &TabularArtifact) -> Result<(ArtifactSummary, Vec<u8>)> {
    let bytes = table_to_csv(&artifact.table).map_err(|e| ReportError::Csv {
        name: artifact.name.clone(),
        source: e,
    })?;
    let summary = ArtifactSummary {
        name: artifact.name.clone(),
        path: dir.join(artifact.filename()),
        rows: artifact.table.row_count(),
        sha256: sha256_hex(&bytes),
    };
    Ok((summary, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_cells_with_commas() {
        let mut table = Table::new(["task", "note"]);
        table.push_row(["rest", "a, b"]).unwrap();
        let bytes = table_to_csv(&table).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "task,note\nrest,\"a, b\"\n");
    }

    #[test]
    fn header_only_table() {
        let table = Table::new(["subject"]);
        let bytes = table_to_csv(&table).unwrap();
        assert_eq!(bytes, b"subject\n");
    }
}
