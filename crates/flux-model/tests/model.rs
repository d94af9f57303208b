use std::path::PathBuf;

use flux_model::{
    ArtifactSummary, BookManifest, BookOutcome, Chapter, ChapterGroup, ContentBlock, DatasetKind,
    Diagnostic, RecordOutcome, SubdatasetRecord, Table,
};

fn chapter(name: &str) -> Chapter {
    Chapter {
        label: name.to_string(),
        dataset: name.to_string(),
        notebook: PathBuf::from(format!("notebooks/{name}/bids_summary.ipynb")),
        artifacts: vec![],
    }
}

#[test]
fn record_serializes_with_status_tag() {
    let record = SubdatasetRecord {
        path: "derivatives/mriqc".to_string(),
        kind: DatasetKind::Mriqc,
        outcome: RecordOutcome::Built {
            notebook: "out/mriqc_summary.ipynb".into(),
            artifact_dir: "out".into(),
            artifacts: vec![ArtifactSummary {
                name: "mriqc_metrics".to_string(),
                path: "out/mriqc_metrics.csv".into(),
                rows: 3,
                sha256: "00".to_string(),
            }],
        },
    };
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["kind"], "mriqc");
    assert_eq!(json["outcome"]["status"], "built");
    let round: SubdatasetRecord = serde_json::from_value(json).expect("deserialize record");
    assert_eq!(round, record);
}

#[test]
fn skipped_record_exposes_reason() {
    let record = SubdatasetRecord {
        path: "notes".to_string(),
        kind: DatasetKind::Unknown,
        outcome: RecordOutcome::Skipped {
            reason: "no recognizable dataset markers".to_string(),
        },
    };
    assert!(!record.is_built());
    assert_eq!(record.status(), "skipped");
    assert_eq!(record.reason(), Some("no recognizable dataset markers"));
}

#[test]
fn manifest_outcome_reflects_chapters_and_diagnostics() {
    let mut manifest = BookManifest {
        title: "Book".to_string(),
        generated: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        groups: vec![ChapterGroup {
            kind: DatasetKind::Bids,
            chapters: vec![chapter("bids")],
        }],
        diagnostics: vec![],
    };
    assert_eq!(manifest.outcome(), BookOutcome::AllSucceeded);

    manifest.diagnostics.push(Diagnostic {
        dataset: "notes".to_string(),
        kind: DatasetKind::Unknown,
        status: "skipped".to_string(),
        reason: "unrecognized".to_string(),
    });
    assert_eq!(manifest.outcome(), BookOutcome::PartialSuccess);

    manifest.groups.clear();
    assert_eq!(manifest.outcome(), BookOutcome::NothingBuilt);
}

#[test]
fn content_block_exposes_table() {
    let mut table = Table::new(["subject", "count"]);
    table.push_row(["01", "4"]).unwrap();
    let block = ContentBlock::code_with_table("display(t)", table.clone());
    assert_eq!(block.table(), Some(&table));
    assert!(ContentBlock::markdown("x").table().is_none());
}
