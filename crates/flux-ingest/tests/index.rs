//! Tests for dataset indexing and queries.

use std::fs;
use std::path::Path;

use flux_ingest::{DatasetIndex, IndexError};
use flux_model::{DatasetKind, Dimension};

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, contents).expect("write file");
}

fn bids_fixture(root: &Path) {
    touch(root, "dataset_description.json", r#"{"Name": "ds", "BIDSVersion": "1.8.0"}"#);
    touch(root, "participants.tsv", "participant_id\tage\tsex\nsub-01\t24\tF\nsub-02\t31\tM\n");
    touch(root, "task-rest_bold.json", r#"{"RepetitionTime": 2.0, "TaskName": "rest"}"#);
    touch(root, "sub-01/anat/sub-01_T1w.nii.gz", "x");
    touch(root, "sub-01/anat/sub-01_T1w.json", "{}");
    touch(root, "sub-01/func/sub-01_task-rest_run-1_bold.nii.gz", "xx");
    touch(root, "sub-01/func/sub-01_task-rest_run-2_bold.nii.gz", "xx");
    touch(
        root,
        "sub-01/func/sub-01_task-rest_run-2_bold.json",
        r#"{"RepetitionTime": 2.5}"#,
    );
    touch(root, "sub-01/func/sub-01_task-rest_events.tsv", "onset\n");
    touch(root, "sub-02/ses-1/anat/sub-02_ses-1_T1w.nii.gz", "x");
    fs::create_dir_all(root.join("sub-03")).expect("empty subject");
}

#[test]
fn bids_entries_exclude_sidecars_and_sort_by_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    bids_fixture(dir.path());

    let index = DatasetIndex::build(dir.path()).expect("build index");
    assert_eq!(index.kind(), DatasetKind::Bids);
    assert_eq!(index.len(), 5);

    let paths: Vec<String> = index
        .entries()
        .iter()
        .map(|entry| entry.path.display().to_string())
        .collect();
    let mut sorted = paths.clone();
    sorted.sort();
    assert_eq!(paths, sorted);
    assert!(paths.iter().all(|path| !path.ends_with(".json")));
}

#[test]
fn bids_entities_and_dimension_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    bids_fixture(dir.path());
    let index = DatasetIndex::build(dir.path()).expect("build index");

    let subjects = index.dimension_values(Dimension::Subject).expect("subjects");
    assert_eq!(
        subjects.into_iter().collect::<Vec<_>>(),
        vec!["01", "02", "03"]
    );
    let sessions = index.dimension_values(Dimension::Session).expect("sessions");
    assert_eq!(sessions.into_iter().collect::<Vec<_>>(), vec!["1"]);
    let datatypes = index.dimension_values(Dimension::Datatype).expect("datatypes");
    assert_eq!(datatypes.into_iter().collect::<Vec<_>>(), vec!["anat", "func"]);
    let tasks = index.dimension_values(Dimension::Task).expect("tasks");
    assert_eq!(tasks.into_iter().collect::<Vec<_>>(), vec!["rest"]);

    let run2 = index
        .entries()
        .iter()
        .find(|entry| entry.path.ends_with("sub-01_task-rest_run-2_bold.nii.gz"))
        .expect("run 2");
    assert_eq!(run2.entity(Dimension::Suffix), Some("bold"));
    assert_eq!(run2.size, 2);
}

#[test]
fn sidecar_overrides_inherited_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    bids_fixture(dir.path());
    let index = DatasetIndex::build(dir.path()).expect("build index");

    let tr = |run: &str| {
        index
            .entries()
            .iter()
            .find(|entry| {
                entry
                    .path
                    .to_string_lossy()
                    .contains(&format!("_run-{run}_"))
            })
            .and_then(|entry| entry.metadata.as_ref())
            .and_then(|meta| meta.get("RepetitionTime"))
            .and_then(serde_json::Value::as_f64)
    };
    assert_eq!(tr("1"), Some(2.0));
    assert_eq!(tr("2"), Some(2.5));
}

fn repetition_time(index: &DatasetIndex, file_name: &str) -> Option<f64> {
    index
        .entries()
        .iter()
        .find(|entry| entry.path.ends_with(file_name))
        .and_then(|entry| entry.metadata.as_ref())
        .and_then(|meta| meta.get("RepetitionTime"))
        .and_then(serde_json::Value::as_f64)
}

#[test]
fn sidecars_are_inherited_down_the_directory_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    touch(root, "dataset_description.json", r#"{"Name": "inherit"}"#);
    touch(root, "task-rest_bold.json", r#"{"RepetitionTime": 1.0, "TaskName": "rest"}"#);
    touch(root, "task-rest_acq-fast_bold.json", r#"{"RepetitionTime": 0.5}"#);
    // Subject-level sidecar beats the root one.
    touch(root, "sub-01/sub-01_task-rest_bold.json", r#"{"RepetitionTime": 2.0}"#);
    touch(root, "sub-01/func/sub-01_task-rest_bold.nii.gz", "x");
    // Session-level sidecar applies to that session only.
    touch(root, "sub-02/ses-1/sub-02_ses-1_task-rest_bold.json", r#"{"RepetitionTime": 3.0}"#);
    touch(root, "sub-02/ses-1/func/sub-02_ses-1_task-rest_bold.nii.gz", "x");
    touch(root, "sub-02/ses-2/func/sub-02_ses-2_task-rest_bold.nii.gz", "x");
    // Extra entities in a root sidecar narrow what it applies to.
    touch(root, "sub-03/func/sub-03_task-rest_acq-fast_bold.nii.gz", "x");
    // A sidecar for another subject never applies.
    touch(root, "sub-04/sub-01_task-rest_bold.json", r#"{"RepetitionTime": 9.0}"#);
    touch(root, "sub-04/func/sub-04_task-rest_bold.nii.gz", "x");

    let index = DatasetIndex::build(root).expect("build index");
    assert_eq!(repetition_time(&index, "sub-01_task-rest_bold.nii.gz"), Some(2.0));
    assert_eq!(repetition_time(&index, "sub-02_ses-1_task-rest_bold.nii.gz"), Some(3.0));
    assert_eq!(repetition_time(&index, "sub-02_ses-2_task-rest_bold.nii.gz"), Some(1.0));
    assert_eq!(repetition_time(&index, "sub-03_task-rest_acq-fast_bold.nii.gz"), Some(0.5));
    assert_eq!(repetition_time(&index, "sub-04_task-rest_bold.nii.gz"), Some(1.0));

    let inherited = index
        .entries()
        .iter()
        .find(|entry| entry.path.ends_with("sub-01_task-rest_bold.nii.gz"))
        .and_then(|entry| entry.metadata.as_ref())
        .expect("merged metadata");
    assert_eq!(inherited.get("TaskName").and_then(serde_json::Value::as_str), Some("rest"));
}

#[test]
fn participants_and_description_are_loaded() {
    let dir = tempfile::tempdir().expect("tempdir");
    bids_fixture(dir.path());
    let index = DatasetIndex::build(dir.path()).expect("build index");

    assert_eq!(index.participants().len(), 2);
    assert_eq!(index.participants()[1]["sex"], "M");
    let name = index
        .description()
        .and_then(|d| d.get("Name"))
        .and_then(serde_json::Value::as_str);
    assert_eq!(name, Some("ds"));
}

#[test]
fn count_groups_missing_entities_under_empty_string() {
    let dir = tempfile::tempdir().expect("tempdir");
    bids_fixture(dir.path());
    let index = DatasetIndex::build(dir.path()).expect("build index");

    let total = index.count(&[]).expect("total");
    assert_eq!(total.get(&Vec::<String>::new()), Some(&5));

    let by_task = index.count(&[Dimension::Task]).expect("by task");
    assert_eq!(by_task.get(&vec!["rest".to_string()]), Some(&3));
    assert_eq!(by_task.get(&vec![String::new()]), Some(&2));

    let bold = index
        .count_where(
            &[(Dimension::Datatype, "func"), (Dimension::Suffix, "bold")],
            &[Dimension::Subject, Dimension::Task],
        )
        .expect("bold runs");
    assert_eq!(bold.len(), 1);
    assert_eq!(bold.get(&vec!["01".to_string(), "rest".to_string()]), Some(&2));
}

#[test]
fn empty_dataset_total_is_zero() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "dataset_description.json", "{}");
    let index = DatasetIndex::build(dir.path()).expect("build index");
    assert!(index.is_empty());
    let total = index.count(&[]).expect("total");
    assert_eq!(total.len(), 1);
    assert_eq!(total.get(&Vec::<String>::new()), Some(&0));
}

#[test]
fn freesurfer_rejects_unsupported_dimensions() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "sub-01/stats/aseg.stats", "# Measure BrainSeg, BrainSegVol, x, 1000.0, mm^3\n");
    touch(dir.path(), "sub-01/stats/lh.aparc.stats", "");
    touch(dir.path(), "fsaverage/stats/aseg.stats", "");

    let index = DatasetIndex::build(dir.path()).expect("build index");
    assert_eq!(index.kind(), DatasetKind::Freesurfer);
    assert_eq!(index.len(), 2);

    let suffixes = index.dimension_values(Dimension::Suffix).expect("suffixes");
    assert_eq!(suffixes.into_iter().collect::<Vec<_>>(), vec!["aseg", "lh.aparc"]);

    let err = index.dimension_values(Dimension::Task).unwrap_err();
    assert!(matches!(
        err,
        IndexError::DimensionUnsupported {
            dimension: Dimension::Task,
            kind: DatasetKind::Freesurfer,
        }
    ));
    assert!(index.count(&[Dimension::Session]).is_err());
    assert!(index.count_where(&[(Dimension::Datatype, "anat")], &[]).is_err());
}

#[test]
fn mriqc_indexes_iqm_json_and_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(
        dir.path(),
        "dataset_description.json",
        r#"{"Name": "qc", "GeneratedBy": [{"Name": "MRIQC"}]}"#,
    );
    touch(dir.path(), "group_T1w.html", "<html/>");
    touch(dir.path(), "sub-01_T1w.html", "<html/>");
    touch(dir.path(), "sub-01/anat/sub-01_T1w.json", r#"{"cjv": 0.4, "snr_total": 10.5}"#);
    touch(dir.path(), "sub-01/func/sub-01_task-rest_bold.json", r#"{"fd_mean": 0.1}"#);

    let index = DatasetIndex::build(dir.path()).expect("build index");
    assert_eq!(index.kind(), DatasetKind::Mriqc);
    assert_eq!(index.len(), 2);
    assert_eq!(index.reports().len(), 2);
    let suffixes = index.dimension_values(Dimension::Suffix).expect("suffixes");
    assert_eq!(suffixes.into_iter().collect::<Vec<_>>(), vec!["T1w", "bold"]);
    assert!(index.entries().iter().all(|entry| entry.metadata.is_some()));
    assert!(index.dimension_values(Dimension::Datatype).is_err());
}

#[test]
fn build_as_overrides_classification() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "sub-01/anat/sub-01_T1w.nii.gz", "x");
    assert_eq!(
        DatasetIndex::build(dir.path()).expect("build").kind(),
        DatasetKind::Unknown
    );
    let forced = DatasetIndex::build_as(dir.path(), DatasetKind::Bids).expect("build as bids");
    assert_eq!(forced.len(), 1);
}

#[test]
fn missing_root_is_unreadable() {
    let err = DatasetIndex::build("/no/such/dataset/root").unwrap_err();
    assert!(matches!(err, IndexError::DatasetUnreadable { .. }));

    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "file.txt", "x");
    let err = DatasetIndex::build(dir.path().join("file.txt")).unwrap_err();
    assert!(matches!(err, IndexError::DatasetUnreadable { .. }));
}

#[cfg(unix)]
#[test]
fn unfetched_annex_files_are_indexed() {
    let dir = tempfile::tempdir().expect("tempdir");
    touch(dir.path(), "dataset_description.json", r#"{"Name": "annexed"}"#);
    fs::create_dir_all(dir.path().join("sub-01/anat")).expect("anat dir");
    std::os::unix::fs::symlink(
        "../../.git/annex/objects/Xk/Zp/MD5E-s1024--abc.nii.gz/MD5E-s1024--abc.nii.gz",
        dir.path().join("sub-01/anat/sub-01_T1w.nii.gz"),
    )
    .expect("dangling symlink");

    let index = DatasetIndex::build(dir.path()).expect("build index");
    assert_eq!(index.len(), 1);
    let total = index.count(&[]).expect("count");
    assert_eq!(total.get(&Vec::<String>::new()), Some(&1));
    let entry = &index.entries()[0];
    assert_eq!(entry.entity(Dimension::Suffix), Some("T1w"));
    assert!(entry.size > 0);
}
