//! Dataset fixtures shared by the integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use flux_model::PipelineOptions;

pub fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, contents).expect("write fixture file");
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn fixed_options() -> PipelineOptions {
    PipelineOptions::default().with_generated_at(fixed_time())
}

/// Three subjects; sub-03 has no functional data.
pub fn bids_dataset(root: &Path) {
    touch(
        root,
        "dataset_description.json",
        r#"{"Name": "Flux test", "BIDSVersion": "1.8.0"}"#,
    );
    touch(
        root,
        "participants.tsv",
        "participant_id\tage\tsex\nsub-01\t24\tF\nsub-02\t31\tM\nsub-03\t28\tF\n",
    );
    touch(root, "task-rest_bold.json", r#"{"RepetitionTime": 2.0}"#);
    for subject in ["01", "02", "03"] {
        touch(
            root,
            &format!("sub-{subject}/anat/sub-{subject}_T1w.nii.gz"),
            "anat",
        );
        touch(root, &format!("sub-{subject}/anat/sub-{subject}_T1w.json"), "{}");
    }
    touch(root, "sub-01/func/sub-01_task-rest_run-1_bold.nii.gz", "bold");
    touch(root, "sub-01/func/sub-01_task-rest_run-2_bold.nii.gz", "bold");
    touch(root, "sub-02/func/sub-02_task-rest_run-1_bold.nii.gz", "bold");
}

/// Anatomical scans only.
pub fn anat_only_dataset(root: &Path) {
    touch(root, "dataset_description.json", r#"{"Name": "anat only"}"#);
    touch(root, "sub-01/anat/sub-01_T1w.nii.gz", "anat");
    touch(root, "sub-02/anat/sub-02_T1w.nii.gz", "anat");
}

/// Task `rest` acquired at 2.0 s for sub-01 and 2.5 s for sub-02.
pub fn mixed_tr_dataset(root: &Path) {
    touch(root, "dataset_description.json", r#"{"Name": "mixed tr"}"#);
    touch(root, "sub-01/func/sub-01_task-rest_bold.nii.gz", "bold");
    touch(root, "sub-01/func/sub-01_task-rest_bold.json", r#"{"RepetitionTime": 2.0}"#);
    touch(root, "sub-02/func/sub-02_task-rest_bold.nii.gz", "bold");
    touch(root, "sub-02/func/sub-02_task-rest_bold.json", r#"{"RepetitionTime": 2.5}"#);
}

/// One subject, task `rest` at 2.0 s in ses-1 and 2.5 s in ses-2. Session
/// sidecars override the dataset-level 3.0 s.
pub fn session_tr_dataset(root: &Path) {
    touch(root, "dataset_description.json", r#"{"Name": "session tr"}"#);
    touch(root, "task-rest_bold.json", r#"{"RepetitionTime": 3.0}"#);
    for (session, tr) in [("1", "2.0"), ("2", "2.5")] {
        touch(
            root,
            &format!("sub-01/ses-{session}/sub-01_ses-{session}_task-rest_bold.json"),
            &format!(r#"{{"RepetitionTime": {tr}}}"#),
        );
        touch(
            root,
            &format!("sub-01/ses-{session}/func/sub-01_ses-{session}_task-rest_bold.nii.gz"),
            "bold",
        );
    }
}

pub fn mriqc_dataset(root: &Path) {
    touch(
        root,
        "dataset_description.json",
        r#"{"Name": "qc", "GeneratedBy": [{"Name": "MRIQC", "Version": "23.1.0"}]}"#,
    );
    touch(root, "group_T1w.html", "<html></html>");
    touch(root, "sub-01_T1w.html", "<html></html>");
    touch(
        root,
        "sub-01/anat/sub-01_T1w.json",
        r#"{"cjv": 0.41, "cnr": 3.2, "snr_total": 12.0}"#,
    );
}

pub const ASEG_STATS: &str = "\
# Title Segmentation Statistics
# Measure BrainSeg, BrainSegVol, Brain Segmentation Volume, 1243340.000000, mm^3
# Measure BrainSegNotVent, BrainSegVolNotVent, Brain Segmentation Volume Without Ventricles, 1222000.000000, mm^3
# Measure lhCortex, lhCortexVol, Left hemisphere cortical gray matter volume, 250000.5, mm^3
# Measure rhCortex, rhCortexVol, Right hemisphere cortical gray matter volume, 251000.5, mm^3
# Measure SubCortGray, SubCortGrayVol, Subcortical gray matter volume, 60000.0, mm^3
# Measure EstimatedTotalIntraCranialVol, eTIV, Estimated Total Intracranial Volume, 1558876.25, mm^3
";

pub fn freesurfer_dataset(root: &Path) {
    touch(root, "sub-01/stats/aseg.stats", ASEG_STATS);
    touch(root, "sub-01/stats/lh.aparc.stats", "# Measure Cortex, NumVert, x, 100, unitless\n");
    fs::create_dir_all(root.join("sub-02")).expect("subject without stats");
    touch(root, "fsaverage/stats/aseg.stats", ASEG_STATS);
}
