//! Integration tests for single-dataset pipeline runs.

mod common;

use std::fs;
use std::path::Path;

use flux_core::{
    ContextKey, FnSection, PipelineBuilder, PipelineError, SectionError, SectionOutput, SectionRegistry,
    SectionResult, SharedContext, builtin_registry,
};
use flux_ingest::{DatasetIndex, IndexError};
use flux_model::{ContentBlock, DatasetKind, Dimension, Table};

use common::{
    anat_only_dataset, bids_dataset, fixed_options, freesurfer_dataset, mixed_tr_dataset, mriqc_dataset,
    session_tr_dataset,
};

fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("read output")
}

fn markdown(result: &flux_core::PipelineResult) -> String {
    result
        .document
        .blocks()
        .iter()
        .filter_map(ContentBlock::markdown_text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn bids_run_writes_notebook_and_artifacts() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(result.notebook, out.path().join("bids_summary.ipynb"));
    assert!(result.notebook.is_file());
    let names: Vec<&str> = result.artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "participants_by_sex",
            "avail",
            "func_counts",
            "tr_by_task",
            "counts_by_suffix",
            "size_by_datatype"
        ]
    );

    assert_eq!(
        read(&out.path().join("avail.csv")),
        "subject,anat,func\n01,1,2\n02,1,1\n03,1,0\n"
    );
    assert_eq!(
        read(&out.path().join("func_counts.csv")),
        "subject,rest\n01,2\n02,1\n"
    );
    assert_eq!(
        read(&out.path().join("tr_by_task.csv")),
        "task,repetition_time,n_runs\nrest,2.0,3\n"
    );
    assert_eq!(
        read(&out.path().join("participants_by_sex.csv")),
        "sex,n_participants\nF,2\nM,1\n"
    );
    insta::assert_snapshot!(read(&out.path().join("counts_by_suffix.csv")).trim_end(), @r"
    datatype,suffix,n_files
    anat,T1w,3
    func,bold,3
    ");
    assert_eq!(
        read(&out.path().join("size_by_datatype.csv")),
        "datatype,n_files,bytes,gb\nanat,3,12,0.000000\nfunc,3,12,0.000000\n"
    );
}

#[test]
fn notebook_title_and_section_order() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(
        result.document.title(),
        format!("BIDS summary: {}", data.path().display())
    );
    assert_eq!(result.sections.first(), Some(&"bids:overview"));
    assert_eq!(result.sections.last(), Some(&"common:explorer"));
    let text = markdown(&result);
    assert!(text.contains("**Flux test** (BIDS 1.8.0)"));
    assert!(text.contains("Each task has a single repetition time."));
}

#[test]
fn csv_outputs_are_identical_across_runs() {
    let data = tempfile::tempdir().expect("tempdir");
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());

    let builder = PipelineBuilder::new(builtin_registry()).with_options(fixed_options());
    let a = builder
        .build(&DatasetIndex::build(data.path()).expect("index"), first.path())
        .expect("first run");
    let b = builder
        .build(&DatasetIndex::build(data.path()).expect("index"), second.path())
        .expect("second run");

    assert_eq!(a.artifacts.len(), b.artifacts.len());
    for (left, right) in a.artifacts.iter().zip(&b.artifacts) {
        assert_eq!(left.name, right.name);
        assert_eq!(
            fs::read(&left.path).expect("read"),
            fs::read(&right.path).expect("read")
        );
        assert_eq!(left.sha256, right.sha256);
    }
    assert_eq!(
        fs::read(&a.notebook).expect("read"),
        fs::read(&b.notebook).expect("read")
    );
}

#[test]
fn artifact_rows_match_displayed_tables() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    let displayed: Vec<&Table> = result.document.tables().collect();
    assert_eq!(displayed.len(), result.artifacts.len());
    for (table, summary) in displayed.iter().zip(&result.artifacts) {
        let written = fs::read(&summary.path).expect("read artifact");
        assert_eq!(flux_report::table_to_csv(table).expect("encode"), written);
        assert_eq!(table.row_count(), summary.rows);
    }
}

#[test]
fn no_functional_runs_emits_header_only_table() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    anat_only_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(read(&out.path().join("func_counts.csv")), "subject\n");
    assert!(markdown(&result).contains("0 functional runs"));
    let func = result
        .artifacts
        .iter()
        .find(|a| a.name == "func_counts")
        .expect("func_counts artifact");
    assert_eq!(func.rows, 0);
}

#[test]
fn inconsistent_repetition_time_is_flagged() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    mixed_tr_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(
        read(&out.path().join("tr_by_task.csv")),
        "task,repetition_time,n_runs\nrest,2.0,1\nrest,2.5,1\n"
    );
    assert!(markdown(&result).contains("**rest**: inconsistent repetition times (2.0, 2.5 s)"));
}

#[test]
fn repetition_time_differs_between_sessions() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    session_tr_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(
        read(&out.path().join("tr_by_task.csv")),
        "task,repetition_time,n_runs\nrest,2.0,1\nrest,2.5,1\n"
    );
    let text = markdown(&result);
    assert!(text.contains("**rest**: inconsistent repetition times (2.0, 2.5 s)"));
    assert!(text.contains("- Sessions: 2"));
}

#[test]
fn mriqc_run_tabulates_metrics() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    mriqc_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    assert_eq!(index.kind(), DatasetKind::Mriqc);
    let result = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(result.notebook, out.path().join("mriqc_summary.ipynb"));
    assert_eq!(
        read(&out.path().join("mriqc_metrics.csv")),
        "subject,session,modality,cjv,cnr,efc,fber,snr_total,fd_mean,tsnr,dvars_std\n01,,T1w,0.41,3.2,,,12.0,,,\n"
    );
    assert_eq!(
        read(&out.path().join("mriqc_counts_by_modality.csv")),
        "modality,n_scans\nT1w,1\n"
    );
    let text = markdown(&result);
    assert!(text.contains("MRIQC version: 23.1.0"));
    assert!(text.contains("group_T1w.html"));
    assert!(text.contains("- sub-01: [sub-01_T1w.html]"));
}

#[test]
fn freesurfer_run_summarises_aseg() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    freesurfer_dataset(data.path());

    let index = DatasetIndex::build(data.path()).expect("index");
    assert_eq!(index.kind(), DatasetKind::Freesurfer);
    PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .expect("pipeline");

    assert_eq!(
        read(&out.path().join("aseg_summary.csv")),
        "subject,BrainSegVol,BrainSegVolNotVent,lhCortexVol,rhCortexVol,SubCortGrayVol,eTIV\n\
         01,1243340.000000,1222000.000000,250000.5,251000.5,60000.0,1558876.25\n"
    );
    assert_eq!(
        read(&out.path().join("fs_subjects.csv")),
        "subject,n_stats_files,has_aseg\n01,2,yes\n02,0,no\n"
    );
    assert!(!out.path().join("avail.csv").exists());
}

#[test]
fn failed_write_leaves_no_partial_outputs() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());
    fs::create_dir(out.path().join("avail.csv")).expect("blocking directory");

    let index = DatasetIndex::build(data.path()).expect("index");
    let err = PipelineBuilder::new(builtin_registry())
        .with_options(fixed_options())
        .build(&index, out.path())
        .unwrap_err();

    assert!(matches!(err, PipelineError::Write(flux_report::ReportError::Write { .. })));
    assert!(!out.path().join("participants_by_sex.csv").exists());
    assert!(!out.path().join("bids_summary.ipynb").exists());
    assert!(out.path().join("avail.csv").is_dir());
}

#[test]
fn bids_section_on_freesurfer_index_is_unsupported_dimension() {
    let data = tempfile::tempdir().expect("tempdir");
    freesurfer_dataset(data.path());
    let index = DatasetIndex::build(data.path()).expect("index");

    assert!(matches!(
        index.count(&[Dimension::Datatype]),
        Err(IndexError::DimensionUnsupported {
            dimension: Dimension::Datatype,
            kind: DatasetKind::Freesurfer,
        })
    ));

    let section = builtin_registry().get("bids:availability").expect("section");
    let mut ctx = SharedContext::new();
    ctx.set(ContextKey::Subjects, ["01"]);
    ctx.set(ContextKey::Datatypes, ["anat"]);
    let err = section.produce(&index, &mut ctx).unwrap_err();
    assert!(matches!(
        err,
        SectionError::Index(IndexError::DimensionUnsupported {
            kind: DatasetKind::Freesurfer,
            ..
        })
    ));
}

#[test]
fn selecting_a_foreign_section_is_unsupported_kind() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    freesurfer_dataset(data.path());
    let index = DatasetIndex::build(data.path()).expect("index");

    let err = PipelineBuilder::new(builtin_registry())
        .with_sections(["freesurfer:overview", "bids:tr"])
        .build(&index, &out.path().join("run"))
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::UnsupportedKind { ref section, kind: DatasetKind::Freesurfer } if section == "bids:tr"
    ));
    assert!(!out.path().join("run").exists());
}

#[test]
fn undeclared_context_read_fails_before_running() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    bids_dataset(data.path());
    let index = DatasetIndex::build(data.path()).expect("index");

    let err = PipelineBuilder::new(builtin_registry())
        .with_sections(["bids:availability"])
        .build(&index, out.path())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingContextDependency {
            key: ContextKey::Subjects,
            ..
        }
    ));

    let options = fixed_options().with_context_validation(false);
    let err = PipelineBuilder::new(builtin_registry())
        .with_options(options)
        .with_sections(["bids:availability"])
        .build(&index, out.path())
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Section {
            cause: SectionError::MissingContext { .. },
            ..
        }
    ));
}

fn emit_dup(_index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    Ok(SectionOutput::new().reloaded_table("dup", Table::new(["value"])))
}

fn fail(_index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    Err(SectionError::failed("synthetic failure"))
}

fn custom(name: &'static str, produce: flux_core::ProduceFn) -> Box<FnSection> {
    Box::new(FnSection {
        name,
        description: "test section",
        kinds: &[DatasetKind::Bids],
        reads: &[],
        writes: &[],
        produce,
    })
}

#[test]
fn duplicate_artifact_names_abort() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    anat_only_dataset(data.path());
    let index = DatasetIndex::build(data.path()).expect("index");

    let mut registry = SectionRegistry::new();
    registry.register(custom("test:first", emit_dup)).expect("register");
    registry.register(custom("test:second", emit_dup)).expect("register");

    let err = PipelineBuilder::new(&registry)
        .build(&index, &out.path().join("run"))
        .unwrap_err();
    assert!(matches!(err, PipelineError::DuplicateArtifactName { ref name } if name == "dup"));
    assert!(!out.path().join("run").exists());
}

#[test]
fn section_failure_writes_nothing() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    anat_only_dataset(data.path());
    let index = DatasetIndex::build(data.path()).expect("index");

    let mut registry = SectionRegistry::new();
    registry.register(custom("test:ok", emit_dup)).expect("register");
    registry.register(custom("test:fail", fail)).expect("register");

    let err = PipelineBuilder::new(&registry)
        .build(&index, &out.path().join("run"))
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Section { ref section_name, .. } if section_name == "test:fail"
    ));
    assert_eq!(err.to_string(), "section 'test:fail' failed: synthetic failure");
    assert!(!out.path().join("run").exists());
}

#[test]
fn unknown_kind_has_no_sections() {
    let data = tempfile::tempdir().expect("tempdir");
    let out = tempfile::tempdir().expect("tempdir");
    let index = DatasetIndex::build(data.path()).expect("index");
    assert_eq!(index.kind(), DatasetKind::Unknown);

    let err = PipelineBuilder::new(builtin_registry())
        .build(&index, out.path())
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoApplicableSections { kind: DatasetKind::Unknown }));
}
