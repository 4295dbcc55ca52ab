use std::fs;
use std::path::Path;

use phase_adapters::phases::{CloseFilePhase, EmitValuePhase, MapLinesPhase, OpenFilePhase, ReadContentsPhase, SaveFilePhase};
use phase_adapters::pipelines::{text_transform, TextTransform};
use phase_adapters::{FileContents, LineMode, OpenedFile, TextLines};
use phase_core::{ExecutionErrorKind, Workflow, WorkflowConfig, WorkflowError, WorkflowOutcome, WorkflowState};
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn transform(input: &Path, output: &Path, overwrite: bool) -> TextTransform {
    TextTransform { input: input.to_path_buf(),
                    output: output.to_path_buf(),
                    overwrite }
}

#[test]
fn upper_transform_full_success() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "hello\nworld\n");
    let output = dir.path().join("out.txt");

    let mut wf = text_transform(&transform(&input, &output, false),
                                MapLinesPhase::with_mode(LineMode::Upper, false),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(fs::read_to_string(&output).unwrap(), "HELLO\nWORLD\n");

    // CloseFilePhase ya liberó el handle
    let opened = wf.last_emitted::<OpenedFile>().expect("opened file");
    assert!(!opened.is_open());
    assert_eq!(wf.close().failed, 0);
}

#[test]
fn bad_lines_are_aggregated_as_partial_success() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "plain\ncafé\nmore\nñandú\n");
    let output = dir.path().join("out.txt");

    let mut wf = text_transform(&transform(&input, &output, false),
                                MapLinesPhase::with_mode(LineMode::Upper, true),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::PartialSuccess);
    assert_eq!(wf.state(), WorkflowState::Completed);
    assert_eq!(fs::read_to_string(&output).unwrap(), "PLAIN\nMORE\n");

    let err = wf.last_error_of::<MapLinesPhase>().expect("aggregate");
    assert!(!err.is_fatal());
    assert_eq!(err.details().len(), 2);
    assert!(err.details()[0].starts_with("line 2: non-ASCII character 'é'"));
    assert!(err.details()[1].starts_with("line 4:"));
}

#[test]
fn no_mappable_line_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "über\n");
    let output = dir.path().join("out.txt");

    let mut wf = text_transform(&transform(&input, &output, false),
                                MapLinesPhase::with_mode(LineMode::Lower, true),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    assert_eq!(wf.cursor(), 2);
    assert!(!output.exists());

    // el handle abierto queda para el barrido de close
    assert!(wf.last_emitted::<OpenedFile>().expect("opened").is_open());
    assert_eq!(wf.close().closed, 2);
    assert!(!wf.last_emitted::<OpenedFile>().expect("opened").is_open());
}

#[test]
fn missing_input_stalls_at_open() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.txt");
    let output = dir.path().join("out.txt");

    let mut wf = text_transform(&transform(&input, &output, false),
                                MapLinesPhase::with_mode(LineMode::Trim, false),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    assert_eq!(wf.cursor(), 0);
    let err = wf.last_error_of::<OpenFilePhase>().expect("open error");
    assert!(err.message().contains("does not exist or is a directory"));
    // el error de IO original queda como causa
    let cause = err.cause().expect("io cause");
    assert_eq!(cause.downcast_ref::<std::io::Error>().map(|e| e.kind()),
               Some(std::io::ErrorKind::NotFound));

    // un directorio tampoco es un archivo regular
    let mut wf = text_transform(&transform(dir.path(), &output, false),
                                MapLinesPhase::with_mode(LineMode::Trim, false),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
}

#[test]
fn existing_output_respects_overwrite_flag() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "  padded  \n");
    let output = write_input(&dir, "out.txt", "old");

    let mut refused = text_transform(&transform(&input, &output, false),
                                     MapLinesPhase::with_mode(LineMode::Trim, false),
                                     WorkflowConfig::default()).unwrap();
    assert_eq!(refused.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    assert_eq!(refused.cursor(), 3);
    assert!(refused.last_error_of::<SaveFilePhase>()
                   .expect("save error")
                   .message()
                   .contains("overwrite is set to false"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "old");
    refused.close();

    let mut allowed = text_transform(&transform(&input, &output, true),
                                     MapLinesPhase::with_mode(LineMode::Trim, false),
                                     WorkflowConfig::default()).unwrap();
    assert_eq!(allowed.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(fs::read_to_string(&output).unwrap(), "padded\n");
}

#[test]
fn read_only_input_is_partial_success() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "x\n");
    let mut perms = fs::metadata(&input).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&input, perms).unwrap();
    let output = dir.path().join("out.txt");

    let mut wf = text_transform(&transform(&input, &output, false),
                                MapLinesPhase::with_mode(LineMode::Upper, false),
                                WorkflowConfig::default()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::PartialSuccess);
    assert!(wf.last_error_of::<OpenFilePhase>()
              .expect("issue")
              .message()
              .contains("cannot be written to"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "X\n");
}

#[test]
fn saving_by_capability_is_ambiguous_when_both_byte_types_exist() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "a\n");
    let output = dir.path().join("out.txt");

    let mut wf = Workflow::new();
    wf.append_phase(OpenFilePhase::new(&input)).unwrap()
      .append_phase(ReadContentsPhase::new())
      .unwrap()
      .append_phase(MapLinesPhase::with_mode(LineMode::Upper, false))
      .unwrap()
      .append_phase(SaveFilePhase::any(&output))
      .unwrap()
      .append_phase(CloseFilePhase::new())
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    let err = wf.last_error_of::<SaveFilePhase>().expect("save error");
    let cause = err.cause().expect("ambiguity cause").to_string();
    assert!(cause.contains("FileContents") && cause.contains("TextLines"));
    assert!(!output.exists());
    wf.close();
}

#[test]
fn saving_by_capability_works_with_a_single_candidate() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("emitted.txt");

    let mut wf = Workflow::new();
    wf.append_phase(EmitValuePhase::new("emit_lines", || TextLines { lines: vec!["one".into(), "two".into()] }))
      .unwrap()
      .append_phase(SaveFilePhase::any(&output))
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(fs::read_to_string(&output).unwrap(), "one\ntwo\n");
    assert!(wf.last_emitted::<FileContents>().is_none());
}

#[test]
fn close_without_open_file_chains_incoming_error() {
    let mut wf = Workflow::new();
    wf.append_phase(CloseFilePhase::new()).unwrap();
    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FatalFailure);
    let err = wf.last_error_of::<CloseFilePhase>().expect("close error");
    assert_eq!(err.kind(), ExecutionErrorKind::Domain);
    assert!(err.cause().expect("cause").to_string().contains("OpenedFile"));
}

#[test]
fn same_adapter_twice_with_distinct_ids() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.txt", "mixed Case\n");
    let mapped = dir.path().join("mapped.txt");
    let raw = dir.path().join("raw.txt");

    let mut wf = Workflow::new();
    wf.append_phase(OpenFilePhase::new(&input)).unwrap()
      .append_phase(ReadContentsPhase::new())
      .unwrap()
      .append_phase(MapLinesPhase::with_mode(LineMode::Lower, false))
      .unwrap()
      .append_phase(SaveFilePhase::of::<TextLines>(&mapped))
      .unwrap();

    // mismo id por defecto: se rechaza
    let clash = wf.append_phase(SaveFilePhase::of::<FileContents>(&raw));
    assert_eq!(clash.err(), Some(WorkflowError::DuplicatePhase("save_file".to_string())));

    wf.append_phase(SaveFilePhase::of::<FileContents>(&raw).with_id("save_raw"))
      .unwrap()
      .append_phase(CloseFilePhase::new())
      .unwrap();

    assert_eq!(wf.run_to_completion().unwrap(), WorkflowOutcome::FullSuccess);
    assert_eq!(fs::read_to_string(&mapped).unwrap(), "mixed case\n");
    assert_eq!(fs::read_to_string(&raw).unwrap(), "mixed Case\n");
    let ids: Vec<String> = wf.report().phases.into_iter().map(|p| p.id).collect();
    assert_eq!(ids, ["open_file", "read_contents", "map_lines", "save_file", "save_raw", "close_file"]);
}
