use std::fs;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn phaseflow() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_phaseflow"));
    cmd.env_remove("PHASEFLOW_DEBUG").env_remove("PHASEFLOW_CLEAR_ON_CLOSE");
    cmd
}

#[test]
fn transform_full_success_exits_zero() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "abc\ndef\n").unwrap();

    phaseflow().arg("transform")
               .arg(&input)
               .arg(&output)
               .assert()
               .code(0)
               .stdout(contains("outcome: full success"))
               .stdout(contains("progress: 100%"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "ABC\nDEF\n");
}

#[test]
fn ascii_only_partial_success_exits_two() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "Keep\nDrop é\n").unwrap();

    phaseflow().args(["transform", "--mode", "lower", "--ascii-only"])
               .arg(&input)
               .arg(&output)
               .assert()
               .code(2)
               .stdout(contains("outcome: partial success"))
               .stdout(contains("[map_lines] warning"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep\n");
}

#[test]
fn existing_output_is_fatal_unless_overwrite() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "  x  \n").unwrap();
    fs::write(&output, "keep me").unwrap();

    phaseflow().args(["transform", "--mode", "trim"])
               .arg(&input)
               .arg(&output)
               .assert()
               .code(1)
               .stdout(contains("outcome: fatal failure"))
               .stdout(contains("progress: 60%"));
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

    phaseflow().args(["transform", "--mode", "trim", "--overwrite"])
               .arg(&input)
               .arg(&output)
               .assert()
               .code(0);
    assert_eq!(fs::read_to_string(&output).unwrap(), "x\n");
}

#[test]
fn json_report_for_missing_input() {
    let dir = TempDir::new().unwrap();
    let out = phaseflow().args(["transform", "--json"])
                         .arg(dir.path().join("absent.txt"))
                         .arg(dir.path().join("out.txt"))
                         .output()
                         .unwrap();
    assert_eq!(out.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["outcome"], "FatalFailure");
    assert_eq!(report["state"], "Stalled");
    assert_eq!(report["errors"][0]["phase_id"], "open_file");
    assert_eq!(report["phases"].as_array().map(Vec::len), Some(5));
}

#[test]
fn describe_lists_pipeline() {
    phaseflow().arg("describe")
               .assert()
               .success()
               .stdout(contains("definition: "))
               .stdout(contains("1. open_file"))
               .stdout(contains("5. close_file"));
}

#[test]
fn invalid_clear_flag_is_a_setup_error() {
    phaseflow().env("PHASEFLOW_CLEAR_ON_CLOSE", "sometimes")
               .arg("describe")
               .assert()
               .code(3)
               .stderr(contains("PHASEFLOW_CLEAR_ON_CLOSE"));
}
