//! CLI integration tests
//!
//! Drive the built `trackplan` binary against documents written to a temp
//! directory.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const INVENTORY: &str = r#"
schema_version: 1
kind: inventory
group_types:
  - type_name: account
  - type_name: workspace
    parent_type: account
groups:
  - id: acc_1
    type: account
  - id: ws_1
    type: workspace
    parent: acc_1
events:
  - name: video_created
    properties:
      - { name: duration, type: number, required: true }
  - name: button_clicked
    status: orphaned
attributions:
  ws_1: [video_created]
"#;

const TARGET: &str = r#"
schema_version: 1
kind: target_plan
group_types:
  - type_name: account
  - type_name: workspace
    parent_type: account
events:
  - name: video.created
    properties:
      - { name: duration, type: number, required: true }
  - name: plan.upgraded
"#;

const CYCLIC: &str = r#"{
  "schema_version": 1,
  "kind": "target_plan",
  "group_types": [
    { "type_name": "team", "parent_type": "squad" },
    { "type_name": "squad", "parent_type": "team" }
  ]
}"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_trackplan"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_reconcile_prints_delta_to_stdout() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &["reconcile", "--inventory", "inventory.yaml", "--target", "target.yaml"],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["summary"]["rename"], 1);
    assert_eq!(doc["summary"]["add"], 1);
    assert_eq!(doc["summary"]["remove"], 1);
    assert_eq!(doc["summary"]["status_breakdown"]["remove"]["orphaned"], 1);
    assert_eq!(doc["hierarchy"]["inventory"]["status"], "valid");
}

#[test]
fn test_reconcile_writes_out_file() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &[
            "reconcile",
            "--inventory",
            "inventory.yaml",
            "--target",
            "target.yaml",
            "--out",
            "reports/delta.json",
        ],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Wrote delta"));

    let written = fs::read_to_string(temp_dir.path().join("reports/delta.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(doc["entries"].as_array().unwrap().len(), 3);
}

#[test]
fn test_canonical_policy_flag_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);
    write(
        temp_dir.path(),
        "trackplan.toml",
        "[reconcile]\nnaming_policy = \"literal\"\n",
    );

    let output = run(
        temp_dir.path(),
        &[
            "reconcile",
            "--inventory",
            "inventory.yaml",
            "--target",
            "target.yaml",
            "--naming-policy",
            "canonical",
        ],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["policy"]["naming_policy"], "canonical");
    assert_eq!(doc["summary"]["keep"], 1);
    assert_eq!(doc["summary"]["rename"], 0);
}

#[test]
fn test_config_file_threshold_applied() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);
    write(
        temp_dir.path(),
        "trackplan.toml",
        "[reconcile]\nrename_threshold = 0.8\n",
    );

    let output = run(
        temp_dir.path(),
        &["reconcile", "--inventory", "inventory.yaml", "--target", "target.yaml"],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["policy"]["rename_threshold"], 0.8);
}

#[test]
fn test_swapped_documents_fail_with_code() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &["reconcile", "--inventory", "target.yaml", "--target", "inventory.yaml"],
    );

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("ERR_INVALID_DOCUMENT"), "Stderr: {}", err);
    assert!(err.contains("run_id:"), "Stderr: {}", err);
}

#[test]
fn test_invalid_threshold_rejected() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &[
            "reconcile",
            "--inventory",
            "inventory.yaml",
            "--target",
            "target.yaml",
            "--threshold",
            "1.5",
        ],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_INVALID_CONFIG"));
}

#[test]
fn test_groups_prints_rollup() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);

    let output = run(temp_dir.path(), &["groups", "inventory.yaml"]);

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["roots"], serde_json::json!(["account"]));
    let account = result["instances"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "acc_1")
        .unwrap();
    assert_eq!(account["effective"], serde_json::json!(["video_created"]));
}

#[test]
fn test_groups_reports_cycle_members() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "cyclic.json", CYCLIC);

    let output = run(temp_dir.path(), &["groups", "cyclic.json"]);

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("ERR_CYCLE_DETECTED"), "Stderr: {}", err);
    assert!(err.contains("squad") && err.contains("team"), "Stderr: {}", err);
}

#[test]
fn test_missing_explicit_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);

    let output = run(
        temp_dir.path(),
        &["groups", "inventory.yaml", "--config", "absent.toml"],
    );

    assert!(!output.status.success());
    assert!(stderr(&output).contains("ERR_INVALID_CONFIG"));
}

#[cfg(not(feature = "parallel"))]
#[test]
fn test_parallel_flag_rejected_without_feature() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &[
            "reconcile",
            "--inventory",
            "inventory.yaml",
            "--target",
            "target.yaml",
            "--parallel",
        ],
    );

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("ERR_INVALID_CONFIG"), "Stderr: {}", err);
    assert!(err.contains("parallel"), "Stderr: {}", err);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_flag_accepted_with_feature() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "inventory.yaml", INVENTORY);
    write(temp_dir.path(), "target.yaml", TARGET);

    let output = run(
        temp_dir.path(),
        &[
            "reconcile",
            "--inventory",
            "inventory.yaml",
            "--target",
            "target.yaml",
            "--parallel",
        ],
    );

    assert!(output.status.success(), "Stderr: {}", stderr(&output));
    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(doc["summary"]["rename"], 1);
}
