//! E2E tests for the `codecity` binary: replay, changed, timeline and
//! analyze over fixture files in a temporary project.
//!
//! Covers: JSON schemas, text summaries, rename policy from project config,
//! and structured errors for missing or malformed inputs.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const HISTORY: &str = r#"[
  {"hash": "a1", "date": "2024-01-01T09:00:00Z", "author_name": "Ada", "author_email": "ada@example.com",
   "message": "scaffold",
   "files": [
     {"path": "src/app.ts", "added": 40, "deleted": 0, "status": "A"},
     {"path": "src/util/math.ts", "added": 20, "deleted": 0, "status": "A"},
     {"path": "README.md", "added": 5, "deleted": 0, "status": "A"}
   ]},
  {"hash": "b2", "date": "2024-01-03T09:00:00Z", "author_name": "Ada", "author_email": "ada@example.com",
   "message": "rename math",
   "files": [
     {"path": "src/util/calc.ts", "added": 2, "deleted": 1, "status": "R", "previous_path": "src/util/math.ts"}
   ]},
  {"hash": "c3", "date": "2024-01-07T09:00:00Z", "author_name": "Lin", "author_email": "lin@example.com",
   "message": "drop readme",
   "files": [
     {"path": "README.md", "added": 0, "deleted": null, "status": "D"},
     {"path": "src/app.ts", "added": 10, "deleted": 30, "status": "M"}
   ]}
]"#;

const LAYOUT: &str = r#"{
  "name": "", "path": "", "type": "directory", "x": 0, "y": 0, "width": 100, "height": 100,
  "children": [
    {"name": "app.ts", "path": "app.ts", "type": "file", "size": 30,
     "x": 0, "y": 0, "width": 10, "height": 10},
    {"name": "lib", "path": "lib", "type": "directory", "x": 50, "y": 0, "width": 50, "height": 50,
     "children": [
       {"name": "util.ts", "path": "lib/util.ts", "type": "file", "size": 8,
        "x": 50, "y": 0, "width": 10, "height": 10}
     ]}
  ]
}"#;

const DEPS: &str = r#"{"app.ts": ["lib/util.ts", "react"]}"#;

fn codecity_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("codecity"));
    cmd.current_dir(dir);
    cmd.env("CODECITY_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("history.json"), HISTORY).expect("write history");
    fs::write(dir.path().join("city.json"), LAYOUT).expect("write layout");
    fs::write(dir.path().join("deps.json"), DEPS).expect("write deps");
    dir
}

fn json_output(dir: &Path, args: &[&str]) -> Value {
    let output = codecity_cmd(dir)
        .args(args)
        .arg("--json")
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn file_paths(node: &Value, out: &mut Vec<String>) {
    if node["type"] == "file" {
        out.push(node["path"].as_str().expect("path").to_string());
    }
    if let Some(children) = node["children"].as_array() {
        for child in children {
            file_paths(child, out);
        }
    }
}

// ---------------------------------------------------------------------------
// codecity replay
// ---------------------------------------------------------------------------

#[test]
fn replay_json_reports_tree_and_summary() {
    let dir = project();
    let json = json_output(dir.path(), &["replay", "--commits", "history.json"]);

    assert_eq!(json["commit_count"], 3);
    assert_eq!(json["index"], 2);
    assert_eq!(json["commit"], "c3");
    assert_eq!(json["author"], "Lin <lin@example.com>");
    assert_eq!(json["tree"]["type"], "directory");
    assert!(json["time_range"]["oldest"].is_string());

    // Renames default to modify: the old path survives.
    let mut files = Vec::new();
    file_paths(&json["tree"], &mut files);
    files.sort();
    assert_eq!(files, vec!["src/app.ts", "src/util/calc.ts", "src/util/math.ts"]);
    assert_eq!(json["file_count"], 3);
    assert_eq!(json["total_size"], 20 + 1 + 20);
}

#[test]
fn replay_move_policy_from_project_config() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".codecity")).expect("mkdir");
    fs::write(
        dir.path().join(".codecity/config.toml"),
        "[replay]\nrename = \"move\"\n",
    )
    .expect("write config");

    let json = json_output(dir.path(), &["replay", "--commits", "history.json", "--at", "1"]);
    let mut files = Vec::new();
    file_paths(&json["tree"], &mut files);
    files.sort();
    assert_eq!(files, vec!["README.md", "src/app.ts", "src/util/calc.ts"]);
    // 40 + 5 + (20 + 2 − 1)
    assert_eq!(json["total_size"], 66);

    // The flag overrides the config.
    let json = json_output(
        dir.path(),
        &["replay", "--commits", "history.json", "--at", "1", "--rename", "modify"],
    );
    assert_eq!(json["file_count"], 4);
}

#[test]
fn replay_text_summary() {
    let dir = project();
    codecity_cmd(dir.path())
        .args(["replay", "--commits", "history.json", "--at", "0", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("files=3"))
        .stdout(predicate::str::contains("directories=2"))
        .stdout(predicate::str::contains("total_size=65"));
}

#[test]
fn replay_missing_file_reports_error_code() {
    let dir = project();
    codecity_cmd(dir.path())
        .args(["replay", "--commits", "nope.json", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"));
}

#[test]
fn replay_malformed_log_reports_decode_error() {
    let dir = project();
    fs::write(dir.path().join("bad.json"), "{\"not\": \"a list\"}").expect("write");
    codecity_cmd(dir.path())
        .args(["replay", "--commits", "bad.json", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: invalid commit log"))
        .stderr(predicate::str::contains("suggestion:"));
}

// ---------------------------------------------------------------------------
// codecity changed
// ---------------------------------------------------------------------------

#[test]
fn changed_lists_non_deleted_paths() {
    let dir = project();
    let json = json_output(dir.path(), &["changed", "--commits", "history.json", "--at", "2"]);
    assert_eq!(json["commit"], "c3");
    assert_eq!(json["changed_paths"], serde_json::json!(["src/app.ts"]));

    codecity_cmd(dir.path())
        .args(["changed", "--commits", "history.json", "--at", "0", "--format", "text"])
        .assert()
        .success()
        .stdout("README.md\nsrc/app.ts\nsrc/util/math.ts\n");
}

#[test]
fn changed_out_of_range_is_empty() {
    let dir = project();
    let json = json_output(dir.path(), &["changed", "--commits", "history.json", "--at", "40"]);
    assert!(json["commit"].is_null());
    assert_eq!(json["changed_paths"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// codecity timeline
// ---------------------------------------------------------------------------

#[test]
fn timeline_samples_and_keeps_last_commit() {
    let dir = project();
    let json = json_output(dir.path(), &["timeline", "--commits", "history.json", "--step", "2"]);
    assert_eq!(json["step"], 2);
    let points = json["points"].as_array().expect("points");
    let indices: Vec<_> = points.iter().map(|p| p["index"].as_u64()).collect();
    assert_eq!(indices, vec![Some(0), Some(2)]);
    assert_eq!(points[0]["file_count"], 3);
    assert_eq!(points[0]["total_size"], 65);
    assert_eq!(points[1]["changed"], 1);
}

// ---------------------------------------------------------------------------
// codecity analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_json_has_city_metrics() {
    let dir = project();
    let json = json_output(
        dir.path(),
        &["analyze", "--layout", "city.json", "--deps", "deps.json"],
    );

    for key in [
        "modularity_score",
        "scalability_score",
        "avg_coupling_radius",
        "hub_concentration",
        "dead_code_ratio",
        "avg_instability",
        "hub_files",
        "abandoned_files",
        "districts",
        "files",
        "graph_hash",
    ] {
        assert!(json.get(key).is_some(), "missing {key}");
    }

    let app = json["files"]
        .as_array()
        .expect("files")
        .iter()
        .find(|f| f["path"] == "app.ts")
        .expect("app.ts");
    // The unresolved `react` import still counts toward out-degree.
    assert_eq!(app["out_degree"], 2);
    assert_eq!(json["hub_files"][0]["path"], "lib/util.ts");
}

#[test]
fn analyze_without_deps_is_isolated() {
    let dir = project();
    let json = json_output(dir.path(), &["analyze", "--layout", "city.json"]);
    assert_eq!(json["modularity_score"], 33);
    assert_eq!(json["hub_files"], serde_json::json!([]));
}

#[test]
fn analyze_respects_external_import_setting() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".codecity")).expect("mkdir");
    fs::write(
        dir.path().join(".codecity/config.toml"),
        "[analytics]\ncount_external_imports = false\n",
    )
    .expect("write config");

    let json = json_output(
        dir.path(),
        &["analyze", "--layout", "city.json", "--deps", "deps.json"],
    );
    let app = json["files"]
        .as_array()
        .expect("files")
        .iter()
        .find(|f| f["path"] == "app.ts")
        .expect("app.ts");
    assert_eq!(app["out_degree"], 1);
}

#[test]
fn analyze_bad_deps_reports_error_code() {
    let dir = project();
    fs::write(dir.path().join("deps.json"), "[1, 2, 3]").expect("write");
    codecity_cmd(dir.path())
        .args(["analyze", "--layout", "city.json", "--deps", "deps.json", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn invalid_project_config_fails_with_config_code() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".codecity")).expect("mkdir");
    fs::write(dir.path().join(".codecity/config.toml"), "[replay\n").expect("write config");
    codecity_cmd(dir.path())
        .args(["replay", "--commits", "history.json", "--json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}
