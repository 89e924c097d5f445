mod common;

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::json;
use tempfile::TempDir;

use common::{procedure, table, view, write_snapshot};

#[test]
fn diff_writes_script_for_new_objects() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([
            table(
                "Child",
                "CREATE TABLE [dbo].[Child] ( [Id] int NOT NULL );\nGO\n",
                &["Table:dbo.Parent"],
            ),
            table(
                "Parent",
                "CREATE TABLE [dbo].[Parent] ( [Id] int NOT NULL );\nGO\n",
                &[],
            ),
        ]),
    );
    let target = write_snapshot(dir.path(), "target.json", "Tgt", json!([]));
    let out = dir.path().join("diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(&out);
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("added 2, changed 0, removed 0, skipped 0"));

    let script = fs::read_to_string(&out).unwrap();
    assert!(script.contains("-- SQLDiff source: [Src]"));
    assert!(script.contains("-- SQLDiff target: [Tgt]"));
    assert!(script.contains("-- Creates/Alters"));
    let parent = script.find("[dbo].[Parent]").expect("parent created");
    let child = script.find("[dbo].[Child]").expect("child created");
    assert!(parent < child, "parent must be created before child");
}

#[test]
fn identical_snapshots_produce_an_empty_script() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(
        dir.path(),
        "db.json",
        "Db",
        json!([view("V", "CREATE VIEW dbo.V AS SELECT 1")]),
    );
    let out = dir.path().join("diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--source-snapshot"])
        .arg(&snapshot)
        .arg("--target-snapshot")
        .arg(&snapshot)
        .arg("--out")
        .arg(&out);
    let output = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&output)
        .contains("added 0, changed 0, removed 0, skipped 0"));

    let script = fs::read_to_string(&out).unwrap();
    assert!(!script.contains("-- Drops"));
    assert!(!script.contains("-- Creates/Alters"));
}

#[test]
fn changed_procedure_becomes_create_or_alter() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([procedure("P", "CREATE PROCEDURE dbo.P AS SELECT 1")]),
    );
    let target = write_snapshot(
        dir.path(),
        "target.json",
        "Tgt",
        json!([procedure("P", "CREATE PROCEDURE dbo.P AS SELECT 2")]),
    );
    let out = dir.path().join("diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    let script = fs::read_to_string(&out).unwrap();
    assert!(script.contains("CREATE OR ALTER PROCEDURE dbo.P AS SELECT 1"));
}

#[test]
fn add_only_never_drops_or_alters() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([
            view("New", "CREATE VIEW dbo.New AS SELECT 1"),
            view("V", "CREATE VIEW dbo.V AS SELECT 1"),
        ]),
    );
    let target = write_snapshot(
        dir.path(),
        "target.json",
        "Tgt",
        json!([
            view("V", "CREATE VIEW dbo.V AS SELECT 99"),
            view("Gone", "CREATE VIEW dbo.Gone AS SELECT 1"),
        ]),
    );
    let out = dir.path().join("diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--add-only", "--include-drops", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(&out);
    cmd.assert().success();

    let script = fs::read_to_string(&out).unwrap();
    assert!(!script.contains("DROP"));
    assert!(!script.contains("CREATE OR ALTER"));
    assert!(script.contains("CREATE VIEW dbo.New AS SELECT 1"));
}

#[test]
fn changed_table_is_skipped_without_rebuild_flag() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([table("T", "CREATE TABLE [dbo].[T] ( [A] int NOT NULL );\nGO\n", &[])]),
    );
    let target = write_snapshot(
        dir.path(),
        "target.json",
        "Tgt",
        json!([table("T", "CREATE TABLE [dbo].[T] ( [B] int NOT NULL );\nGO\n", &[])]),
    );
    let out = dir.path().join("diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(&out);
    let output = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&output)
        .contains("added 0, changed 1, removed 0, skipped 1"));

    let script = fs::read_to_string(&out).unwrap();
    assert!(script.contains("-- WARNING: table [dbo].[T]"));
    assert!(script.contains("--allow-table-rebuild"));
    assert!(!script.contains("DROP TABLE"));
    assert!(!script.contains("CREATE TABLE [dbo].[T] ( [A]"));
}

#[test]
fn drift_exits_two_when_changes_exist() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([view("V", "CREATE VIEW dbo.V AS SELECT 1")]),
    );
    let target = write_snapshot(dir.path(), "target.json", "Tgt", json!([]));

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["drift", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target);
    let assert = cmd.assert().code(2);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("CREATE VIEW dbo.V AS SELECT 1"));
}

#[test]
fn drift_exits_zero_when_schemas_match() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(
        dir.path(),
        "db.json",
        "Db",
        json!([view("V", "CREATE VIEW dbo.V AS SELECT 1")]),
    );

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["drift", "--source-snapshot"])
        .arg(&snapshot)
        .arg("--target-snapshot")
        .arg(&snapshot);
    cmd.assert().success();
}

#[test]
fn drift_ignores_whitespace_and_case_differences() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([view("V", "CREATE VIEW dbo.V\nAS\n    SELECT 1")]),
    );
    let target = write_snapshot(
        dir.path(),
        "target.json",
        "Tgt",
        json!([view("V", "create view dbo.V as select 1")]),
    );

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["drift", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target);
    cmd.assert().success();
}

#[test]
fn sync_dry_run_prints_batches_without_connecting() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(
        dir.path(),
        "source.json",
        "Src",
        json!([view("V", "CREATE VIEW dbo.V AS SELECT 1")]),
    );
    let target = write_snapshot(dir.path(), "target.json", "Tgt", json!([]));
    let out = dir.path().join("sync.diff.sql");

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["sync", "--dry-run", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(&out);
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("Dry run:"));
    assert!(stdout.contains("CREATE VIEW dbo.V AS SELECT 1"));
    assert!(out.exists());
}

#[test]
fn apply_dry_run_splits_script_into_batches() {
    let dir = TempDir::new().unwrap();
    let script_path = dir.path().join("deploy.sql");
    fs::write(
        &script_path,
        "CREATE VIEW dbo.A AS SELECT 1\nGO\nCREATE VIEW dbo.B AS SELECT 2\nGO -- trailing note\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["apply", "--dry-run", "--conn", "Server=localhost;Database=x", "--script"])
        .arg(&script_path);
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&output);
    assert!(stdout.contains("Dry run: 2 batch(es)"));
    assert!(stdout.contains("-- Batch 1"));
    assert!(stdout.contains("-- Batch 2"));
}

#[test]
fn missing_snapshot_document_is_an_error() {
    let dir = TempDir::new().unwrap();
    let target = write_snapshot(dir.path(), "target.json", "Tgt", json!([]));

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["diff", "--source-snapshot"])
        .arg(dir.path().join("nope.json"))
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(dir.path().join("diff.sql"));
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("Failed to read snapshot"));
}

#[test]
fn deploy_rejects_a_snapshot_target() {
    let dir = TempDir::new().unwrap();
    let source = write_snapshot(dir.path(), "source.json", "Src", json!([]));
    let target = write_snapshot(dir.path(), "target.json", "Tgt", json!([]));

    let mut cmd = cargo_bin_cmd!("sqldiff");
    cmd.args(["deploy", "--source-snapshot"])
        .arg(&source)
        .arg("--target-snapshot")
        .arg(&target)
        .arg("--out")
        .arg(dir.path().join("deploy.sql"));
    let assert = cmd.assert().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("target connection"));
}
