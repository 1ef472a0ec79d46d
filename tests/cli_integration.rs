//! CLI integration tests for antledger
//!
//! These tests drive the binary over fixture inputs in a temp directory, with
//! history lookups answered from a fixture file instead of git.

use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the antledger binary
fn antledger_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("antledger"))
}

const SITE_DATA: &str = r#"{
  "version": "1",
  "ants": [
    {"ant": "ants are small", "suggestedContent": "ants r small", "tweeted": true, "tweetedAt": "2023-01-05T10:00:00Z"},
    {"ant": "ants march in lines"},
    {"ant": "old legacy ant", "legacy": true},
    {"ant": "forgotten ant"}
  ]
}"#;

const RAW_ISSUES: &str = r#"[
  {"title": "`ants r small`", "state": "CLOSED", "createdAt": "2023-01-01T09:00:00Z", "closed": true, "closedAt": "2023-01-02T09:00:00Z", "body": "", "labels": [{"name": "autogenerated"}]},
  {"title": "`ants march in lines`", "state": "CLOSED", "createdAt": "2023-01-01T20:00:00Z", "closed": true, "closedAt": "2023-01-03T09:00:00Z", "body": "", "labels": []},
  {"title": "`ant’s nope`", "state": "CLOSED", "createdAt": "2023-01-04T09:00:00Z", "closed": true, "closedAt": "2023-01-05T09:00:00Z", "body": "", "labels": []},
  {"title": "`an unseen ant`", "state": "OPEN", "createdAt": "2023-01-06T09:00:00Z", "closed": false, "closedAt": null, "body": "", "labels": []},
  {"title": "`broken close`", "state": "CLOSED", "createdAt": "2023-01-06T09:00:00Z", "closed": true, "closedAt": null, "body": "", "labels": []},
  {"title": "no backticks here", "state": "OPEN", "createdAt": "2023-01-07T09:00:00Z", "closed": false, "closedAt": null, "body": "", "labels": [{"name": "autogenerated"}]}
]"#;

const HISTORY: &str = r#"{"old legacy ant": "2022-06-01T08:00:00Z"}"#;

const LISTING: &str = "ants are small\nants march in lines\nold legacy ant\n";

/// Create a temp directory with every input file
fn setup_inputs() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("site.json"), SITE_DATA).unwrap();
    fs::write(dir.path().join("issues.json"), RAW_ISSUES).unwrap();
    fs::write(dir.path().join("history.json"), HISTORY).unwrap();
    fs::write(dir.path().join("ants.txt"), LISTING).unwrap();
    dir
}

/// Runs a pipeline command with the fixture inputs
fn pipeline_cmd(dir: &Path, command: &str) -> assert_cmd::Command {
    let mut cmd = antledger_cmd();
    cmd.current_dir(dir).args([
        command,
        "--site-data",
        "site.json",
        "--raw-issues",
        "issues.json",
    ]);
    cmd
}

fn reconcile_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = pipeline_cmd(dir, "reconcile");
    cmd.args(["--history-file", "history.json", "--out", "out"]);
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap()
}

// =============================================================================
// Reconcile Tests
// =============================================================================

#[test]
fn test_reconcile_writes_every_table() {
    let dir = setup_inputs();

    reconcile_cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 7 files"));

    let out = dir.path().join("out");
    for name in [
        "ant.sql",
        "ant_tweeted.sql",
        "ant_declined.sql",
        "release.sql",
        "ant_release.sql",
        "migration.sql",
        "seed.sql",
    ] {
        assert!(out.join(name).is_file(), "missing {}", name);
    }

    let release = fs::read_to_string(out.join("release.sql")).unwrap();
    assert!(release.contains("(1, 'v1')"));
    assert!(release.contains("(2, 'v2')"));

    let declined = fs::read_to_string(out.join("ant_declined.sql")).unwrap();
    assert!(declined.contains("'ant''s nope'"));
    assert!(declined.contains("user_name = 'kaspar'"));

    let ant = fs::read_to_string(out.join("ant.sql")).unwrap();
    assert!(ant.contains("('ants r small', "));
    assert!(!ant.contains("an unseen ant"));
    assert!(!ant.contains("broken close"));

    let seed = fs::read_to_string(out.join("seed.sql")).unwrap();
    assert!(seed.starts_with("BEGIN;"));
    assert!(seed.ends_with("COMMIT;\n"));
    assert!(seed.contains("insert into migration (migration_label) values ('seed-ants:"));
}

#[test]
fn test_reconcile_json_summary() {
    let dir = setup_inputs();

    let assert = reconcile_cmd(dir.path())
        .args(["--format", "json"])
        .assert()
        .success();

    let json = stdout_json(assert.get_output());
    assert_eq!(json["unseen"], 1);
    assert_eq!(json["declined"], 1);
    assert_eq!(json["accepted"], 2);
    assert_eq!(json["legacy"], 1);
    assert_eq!(json["skipped"], 2);
    assert_eq!(json["releases"], 2);
    assert_eq!(json["latest_release"], 2);
    assert!(json["migration_label"]
        .as_str()
        .unwrap()
        .starts_with("seed-ants:"));
    assert_eq!(json["files"].as_array().unwrap().len(), 7);
}

#[test]
fn test_reconcile_is_deterministic() {
    let dir = setup_inputs();

    reconcile_cmd(dir.path()).assert().success();
    let first = fs::read_to_string(dir.path().join("out/seed.sql")).unwrap();

    reconcile_cmd(dir.path()).args(["--workers", "1"]).assert().success();
    let second = fs::read_to_string(dir.path().join("out/seed.sql")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_reconcile_removes_stale_tables() {
    let dir = setup_inputs();
    reconcile_cmd(dir.path()).assert().success();
    assert!(dir.path().join("out/ant_declined.sql").exists());

    // Same export without the declined issue
    let issues: Vec<Value> = serde_json::from_str(RAW_ISSUES).unwrap();
    let kept: Vec<&Value> = issues
        .iter()
        .filter(|issue| issue["title"] != "`ant’s nope`")
        .collect();
    fs::write(
        dir.path().join("issues.json"),
        serde_json::to_string(&kept).unwrap(),
    )
    .unwrap();

    reconcile_cmd(dir.path()).assert().success();
    assert!(!dir.path().join("out/ant_declined.sql").exists());
    assert!(dir.path().join("out/ant.sql").exists());
}

#[test]
fn test_reconcile_leaves_foreign_files_in_output_dir() {
    let dir = setup_inputs();
    fs::write(dir.path().join("schema.sql"), "create table ant ();\n").unwrap();

    pipeline_cmd(dir.path(), "reconcile")
        .args(["--history-file", "history.json", "--out", "."])
        .assert()
        .success();

    assert!(dir.path().join("seed.sql").exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("schema.sql")).unwrap(),
        "create table ant ();\n"
    );
    assert!(dir.path().join("site.json").exists());
}

#[test]
fn test_reconcile_fails_when_legacy_ant_has_no_history() {
    let dir = setup_inputs();
    fs::write(dir.path().join("history.json"), "{}").unwrap();

    reconcile_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Content never appeared in history"))
        .stderr(predicate::str::contains("old legacy ant"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_reconcile_strict_mode_rejects_unparseable_generated_issue() {
    let dir = setup_inputs();

    reconcile_cmd(dir.path())
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no backticked content"));
}

#[test]
fn test_reconcile_missing_site_data() {
    let dir = TempDir::new().unwrap();

    reconcile_cmd(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read site data"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let dir = setup_inputs();

    reconcile_cmd(dir.path())
        .args(["--verbose", "--format", "json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[verbose:classify]"))
        .stderr(predicate::str::contains("[verbose:history] Using fixture"));
}

// =============================================================================
// Classify Tests
// =============================================================================

#[test]
fn test_classify_counts() {
    let dir = setup_inputs();

    let assert = pipeline_cmd(dir.path(), "classify")
        .args(["--format", "json"])
        .assert()
        .success();

    let json = stdout_json(assert.get_output());
    assert_eq!(json["unseen"], 1);
    assert_eq!(json["declined"], 1);
    assert_eq!(json["accepted"], 2);
    assert_eq!(json["skipped"], 2);
}

#[test]
fn test_classify_lists_canonical_content() {
    let dir = setup_inputs();

    pipeline_cmd(dir.path(), "classify")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Accepted (2):"))
        .stdout(predicate::str::contains("  ants are small"))
        .stdout(predicate::str::contains("  ant's nope"))
        .stdout(predicate::str::contains("  an unseen ant"));
}

#[test]
fn test_classify_list_json_is_tagged_by_kind() {
    let dir = setup_inputs();

    let assert = pipeline_cmd(dir.path(), "classify")
        .args(["--list", "--format", "json"])
        .assert()
        .success();

    let json = stdout_json(assert.get_output());
    assert_eq!(json["skipped"], 2);
    let ants = json["ants"].as_array().unwrap();
    let kinds: Vec<&str> = ants.iter().map(|ant| ant["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["unseen", "declined", "accepted", "accepted"]);
    assert_eq!(ants[0]["originalSuggestionContent"], "an unseen ant");
    assert_eq!(ants[2]["antContent"], "ants are small");
    assert_eq!(ants[2]["originalSuggestionContent"], "ants r small");
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_passes_with_unaccounted_warning() {
    let dir = setup_inputs();

    pipeline_cmd(dir.path(), "check")
        .args(["--history-file", "history.json", "--listing", "ants.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'forgotten ant' is not accounted for"))
        .stdout(predicate::str::contains("passed with warnings"));
}

#[test]
fn test_check_reports_listed_ant_missing_from_site() {
    let dir = setup_inputs();
    fs::write(
        dir.path().join("ants.txt"),
        format!("{}ghost ant\n", LISTING),
    )
    .unwrap();

    pipeline_cmd(dir.path(), "check")
        .args(["--history-file", "history.json", "--listing", "ants.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'ghost ant' is not a site ant"))
        .stdout(predicate::str::contains("Integrity check found 1 error(s)"));
}

#[test]
fn test_check_deny_errors_fails_on_error_findings() {
    let dir = setup_inputs();
    fs::write(
        dir.path().join("ants.txt"),
        format!("{}ghost ant\n", LISTING),
    )
    .unwrap();

    pipeline_cmd(dir.path(), "check")
        .args(["--history-file", "history.json", "--listing", "ants.txt"])
        .arg("--deny-errors")
        .assert()
        .failure()
        .stdout(predicate::str::contains("'ghost ant' is not a site ant"))
        .stderr(predicate::str::contains("Integrity check failed with 1 error(s)"));
}

#[test]
fn test_check_deny_errors_allows_warnings() {
    let dir = setup_inputs();

    pipeline_cmd(dir.path(), "check")
        .args(["--history-file", "history.json", "--listing", "ants.txt"])
        .arg("--deny-errors")
        .assert()
        .success();
}

#[test]
fn test_check_json_report() {
    let dir = setup_inputs();

    let assert = pipeline_cmd(dir.path(), "check")
        .args([
            "--history-file",
            "history.json",
            "--listing",
            "ants.txt",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let json = stdout_json(assert.get_output());
    assert_eq!(json["site_ants"], 4);
    assert_eq!(json["listed"], 3);
    let findings = json["findings"].as_array().unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0]["kind"], "unaccounted");
    assert_eq!(findings[0]["content"], "forgotten ant");
}

// =============================================================================
// Standalone Command Tests
// =============================================================================

#[test]
fn test_hash_matches_known_value() {
    antledger_cmd()
        .args(["hash", "hello"])
        .assert()
        .success()
        .stdout("99162322\n");
}

#[test]
fn test_hash_json() {
    let assert = antledger_cmd()
        .args(["hash", "ab", "--format", "json"])
        .assert()
        .success();

    let json = stdout_json(assert.get_output());
    assert_eq!(json["content"], "ab");
    assert_eq!(json["hash"], 3105);
}

#[test]
fn test_release_from_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("release.json"),
        r#"{"Date": {"Year": 2024, "Month": 2, "Day": 9}, "Ants": ["first ant", "second ant"]}"#,
    )
    .unwrap();

    antledger_cmd()
        .current_dir(dir.path())
        .args(["release", "release.json", "12"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("BEGIN;"))
        .stdout(predicate::str::contains("'2024-03-09 00:00:00'"))
        .stdout(predicate::str::contains("(12, 'v12')"))
        .stdout(predicate::str::contains("values ('release-12-2024-03-09');"));
}

#[test]
fn test_release_rejects_invalid_date() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("release.json"),
        r#"{"Date": {"Year": 2024, "Month": 12, "Day": 1}, "Ants": ["a"]}"#,
    )
    .unwrap();

    antledger_cmd()
        .current_dir(dir.path())
        .args(["release", "release.json", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid release date"));
}

#[test]
fn test_rehash_writes_file() {
    let dir = setup_inputs();

    antledger_cmd()
        .current_dir(dir.path())
        .args(["rehash", "ants.txt", "--out", "sql/rehash.sql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    let sql = fs::read_to_string(dir.path().join("sql/rehash.sql")).unwrap();
    assert!(sql.contains("set ant_content_hash = 0 where ant_content = 'ants are small';"));
    assert!(sql.contains(&format!(
        "set ant_content_hash = {} where ant_content = 'old legacy ant';",
        2 * (2147483647u32 / 3)
    )));
    assert!(sql.contains("reorder-content-hash-to-match-legacy:"));
}

#[test]
fn test_rehash_empty_listing_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("empty.txt"), "\n\n").unwrap();

    antledger_cmd()
        .current_dir(dir.path())
        .args(["rehash", "empty.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Listing is empty"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_init_is_idempotent() {
    let dir = TempDir::new().unwrap();

    antledger_cmd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created antledger.toml"));
    assert!(dir.path().join("antledger.toml").is_file());

    antledger_cmd()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_config_file_supplies_paths_and_accounts() {
    let dir = setup_inputs();
    fs::write(
        dir.path().join("antledger.toml"),
        r#"
site_data = "site.json"
raw_issues = "issues.json"
out_dir = "generated"

[sql]
reviewer_user = "moderator"
migration_prefix = "initial-ants"
"#,
    )
    .unwrap();

    antledger_cmd()
        .current_dir(dir.path())
        .args(["reconcile", "--history-file", "history.json"])
        .assert()
        .success();

    let declined = fs::read_to_string(dir.path().join("generated/ant_declined.sql")).unwrap();
    assert!(declined.contains("user_name = 'moderator'"));
    let migration = fs::read_to_string(dir.path().join("generated/migration.sql")).unwrap();
    assert!(migration.contains("'initial-ants:"));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = setup_inputs();
    fs::write(dir.path().join("bad.toml"), "[history]\nworkers = 0\n").unwrap();

    pipeline_cmd(dir.path(), "classify")
        .args(["--config", "bad.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("history.workers must be at least 1"));
}
