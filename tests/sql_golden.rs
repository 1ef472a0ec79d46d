//! Golden file tests for the SQL seed
//!
//! Content hashes and migration labels are persisted in production databases,
//! so the exact text of the seed must not drift.

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the antledger binary
fn antledger_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("antledger"))
}

/// One accepted, tweeted ant and nothing else
fn setup_single_ant() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("site.json"),
        r#"{"version": "1", "ants": [{"ant": "tiny ant", "tweeted": true, "tweetedAt": "2023-02-05T00:00:00Z"}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("issues.json"),
        r#"[{"title": "`tiny ant`", "state": "CLOSED", "createdAt": "2023-02-03T04:05:06Z", "closed": true, "closedAt": "2023-02-04T00:00:00Z", "body": "", "labels": []}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("history.json"), "{}").unwrap();
    dir
}

const ANT_ID: &str = "(select ant_id from ant where suggested_content = 'tiny ant' and created_at = '2023-02-03 04:05:06')";

fn expected_seed() -> String {
    [
        "BEGIN;",
        "insert into ant (suggested_content, ant_user_id, created_at)\n  values\n    ('tiny ant', (select user_id from registered_user where user_name = 'nobody'), '2023-02-03 04:05:06')\n;",
        format!("insert into ant_tweeted (ant_id, tweeted_at)\n  values\n    ({}, '2023-02-05 00:00:00')\n;", ANT_ID).as_str(),
        "insert into release (release_number, release_label)\n  values\n    (1, 'v1')\n;",
        format!("insert into ant_release (ant_id, release_number, ant_content, ant_content_hash)\n  values\n    ({}, 1, 'tiny ant', 115661000)\n;", ANT_ID).as_str(),
        "insert into migration (migration_label) values ('seed-ants:1110415066');",
        "COMMIT;\n",
    ]
    .join("\n\n")
}

#[test]
fn golden_seed_script() {
    let dir = setup_single_ant();

    antledger_cmd()
        .current_dir(dir.path())
        .args([
            "reconcile",
            "--site-data",
            "site.json",
            "--raw-issues",
            "issues.json",
            "--history-file",
            "history.json",
            "--out",
            "out",
        ])
        .assert()
        .success();

    let seed = fs::read_to_string(dir.path().join("out/seed.sql")).unwrap();
    assert_eq!(seed, expected_seed());

    let migration = fs::read_to_string(dir.path().join("out/migration.sql")).unwrap();
    assert_eq!(
        migration,
        "insert into migration (migration_label) values ('seed-ants:1110415066');\n"
    );

    assert!(!dir.path().join("out/ant_declined.sql").exists());
}

#[test]
fn golden_hash_values() {
    for (text, hash) in [("hello", "99162322"), ("ab", "3105"), ("tiny ant", "115661000")] {
        antledger_cmd()
            .args(["hash", text])
            .assert()
            .success()
            .stdout(predicate::str::diff(format!("{}\n", hash)));
    }
}
