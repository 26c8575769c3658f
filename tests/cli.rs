//! End-to-end tests for the `trafficd` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;


fn trafficd() -> Command {
    let mut cmd = Command::cargo_bin("trafficd").unwrap();
    cmd.env_remove("TRAFFIC_DB")
        .env_remove("TRAFFIC_TOKEN_SECRET")
        .env_remove("TRAFFIC_PORT");
    cmd
}


#[test]
fn test_help_lists_commands() {
    trafficd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("rollup"));
}


#[test]
fn test_token_requires_secret() {
    trafficd()
        .args(["token", "--uid", "user-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token secret not set"));
}


#[test]
fn test_token_prints_signed_token() {
    trafficd()
        .args(["token", "--uid", "user-1", "--email", "admin@example.com"])
        .env("TRAFFIC_TOKEN_SECRET", "cli-secret")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Z2-7]+\.[A-Z2-7]+\n$").unwrap());
}


#[test]
fn test_serve_requires_secret() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd()
        .args(["serve", "--db"])
        .arg(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Token secret not set"));
}


#[test]
fn test_seed_then_rollup_monthly() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd()
        .arg("seed")
        .arg("--db")
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded 61 traffic records."));

    trafficd()
        .args(["rollup", "--granularity", "monthly", "--db"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-03"))
        .stdout(predicate::str::contains("2025-04"))
        .stdout(predicate::str::contains("(31 days)"))
        .stdout(predicate::str::contains("(30 days)"))
        .stdout(predicate::str::contains("Peak Day:            2025-03-17 (188)"));
}


#[test]
fn test_rollup_weekly_with_range() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd().arg("seed").arg("--db").arg(&db_path).assert().success();

    // 2025-03-03..2025-03-09 is ISO week 10
    trafficd()
        .args(["rollup", "-g", "weekly", "--from", "2025-03-03", "--to", "2025-03-09", "--db"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-W10"))
        .stdout(predicate::str::contains("854"))
        .stdout(predicate::str::contains("2025-W09").not());
}


#[test]
fn test_rollup_rejects_bad_date() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd()
        .args(["rollup", "--from", "03/01/2025", "--db"])
        .arg(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("date must be YYYY-MM-DD string"));
}


#[test]
fn test_rollup_rejects_bad_to_and_reversed_range() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd()
        .args(["rollup", "--to", "2025-02-30", "--db"])
        .arg(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("date must be a valid calendar date"));

    trafficd()
        .args(["rollup", "--from", "2025-04-01", "--to", "2025-03-01", "--db"])
        .arg(&db_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is after --to"));
}


#[test]
fn test_editor_lifecycle() {
    let tmp_dir = TempDir::new().unwrap();
    let db_path = tmp_dir.path().join("traffic.db");

    trafficd()
        .args(["editors", "add", "  Alice@Example.com "])
        .arg("--db")
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added editor alice@example.com"));

    trafficd()
        .args(["editors", "list", "--db"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("alice@example.com"));

    trafficd()
        .args(["editors", "remove", "alice@example.com", "--db"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed editor"));

    trafficd()
        .args(["editors", "list", "--db"])
        .arg(&db_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No editors"));
}
