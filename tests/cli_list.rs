//! End-to-end tests for the `repokeep list` and `repokeep doctor` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use rusqlite::Connection;
use std::path::Path;

fn repokeep_cmd() -> Command {
    Command::cargo_bin("repokeep").unwrap()
}

fn seed_catalog(db_path: &Path, rows: &[(i64, &str, &str)]) {
    let conn = Connection::open(db_path).unwrap();
    conn.execute(
        "CREATE TABLE repos (id INTEGER, user_name VARCHAR, repo_name VARCHAR)",
        [],
    )
    .unwrap();
    for (id, user_name, repo_name) in rows {
        conn.execute(
            "INSERT INTO repos (id, user_name, repo_name) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, user_name, repo_name],
        )
        .unwrap();
    }
}

#[test]
fn list_empty_catalog() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("db.sqlite3");
    let root = temp.path().join("mirrors");

    repokeep_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .args(["--root", root.to_str().unwrap()])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No repositories cataloged"));
}

#[test]
fn list_shows_mirror_state() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("db.sqlite3");
    let root = temp.path().join("mirrors");
    seed_catalog(
        &db_path,
        &[(1, "octocat", "Hello-World"), (2, "rust-lang", "rust")],
    );
    std::fs::create_dir_all(root.join("octocat").join("Hello-World")).unwrap();

    repokeep_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .args(["--root", root.to_str().unwrap()])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("octocat/Hello-World"))
        .stdout(predicate::str::contains("cloned"))
        .stdout(predicate::str::contains("rust-lang/rust"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn list_long_format_includes_both_urls() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("db.sqlite3");
    let root = temp.path().join("mirrors");
    seed_catalog(&db_path, &[(1, "octocat", "Hello-World")]);

    repokeep_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .args(["--root", root.to_str().unwrap()])
        .args(["list", "--long"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://github.com/octocat/Hello-World.git",
        ))
        .stdout(predicate::str::contains(
            "git@github.com:octocat/Hello-World.git",
        ))
        .stdout(predicate::str::contains("octocat"));
}

#[test]
fn list_marks_invalid_rows() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("db.sqlite3");
    let root = temp.path().join("mirrors");
    seed_catalog(&db_path, &[(1, "bad owner", "x")]);

    repokeep_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .args(["--root", root.to_str().unwrap()])
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("invalid"));
}

#[test]
fn doctor_reports_git_and_paths() {
    let temp = tempfile::tempdir().unwrap();
    let db_path = temp.path().join("db.sqlite3");
    let root = temp.path().join("mirrors");

    repokeep_cmd()
        .args(["--db", db_path.to_str().unwrap()])
        .args(["--root", root.to_str().unwrap()])
        .arg("doctor")
        .assert()
        .stdout(predicate::str::contains("git:"))
        .stdout(predicate::str::contains("catalog:"))
        .stdout(predicate::str::contains("mirror root:"));
}
