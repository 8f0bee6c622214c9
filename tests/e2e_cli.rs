//! CLI end-to-end tests
//!
//! Tests for the stowage command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use stowage_common::RecordId;
use stowage_db::models::Account;
use stowage_db::pool::init_pool;
use stowage_db::queries::accounts;
use tempfile::tempdir;

/// Get a command for the stowage binary
#[allow(deprecated)]
fn stowage_cmd() -> Command {
    Command::cargo_bin("stowage").unwrap()
}

/// Write a config pointing at a database and storage root inside `dir`.
fn write_config(dir: &Path, storage: &str) -> std::path::PathBuf {
    let config_path = dir.join("stowage.toml");
    let config = format!(
        "[database]\npath = {:?}\nbatch_size = 10\n\n[storage]\n{}\n",
        dir.join("stowage.db"),
        storage
    );
    fs::write(&config_path, config).unwrap();
    config_path
}

fn filesystem_storage(root: &Path) -> String {
    format!("backend = \"filesystem\"\nroot = {:?}", root)
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = stowage_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = stowage_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("storage-schema"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = stowage_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stowage"));
}

#[test]
fn test_cli_storage_schema_help() {
    let mut cmd = stowage_cmd();
    cmd.args(["storage-schema", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_cli_dry_run_on_empty_database() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("system");
    fs::create_dir_all(&root).unwrap();
    let config_path = write_config(dir.path(), &filesystem_storage(&root));
    init_pool(&dir.path().join("stowage.db").to_string_lossy()).unwrap();

    let mut cmd = stowage_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["storage-schema", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Upgraded storage schema of 0 files across 0 records (DRY RUN)",
        ));
}

#[test]
fn test_cli_storage_schema_moves_files() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("system");
    let config_path = write_config(dir.path(), &filesystem_storage(&root));

    {
        let pool = init_pool(&dir.path().join("stowage.db").to_string_lossy()).unwrap();
        let conn = pool.get().unwrap();
        let mut account = Account::new(RecordId::from(1), "alice", None);
        account.avatar = account.avatar.with_file(Some("me.png".into()), None);
        accounts::insert_account(&conn, &account).unwrap();
    }

    let old = root.join("accounts/avatars/000/000/001/original/me.png");
    fs::create_dir_all(old.parent().unwrap()).unwrap();
    fs::write(&old, b"png").unwrap();

    let mut cmd = stowage_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("storage-schema")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Upgraded storage schema of 1 files across 1 records",
        ));

    assert!(!old.exists());
    assert!(root
        .join("accounts/avatars/000/000/000/000/000/001/original/me.png")
        .exists());
}

#[test]
fn test_cli_fog_backend_fails() {
    let dir = tempdir().unwrap();
    let config_path = write_config(dir.path(), "backend = \"fog\"");

    let mut cmd = stowage_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .arg("storage-schema")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "The fog storage driver is not supported for this operation at this time",
        ));

    assert!(!dir.path().join("stowage.db").exists());
}

#[test]
fn test_cli_dry_run_does_not_create_database() {
    let dir = tempdir().unwrap();
    let config_path = write_config(dir.path(), &filesystem_storage(dir.path()));

    let mut cmd = stowage_cmd();
    cmd.arg("--config")
        .arg(&config_path)
        .args(["storage-schema", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not found"));

    assert!(!dir.path().join("stowage.db").exists());
}

#[test]
fn test_cli_validate_valid_config() {
    let dir = tempdir().unwrap();
    let config_path = write_config(dir.path(), &filesystem_storage(dir.path()));

    let mut cmd = stowage_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("filesystem"));
}

#[test]
fn test_cli_validate_rejects_zero_batch_size() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("bad.toml");
    fs::write(&config_path, "[database]\nbatch_size = 0\n").unwrap();

    let mut cmd = stowage_cmd();
    cmd.arg("validate")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch_size"));
}

#[test]
fn test_cli_validate_missing_file() {
    let mut cmd = stowage_cmd();
    cmd.args(["validate", "/nonexistent/stowage.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}
