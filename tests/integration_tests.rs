//! Integration tests for the chansync CLI.
//!
//! Everything here runs without a backend: validation failures short-
//! circuit before any network I/O, and config commands only read local
//! state. Behavior against a live (mock) backend is covered in
//! `sync_client.rs`.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a chansync Command with the ambient environment
/// stripped, so a developer's own CHANSYNC_* settings cannot leak in.
fn chansync() -> Command {
    let mut cmd = cargo_bin_cmd!("chansync");
    cmd.env_remove("CHANSYNC_BASE_URL")
        .env_remove("CHANSYNC_API_TOKEN")
        .env_remove("CHANSYNC_TIMEOUT_SECS");
    cmd
}

/// Helper for an isolated working directory (no stray chansync.toml
/// or .env from the repo root).
fn temp_cwd() -> TempDir {
    TempDir::new().unwrap()
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_chansync_help() {
        chansync().arg("--help").assert().success();
    }

    #[test]
    fn test_chansync_version() {
        chansync().arg("--version").assert().success();
    }

    #[test]
    fn test_subcommand_help_lists_ticket_operations() {
        chansync()
            .args(["ticket", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("link"))
            .stdout(predicate::str::contains("unlink"))
            .stdout(predicate::str::contains("comment"));
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        chansync().arg("frobnicate").assert().failure();
    }
}

// =============================================================================
// Client-Side Validation Tests
// =============================================================================

mod validation {
    use super::*;

    #[test]
    fn test_invalid_ticket_url_is_rejected_without_a_backend() {
        let dir = temp_cwd();
        // base_url points nowhere reachable; a rejected URL must never
        // get far enough to notice.
        chansync()
            .current_dir(dir.path())
            .args([
                "--base-url",
                "http://127.0.0.1:9",
                "ticket",
                "link",
                "chan-1",
                "https://example.com/c/aBcD1234/card",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a valid ticket URL"));
    }

    #[test]
    fn test_short_card_id_is_rejected() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args([
                "--base-url",
                "http://127.0.0.1:9",
                "ticket",
                "link",
                "chan-1",
                "https://trello.com/c/short/card",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not a valid ticket URL"));
    }

    #[test]
    fn test_empty_comment_is_rejected_without_a_backend() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args([
                "--base-url",
                "http://127.0.0.1:9",
                "ticket",
                "comment",
                "chan-1",
                "   ",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("comment must not be empty"));
    }

    #[test]
    fn test_unlink_without_a_tty_cancels_cleanly() {
        let dir = temp_cwd();
        // No --yes and no terminal to confirm on: the prompt resolves
        // to "no" and nothing is sent.
        chansync()
            .current_dir(dir.path())
            .args([
                "--base-url",
                "http://127.0.0.1:9",
                "ticket",
                "unlink",
                "chan-1",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cancelled."));
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_show_reports_defaults() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("base_url     = \"http://localhost:8000\""))
            .stdout(predicate::str::contains("api_token    = (not set)"))
            .stdout(predicate::str::contains("timeout_secs = 20"));
    }

    #[test]
    fn test_config_show_honors_flags() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args([
                "--base-url",
                "https://dashboard.example.org/",
                "--token",
                "abc123",
                "config",
                "show",
            ])
            .assert()
            .success()
            // Trailing slash normalized, token masked.
            .stdout(predicate::str::contains(
                "base_url     = \"https://dashboard.example.org\"",
            ))
            .stdout(predicate::str::contains("api_token    = (set)"))
            .stdout(predicate::str::contains("abc123").not());
    }

    #[test]
    fn test_config_show_reads_local_file() {
        let dir = temp_cwd();
        fs::write(
            dir.path().join("chansync.toml"),
            "base_url = \"https://file.example.org\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        chansync()
            .current_dir(dir.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "base_url     = \"https://file.example.org\"",
            ))
            .stdout(predicate::str::contains("timeout_secs = 5"));
    }

    #[test]
    fn test_config_validate_accepts_defaults() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));
    }

    #[test]
    fn test_config_validate_rejects_bad_scheme() {
        let dir = temp_cwd();
        chansync()
            .current_dir(dir.path())
            .args(["--base-url", "ftp://dashboard", "config", "validate"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "base_url must start with http:// or https://",
            ));
    }

    #[test]
    fn test_malformed_config_file_fails_commands() {
        let dir = temp_cwd();
        fs::write(dir.path().join("chansync.toml"), "base_url = [not toml").unwrap();

        chansync()
            .current_dir(dir.path())
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Failed to parse config file"));
    }
}
