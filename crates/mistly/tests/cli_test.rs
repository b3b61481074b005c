//! Integration tests for the `mistly` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring Mist API access.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mistly` binary with env isolation.
///
/// Clears all `MISTLY_*` / `MIST_*` env vars and points config
/// directories at a nonexistent path so tests never touch the user's
/// real configuration.
fn mistly_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mistly");
    cmd.env("HOME", "/tmp/mistly-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mistly-test-nonexistent")
        .env_remove("MISTLY_PROFILE")
        .env_remove("MISTLY_OUTPUT")
        .env_remove("MISTLY_TIMEOUT")
        .env_remove("MIST_HOST")
        .env_remove("MIST_API_TOKEN");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mistly_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mistly_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Mist")
            .and(predicate::str::contains("orgs"))
            .and(predicate::str::contains("licenses"))
            .and(predicate::str::contains("compare")),
    );
}

#[test]
fn test_version_flag() {
    mistly_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mistly"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    mistly_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    mistly_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    mistly_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Offline commands ────────────────────────────────────────────────

#[test]
fn test_skus_works_offline() {
    mistly_cmd().arg("skus").assert().success().stdout(
        predicate::str::contains("SUB-MAN")
            .and(predicate::str::contains("SUB-AI"))
            .and(predicate::str::contains("SUB-NAC")),
    );
}

#[test]
fn test_skus_json_output() {
    mistly_cmd()
        .args(["skus", "--output", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"sku\"").and(predicate::str::contains("SUB-VNA")),
        );
}

#[test]
fn test_skus_csv_output() {
    mistly_cmd()
        .args(["skus", "--output", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sku,category,description"));
}

#[test]
fn test_config_show_no_config() {
    // `config show` renders the default config when no file exists.
    mistly_cmd().args(["config", "show"]).assert().success();
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = mistly_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_orgs_list_without_token_fails() {
    let output = mistly_cmd().args(["orgs", "list"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("token") || text.contains("MIST_API_TOKEN"),
        "Expected token guidance in error:\n{text}"
    );
}

#[test]
fn test_compare_requires_orgs_or_all() {
    let output = mistly_cmd()
        .args(["--token", "dummy", "compare"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("--all") || text.contains("organization"),
        "Expected guidance about org ids:\n{text}"
    );
}

#[test]
fn test_compare_rejects_non_uuid() {
    let output = mistly_cmd()
        .args(["--token", "dummy", "compare", "not-a-uuid"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("UUID"),
        "Expected UUID validation message:\n{text}"
    );
}

#[test]
fn test_compare_rejects_bad_purchased_spec() {
    let output = mistly_cmd()
        .args([
            "--token",
            "dummy",
            "compare",
            "--all",
            "--purchased",
            "SUB-MAN",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("SKU=COUNT") || text.contains("purchased"),
        "Expected purchased spec guidance:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = mistly_cmd()
        .args(["--output", "invalid", "orgs", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_orgs_subcommands_exist() {
    mistly_cmd()
        .args(["orgs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list").and(predicate::str::contains("get")));
}

#[test]
fn test_licenses_subcommands_exist() {
    mistly_cmd()
        .args(["licenses", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("summary").and(predicate::str::contains("usage")));
}

#[test]
fn test_config_subcommands_exist() {
    mistly_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-token"))
                .and(predicate::str::contains("profiles")),
        );
}
