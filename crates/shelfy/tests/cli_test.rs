//! Integration tests for the `shelfy` CLI binary.
//!
//! Argument parsing, help output, completions, and error exits run
//! without a server; the end-to-end cases talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `shelfy` binary with env isolation.
///
/// Clears all `SHELFY_*` env vars and points the config file at a
/// nonexistent path so tests never touch the user's real configuration.
fn shelfy_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("shelfy");
    cmd.env("HOME", "/tmp/shelfy-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/shelfy-cli-test-nonexistent")
        .env(
            "SHELFY_CONFIG",
            "/tmp/shelfy-cli-test-nonexistent/config.toml",
        )
        .env_remove("SHELFY_PROFILE")
        .env_remove("SHELFY_SERVER")
        .env_remove("SHELFY_TOKEN")
        .env_remove("SHELFY_OUTPUT")
        .env_remove("SHELFY_INSECURE")
        .env_remove("SHELFY_TIMEOUT")
        .env_remove("SHELFY_PASSWORD");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = shelfy_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    shelfy_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("books")
            .and(predicate::str::contains("categories"))
            .and(predicate::str::contains("reviews"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    shelfy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfy"));
}

#[test]
fn test_books_help_lists_subcommands() {
    shelfy_cmd().args(["books", "--help"]).assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("create"))
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("reviews")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    shelfy_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    shelfy_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfy"));
}

#[test]
fn test_completions_fish() {
    shelfy_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    shelfy_cmd()
        .arg("shelves")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_output_format() {
    shelfy_cmd()
        .args(["-o", "xml", "books", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_page_zero_is_rejected() {
    shelfy_cmd()
        .args(["books", "list", "--page", "0"])
        .assert()
        .code(2);
}

// ── Configuration and session errors ────────────────────────────────

#[test]
fn test_no_server_configured() {
    shelfy_cmd()
        .args(["books", "list"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("No server configured"));
}

#[test]
fn test_unknown_profile() {
    shelfy_cmd()
        .args(["--profile", "work", "books", "list"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("work"));
}

#[test]
fn test_invalid_server_url() {
    shelfy_cmd()
        .args(["--server", "ftp://books.example", "status"])
        .assert()
        .code(5);
}

#[test]
fn test_private_command_without_token() {
    // Port 9 (discard) is never contacted: the session check runs first.
    shelfy_cmd()
        .args(["--server", "http://127.0.0.1:9", "books", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_status_is_offline() {
    shelfy_cmd()
        .args([
            "--server",
            "http://127.0.0.1:9",
            "--token",
            "abc",
            "-o",
            "json",
            "status",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"logged_in\": true"));
}

#[test]
fn test_config_path_needs_no_server() {
    let output = shelfy_cmd()
        .args([
            "--server",
            "http://127.0.0.1:9",
            "--token",
            "abc",
            "--timeout",
            "1",
            "config",
            "path",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("config.toml"));
}

// ── End-to-end against a mock server ────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_books_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books"))
        .and(header("authorization", "Bearer abc"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 6, "title": "Dune", "author": "Frank Herbert" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        shelfy_cmd()
            .args([
                "--server", &uri, "--token", "abc", "-o", "json", "books", "list", "--page", "2",
                "--limit", "5",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"title\": \"Dune\""), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_category_delete_surfaces_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/category/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "Drama", "description": "Plays"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/category/3"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "message": "Category in use" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        shelfy_cmd()
            .args([
                "--server", &uri, "--token", "abc", "--yes", "categories", "delete", "3",
            ])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("Category in use"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_book_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/books/99"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let uri = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        shelfy_cmd()
            .args(["--server", &uri, "--token", "abc", "books", "get", "99"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("books list"));
}
