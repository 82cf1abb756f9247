#![allow(deprecated)]

/// End-to-end tests for the `chatline` binary
///
/// Each test runs in a fresh temporary directory with the chat-related
/// environment variables removed, so neither a developer's `.env` nor
/// their `config/config.yaml` leaks in.
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn chatline(workdir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chatline").unwrap();
    cmd.current_dir(workdir.path())
        .env_remove("API_URL")
        .env_remove("Unique_ID_Eng")
        .env_remove("Unique_ID_Arabic")
        .env_remove("CHATLINE_TIMEOUT_SECONDS")
        .env_remove("CHATLINE_CONNECT_TIMEOUT_SECONDS")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    chatline(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("profiles"));
}

#[test]
fn test_profiles_lists_configured_profiles() {
    let dir = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file(&common::config_yaml("http://localhost:8000/chat"));

    chatline(&dir)
        .arg("--config")
        .arg(config_path)
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("English"))
        .stdout(predicate::str::contains("Arabic"))
        .stdout(predicate::str::contains("RTL"))
        .stdout(predicate::str::contains("eng-****"))
        .stdout(predicate::str::contains("eng-001").not());
}

#[test]
fn test_profiles_works_without_environment() {
    let dir = TempDir::new().unwrap();
    chatline(&dir)
        .arg("profiles")
        .assert()
        .success()
        .stdout(predicate::str::contains("<unset: Unique_ID_Eng>"));
}

#[test]
fn test_ask_without_endpoint_fails_fast() {
    let dir = TempDir::new().unwrap();
    chatline(&dir)
        .arg("ask")
        .arg("--prompt")
        .arg("Hi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Endpoint URL is not set"));
}

#[test]
fn test_ask_without_backend_id_fails_fast() {
    let dir = TempDir::new().unwrap();
    chatline(&dir)
        .env("Unique_ID_Eng", "eng-001")
        .arg("--endpoint")
        .arg("http://localhost:8000/chat")
        .arg("ask")
        .arg("--prompt")
        .arg("Hi")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing backend identifier for profile 'Arabic'",
        ));
}

#[test]
fn test_ask_unknown_profile_fails() {
    let dir = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file(&common::config_yaml("http://localhost:8000/chat"));

    chatline(&dir)
        .arg("--config")
        .arg(config_path)
        .arg("--profile")
        .arg("French")
        .arg("ask")
        .arg("--prompt")
        .arg("Bonjour")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile: French"));
}

#[test]
fn test_ask_unreachable_backend_reports_connection_error() {
    let dir = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file(&common::config_yaml(&common::unused_local_url()));

    chatline(&dir)
        .arg("--config")
        .arg(config_path)
        .arg("ask")
        .arg("--prompt")
        .arg("Hi")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error connecting to API"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_ask_streams_reply_to_stdout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"Visiting hours are 9-5".to_vec(), "text/plain"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let (_config_dir, config_path) =
        common::temp_config_file(&common::config_yaml(&format!("{}/chat", server.uri())));

    chatline(&dir)
        .arg("--config")
        .arg(config_path)
        .arg("ask")
        .arg("--prompt")
        .arg("Hours?")
        .assert()
        .success()
        .stdout(predicate::str::contains("Visiting hours are 9-5"));
}
