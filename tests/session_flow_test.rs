//! End-to-end session tests
//!
//! Drives a `ChatController` built from a config file against a `wiremock`
//! server, checking what is recorded in the session and what is sent on
//! the wire across turns, failures, and profile switches.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatline::cli::Cli;
use chatline::commands::build_controller;
use chatline::config::Config;
use chatline::controller::{ChatController, TurnPhase};
use chatline::observer::RecordingObserver;
use chatline::render::{is_rtl_formatted, render_text};
use chatline::TextDirection;

mod common;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a controller from a temp config file pointing at `server`
///
/// The endpoint is passed on the command line so an `API_URL` in the test
/// environment cannot redirect requests.
fn controller_for(server: &MockServer) -> (ChatController, RecordingObserver) {
    let url = format!("{}/chat", server.uri());
    let (_dir, config_path) = common::temp_config_file(&common::config_yaml(&url));
    let cli = Cli {
        endpoint: Some(url),
        ..Cli::default()
    };
    let config = Config::load(config_path.to_str().unwrap(), &cli).expect("config should load");
    config.validate().expect("config should validate");

    let recorder = RecordingObserver::new();
    let controller =
        build_controller(&config, Box::new(recorder.clone())).expect("controller should build");
    (controller, recorder)
}

fn text_reply(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/plain; charset=utf-8")
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// Two turns on one profile: the second request carries the full
/// transcript, including its own user entry.
#[tokio::test]
async fn test_consecutive_turns_send_growing_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "query": "Hi",
            "unique_id": "eng-001",
            "history": ["User: Hi"],
        })))
        .respond_with(text_reply("Hello"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "query": "Visiting hours?",
            "unique_id": "eng-001",
            "history": ["User: Hi", "Assistant: Hello", "User: Visiting hours?"],
        })))
        .respond_with(text_reply("9am to 5pm"))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);

    assert_eq!(controller.submit("Hi").await.unwrap(), "Hello");
    assert_eq!(
        controller.submit("Visiting hours?").await.unwrap(),
        "9am to 5pm"
    );

    assert_eq!(
        controller.transcript(),
        &[
            "User: Hi",
            "Assistant: Hello",
            "User: Visiting hours?",
            "Assistant: 9am to 5pm",
        ]
    );
    assert_eq!(controller.phase(), TurnPhase::Completed);
}

/// A failed turn keeps the user entry; resubmitting sends it again after
/// the unanswered one.
#[tokio::test]
async fn test_failed_turn_then_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "query": "Hi",
            "unique_id": "eng-001",
            "history": ["User: Hi", "User: Hi"],
        })))
        .respond_with(text_reply("Hello"))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, recorder) = controller_for(&server);

    let err = controller.submit("Hi").await.unwrap_err();
    assert!(err.to_string().contains("Error connecting to API"));
    assert_eq!(controller.phase(), TurnPhase::Failed);
    assert_eq!(controller.transcript(), &["User: Hi"]);
    assert!(controller.session().awaiting_reply());
    assert!(recorder.stream_states().is_empty());

    assert_eq!(controller.submit("Hi").await.unwrap(), "Hello");
    assert_eq!(
        controller.transcript(),
        &["User: Hi", "User: Hi", "Assistant: Hello"]
    );
}

/// Switching profile clears the conversation; the next request uses the
/// new backend id and a fresh history.
#[tokio::test]
async fn test_profile_switch_resets_history_and_backend_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "query": "Hi",
            "unique_id": "eng-001",
            "history": ["User: Hi"],
        })))
        .respond_with(text_reply("Hello"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_json(json!({
            "query": "مرحبا",
            "unique_id": "ar-001",
            "history": ["User: مرحبا"],
        })))
        .respond_with(text_reply("أهلا بك، كيف يمكنني مساعدتك؟"))
        .expect(1)
        .mount(&server)
        .await;

    let (mut controller, recorder) = controller_for(&server);
    controller.submit("Hi").await.unwrap();

    assert!(controller.select_profile("arabic").unwrap());
    assert!(controller.messages().is_empty());
    assert_eq!(
        controller.active_profile().text_direction(),
        TextDirection::Rtl
    );

    recorder.clear();
    let reply = controller.submit("مرحبا").await.unwrap();
    assert_eq!(reply, "أهلا بك، كيف يمكنني مساعدتك؟");

    // Every visible state of the Arabic reply renders right-to-left
    let states = recorder.stream_states();
    assert!(!states.is_empty());
    for state in states {
        for line in render_text(&state, TextDirection::Rtl, 20) {
            assert!(is_rtl_formatted(&line), "not RTL formatted: {:?}", line);
        }
    }
}

/// Selecting the active profile keeps the conversation.
#[tokio::test]
async fn test_reselecting_active_profile_keeps_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(text_reply("Hello"))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);
    controller.submit("Hi").await.unwrap();

    assert!(!controller.select_profile("English").unwrap());
    assert_eq!(controller.messages().len(), 2);
}

/// Abandoning a turn mid-flight stores no reply and is noticed on the
/// next turn.
#[tokio::test]
async fn test_abandoned_turn_stores_no_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(text_reply("late").set_delay(Duration::from_secs(3)))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(text_reply("on time"))
        .mount(&server)
        .await;

    let (mut controller, _) = controller_for(&server);

    let abandoned =
        tokio::time::timeout(Duration::from_millis(200), controller.submit("Hi")).await;
    assert!(abandoned.is_err(), "turn should still be in flight");
    assert!(controller.phase().in_flight());
    assert_eq!(controller.transcript(), &["User: Hi"]);

    assert_eq!(controller.submit("Again").await.unwrap(), "on time");
    assert_eq!(
        controller.transcript(),
        &["User: Hi", "User: Again", "Assistant: on time"]
    );
}
