use std::time::Duration;

use axum::http::StatusCode;
use rvw_api::ApiState;
use rvw_db::MemoryReviewStore;
use rvw_srs::{ItemRef, ReviewKey};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{MemoryApp, SlowStore, TEST_SECRET, TestClient, app_with_state};

fn question_uri() -> String {
    format!("/webhooks/question-review?key={TEST_SECRET}")
}

fn sentence_uri() -> String {
    format!("/webhooks/sentence-review?key={TEST_SECRET}")
}

fn question_body(user_id: &str, question_id: Uuid, status: &str) -> Value {
    json!({ "payload": { "userId": user_id, "questionId": question_id, "status": status } })
}

fn sentence_body(user_id: &str, sentence_id: Uuid, status: &str) -> Value {
    json!({ "payload": { "userId": user_id, "sentenceId": sentence_id, "status": status } })
}

#[tokio::test]
async fn test_first_success_creates_review() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(&question_uri(), &question_body("user1", app.question.id, "Success"))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["userId"], "user1");
    assert_eq!(body["itemKind"], "question");
    assert_eq!(body["itemId"], app.question.id.to_string());
    assert_eq!(body["language"], "English");
    assert_eq!(body["repetitions"], 1);
    assert_eq!(body["interval"], 1);
    assert!((body["easeFactor"].as_f64().unwrap() - 2.6).abs() < 1e-9);

    let stored = app
        .store
        .get(&ReviewKey::new("user1", app.question))
        .await
        .expect("review should be stored");
    assert_eq!(stored.state.repetitions, 1);
}

#[tokio::test]
async fn test_streak_then_failure() {
    let app = MemoryApp::new().await;
    let uri = sentence_uri();

    let mut last = Value::Null;
    for _ in 0..3 {
        let response = app
            .client
            .post_json(&uri, &sentence_body("user1", app.sentence.id, "Success"))
            .await;
        response.assert_status(StatusCode::OK);
        last = response.json();
    }
    assert_eq!(last["repetitions"], 3);
    // 6 * 2.7 rounded
    assert_eq!(last["interval"], 16);
    assert_eq!(last["language"], "Turkish");

    let response = app
        .client
        .post_json(&uri, &sentence_body("user1", app.sentence.id, "Failure"))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["repetitions"], 0);
    assert_eq!(body["interval"], 0);
    let ease = body["easeFactor"].as_f64().unwrap();
    // 2.8 after the streak, minus 0.8
    assert!((ease - 2.0).abs() < 1e-9, "unexpected ease factor {ease}");
}

#[tokio::test]
async fn test_unknown_status_is_rejected_without_creating_state() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(&question_uri(), &question_body("user1", app.question.id, "Bloop"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("Bloop"));
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_missing_key_is_unauthorized() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(
            "/webhooks/question-review",
            &question_body("user1", app.question.id, "Success"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_wrong_key_is_unauthorized() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(
            "/webhooks/sentence-review?key=not-the-key",
            &sentence_body("user1", app.sentence.id, "Success"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = MemoryApp::new().await;

    let response = app.client.post_raw(&question_uri(), "invalid-json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("Invalid payload format"));
}

#[tokio::test]
async fn test_blank_fields_are_bad_request() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(&question_uri(), &json!({ "payload": {} }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("userId is blank"));

    let response = app
        .client
        .post_json(
            &question_uri(),
            &json!({ "payload": { "userId": "user1", "questionId": "", "status": "Success" } }),
        )
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.error_message().contains("questionId is blank"));
}

#[tokio::test]
async fn test_non_uuid_item_is_bad_request() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(
            &sentence_uri(),
            &json!({ "payload": { "userId": "user1", "sentenceId": "non-existent-sentence", "status": "Success" } }),
        )
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_item_is_not_found() {
    let app = MemoryApp::new().await;

    let response = app
        .client
        .post_json(&question_uri(), &question_body("user1", Uuid::new_v4(), "Success"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(app.store.is_empty().await);
}

#[tokio::test]
async fn test_question_id_on_sentence_endpoint_is_not_found() {
    let app = MemoryApp::new().await;

    // A question id is not a sentence
    let response = app
        .client
        .post_json(&sentence_uri(), &sentence_body("user1", app.question.id, "Success"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let app = MemoryApp::new().await;

    let response = app.client.get(&question_uri()).await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_learners_are_independent() {
    let app = MemoryApp::new().await;

    for user in ["user1", "user1", "user2"] {
        app.client
            .post_json(&question_uri(), &question_body(user, app.question.id, "Success"))
            .await
            .assert_status(StatusCode::OK);
    }

    let first = app.store.get(&ReviewKey::new("user1", app.question)).await.unwrap();
    let second = app.store.get(&ReviewKey::new("user2", app.question)).await.unwrap();
    assert_eq!(first.state.repetitions, 2);
    assert_eq!(second.state.repetitions, 1);
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = MemoryApp::new().await;

    let response = app.client.get("/health").await;

    response.assert_status(StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_review_past_deadline_times_out() {
    let inner = MemoryReviewStore::new();
    let question = ItemRef::question(Uuid::new_v4());
    inner.add_item(question, "English").await;
    let store = SlowStore {
        inner: inner.clone(),
        delay: Duration::from_secs(3),
    };
    let state =
        ApiState::new(store, TEST_SECRET).with_request_timeout(Duration::from_millis(100));
    let client = TestClient::new(app_with_state(state));

    let response = client
        .post_json(&question_uri(), &question_body("user1", question.id, "Success"))
        .await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Request timed out" }));
    assert!(inner.is_empty().await);
}
