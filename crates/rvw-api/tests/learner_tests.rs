use axum::http::StatusCode;
use rvw_srs::{ItemRef, ReviewKey, ReviewState};
use serde_json::Value;
use uuid::Uuid;

use crate::common::{MemoryApp, TEST_SECRET};

/// Seed `count` extra questions for `user1`, due further in the future the
/// later they were created.
async fn seed_questions(app: &MemoryApp, count: i64, language: &str) -> Vec<ItemRef> {
    let now = chrono::Utc::now();
    let mut items = Vec::new();
    for n in 0..count {
        let item = ItemRef::question(Uuid::new_v4());
        app.store.add_item(item, language).await;
        let due = now + chrono::Duration::days(n + 1);
        let key = ReviewKey::new("user1", item);
        rvw_db::ReviewStore::apply_review(&app.store, &key, now, |s| {
            Ok(ReviewState {
                next_review_instant: due,
                ..s.clone()
            })
        })
        .await
        .unwrap();
        items.push(item);
    }
    items
}

/// Append the webhook secret to `uri`.
fn with_key(uri: &str) -> String {
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}key={TEST_SECRET}")
}

fn item_ids(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["itemId"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_next_reviews_are_soonest_first() {
    let app = MemoryApp::new().await;
    let items = seed_questions(&app, 3, "English").await;
    seed_questions(&app, 2, "Turkish").await;

    let response = app
        .client
        .get(&with_key("/learners/user1/questions/next?language=English&limit=2"))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(
        item_ids(&body),
        vec![items[0].id.to_string(), items[1].id.to_string()]
    );
}

#[tokio::test]
async fn test_reviewed_item_moves_back() {
    let app = MemoryApp::new().await;
    seed_questions(&app, 2, "English").await;

    // Failed just now, so due before the seeded ones
    app.client
        .post_json(
            &format!("/webhooks/question-review?key={TEST_SECRET}"),
            &serde_json::json!({
                "payload": { "userId": "user1", "questionId": app.question.id, "status": "Failure" }
            }),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = app
        .client
        .get(&with_key("/learners/user1/questions/next?language=English"))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 3);
    assert_eq!(body[0]["itemId"], app.question.id.to_string());
}

#[tokio::test]
async fn test_list_reviews_per_kind() {
    let app = MemoryApp::new().await;
    seed_questions(&app, 2, "English").await;

    let response = app.client.get(&with_key("/learners/user1/questions")).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);

    let response = app.client.get(&with_key("/learners/user1/sentences")).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body.as_array().unwrap().is_empty());

    let response = app.client.get(&with_key("/learners/someone-else/questions")).await;
    let body: Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_next_reviews_validation() {
    let app = MemoryApp::new().await;

    app.client
        .get(&with_key("/learners/user1/questions/next"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.client
        .get(&with_key("/learners/user1/questions/next?language=English&limit=0"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.client
        .get(&with_key("/learners/user1/questions/next?language=English&limit=1000"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.client
        .get(&with_key("/learners/user1/questions/next?language=English&limit=many"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.client
        .get(&with_key("/learners/user1/decks/next?language=English"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = MemoryApp::new().await;

    let response = app.client.get("/api/v1/decks").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(response.error_message().contains("not found"));
}

#[tokio::test]
async fn test_reads_require_key() {
    let app = MemoryApp::new().await;
    seed_questions(&app, 1, "English").await;

    for uri in [
        "/learners/user1/questions",
        "/learners/user1/questions/next?language=English",
    ] {
        let response = app.client.get(uri).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.error_message().contains("Missing key"));
    }
}

#[tokio::test]
async fn test_reads_reject_wrong_key() {
    let app = MemoryApp::new().await;
    seed_questions(&app, 1, "English").await;

    for uri in [
        "/learners/user1/questions?key=wrong",
        "/learners/user1/questions/next?key=wrong&language=English",
    ] {
        let response = app.client.get(uri).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert!(response.error_message().contains("Invalid key"));
    }
}
