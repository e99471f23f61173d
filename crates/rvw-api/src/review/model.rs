use chrono::{DateTime, Utc};
use rvw_db::ReviewRecord;
use rvw_srs::{ItemKind, ItemRef, Outcome, ReviewKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    validation::{parse_item_id, parse_outcome, validate_learner_id},
};

/// Body of a question review message.
///
/// Missing fields default to empty strings so they are reported by
/// validation rather than as a JSON error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestionReviewPayload {
    pub user_id: String,
    pub question_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SentenceReviewPayload {
    pub user_id: String,
    pub sentence_id: String,
    pub status: String,
}

/// `{"payload": {...}}` as delivered by the broker's webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadWrapper<T> {
    pub payload: T,
}

/// Queue task envelope: `{"id": "...", "payload": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task<T> {
    #[serde(default)]
    pub id: String,
    pub payload: T,
}

/// A review message for one kind of item.
pub trait ReviewPayload {
    const KIND: ItemKind;

    /// Validate the raw fields and turn them into a request.
    fn into_request(self) -> Result<ReviewRequest, ApiError>;
}

fn build_request(
    kind: ItemKind,
    user_id: String,
    (id_field, item_id): (&str, &str),
    status: &str,
) -> Result<ReviewRequest, ApiError> {
    validate_learner_id(&user_id)?;
    let id = parse_item_id(id_field, item_id)?;
    let outcome = parse_outcome(status)?;

    Ok(ReviewRequest {
        key: ReviewKey::new(user_id, ItemRef { kind, id }),
        outcome,
    })
}

impl ReviewPayload for QuestionReviewPayload {
    const KIND: ItemKind = ItemKind::Question;

    fn into_request(self) -> Result<ReviewRequest, ApiError> {
        build_request(
            Self::KIND,
            self.user_id,
            ("questionId", &self.question_id),
            &self.status,
        )
    }
}

impl ReviewPayload for SentenceReviewPayload {
    const KIND: ItemKind = ItemKind::Sentence;

    fn into_request(self) -> Result<ReviewRequest, ApiError> {
        build_request(
            Self::KIND,
            self.user_id,
            ("sentenceId", &self.sentence_id),
            &self.status,
        )
    }
}

/// A validated review: who reviewed what, and how it went.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRequest {
    pub key: ReviewKey,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: String,
    pub item_kind: ItemKind,
    pub item_id: Uuid,
    pub language: String,
    pub repetitions: i32,
    pub ease_factor: f64,
    pub interval: i32,
    pub next_review_instant: DateTime<Utc>,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(record: ReviewRecord) -> Self {
        let state = record.state;
        Self {
            id: record.id,
            user_id: state.key.learner_id,
            item_kind: state.key.item.kind,
            item_id: state.key.item.id,
            language: record.language,
            repetitions: state.repetitions,
            ease_factor: state.ease_factor,
            interval: state.interval,
            next_review_instant: state.next_review_instant,
        }
    }
}
