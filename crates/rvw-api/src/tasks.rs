//! Queue task processing over HTTP.
//!
//! The broker forwards each task from a processing queue to
//! `POST /tasks/{task}`, with the task envelope as the body.

use std::{fmt, str::FromStr};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::post,
};
use rvw_db::ReviewStore;
use serde::de::DeserializeOwned;

use crate::{
    auth::Authorized,
    error::ApiError,
    review::{
        ReviewPayload, ReviewResponse,
        model::{QuestionReviewPayload, SentenceReviewPayload, Task},
        routes::decode_body,
        service::review_item_within,
    },
    state::ApiState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    QuestionReview,
    SentenceReview,
}

impl TaskKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QuestionReview => "question-review",
            Self::SentenceReview => "sentence-review",
        }
    }

    /// Name of the queue the task is consumed from
    pub const fn queue_name(self) -> &'static str {
        match self {
            Self::QuestionReview => "QUESTION_REVIEW_PROCESSING_QUEUE",
            Self::SentenceReview => "SENTENCE_REVIEW_PROCESSING_QUEUE",
        }
    }
}

impl FromStr for TaskKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question-review" => Ok(Self::QuestionReview),
            "sentence-review" => Ok(Self::SentenceReview),
            other => Err(ApiError::NotFound(format!("unknown task type: {other}"))),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn routes<S>() -> Router<ApiState<S>>
where
    S: ReviewStore + Clone + 'static,
{
    Router::new().route("/tasks/{task}", post(process_task::<S>))
}

async fn process_task<S>(
    _: Authorized,
    State(state): State<ApiState<S>>,
    Path(task): Path<String>,
    body: Bytes,
) -> Result<Json<ReviewResponse>, ApiError>
where
    S: ReviewStore + Clone + 'static,
{
    match task.parse::<TaskKind>()? {
        kind @ TaskKind::QuestionReview => {
            run::<S, QuestionReviewPayload>(&state, kind, &body).await
        }
        kind @ TaskKind::SentenceReview => {
            run::<S, SentenceReviewPayload>(&state, kind, &body).await
        }
    }
}

async fn run<S, P>(
    state: &ApiState<S>,
    kind: TaskKind,
    body: &[u8],
) -> Result<Json<ReviewResponse>, ApiError>
where
    S: ReviewStore,
    P: ReviewPayload + DeserializeOwned + Send,
{
    let Task { id, payload } = decode_body::<Task<P>>(body)?;
    tracing::debug!(task_id = %id, queue = kind.queue_name(), "Received task");

    let request = payload.into_request()?;
    let record = review_item_within(
        &state.store,
        state.scheduler.as_ref(),
        request,
        state.request_timeout,
    )
    .await?;

    tracing::info!(task_id = %id, task = %kind, "Task processed");
    Ok(Json(record.into()))
}
