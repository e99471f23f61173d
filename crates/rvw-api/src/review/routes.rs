use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use rvw_db::ReviewStore;
use serde::de::DeserializeOwned;

use super::{
    model::{PayloadWrapper, QuestionReviewPayload, ReviewPayload, ReviewResponse, SentenceReviewPayload},
    service::review_item_within,
};
use crate::{auth::Authorized, error::ApiError, state::ApiState};

/// Webhook endpoints called by the message broker, one per item kind
pub fn routes<S>() -> Router<ApiState<S>>
where
    S: ReviewStore + Clone + 'static,
{
    Router::new()
        .route(
            "/webhooks/question-review",
            post(handle_webhook::<S, QuestionReviewPayload>),
        )
        .route(
            "/webhooks/sentence-review",
            post(handle_webhook::<S, SentenceReviewPayload>),
        )
}

/// Decode a JSON body, reporting syntax and shape errors as a 400.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("Invalid payload format: {e}")))
}

async fn handle_webhook<S, P>(
    _: Authorized,
    State(state): State<ApiState<S>>,
    body: Bytes,
) -> Result<Json<ReviewResponse>, ApiError>
where
    S: ReviewStore + Clone + 'static,
    P: ReviewPayload + DeserializeOwned + Send + 'static,
{
    let PayloadWrapper { payload } = decode_body::<PayloadWrapper<P>>(&body)?;
    let request = payload.into_request()?;

    let record = review_item_within(
        &state.store,
        state.scheduler.as_ref(),
        request,
        state.request_timeout,
    )
    .await?;

    Ok(Json(record.into()))
}
