use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use rvw_db::ReviewStore;
use serde::Deserialize;

use crate::{
    auth::Authorized,
    error::ApiError,
    review::ReviewResponse,
    state::ApiState,
    validation::{parse_item_kind, validate_language, validate_learner_id, validate_limit},
};

/// Read-only views over a learner's reviews, behind the same key as the webhooks
pub fn routes<S>() -> Router<ApiState<S>>
where
    S: ReviewStore + Clone + 'static,
{
    Router::new()
        .route("/learners/{learner_id}/{kind}", get(list_reviews::<S>))
        .route("/learners/{learner_id}/{kind}/next", get(next_reviews::<S>))
}

#[derive(Debug, Deserialize)]
struct NextReviewsQuery {
    language: Option<String>,
    limit: Option<i64>,
}

/// All reviews of a learner for one kind of item, soonest due first
async fn list_reviews<S>(
    _: Authorized,
    State(state): State<ApiState<S>>,
    Path((learner_id, kind)): Path<(String, String)>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError>
where
    S: ReviewStore + Clone + 'static,
{
    validate_learner_id(&learner_id)?;
    let kind = parse_item_kind(&kind)?;

    let records = state.store.learner_reviews(&learner_id, kind).await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

/// The reviews a learner should do next in one language
async fn next_reviews<S>(
    _: Authorized,
    State(state): State<ApiState<S>>,
    Path((learner_id, kind)): Path<(String, String)>,
    query: Result<Query<NextReviewsQuery>, QueryRejection>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError>
where
    S: ReviewStore + Clone + 'static,
{
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    validate_learner_id(&learner_id)?;
    let kind = parse_item_kind(&kind)?;
    let language = query
        .language
        .ok_or_else(|| ApiError::Validation("language is required".to_string()))?;
    validate_language(&language)?;
    let limit = validate_limit(query.limit)?;

    let records = state
        .store
        .next_reviews(&learner_id, kind, &language, limit)
        .await?;

    tracing::debug!(%learner_id, %kind, %language, count = records.len(), "Listed next reviews");
    Ok(Json(records.into_iter().map(Into::into).collect()))
}
