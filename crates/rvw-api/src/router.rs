use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::get};
use rvw_db::ReviewStore;
use serde_json::json;

use crate::{learner, review, state::ApiState, tasks};

pub fn router<S>() -> Router<ApiState<S>>
where
    S: ReviewStore + Clone + 'static,
{
    Router::new()
        .route("/health", get(health))
        .merge(review::routes())
        .merge(tasks::routes())
        .merge(learner::routes())
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "The requested resource was not found" })),
    )
}
