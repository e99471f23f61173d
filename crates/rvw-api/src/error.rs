use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rvw_db::StoreError;
use rvw_srs::SrsError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Scheduling error: {0}")]
    Schedule(#[from] SrsError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ItemNotFound(item) => Self::NotFound(format!("{item} not found")),
            StoreError::ReviewNotFound(id) => Self::NotFound(format!("no review found with ID {id}")),
            StoreError::Schedule(e) => Self::Schedule(e),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

impl ApiError {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) | Self::Schedule(SrsError::InvalidOutcome(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Schedule(SrsError::InvariantViolation(_)) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal details stay in the logs
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".to_string()
            }
            Self::Schedule(e @ SrsError::InvariantViolation(_)) => {
                tracing::error!(error = %e, "Stored review state rejected by the scheduler");
                "Internal server error".to_string()
            }
            Self::Schedule(SrsError::InvalidOutcome(value)) => {
                format!("invalid status value: {value:?}")
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
