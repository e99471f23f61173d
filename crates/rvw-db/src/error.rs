use rvw_srs::{ItemRef, SrsError};
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by [`ReviewStore`](crate::store::ReviewStore) implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    ItemNotFound(ItemRef),
    #[error("no review found with ID {0}")]
    ReviewNotFound(Uuid),
    #[error(transparent)]
    Schedule(#[from] SrsError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {key}: {reason}")]
pub struct InvalidConfig {
    pub key: &'static str,
    pub reason: String,
}

impl InvalidConfig {
    pub fn new(key: &'static str, reason: impl Into<String>) -> Self {
        Self {
            key,
            reason: reason.into(),
        }
    }
}
