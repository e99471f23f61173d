//! The `ReviewStore` trait and its PostgreSQL implementation.
//!
//! Transport adapters depend on this abstraction so the read-modify-write
//! cycle around the scheduler is one atomic call, whatever the backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use rvw_srs::{ItemKind, ReviewKey, ReviewState, SrsError};
use sqlx::PgPool;

use crate::{
    error::StoreError,
    models::{ReviewRecord, ReviewRow},
    repositories::review,
};

/// Persistence for review states.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers running on a multi-threaded tokio runtime.
pub trait ReviewStore: Send + Sync {
    /// Fetch the review for `key`, creating it with default values if the
    /// learner has never reviewed the item, then replace it with the state
    /// returned by `transform`.
    ///
    /// `now` is the instant the review is scheduled at. Stored rows are
    /// checked against it, so pass the same instant `transform` uses.
    ///
    /// The whole cycle is atomic with respect to other calls for the same key:
    /// concurrent reviews of one pair are applied one after the other, each on
    /// top of the previous result. A failing `transform` leaves the stored
    /// state untouched.
    ///
    /// # Errors
    ///
    /// * [`StoreError::ItemNotFound`] if the item does not exist.
    /// * [`StoreError::ReviewNotFound`] if the row vanished before the update.
    /// * [`StoreError::Schedule`] if the stored row is invalid or `transform`
    ///   fails.
    fn apply_review<F>(
        &self,
        key: &ReviewKey,
        now: DateTime<Utc>,
        transform: F,
    ) -> impl Future<Output = Result<ReviewRecord, StoreError>> + Send
    where
        F: FnOnce(&ReviewState) -> Result<ReviewState, SrsError> + Send;

    /// Up to `limit` reviews of a learner in `language`, soonest due first.
    fn next_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
        language: &str,
        limit: i64,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, StoreError>> + Send;

    /// All reviews of a learner for one kind of item, soonest due first.
    fn learner_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
    ) -> impl Future<Output = Result<Vec<ReviewRecord>, StoreError>> + Send;
}

/// [`ReviewStore`] backed by the `question_reviews` and `sentence_reviews` tables.
#[derive(Debug, Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ReviewStore for PgReviewStore {
    async fn apply_review<F>(
        &self,
        key: &ReviewKey,
        now: DateTime<Utc>,
        transform: F,
    ) -> Result<ReviewRecord, StoreError>
    where
        F: FnOnce(&ReviewState) -> Result<ReviewState, SrsError> + Send,
    {
        // Single transaction; the row lock serializes concurrent reviews of the pair
        let mut tx = self.pool.begin().await?;

        let row = match review::get_review_for_update(&mut *tx, key).await? {
            Some(row) => row,
            None => {
                let language = review::get_item_language(&mut *tx, key.item)
                    .await?
                    .ok_or(StoreError::ItemNotFound(key.item))?;

                // A concurrent first review may win the insert; either way the
                // row exists afterwards and the select below waits for its lock.
                review::insert_review_if_absent(&mut *tx, key, &language).await?;

                review::get_review_for_update(&mut *tx, key)
                    .await?
                    .ok_or(StoreError::ItemNotFound(key.item))?
            }
        };

        let current = row.into_record(key.item.kind, now)?;
        let next = transform(&current.state)?;

        let updated = review::update_review(&mut *tx, current.id, &next).await?;
        if updated == 0 {
            return Err(StoreError::ReviewNotFound(current.id));
        }

        tx.commit().await?;

        Ok(ReviewRecord {
            id: current.id,
            language: current.language,
            state: next,
        })
    }

    async fn next_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
        language: &str,
        limit: i64,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let rows =
            review::list_next_reviews(&self.pool, learner_id, kind, language, limit).await?;
        into_records(rows, kind)
    }

    async fn learner_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let rows = review::list_learner_reviews(&self.pool, learner_id, kind).await?;
        into_records(rows, kind)
    }
}

fn into_records(rows: Vec<ReviewRow>, kind: ItemKind) -> Result<Vec<ReviewRecord>, StoreError> {
    let now = Utc::now();
    rows.into_iter()
        .map(|row| row.into_record(kind, now).map_err(StoreError::from))
        .collect()
}
