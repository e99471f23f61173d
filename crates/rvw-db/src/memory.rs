//! In-process [`ReviewStore`] for tests and local runs without PostgreSQL.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use rvw_srs::{ItemKind, ItemRef, ReviewKey, ReviewState, SrsError};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{error::StoreError, models::ReviewRecord, store::ReviewStore};

#[derive(Debug, Default)]
struct Inner {
    /// Known items and their language
    items: HashMap<ItemRef, String>,
    reviews: HashMap<ReviewKey, ReviewRecord>,
}

/// Review store held in memory. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryReviewStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reviewable item.
    pub async fn add_item(&self, item: ItemRef, language: impl Into<String>) {
        self.inner.lock().await.items.insert(item, language.into());
    }

    /// Current stored state for a pair, if any.
    pub async fn get(&self, key: &ReviewKey) -> Option<ReviewRecord> {
        self.inner.lock().await.reviews.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.reviews.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.reviews.is_empty()
    }

    async fn filtered<P>(&self, learner_id: &str, kind: ItemKind, mut keep: P) -> Vec<ReviewRecord>
    where
        P: FnMut(&ReviewRecord) -> bool,
    {
        let inner = self.inner.lock().await;
        let mut records: Vec<ReviewRecord> = inner
            .reviews
            .values()
            .filter(|r| r.key().learner_id == learner_id && r.key().item.kind == kind)
            .filter(|r| keep(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.state.next_review_instant);
        records
    }
}

impl ReviewStore for MemoryReviewStore {
    async fn apply_review<F>(
        &self,
        key: &ReviewKey,
        now: DateTime<Utc>,
        transform: F,
    ) -> Result<ReviewRecord, StoreError>
    where
        F: FnOnce(&ReviewState) -> Result<ReviewState, SrsError> + Send,
    {
        // Held for the whole cycle, which serializes concurrent reviews
        let mut inner = self.inner.lock().await;

        let current = match inner.reviews.get(key) {
            // Same checks as rows loaded from PostgreSQL
            Some(record) => ReviewRecord {
                state: ReviewState::restore(
                    key.clone(),
                    record.state.repetitions,
                    record.state.ease_factor,
                    record.state.interval,
                    record.state.next_review_instant,
                    now,
                )?,
                ..record.clone()
            },
            None => {
                let language = inner
                    .items
                    .get(&key.item)
                    .cloned()
                    .ok_or(StoreError::ItemNotFound(key.item))?;
                ReviewRecord {
                    id: Uuid::new_v4(),
                    language,
                    state: ReviewState::new(key.clone(), now),
                }
            }
        };

        let next = ReviewRecord {
            state: transform(&current.state)?,
            ..current
        };
        inner.reviews.insert(key.clone(), next.clone());

        Ok(next)
    }

    async fn next_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
        language: &str,
        limit: i64,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        let mut records = self
            .filtered(learner_id, kind, |r| r.language == language)
            .await;
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }

    async fn learner_reviews(
        &self,
        learner_id: &str,
        kind: ItemKind,
    ) -> Result<Vec<ReviewRecord>, StoreError> {
        Ok(self.filtered(learner_id, kind, |_| true).await)
    }
}
