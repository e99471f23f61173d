use chrono::{DateTime, Utc};
use rvw_srs::{ItemKind, ItemRef, ReviewKey, ReviewState, SrsError};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Review row as stored in `question_reviews` / `sentence_reviews`.
///
/// The item column (`question_id` or `sentence_id`) is selected as `item_id`.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub user_id: String,
    /// Copied from the item when the row was created
    pub language: String,
    pub repetitions: i32,
    pub ease_factor: f64,
    pub interval: i32,
    pub next_review_instant: DateTime<Utc>,
}

impl ReviewRow {
    /// Turn the row into a record, rejecting values the scheduler cannot work with.
    pub fn into_record(self, kind: ItemKind, now: DateTime<Utc>) -> Result<ReviewRecord, SrsError> {
        let key = ReviewKey::new(
            self.user_id,
            ItemRef {
                kind,
                id: self.item_id,
            },
        );
        let state = ReviewState::restore(
            key,
            self.repetitions,
            self.ease_factor,
            self.interval,
            self.next_review_instant,
            now,
        )?;

        Ok(ReviewRecord {
            id: self.id,
            language: self.language,
            state,
        })
    }
}

/// A persisted review: row id, denormalized language tag and scheduling state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewRecord {
    pub id: Uuid,
    pub language: String,
    pub state: ReviewState,
}

impl ReviewRecord {
    pub const fn key(&self) -> &ReviewKey {
        &self.state.key
    }
}
