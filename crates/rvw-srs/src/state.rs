use std::fmt;

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    INITIAL_EASE_FACTOR, MAX_EASE_FACTOR, MAX_INTERVAL_DAYS, MAX_REPETITIONS, MIN_EASE_FACTOR,
    SrsError,
};

/// Stored ease factors are accepted this far outside the clamp bounds and
/// pulled back in. Older rows were written with single precision floats.
const STORED_EASE_TOLERANCE: f64 = 0.1;

/// Upper bound on how far in the future a stored review may be due.
const MAX_REVIEW_INSTANT_DAYS: u64 = 365 * 10;

/// The kind of content a learner is reviewing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Question,
    Sentence,
}

impl ItemKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Sentence => "sentence",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reviewable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: Uuid,
}

impl ItemRef {
    pub const fn question(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Question,
            id,
        }
    }

    pub const fn sentence(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Sentence,
            id,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Identity of a review record: at most one state exists per (learner, item).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewKey {
    pub learner_id: String,
    pub item: ItemRef,
}

impl ReviewKey {
    pub fn new(learner_id: impl Into<String>, item: ItemRef) -> Self {
        Self {
            learner_id: learner_id.into(),
            item,
        }
    }
}

/// Scheduling state of one item for one learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub key: ReviewKey,
    /// Consecutive passing reviews since the last reset.
    pub repetitions: i32,
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: i32,
    pub next_review_instant: DateTime<Utc>,
}

impl ReviewState {
    /// State of an item that has never been reviewed. It is due right away.
    pub fn new(key: ReviewKey, now: DateTime<Utc>) -> Self {
        Self {
            key,
            repetitions: 0,
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            next_review_instant: now,
        }
    }

    /// Rebuild a state from persisted fields.
    ///
    /// Rows outside the ranges the scheduler can produce are rejected. Ease
    /// factors slightly outside the clamp bounds are clamped, everything else
    /// must be exact.
    pub fn restore(
        key: ReviewKey,
        repetitions: i32,
        ease_factor: f64,
        interval: i32,
        next_review_instant: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Self, SrsError> {
        if !(0..=MAX_REPETITIONS).contains(&repetitions) {
            return Err(SrsError::InvariantViolation(format!(
                "repetitions must be between 0 and {MAX_REPETITIONS}, got {repetitions}"
            )));
        }
        if !(0..=MAX_INTERVAL_DAYS).contains(&interval) {
            return Err(SrsError::InvariantViolation(format!(
                "interval must be between 0 and {MAX_INTERVAL_DAYS} days, got {interval}"
            )));
        }
        let lower = MIN_EASE_FACTOR - STORED_EASE_TOLERANCE;
        let upper = MAX_EASE_FACTOR + STORED_EASE_TOLERANCE;
        if !ease_factor.is_finite() || !(lower..=upper).contains(&ease_factor) {
            return Err(SrsError::InvariantViolation(format!(
                "ease factor must be between {MIN_EASE_FACTOR} and {MAX_EASE_FACTOR}, got {ease_factor}"
            )));
        }
        let latest = now
            .checked_add_days(Days::new(MAX_REVIEW_INSTANT_DAYS))
            .ok_or_else(|| SrsError::InvariantViolation("clock out of range".to_string()))?;
        if next_review_instant > latest {
            return Err(SrsError::InvariantViolation(format!(
                "next review instant {next_review_instant} is more than {} years away",
                MAX_REVIEW_INSTANT_DAYS / 365
            )));
        }

        Ok(Self {
            key,
            repetitions,
            ease_factor: ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR),
            interval,
            next_review_instant,
        })
    }
}
