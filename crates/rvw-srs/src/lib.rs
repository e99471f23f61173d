//! SRS (Spaced Repetition System) core for the review workers
//!
//! This crate holds the SM-2 scheduling rule that decides when a learner should
//! see a question or sentence again. It is pure: callers load a
//! [`ReviewState`], apply an [`Outcome`] through [`update`] or a [`Scheduler`],
//! and persist the returned state themselves.

mod error;
mod outcome;
mod scheduler;
mod state;

pub use error::SrsError;
pub use outcome::{Outcome, PASSING_QUALITY};
pub use scheduler::{Clock, FixedClock, Scheduler, SystemClock, update};
pub use state::{ItemKind, ItemRef, ReviewKey, ReviewState};

/// Ease factor given to an item the first time it is reviewed.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Lowest ease factor. Below this intervals stop growing in a useful way.
pub const MIN_EASE_FACTOR: f64 = 1.3;

pub const MAX_EASE_FACTOR: f64 = 5.0;

/// Repetitions stop counting here.
pub const MAX_REPETITIONS: i32 = 1000;

/// Longest interval between two reviews (10 years, in days).
pub const MAX_INTERVAL_DAYS: i32 = 365 * 10;

/// Interval assigned after a failed review.
pub const FAILURE_INTERVAL: i32 = 0;
