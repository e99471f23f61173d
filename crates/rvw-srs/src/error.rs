use thiserror::Error;

/// Errors raised by the review scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrsError {
    /// The attempt outcome is neither `Success` nor `Failure`.
    #[error("invalid outcome: {0:?}")]
    InvalidOutcome(String),
    /// The caller handed over a state that breaks the scheduler's preconditions.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}
