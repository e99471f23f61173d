use chrono::{DateTime, Days, Utc};

use crate::{
    FAILURE_INTERVAL, MAX_EASE_FACTOR, MAX_INTERVAL_DAYS, MAX_REPETITIONS, MIN_EASE_FACTOR,
    Outcome, PASSING_QUALITY, ReviewState, SrsError,
};

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Applies review outcomes to review states, reading "now" from its clock.
#[derive(Debug, Clone, Default)]
pub struct Scheduler<C = SystemClock> {
    clock: C,
}

impl Scheduler<SystemClock> {
    pub const fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> Scheduler<C> {
    pub const fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Compute the state that follows `state` after an attempt with `outcome`.
    pub fn review(&self, state: &ReviewState, outcome: Outcome) -> Result<ReviewState, SrsError> {
        update(state, outcome, self.clock.now())
    }
}

/// SM-2 update rule restricted to a pass/fail outcome.
///
/// The input is left untouched and a new state is returned with the same key.
///
/// # Algorithm
///
/// * Failure (quality below 3): repetitions reset to 0, interval to
///   [`FAILURE_INTERVAL`].
/// * Success: repetitions increase (saturating at [`MAX_REPETITIONS`]). The
///   first success schedules the item for the next day, the second for six
///   days later, and every following success multiplies the previous interval
///   by the ease factor (rounded, capped at [`MAX_INTERVAL_DAYS`]).
/// * The ease factor moves by `0.1 - (5 - q) * (0.08 + (5 - q) * 0.02)` using
///   the previous factor, clamped to `[1.3, 5.0]`: +0.1 on success, -0.8 on
///   failure.
/// * The item is next due `interval` calendar days after `now`.
///
/// # Errors
///
/// [`SrsError::InvariantViolation`] when `state` has negative counters, an
/// interval above the cap, or an ease factor outside the clamp bounds.
pub fn update(
    state: &ReviewState,
    outcome: Outcome,
    now: DateTime<Utc>,
) -> Result<ReviewState, SrsError> {
    check_preconditions(state)?;

    let quality = outcome.quality();

    let (repetitions, interval) = if quality < PASSING_QUALITY {
        (0, FAILURE_INTERVAL)
    } else {
        let repetitions = state.repetitions.saturating_add(1).min(MAX_REPETITIONS);
        let interval = match repetitions {
            1 => 1,
            2 => 6,
            _ => grow_interval(state.interval, state.ease_factor),
        };
        (repetitions, interval)
    };

    let lapse = f64::from(5 - quality);
    let ease_factor = (state.ease_factor + (0.1 - lapse * (0.08 + lapse * 0.02)))
        .clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR);

    // Calendar days, not 24h multiples, so the time of day stays put.
    let next_review_instant = now
        .checked_add_days(Days::new(interval.unsigned_abs().into()))
        .ok_or_else(|| {
            SrsError::InvariantViolation(format!("due date overflows {interval} days after {now}"))
        })?;

    Ok(ReviewState {
        key: state.key.clone(),
        repetitions,
        ease_factor,
        interval,
        next_review_instant,
    })
}

fn grow_interval(previous: i32, ease_factor: f64) -> i32 {
    let grown = (f64::from(previous) * ease_factor).round();
    // Bounded by MAX_INTERVAL_DAYS before the cast, so it always fits.
    grown.min(f64::from(MAX_INTERVAL_DAYS)) as i32
}

fn check_preconditions(state: &ReviewState) -> Result<(), SrsError> {
    if state.repetitions < 0 {
        return Err(SrsError::InvariantViolation(format!(
            "negative repetitions: {}",
            state.repetitions
        )));
    }
    if !(0..=MAX_INTERVAL_DAYS).contains(&state.interval) {
        return Err(SrsError::InvariantViolation(format!(
            "interval out of range: {}",
            state.interval
        )));
    }
    if !(MIN_EASE_FACTOR..=MAX_EASE_FACTOR).contains(&state.ease_factor) {
        // NaN fails the range check too
        return Err(SrsError::InvariantViolation(format!(
            "ease factor out of range: {}",
            state.ease_factor
        )));
    }
    Ok(())
}
