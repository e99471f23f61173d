use std::time::{Duration, Instant};

use rvw_db::{ReviewRecord, ReviewStore};
use rvw_srs::{Clock, Scheduler, update};

use super::model::ReviewRequest;
use crate::{error::ApiError, metrics};

/// Apply one review outcome to the stored state of a (learner, item) pair.
///
/// The state is fetched (or created with defaults on the first review),
/// passed through the scheduler and written back as one atomic store call.
pub async fn review_item<S, C>(
    store: &S,
    scheduler: &Scheduler<C>,
    request: ReviewRequest,
) -> Result<ReviewRecord, ApiError>
where
    S: ReviewStore,
    C: Clock,
{
    let ReviewRequest { key, outcome } = request;
    let start = Instant::now();

    // Read once: the store checks the loaded row against the same instant
    let now = scheduler.now();
    let result = store
        .apply_review(&key, now, |state| update(state, outcome, now))
        .await;
    metrics::record_store_operation("apply_review", start.elapsed().as_secs_f64(), result.is_ok());

    let record = result.inspect_err(|e| {
        tracing::warn!(learner_id = %key.learner_id, item = %key.item, error = %e, "Review failed");
    })?;

    metrics::record_review(key.item.kind, outcome);
    tracing::info!(
        learner_id = %key.learner_id,
        item = %key.item,
        %outcome,
        repetitions = record.state.repetitions,
        interval = record.state.interval,
        next_review_instant = %record.state.next_review_instant,
        "Review processed"
    );

    Ok(record)
}

/// [`review_item`] bounded by `timeout`.
///
/// On expiry the in-flight store call is dropped, which rolls back its
/// transaction, and [`ApiError::Timeout`] is returned.
pub async fn review_item_within<S, C>(
    store: &S,
    scheduler: &Scheduler<C>,
    request: ReviewRequest,
    timeout: Duration,
) -> Result<ReviewRecord, ApiError>
where
    S: ReviewStore,
    C: Clock,
{
    tokio::time::timeout(timeout, review_item(store, scheduler, request))
        .await
        .map_err(|_| ApiError::Timeout)?
}
