use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;
use rvw_db::PgReviewStore;
use rvw_srs::Scheduler;

use crate::{ApiConfig, auth::WebhookSecret};

/// Default deadline for one review, matching the webhook sender's retry window.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared state of the review service, generic over the review store.
#[derive(Clone)]
pub struct ApiState<S = PgReviewStore> {
    pub store: S,
    pub scheduler: Arc<Scheduler>,
    pub webhook_secret: WebhookSecret,
    pub request_timeout: Duration,
}

impl<S> ApiState<S> {
    pub fn new(store: S, webhook_secret: impl Into<String>) -> Self {
        Self {
            store,
            scheduler: Arc::new(Scheduler::new()),
            webhook_secret: WebhookSecret::new(webhook_secret),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(store: S, config: &ApiConfig) -> Self {
        Self {
            request_timeout: config.request_timeout,
            ..Self::new(store, config.webhook_secret.clone())
        }
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl<S> FromRef<ApiState<S>> for WebhookSecret {
    fn from_ref(state: &ApiState<S>) -> Self {
        state.webhook_secret.clone()
    }
}
