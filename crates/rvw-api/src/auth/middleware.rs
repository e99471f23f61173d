use std::{fmt, sync::Arc};

use axum::{
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::error::ApiError;

/// Shared secret the message broker appends to every delivery as `?key=`.
#[derive(Clone)]
pub struct WebhookSecret(Arc<str>);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::from(secret.into()))
    }

    /// Compare `candidate` with the secret in constant time. An empty secret
    /// never matches.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = self.0.as_bytes();
        !expected.is_empty() && bool::from(expected.ct_eq(candidate.as_bytes()))
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WebhookSecret(..)")
    }
}

#[derive(Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

/// Extractor for requests carrying the webhook secret.
///
/// # Example
/// ```
/// use rvw_api::{auth::Authorized, error::ApiError};
///
/// async fn handler(_: Authorized) -> Result<(), ApiError> {
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

impl<S> FromRequestParts<S> for Authorized
where
    WebhookSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secret = WebhookSecret::from_ref(state);

        let Query(query) = Query::<KeyQuery>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::Auth("Malformed query string".to_string()))?;
        let key = query
            .key
            .ok_or_else(|| ApiError::Auth("Missing key".to_string()))?;

        if !secret.matches(&key) {
            tracing::warn!(path = %parts.uri.path(), "Rejected request with invalid key");
            return Err(ApiError::Auth("Invalid key".to_string()));
        }

        Ok(Authorized)
    }
}
