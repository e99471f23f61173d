use rvw_srs::{ItemKind, Outcome};
use uuid::Uuid;

use crate::error::ApiError;

/// Default number of reviews returned by the listing endpoints
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Validate a learner identifier
///
/// # Examples
/// ```
/// use rvw_api::validation::validate_learner_id;
///
/// assert!(validate_learner_id("user1").is_ok());
/// assert!(validate_learner_id("  ").is_err());
/// ```
pub fn validate_learner_id(learner_id: &str) -> Result<(), ApiError> {
    if learner_id.trim().is_empty() {
        return Err(ApiError::Validation("userId is blank".to_string()));
    }
    Ok(())
}

/// Parse an item identifier. `field` names the payload field in errors.
pub fn parse_item_id(field: &str, value: &str) -> Result<Uuid, ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("{field} is blank")));
    }
    Uuid::parse_str(value.trim())
        .map_err(|_| ApiError::Validation(format!("{field} '{value}' is not a valid UUID")))
}

/// Parse a review status. Only the exact strings `Success` and `Failure` are
/// accepted.
pub fn parse_outcome(status: &str) -> Result<Outcome, ApiError> {
    Ok(status.parse::<Outcome>()?)
}

/// Map a plural path segment (`questions`, `sentences`) to an item kind.
pub fn parse_item_kind(segment: &str) -> Result<ItemKind, ApiError> {
    match segment {
        "questions" => Ok(ItemKind::Question),
        "sentences" => Ok(ItemKind::Sentence),
        other => Err(ApiError::NotFound(format!("unknown item kind '{other}'"))),
    }
}

pub fn validate_language(language: &str) -> Result<(), ApiError> {
    if language.trim().is_empty() {
        return Err(ApiError::Validation("language is blank".to_string()));
    }
    Ok(())
}

/// Resolve an optional `limit` query value.
pub fn validate_limit(limit: Option<i64>) -> Result<i64, ApiError> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(limit) if (1..=MAX_LIMIT).contains(&limit) => Ok(limit),
        Some(limit) => Err(ApiError::Validation(format!(
            "limit must be between 1 and {MAX_LIMIT}, got {limit}"
        ))),
    }
}
