use rvw_srs::{ItemKind, ItemRef, ReviewKey, ReviewState};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ReviewRow;

/// SQL for one review table. Question and sentence reviews share a layout and
/// differ only in table and item column names.
struct ReviewQueries {
    item_language: &'static str,
    insert_if_absent: &'static str,
    select_for_update: &'static str,
    update: &'static str,
    next_reviews: &'static str,
    learner_reviews: &'static str,
}

const QUESTION_QUERIES: ReviewQueries = ReviewQueries {
    // language=PostgreSQL
    item_language: r#"
        SELECT language
        FROM questions
        WHERE id = $1
    "#,
    // language=PostgreSQL
    insert_if_absent: r#"
        INSERT INTO question_reviews (id, question_id, user_id, language)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (question_id, user_id) DO NOTHING
    "#,
    // language=PostgreSQL
    select_for_update: r#"
        SELECT id, question_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM question_reviews
        WHERE question_id = $1 AND user_id = $2
        FOR UPDATE
    "#,
    // language=PostgreSQL
    update: r#"
        UPDATE question_reviews
        SET repetitions = $1,
            ease_factor = $2,
            "interval" = $3,
            next_review_instant = $4
        WHERE id = $5
    "#,
    // language=PostgreSQL
    next_reviews: r#"
        SELECT id, question_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM question_reviews
        WHERE user_id = $1 AND language = $2
        ORDER BY next_review_instant ASC
        LIMIT $3
    "#,
    // language=PostgreSQL
    learner_reviews: r#"
        SELECT id, question_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM question_reviews
        WHERE user_id = $1
        ORDER BY next_review_instant ASC
    "#,
};

const SENTENCE_QUERIES: ReviewQueries = ReviewQueries {
    // language=PostgreSQL
    item_language: r#"
        SELECT source_language
        FROM sentences
        WHERE id = $1
    "#,
    // language=PostgreSQL
    insert_if_absent: r#"
        INSERT INTO sentence_reviews (id, sentence_id, user_id, language)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (sentence_id, user_id) DO NOTHING
    "#,
    // language=PostgreSQL
    select_for_update: r#"
        SELECT id, sentence_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM sentence_reviews
        WHERE sentence_id = $1 AND user_id = $2
        FOR UPDATE
    "#,
    // language=PostgreSQL
    update: r#"
        UPDATE sentence_reviews
        SET repetitions = $1,
            ease_factor = $2,
            "interval" = $3,
            next_review_instant = $4
        WHERE id = $5
    "#,
    // language=PostgreSQL
    next_reviews: r#"
        SELECT id, sentence_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM sentence_reviews
        WHERE user_id = $1 AND language = $2
        ORDER BY next_review_instant ASC
        LIMIT $3
    "#,
    // language=PostgreSQL
    learner_reviews: r#"
        SELECT id, sentence_id AS item_id, user_id, language, repetitions,
               ease_factor, "interval", next_review_instant
        FROM sentence_reviews
        WHERE user_id = $1
        ORDER BY next_review_instant ASC
    "#,
};

const fn queries(kind: ItemKind) -> &'static ReviewQueries {
    match kind {
        ItemKind::Question => &QUESTION_QUERIES,
        ItemKind::Sentence => &SENTENCE_QUERIES,
    }
}

/// Language of a question or sentence, `None` if the item does not exist.
pub async fn get_item_language<'e, E>(
    executor: E,
    item: ItemRef,
) -> Result<Option<String>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(queries(item.kind).item_language)
        .bind(item.id)
        .fetch_optional(executor)
        .await
}

/// Insert a review row with default scheduling values unless one already
/// exists for the pair. Returns whether a row was inserted.
pub async fn insert_review_if_absent<'e, E>(
    executor: E,
    key: &ReviewKey,
    language: &str,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(queries(key.item.kind).insert_if_absent)
        .bind(Uuid::new_v4())
        .bind(key.item.id)
        .bind(&key.learner_id)
        .bind(language)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Fetch the review for a pair and lock the row until the transaction ends.
pub async fn get_review_for_update<'e, E>(
    executor: E,
    key: &ReviewKey,
) -> Result<Option<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(queries(key.item.kind).select_for_update)
        .bind(key.item.id)
        .bind(&key.learner_id)
        .fetch_optional(executor)
        .await
}

/// Overwrite the scheduling columns of a review. Returns the number of rows
/// updated.
pub async fn update_review<'e, E>(
    executor: E,
    review_id: Uuid,
    state: &ReviewState,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(queries(state.key.item.kind).update)
        .bind(state.repetitions)
        .bind(state.ease_factor)
        .bind(state.interval)
        .bind(state.next_review_instant)
        .bind(review_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// A learner's reviews in one language, soonest due first.
pub async fn list_next_reviews<'e, E>(
    executor: E,
    learner_id: &str,
    kind: ItemKind,
    language: &str,
    limit: i64,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(queries(kind).next_reviews)
        .bind(learner_id)
        .bind(language)
        .bind(limit)
        .fetch_all(executor)
        .await
}

/// Every review a learner has for one kind of item.
pub async fn list_learner_reviews<'e, E>(
    executor: E,
    learner_id: &str,
    kind: ItemKind,
) -> Result<Vec<ReviewRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(queries(kind).learner_reviews)
        .bind(learner_id)
        .fetch_all(executor)
        .await
}
