//! Pagination cursor store.
//!
//! Each upstream source keeps an opaque cursor token under a free-form
//! scope key (`"reddit:global"`, `"hackernews:global"`, or a per-brand
//! variant). The read-modify-write cycle is deliberately unprotected:
//! overlapping runs are last-writer-wins, which can skip or re-fetch a
//! page of upstream results. That is acceptable because mention creation
//! downstream is idempotent either way.

use sqlx::PgPool;

use crate::DbError;

/// Returns the stored cursor for a scope key, or `None` if none is stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_cursor(pool: &PgPool, scope_key: &str) -> Result<Option<String>, DbError> {
    let cursor: Option<String> =
        sqlx::query_scalar("SELECT cursor FROM pagination_cursors WHERE scope_key = $1")
            .bind(scope_key)
            .fetch_optional(pool)
            .await?;

    Ok(cursor)
}

/// Stores (or replaces) the cursor for a scope key.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn set_cursor(pool: &PgPool, scope_key: &str, cursor: &str) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO pagination_cursors (scope_key, cursor) \
         VALUES ($1, $2) \
         ON CONFLICT (scope_key) DO UPDATE SET \
             cursor = EXCLUDED.cursor, \
             updated_at = NOW()",
    )
    .bind(scope_key)
    .bind(cursor)
    .execute(pool)
    .await?;

    Ok(())
}

/// Removes the stored cursor for a scope key, if any.
///
/// Used when the upstream rejects a cursor as invalid or expired: the
/// caller clears the cursor and retries once from a fresh state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_cursor(pool: &PgPool, scope_key: &str) -> Result<(), DbError> {
    sqlx::query("DELETE FROM pagination_cursors WHERE scope_key = $1")
        .bind(scope_key)
        .execute(pool)
        .await?;

    Ok(())
}
