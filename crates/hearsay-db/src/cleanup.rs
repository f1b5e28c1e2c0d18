//! Age-based mention cleanup and collection statistics.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// Aggregate statistics over the `mentions` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MentionStats {
    pub total_mentions: i64,
    pub oldest_mention_at: Option<DateTime<Utc>>,
    pub newest_mention_at: Option<DateTime<Utc>>,
}

/// Result of one cleanup invocation.
#[derive(Debug, Clone, Serialize)]
pub struct CleanupOutcome {
    pub deleted: i64,
    pub dry_run: bool,
    pub cutoff: DateTime<Utc>,
    pub message: String,
}

/// Counts mentions created strictly before `cutoff`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_mentions_older_than(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mentions WHERE created_at < $1")
        .bind(cutoff)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Deletes mentions created strictly before `cutoff` and returns the
/// number of rows removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn delete_mentions_older_than(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<i64, DbError> {
    let result = sqlx::query("DELETE FROM mentions WHERE created_at < $1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(i64::try_from(result.rows_affected()).unwrap_or(i64::MAX))
}

/// Returns count plus oldest/newest creation timestamps for all mentions.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mention_stats(pool: &PgPool) -> Result<MentionStats, DbError> {
    let stats = sqlx::query_as::<_, MentionStats>(
        "SELECT COUNT(*) AS total_mentions, \
                MIN(created_at) AS oldest_mention_at, \
                MAX(created_at) AS newest_mention_at \
         FROM mentions",
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}

/// Runs an age-based cleanup: mentions older than `days_to_keep` days are
/// deleted, or merely counted when `dry_run` is set.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn run_cleanup(
    pool: &PgPool,
    days_to_keep: i64,
    dry_run: bool,
) -> Result<CleanupOutcome, DbError> {
    let cutoff = Utc::now() - Duration::days(days_to_keep);

    let deleted = if dry_run {
        count_mentions_older_than(pool, cutoff).await?
    } else {
        delete_mentions_older_than(pool, cutoff).await?
    };

    let message = if dry_run {
        format!("dry run: {deleted} mentions older than {days_to_keep} days would be deleted")
    } else {
        format!("deleted {deleted} mentions older than {days_to_keep} days")
    };

    Ok(CleanupOutcome {
        deleted,
        dry_run,
        cutoff,
        message,
    })
}
