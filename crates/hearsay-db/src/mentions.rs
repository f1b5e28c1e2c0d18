//! Database operations for the `mentions` table — the mention repository.
//!
//! Deduplication is enforced by the storage layer: `mentions` carries a
//! unique index on `(platform, upstream_item_id)` and inserts go through
//! `ON CONFLICT DO NOTHING`, so the duplicate signal is `rows_affected == 0`
//! rather than an application-level check-then-act.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use hearsay_core::{Channel, ItemType, Platform, SentimentLabel};
use sqlx::PgPool;
use uuid::Uuid;

use crate::brands::channel_columns;
use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// Insert shape for a new mention, produced by the ingestion pipeline.
#[derive(Debug, Clone)]
pub struct NewMention {
    pub brand_id: i64,
    pub platform: Platform,
    pub upstream_item_id: String,
    pub item_type: ItemType,
    pub keyword_matched: String,
    pub title: Option<String>,
    pub content: String,
    pub snippet: String,
    pub author: Option<String>,
    pub url: String,
    pub permalink: Option<String>,
    pub upstream_score: i32,
    pub num_comments: i32,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A full row from the `mentions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MentionRow {
    pub id: i64,
    pub public_id: Uuid,
    pub brand_id: i64,
    pub platform: String,
    pub upstream_item_id: String,
    pub item_type: String,
    pub keyword_matched: String,
    pub title: Option<String>,
    pub content: String,
    pub snippet: String,
    pub author: Option<String>,
    pub url: String,
    pub permalink: Option<String>,
    pub upstream_score: i32,
    pub num_comments: i32,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub is_processed: bool,
    pub unread: bool,
    pub email_sent: bool,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub slack_sent: bool,
    pub slack_sent_at: Option<DateTime<Utc>>,
    pub telegram_sent: bool,
    pub telegram_sent_at: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A mention awaiting delivery on one channel, joined to its brand's
/// destination for that channel.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PendingMentionRow {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub destination: String,
    pub platform: String,
    pub item_type: String,
    pub keyword_matched: String,
    pub title: Option<String>,
    pub snippet: String,
    pub sentiment_label: String,
    pub url: String,
}

const MENTION_COLUMNS: &str = "id, public_id, brand_id, platform, upstream_item_id, item_type, \
     keyword_matched, title, content, snippet, author, url, permalink, \
     upstream_score, num_comments, sentiment_score, sentiment_label, \
     is_processed, unread, email_sent, email_sent_at, slack_sent, slack_sent_at, \
     telegram_sent, telegram_sent_at, posted_at, created_at";

/// Maps a channel to its `(sent, sent_at)` column pair on `mentions`.
fn sent_columns(channel: Channel) -> (&'static str, &'static str) {
    match channel {
        Channel::Email => ("email_sent", "email_sent_at"),
        Channel::Slack => ("slack_sent", "slack_sent_at"),
        Channel::Telegram => ("telegram_sent", "telegram_sent_at"),
    }
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Returns the subset of `item_ids` already present for `platform`, in one query.
///
/// Used by the ingestion pipeline to pre-filter a fetched batch before
/// inserting, keeping ingestion to two queries per batch instead of one
/// existence check per candidate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn existing_item_ids(
    pool: &PgPool,
    platform: Platform,
    item_ids: &[String],
) -> Result<HashSet<String>, DbError> {
    if item_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT upstream_item_id FROM mentions \
         WHERE platform = $1 AND upstream_item_id = ANY($2)",
    )
    .bind(platform.as_str())
    .bind(item_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Returns whether a mention already exists for `(platform, item_id)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mention_exists(
    pool: &PgPool,
    platform: Platform,
    item_id: &str,
) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM mentions WHERE platform = $1 AND upstream_item_id = $2)",
    )
    .bind(platform.as_str())
    .bind(item_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Atomically insert a mention unless one already exists for its
/// `(platform, upstream_item_id)` pair.
///
/// Returns `true` if a row was inserted, `false` if the unique index
/// rejected it as a duplicate. Safe under concurrent ingestion runs: the
/// storage engine, not the caller, arbitrates duplicates.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails for any reason other
/// than the uniqueness conflict.
pub async fn insert_mention_if_absent(
    pool: &PgPool,
    mention: &NewMention,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO mentions \
             (public_id, brand_id, platform, upstream_item_id, item_type, \
              keyword_matched, title, content, snippet, author, url, permalink, \
              upstream_score, num_comments, sentiment_score, sentiment_label, \
              is_processed, posted_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, true, $17) \
         ON CONFLICT (platform, upstream_item_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(mention.brand_id)
    .bind(mention.platform.as_str())
    .bind(&mention.upstream_item_id)
    .bind(mention.item_type.as_str())
    .bind(&mention.keyword_matched)
    .bind(&mention.title)
    .bind(&mention.content)
    .bind(&mention.snippet)
    .bind(&mention.author)
    .bind(&mention.url)
    .bind(&mention.permalink)
    .bind(mention.upstream_score)
    .bind(mention.num_comments)
    .bind(mention.sentiment_score)
    .bind(mention.sentiment_label.as_str())
    .bind(mention.posted_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

// ---------------------------------------------------------------------------
// Notification delivery state
// ---------------------------------------------------------------------------

/// Returns up to `limit` mentions pending delivery on `channel`, oldest
/// first, restricted to active brands with the channel enabled and a
/// non-empty destination.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn pending_for_channel(
    pool: &PgPool,
    channel: Channel,
    limit: i64,
) -> Result<Vec<PendingMentionRow>, DbError> {
    let (sent_col, _) = sent_columns(channel);
    let (enabled_col, dest_col) = channel_columns(channel);

    let rows = sqlx::query_as::<_, PendingMentionRow>(&format!(
        "SELECT m.id, m.brand_id, b.name AS brand_name, b.{dest_col} AS destination, \
                m.platform, m.item_type, m.keyword_matched, m.title, m.snippet, \
                m.sentiment_label, m.url \
         FROM mentions m \
         JOIN brands b ON b.id = m.brand_id \
         WHERE m.{sent_col} = false \
           AND b.is_active = true \
           AND b.{enabled_col} = true \
           AND COALESCE(TRIM(b.{dest_col}), '') <> '' \
         ORDER BY m.created_at, m.id \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Counts all mentions currently pending delivery on `channel`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_pending_for_channel(pool: &PgPool, channel: Channel) -> Result<i64, DbError> {
    let (sent_col, _) = sent_columns(channel);
    let (enabled_col, dest_col) = channel_columns(channel);

    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) \
         FROM mentions m \
         JOIN brands b ON b.id = m.brand_id \
         WHERE m.{sent_col} = false \
           AND b.is_active = true \
           AND b.{enabled_col} = true \
           AND COALESCE(TRIM(b.{dest_col}), '') <> ''"
    ))
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Marks a mention as sent on one channel. One-way transition: the sent
/// flag never goes back to `false`, and `sent_at` keeps its original
/// timestamp on a repeated mark, so re-marking is a no-op.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no mention exists with the given id,
/// or [`DbError::Sqlx`] if the update fails.
pub async fn mark_channel_sent(
    pool: &PgPool,
    mention_id: i64,
    channel: Channel,
) -> Result<(), DbError> {
    let (sent_col, sent_at_col) = sent_columns(channel);

    let result = sqlx::query(&format!(
        "UPDATE mentions \
         SET {sent_col} = true, {sent_at_col} = COALESCE({sent_at_col}, NOW()) \
         WHERE id = $1"
    ))
    .bind(mention_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Inspection
// ---------------------------------------------------------------------------

/// Returns recent mentions, optionally filtered by brand, newest first.
///
/// Brand filtering is by `brand_id` — the authoritative owner of a
/// mention — never by keyword string.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_mentions(
    pool: &PgPool,
    brand_id: Option<i64>,
    limit: i64,
) -> Result<Vec<MentionRow>, DbError> {
    let rows = match brand_id {
        Some(id) => {
            sqlx::query_as::<_, MentionRow>(&format!(
                "SELECT {MENTION_COLUMNS} FROM mentions \
                 WHERE brand_id = $1 \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $2"
            ))
            .bind(id)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, MentionRow>(&format!(
                "SELECT {MENTION_COLUMNS} FROM mentions \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
