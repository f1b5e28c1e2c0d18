//! Database operations for the `brands` and `brand_keywords` tables.

use chrono::{DateTime, Utc};
use hearsay_core::Channel;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub email_enabled: bool,
    pub email_recipient: Option<String>,
    pub slack_enabled: bool,
    pub slack_webhook_url: Option<String>,
    pub telegram_enabled: bool,
    pub telegram_chat_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `brand_keywords` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeywordRow {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

const BRAND_COLUMNS: &str = "id, public_id, name, slug, \
     email_enabled, email_recipient, slack_enabled, slack_webhook_url, \
     telegram_enabled, telegram_chat_id, is_active, created_at, updated_at";

/// Maps a channel to its `(enabled, destination)` column pair on `brands`.
pub(crate) fn channel_columns(channel: Channel) -> (&'static str, &'static str) {
    match channel {
        Channel::Email => ("email_enabled", "email_recipient"),
        Channel::Slack => ("slack_enabled", "slack_webhook_url"),
        Channel::Telegram => ("telegram_enabled", "telegram_chat_id"),
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active brands, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single active brand by slug, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE slug = $1 AND is_active = true"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the keyword list for one brand, in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_keywords_for_brand(
    pool: &PgPool,
    brand_id: i64,
) -> Result<Vec<KeywordRow>, DbError> {
    let rows = sqlx::query_as::<_, KeywordRow>(
        "SELECT id, brand_id, name, kind, created_at \
         FROM brand_keywords \
         WHERE brand_id = $1 \
         ORDER BY id",
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns active brands that have the given channel enabled with a
/// non-empty destination, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands_with_channel(
    pool: &PgPool,
    channel: Channel,
) -> Result<Vec<BrandRow>, DbError> {
    let (enabled_col, dest_col) = channel_columns(channel);
    let rows = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands \
         WHERE is_active = true AND {enabled_col} = true \
           AND COALESCE(TRIM({dest_col}), '') <> '' \
         ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
