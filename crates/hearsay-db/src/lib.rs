//! Postgres access for the mention pipeline: pool construction, embedded
//! migrations, and per-table query modules.

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

// Path relative to crates/hearsay-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// Pool sizing, taken from the application config rather than its own
/// environment variables so there is one source of truth for tuning.
#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &hearsay_core::AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }

    /// Opens a pool against `database_url` with this sizing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlx`] if the connection cannot be established.
    pub async fn connect(&self, database_url: &str) -> Result<PgPool, DbError> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect(database_url)
            .await?;
        Ok(pool)
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`DbError::Migration`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the round trip fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

pub mod brands;
pub mod cleanup;
pub mod cursors;
pub mod mentions;
pub mod seed;

pub use brands::{
    get_brand_by_slug, list_active_brands, list_brands_with_channel, list_keywords_for_brand,
    BrandRow, KeywordRow,
};
pub use cleanup::{
    count_mentions_older_than, delete_mentions_older_than, mention_stats, run_cleanup,
    CleanupOutcome, MentionStats,
};
pub use cursors::{clear_cursor, get_cursor, set_cursor};
pub use mentions::{
    count_pending_for_channel, existing_item_ids, insert_mention_if_absent, list_recent_mentions,
    mark_channel_sent, mention_exists, pending_for_channel, MentionRow, NewMention,
    PendingMentionRow,
};
pub use seed::seed_brands;
