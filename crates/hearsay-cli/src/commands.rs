//! Command handlers for the CLI.
//!
//! Each handler runs one pass and prints its summary as a JSON line.
//! Partial failures (a fetch that errored, a webhook that refused) are
//! reported inside the summary, not as a process exit code; only setup
//! failures propagate.

use std::path::Path;

use sqlx::PgPool;

use hearsay_core::AppConfig;

pub(crate) async fn seed(
    pool: &PgPool,
    config: &AppConfig,
    path: Option<&Path>,
) -> anyhow::Result<()> {
    let path = path.unwrap_or(&config.brands_path);
    let brands_file = hearsay_core::load_brands(path)?;
    let count = hearsay_db::seed_brands(pool, &brands_file.brands).await?;

    println!(
        "{}",
        serde_json::json!({ "seeded_brands": count, "path": path.display().to_string() })
    );
    Ok(())
}

pub(crate) async fn ingest_reddit(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let summary = hearsay_ingest::run_reddit_ingestion(pool, config).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

pub(crate) async fn ingest_hackernews(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let summary = hearsay_ingest::run_hackernews_ingestion(pool, config).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

pub(crate) async fn notify_email(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let summary = hearsay_notify::run_email_dispatch(pool, config).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

pub(crate) async fn notify_slack(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let summary = hearsay_notify::run_slack_dispatch(pool, config).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

pub(crate) async fn notify_telegram(pool: &PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let summary = hearsay_notify::run_telegram_dispatch(pool, config).await?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

pub(crate) async fn cleanup(pool: &PgPool, days: i64, dry_run: bool) -> anyhow::Result<()> {
    if days < 1 {
        anyhow::bail!("--days must be at least 1");
    }

    let before = hearsay_db::mention_stats(pool).await?;
    let outcome = hearsay_db::run_cleanup(pool, days, dry_run).await?;
    let after = hearsay_db::mention_stats(pool).await?;

    println!(
        "{}",
        serde_json::json!({
            "deleted": outcome.deleted,
            "dry_run": outcome.dry_run,
            "message": outcome.message,
            "total_before": before.total_mentions,
            "total_after": after.total_mentions,
        })
    );
    Ok(())
}

pub(crate) async fn cursor_get(pool: &PgPool, scope: &str) -> anyhow::Result<()> {
    let cursor = hearsay_db::get_cursor(pool, scope).await?;
    println!("{}", serde_json::json!({ "scope": scope, "cursor": cursor }));
    Ok(())
}

pub(crate) async fn cursor_set(pool: &PgPool, scope: &str, cursor: &str) -> anyhow::Result<()> {
    hearsay_db::set_cursor(pool, scope, cursor).await?;
    println!("{}", serde_json::json!({ "scope": scope, "cursor": cursor }));
    Ok(())
}

pub(crate) async fn cursor_clear(pool: &PgPool, scope: &str) -> anyhow::Result<()> {
    hearsay_db::clear_cursor(pool, scope).await?;
    println!("{}", serde_json::json!({ "scope": scope, "cursor": null }));
    Ok(())
}

pub(crate) async fn stats(pool: &PgPool) -> anyhow::Result<()> {
    let stats = hearsay_db::mention_stats(pool).await?;
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}
