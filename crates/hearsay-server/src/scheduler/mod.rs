//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring ingestion, dispatch, and cleanup jobs.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use hearsay_core::AppConfig;

/// Mentions older than this are deleted by the weekly cleanup job.
const CLEANUP_DAYS_TO_KEEP: i64 = 30;

/// Builds and starts the background job scheduler.
///
/// Registers all recurring jobs and starts the scheduler. Returns the
/// running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process — dropping it shuts down all jobs.
///
/// Jobs never panic: every failure is logged and the job simply runs
/// again on its next tick. Overlapping runs are tolerated because all
/// writes are idempotent.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let pool = Arc::new(pool);

    // Ingestion runs twice an hour, the two sources offset so they never
    // contend for the run budget at the same instant.
    register_job(
        &scheduler,
        "0 5,35 * * * *",
        "reddit ingestion",
        Arc::clone(&pool),
        Arc::clone(&config),
        |pool, config| async move {
            match hearsay_ingest::run_reddit_ingestion(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    created = summary.mentions_created,
                    duplicates = summary.duplicates_skipped,
                    errors = summary.errors.len(),
                    "scheduler: reddit ingestion complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: reddit ingestion failed"),
            }
        },
    )
    .await?;

    register_job(
        &scheduler,
        "0 20,50 * * * *",
        "hacker news ingestion",
        Arc::clone(&pool),
        Arc::clone(&config),
        |pool, config| async move {
            match hearsay_ingest::run_hackernews_ingestion(&pool, &config).await {
                Ok(summary) => tracing::info!(
                    created = summary.mentions_created,
                    duplicates = summary.duplicates_skipped,
                    errors = summary.errors.len(),
                    "scheduler: hacker news ingestion complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: hacker news ingestion failed"),
            }
        },
    )
    .await?;

    // Dispatchers run every ten minutes, staggered by channel.
    register_job(
        &scheduler,
        "0 2-59/10 * * * *",
        "email dispatch",
        Arc::clone(&pool),
        Arc::clone(&config),
        |pool, config| async move {
            log_dispatch("email", hearsay_notify::run_email_dispatch(&pool, &config).await);
        },
    )
    .await?;

    register_job(
        &scheduler,
        "0 5-59/10 * * * *",
        "slack dispatch",
        Arc::clone(&pool),
        Arc::clone(&config),
        |pool, config| async move {
            log_dispatch("slack", hearsay_notify::run_slack_dispatch(&pool, &config).await);
        },
    )
    .await?;

    register_job(
        &scheduler,
        "0 8-59/10 * * * *",
        "telegram dispatch",
        Arc::clone(&pool),
        Arc::clone(&config),
        |pool, config| async move {
            log_dispatch(
                "telegram",
                hearsay_notify::run_telegram_dispatch(&pool, &config).await,
            );
        },
    )
    .await?;

    // Weekly retention cleanup, Sunday 03:00 UTC.
    register_job(
        &scheduler,
        "0 0 3 * * SUN",
        "mention cleanup",
        Arc::clone(&pool),
        config,
        |pool, _config| async move {
            match hearsay_db::run_cleanup(&pool, CLEANUP_DAYS_TO_KEEP, false).await {
                Ok(outcome) => tracing::info!(
                    deleted = outcome.deleted,
                    "scheduler: weekly cleanup complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: weekly cleanup failed"),
            }
        },
    )
    .await?;

    scheduler.start().await?;
    Ok(scheduler)
}

fn log_dispatch(
    channel: &str,
    result: Result<hearsay_notify::DispatchSummary, hearsay_notify::NotifyError>,
) {
    match result {
        Ok(summary) => tracing::info!(
            channel,
            total = summary.total,
            success = summary.success,
            failed = summary.failed,
            remaining = summary.remaining,
            "scheduler: dispatch complete"
        ),
        Err(e) => tracing::error!(channel, error = %e, "scheduler: dispatch failed"),
    }
}

/// Register one cron job that clones the pool and config into each tick.
async fn register_job<F, Fut>(
    scheduler: &JobScheduler,
    cron: &str,
    name: &'static str,
    pool: Arc<PgPool>,
    config: Arc<AppConfig>,
    run: F,
) -> Result<(), JobSchedulerError>
where
    F: Fn(Arc<PgPool>, Arc<AppConfig>) -> Fut + Send + Sync + Clone + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);
        let run = run.clone();

        Box::pin(async move {
            tracing::info!(job = name, "scheduler: starting run");
            run(pool, config).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
