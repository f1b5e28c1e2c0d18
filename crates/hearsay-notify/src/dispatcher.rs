//! The shared dispatch loop, generic over a [`ChannelSender`].

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use hearsay_core::AppConfig;
use hearsay_db as db;
use sqlx::PgPool;

use crate::channels::{ChannelSender, EmailSender, SlackSender, TelegramSender};
use crate::error::NotifyError;
use crate::types::DispatchSummary;

/// How many failures for the same mention within a run trigger an
/// operator-facing warning.
const FAILURE_WARN_THRESHOLD: u32 = 3;

/// Run one dispatch pass for `sender`'s channel.
///
/// Fetches pending mentions up to the per-run cap, sends them in fixed
/// batches with a delay in between, and marks every processed mention
/// sent regardless of the send outcome. Only database failures (pending
/// fetch, flag write) propagate; without the flag write the at-most-once
/// guarantee is lost.
///
/// # Errors
///
/// Returns [`NotifyError::Db`] when pending mentions cannot be read or a
/// sent flag cannot be written.
pub async fn run_dispatch<S: ChannelSender>(
    pool: &PgPool,
    config: &AppConfig,
    sender: &S,
) -> Result<DispatchSummary, NotifyError> {
    let started = Instant::now();
    let budget = Duration::from_secs(config.dispatch_run_budget_secs);
    let channel = sender.channel();

    let total_pending = db::count_pending_for_channel(pool, channel).await?;
    let pending = db::pending_for_channel(pool, channel, config.dispatch_run_cap).await?;
    tracing::info!(
        channel = channel.as_str(),
        total_pending,
        claimed = pending.len(),
        "starting dispatch run"
    );

    let mut success = 0usize;
    let mut failed = 0usize;
    let mut processed = 0usize;
    let mut failure_counts: HashMap<i64, u32> = HashMap::new();

    'batches: for batch in pending.chunks(config.dispatch_batch_size.max(1)) {
        for mention in batch {
            if started.elapsed() >= budget {
                tracing::warn!(
                    channel = channel.as_str(),
                    processed,
                    "run budget exhausted — leaving the rest for the next run"
                );
                break 'batches;
            }

            match sender.send(mention).await {
                Ok(()) => success += 1,
                Err(e) => {
                    failed += 1;
                    let count = failure_counts.entry(mention.id).or_insert(0);
                    *count += 1;
                    tracing::warn!(
                        channel = channel.as_str(),
                        mention_id = mention.id,
                        brand = %mention.brand_name,
                        error = %e,
                        "notification send failed — marking sent anyway"
                    );
                    if *count >= FAILURE_WARN_THRESHOLD {
                        tracing::warn!(
                            channel = channel.as_str(),
                            mention_id = mention.id,
                            failures = *count,
                            "repeated failures for one mention — check the channel configuration"
                        );
                    }
                }
            }

            // Poison-pill policy: flip the sent flag whether or not the
            // send succeeded, so a bad destination cannot block the queue.
            db::mark_channel_sent(pool, mention.id, channel).await?;
            processed += 1;
        }

        if processed < pending.len() {
            tokio::time::sleep(Duration::from_millis(config.dispatch_batch_delay_ms)).await;
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    let remaining = (total_pending - processed as i64).max(0);
    let summary = DispatchSummary {
        total: processed,
        success,
        failed,
        remaining,
        timestamp: Utc::now(),
    };
    tracing::info!(
        channel = channel.as_str(),
        total = summary.total,
        success = summary.success,
        failed = summary.failed,
        remaining = summary.remaining,
        "dispatch run finished"
    );
    Ok(summary)
}

/// # Errors
///
/// Returns [`NotifyError::Config`] when the email provider is not
/// configured, or any error from [`run_dispatch`].
pub async fn run_email_dispatch(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<DispatchSummary, NotifyError> {
    let sender = EmailSender::new(config)?;
    run_dispatch(pool, config, &sender).await
}

/// # Errors
///
/// Returns any error from [`run_dispatch`].
pub async fn run_slack_dispatch(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<DispatchSummary, NotifyError> {
    let sender = SlackSender::new();
    run_dispatch(pool, config, &sender).await
}

/// # Errors
///
/// Returns [`NotifyError::Config`] when no bot token is configured, or
/// any error from [`run_dispatch`].
pub async fn run_telegram_dispatch(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<DispatchSummary, NotifyError> {
    let sender = TelegramSender::new(config)?;
    run_dispatch(pool, config, &sender).await
}
