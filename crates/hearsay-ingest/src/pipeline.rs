//! Ingestion orchestration: one run per source.
//!
//! A run loads the active brands and their keywords, pulls new upstream
//! content from behind the stored pagination cursor, matches and scores
//! each candidate, and persists deduplicated mentions. Per-keyword
//! failures are recorded in the [`RunSummary`] and never abort sibling
//! keywords or brands; only setup failures (database, credentials) fail
//! the run itself.

use std::time::{Duration, Instant};

use hearsay_core::{AppConfig, Platform};
use hearsay_db::{self as db, BrandRow, NewMention};
use sqlx::PgPool;

use crate::error::IngestError;
use crate::matcher::match_keyword;
use crate::retry::retry_with_backoff;
use crate::scorer::analyze;
use crate::snippet::extract_snippet;
use crate::sources::{HnClient, RedditClient};
use crate::types::{MentionCandidate, RunSummary};

/// Cursor scope for the shared Reddit listing position.
pub const REDDIT_CURSOR_SCOPE: &str = "reddit:global";
/// Cursor scope for the Hacker News search window (epoch seconds).
pub const HN_CURSOR_SCOPE: &str = "hackernews:global";

/// Run one Reddit ingestion pass.
///
/// The `/r/all/new` listing is fetched once per run behind the global
/// cursor; every brand's keywords are then matched against that shared
/// window locally.
///
/// # Errors
///
/// Returns an error only when setup fails (missing credentials, token
/// exchange, database). Fetch and persistence failures are recorded in
/// the returned summary instead.
pub async fn run_reddit_ingestion(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<RunSummary, IngestError> {
    let client = RedditClient::connect(config).await?;
    run_reddit_ingestion_with(pool, config, &client).await
}

/// Like [`run_reddit_ingestion`] but with a caller-supplied client, so
/// tests can point it at a mock server.
pub async fn run_reddit_ingestion_with(
    pool: &PgPool,
    config: &AppConfig,
    client: &RedditClient,
) -> Result<RunSummary, IngestError> {
    let started = Instant::now();
    let budget = Duration::from_secs(config.ingest_run_budget_secs);
    let mut summary = RunSummary::default();

    let brands = db::list_active_brands(pool).await?;
    if brands.is_empty() {
        tracing::info!("no active brands configured — skipping Reddit ingestion");
        return Ok(summary);
    }

    let window = match fetch_reddit_window(pool, config, client, started, budget).await {
        Ok(window) => window,
        Err(e) => {
            summary.record_error("reddit fetch", e);
            return Ok(summary);
        }
    };
    if let Some(e) = &window.fetch_error {
        summary.record_error("reddit fetch", e);
    }
    tracing::debug!(candidates = window.items.len(), "fetched Reddit window");

    let errors_before_persist = summary.errors.len();
    let mut window_processed = true;
    for brand in &brands {
        if started.elapsed() >= budget {
            tracing::warn!(
                brand = %brand.slug,
                "run budget exhausted — returning partial summary"
            );
            window_processed = false;
            break;
        }

        let keywords = match db::list_keywords_for_brand(pool, brand.id).await {
            Ok(rows) => rows,
            Err(e) => {
                summary.record_error(&format!("{}: load keywords", brand.slug), e);
                continue;
            }
        };
        summary.companies_processed += 1;
        summary.keywords_processed += keywords.len();
        let names: Vec<String> = keywords.into_iter().map(|k| k.name).collect();
        if names.is_empty() {
            continue;
        }

        let matched: Vec<(&MentionCandidate, &str)> = window
            .items
            .iter()
            .filter_map(|c| match_keyword(&searchable_text(c), &names).map(|kw| (c, kw)))
            .collect();
        if matched.is_empty() {
            continue;
        }

        persist_batch(pool, brand, Platform::Reddit, &matched, &mut summary).await;
    }

    // The cursor moves only once every matched item in the window has
    // landed. When a brand failed to persist or the budget cut the loop
    // short, the same window is fetched again next run and the
    // conditional insert skips whatever already made it in.
    if window_processed && summary.errors.len() == errors_before_persist {
        if let Some(next) = &window.next_cursor {
            db::set_cursor(pool, REDDIT_CURSOR_SCOPE, next).await?;
        }
    }

    tracing::info!(
        companies = summary.companies_processed,
        keywords = summary.keywords_processed,
        created = summary.mentions_created,
        duplicates = summary.duplicates_skipped,
        errors = summary.errors.len(),
        "Reddit ingestion run finished"
    );
    Ok(summary)
}

/// Run one Hacker News ingestion pass: two parallel tagged searches per
/// keyword against the public index, windowed by the stored epoch cursor.
///
/// # Errors
///
/// Returns an error only when setup fails; per-keyword search failures
/// are recorded in the returned summary.
pub async fn run_hackernews_ingestion(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<RunSummary, IngestError> {
    let started = Instant::now();
    let budget = Duration::from_secs(config.ingest_run_budget_secs);
    let mut summary = RunSummary::default();

    let client = HnClient::new(config)?;
    let brands = db::list_active_brands(pool).await?;
    if brands.is_empty() {
        tracing::info!("no active brands configured — skipping Hacker News ingestion");
        return Ok(summary);
    }

    let since = load_hn_cursor(pool).await?;
    let mut max_seen = since;
    let mut fetch_failed = false;
    let mut persist_failed = false;

    'brands: for brand in &brands {
        let keywords = match db::list_keywords_for_brand(pool, brand.id).await {
            Ok(rows) => rows,
            Err(e) => {
                summary.record_error(&format!("{}: load keywords", brand.slug), e);
                continue;
            }
        };
        summary.companies_processed += 1;

        for keyword in &keywords {
            if started.elapsed() >= budget {
                tracing::warn!(
                    brand = %brand.slug,
                    keyword = %keyword.name,
                    "run budget exhausted — returning partial summary"
                );
                break 'brands;
            }
            summary.keywords_processed += 1;

            let candidates = match retry_with_backoff(
                config.ingest_max_retries,
                config.ingest_retry_backoff_base_ms,
                || client.search_keyword(&keyword.name, since),
            )
            .await
            {
                Ok(items) => items,
                Err(e) => {
                    fetch_failed = true;
                    summary.record_error(&format!("{}/{}", brand.slug, keyword.name), e);
                    continue;
                }
            };

            let names = std::slice::from_ref(&keyword.name);
            for candidate in &candidates {
                if let Some(ts) = candidate.posted_at.map(|t| t.timestamp()) {
                    max_seen = Some(max_seen.map_or(ts, |m| m.max(ts)));
                }
                // Phrase search can return partial-word hits; re-check
                // with word-boundary semantics.
                let Some(matched) = match_keyword(&searchable_text(candidate), names) else {
                    continue;
                };
                if !persist_one(pool, brand, candidate, matched, &mut summary).await {
                    persist_failed = true;
                }
            }
        }
    }

    // The window only advances when every fetch and every persist
    // succeeded; a failed keyword or a mention that would not insert
    // gets the same window again next run.
    if !fetch_failed && !persist_failed {
        if let Some(ts) = max_seen.filter(|ts| Some(*ts) != since) {
            db::set_cursor(pool, HN_CURSOR_SCOPE, &ts.to_string()).await?;
        }
    }

    tracing::info!(
        companies = summary.companies_processed,
        keywords = summary.keywords_processed,
        created = summary.mentions_created,
        duplicates = summary.duplicates_skipped,
        errors = summary.errors.len(),
        "Hacker News ingestion run finished"
    );
    Ok(summary)
}

/// One run's worth of fetched Reddit pages.
struct RedditWindow {
    items: Vec<MentionCandidate>,
    /// Position after the last page actually fetched. Not written back
    /// until the window's matches have been persisted.
    next_cursor: Option<String>,
    /// A page-2+ fetch failure. The pages already in hand are still
    /// processed; the failed page falls into the next run's window.
    fetch_error: Option<IngestError>,
}

/// Fetch the Reddit window behind the stored cursor, clearing the cursor
/// and retrying once from a fresh state when the upstream rejects it.
async fn fetch_reddit_window(
    pool: &PgPool,
    config: &AppConfig,
    client: &RedditClient,
    started: Instant,
    budget: Duration,
) -> Result<RedditWindow, IngestError> {
    let cursor = db::get_cursor(pool, REDDIT_CURSOR_SCOPE).await?;
    match fetch_reddit_pages(config, client, cursor, started, budget).await {
        Err(IngestError::InvalidCursor(stale)) => {
            tracing::warn!(
                cursor = %stale,
                "stored Reddit cursor rejected upstream — clearing and retrying once"
            );
            db::clear_cursor(pool, REDDIT_CURSOR_SCOPE).await?;
            fetch_reddit_pages(config, client, None, started, budget).await
        }
        result => result,
    }
}

async fn fetch_reddit_pages(
    config: &AppConfig,
    client: &RedditClient,
    initial_cursor: Option<String>,
    started: Instant,
    budget: Duration,
) -> Result<RedditWindow, IngestError> {
    let mut window = RedditWindow {
        items: Vec::new(),
        next_cursor: None,
        fetch_error: None,
    };
    let mut cursor = initial_cursor;

    for page in 0..config.ingest_max_pages {
        if started.elapsed() >= budget {
            tracing::warn!(page, "run budget exhausted mid-fetch — keeping partial window");
            break;
        }

        let fetched = match retry_with_backoff(
            config.ingest_max_retries,
            config.ingest_retry_backoff_base_ms,
            || client.fetch_new(cursor.as_deref(), config.ingest_page_limit),
        )
        .await
        {
            Ok(fetched) => fetched,
            Err(e) if window.items.is_empty() => return Err(e),
            Err(e) => {
                tracing::warn!(
                    page,
                    error = %e,
                    "page fetch failed mid-window — processing the pages already in hand"
                );
                window.fetch_error = Some(e);
                break;
            }
        };
        window.items.extend(fetched.items);

        match fetched.next_cursor {
            Some(next) => {
                window.next_cursor = Some(next.clone());
                cursor = Some(next);
            }
            None => break,
        }
    }

    Ok(window)
}

/// Reads the Hacker News epoch cursor, clearing an unparseable value so
/// the run proceeds from a fresh window instead of failing.
async fn load_hn_cursor(pool: &PgPool) -> Result<Option<i64>, IngestError> {
    let Some(raw) = db::get_cursor(pool, HN_CURSOR_SCOPE).await? else {
        return Ok(None);
    };
    match raw.trim().parse::<i64>() {
        Ok(ts) => Ok(Some(ts)),
        Err(_) => {
            tracing::warn!(
                cursor = %raw,
                "stored Hacker News cursor is not an epoch timestamp — clearing"
            );
            db::clear_cursor(pool, HN_CURSOR_SCOPE).await?;
            Ok(None)
        }
    }
}

/// Persist a batch of matched candidates for one brand: one batched
/// existence query pre-filters known duplicates, then the storage-level
/// conditional insert arbitrates the rest.
async fn persist_batch(
    pool: &PgPool,
    brand: &BrandRow,
    platform: Platform,
    matched: &[(&MentionCandidate, &str)],
    summary: &mut RunSummary,
) {
    let ids: Vec<String> = matched
        .iter()
        .map(|(c, _)| c.upstream_item_id.clone())
        .collect();
    let existing = match db::existing_item_ids(pool, platform, &ids).await {
        Ok(set) => set,
        Err(e) => {
            summary.record_error(&format!("{}: existence check", brand.slug), e);
            return;
        }
    };

    for (candidate, keyword) in matched {
        if existing.contains(&candidate.upstream_item_id) {
            summary.duplicates_skipped += 1;
            continue;
        }
        insert_candidate(pool, brand, candidate, keyword, summary).await;
    }
}

/// Persist one Hacker News candidate with a per-item existence pre-check:
/// the story- and comment-tagged result sets can overlap within a run.
///
/// Returns `false` when the mention could not be persisted, so the
/// caller can hold the window cursor back and retry it next run.
async fn persist_one(
    pool: &PgPool,
    brand: &BrandRow,
    candidate: &MentionCandidate,
    keyword: &str,
    summary: &mut RunSummary,
) -> bool {
    match db::mention_exists(pool, candidate.platform, &candidate.upstream_item_id).await {
        Ok(true) => {
            summary.duplicates_skipped += 1;
            return true;
        }
        Ok(false) => {}
        Err(e) => {
            summary.record_error(&format!("{}: existence check", brand.slug), e);
            return false;
        }
    }
    insert_candidate(pool, brand, candidate, keyword, summary).await
}

async fn insert_candidate(
    pool: &PgPool,
    brand: &BrandRow,
    candidate: &MentionCandidate,
    keyword: &str,
    summary: &mut RunSummary,
) -> bool {
    let mention = build_mention(brand.id, candidate, keyword);
    match db::insert_mention_if_absent(pool, &mention).await {
        Ok(true) => {
            summary.mentions_created += 1;
            true
        }
        Ok(false) => {
            summary.duplicates_skipped += 1;
            true
        }
        Err(e) => {
            summary.record_error(
                &format!("{}/{}: insert {}", brand.slug, keyword, candidate.upstream_item_id),
                e,
            );
            false
        }
    }
}

/// Title plus content, so keywords appearing only in a title still match
/// and get highlighted in the snippet.
fn searchable_text(candidate: &MentionCandidate) -> String {
    match &candidate.title {
        Some(title) if *title != candidate.content => {
            format!("{title}\n{}", candidate.content)
        }
        _ => candidate.content.clone(),
    }
}

fn build_mention(brand_id: i64, candidate: &MentionCandidate, keyword: &str) -> NewMention {
    let text = searchable_text(candidate);
    let sentiment = analyze(&text);
    NewMention {
        brand_id,
        platform: candidate.platform,
        upstream_item_id: candidate.upstream_item_id.clone(),
        item_type: candidate.item_type,
        keyword_matched: keyword.to_owned(),
        title: candidate.title.clone(),
        content: candidate.content.clone(),
        snippet: extract_snippet(&text, keyword),
        author: candidate.author.clone(),
        url: candidate.url.clone(),
        permalink: candidate.permalink.clone(),
        upstream_score: candidate.score,
        num_comments: candidate.num_comments,
        sentiment_score: sentiment.score,
        sentiment_label: sentiment.label,
        posted_at: candidate.posted_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearsay_core::ItemType;

    fn candidate(title: Option<&str>, content: &str) -> MentionCandidate {
        MentionCandidate {
            platform: Platform::HackerNews,
            upstream_item_id: "1".to_owned(),
            item_type: ItemType::Story,
            title: title.map(str::to_owned),
            content: content.to_owned(),
            author: None,
            url: "https://news.ycombinator.com/item?id=1".to_owned(),
            permalink: None,
            score: 0,
            num_comments: 0,
            posted_at: None,
        }
    }

    #[test]
    fn searchable_text_prepends_distinct_title() {
        let c = candidate(Some("Acme launches"), "big release this week");
        assert_eq!(searchable_text(&c), "Acme launches\nbig release this week");
    }

    #[test]
    fn searchable_text_skips_title_identical_to_content() {
        let c = candidate(Some("Acme launches"), "Acme launches");
        assert_eq!(searchable_text(&c), "Acme launches");
    }

    #[test]
    fn build_mention_scores_and_highlights() {
        let c = candidate(Some("Acme launches"), "Acme is great");
        let mention = build_mention(7, &c, "Acme");
        assert_eq!(mention.brand_id, 7);
        assert_eq!(mention.keyword_matched, "Acme");
        assert!(mention.sentiment_score > 0.0);
        assert!(mention.snippet.contains("**Acme**"));
    }
}
