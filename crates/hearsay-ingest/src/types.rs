use chrono::{DateTime, Utc};
use hearsay_core::{ItemType, Platform};
use serde::Serialize;

/// A normalized piece of upstream content, produced by a source adapter.
///
/// Every field is validated/defaulted at the adapter boundary — raw
/// upstream JSON never escapes the adapters. Not persisted directly; the
/// pipeline turns matched candidates into mentions.
#[derive(Debug, Clone)]
pub struct MentionCandidate {
    pub platform: Platform,
    pub upstream_item_id: String,
    pub item_type: ItemType,
    pub title: Option<String>,
    /// Guaranteed non-empty by the adapter's field fallback chain.
    pub content: String,
    pub author: Option<String>,
    pub url: String,
    pub permalink: Option<String>,
    pub score: i32,
    pub num_comments: i32,
    pub posted_at: Option<DateTime<Utc>>,
}

/// One fetched window of upstream results plus the cursor for the next.
#[derive(Debug, Clone)]
pub struct FetchPage {
    pub items: Vec<MentionCandidate>,
    /// `None` when the upstream stream is exhausted; the stored cursor
    /// is left untouched in that case.
    pub next_cursor: Option<String>,
}

/// Aggregate result of one ingestion run.
///
/// Per-keyword failures are accumulated in `errors`; the run itself only
/// fails when setup (config, database) fails before any work begins.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub companies_processed: usize,
    pub keywords_processed: usize,
    pub mentions_created: usize,
    pub duplicates_skipped: usize,
    pub errors: Vec<String>,
}

impl RunSummary {
    pub(crate) fn record_error(&mut self, context: &str, error: impl std::fmt::Display) {
        tracing::warn!(context, error = %error, "ingestion step failed");
        self.errors.push(format!("{context}: {error}"));
    }
}
