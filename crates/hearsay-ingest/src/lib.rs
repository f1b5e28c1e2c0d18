//! Mention-ingestion pipeline for Hearsay.
//!
//! Collects brand-relevant content from Reddit and Hacker News behind
//! stored pagination cursors, matches it against each brand's keyword
//! list, scores sentiment with a lexicon, and persists deduplicated
//! mentions. Runs are idempotent: re-processing the same upstream window
//! creates zero duplicate mentions.

pub mod error;
pub mod matcher;
pub mod pipeline;
pub mod scorer;
pub mod snippet;
pub mod types;

mod retry;
mod sources;

pub use error::IngestError;
pub use matcher::match_keyword;
pub use pipeline::{
    run_hackernews_ingestion, run_reddit_ingestion, run_reddit_ingestion_with,
    HN_CURSOR_SCOPE, REDDIT_CURSOR_SCOPE,
};
pub use scorer::{analyze, Sentiment};
pub use snippet::extract_snippet;
pub use sources::{HnClient, RedditClient};
pub use types::{FetchPage, MentionCandidate, RunSummary};
