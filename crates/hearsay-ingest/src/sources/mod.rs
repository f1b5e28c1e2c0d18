//! Upstream source adapters.
//!
//! Each adapter fetches new content from one platform and maps the
//! upstream JSON into [`crate::types::MentionCandidate`], validating and
//! defaulting every field. Raw upstream payloads never leave this module.

mod hackernews;
mod reddit;
mod reddit_helpers;

pub use hackernews::HnClient;
pub use reddit::RedditClient;
