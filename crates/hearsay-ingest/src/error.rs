use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reddit API error: {0}")]
    Reddit(String),

    #[error("Hacker News search error: {0}")]
    HackerNews(String),

    /// The upstream rejected the stored pagination cursor. The caller
    /// clears the cursor and retries once from a fresh state.
    #[error("invalid or expired pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("missing configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Db(#[from] hearsay_db::DbError),
}
