use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider accepted the request but rejected the message.
    #[error("provider rejected the message: {0}")]
    Provider(String),

    /// The configured destination cannot possibly work (e.g. a Telegram
    /// chat id that is really a bot token). Treated as a hard per-mention
    /// failure; the mention is still marked sent.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("missing configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Db(#[from] hearsay_db::DbError),
}
