use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub brands_path: PathBuf,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    // Upstream source adapters.
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    pub reddit_proxy_url: Option<String>,
    pub hn_base_url: String,

    // Ingestion run tuning.
    pub ingest_page_limit: usize,
    pub ingest_max_pages: usize,
    pub ingest_request_timeout_secs: u64,
    pub ingest_run_budget_secs: u64,
    pub ingest_max_retries: u32,
    pub ingest_retry_backoff_base_ms: u64,

    // Notification dispatch tuning.
    pub dispatch_run_cap: i64,
    pub dispatch_batch_size: usize,
    pub dispatch_batch_delay_ms: u64,
    pub dispatch_run_budget_secs: u64,

    // Channel provider credentials.
    pub email_api_base_url: String,
    pub email_api_key: Option<String>,
    pub email_from: String,
    pub telegram_api_base_url: String,
    pub telegram_bot_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("brands_path", &self.brands_path)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "reddit_client_id",
                &self.reddit_client_id.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "reddit_client_secret",
                &self.reddit_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("reddit_user_agent", &self.reddit_user_agent)
            .field("reddit_proxy_url", &self.reddit_proxy_url)
            .field("hn_base_url", &self.hn_base_url)
            .field("ingest_page_limit", &self.ingest_page_limit)
            .field("ingest_max_pages", &self.ingest_max_pages)
            .field(
                "ingest_request_timeout_secs",
                &self.ingest_request_timeout_secs,
            )
            .field("ingest_run_budget_secs", &self.ingest_run_budget_secs)
            .field("ingest_max_retries", &self.ingest_max_retries)
            .field(
                "ingest_retry_backoff_base_ms",
                &self.ingest_retry_backoff_base_ms,
            )
            .field("dispatch_run_cap", &self.dispatch_run_cap)
            .field("dispatch_batch_size", &self.dispatch_batch_size)
            .field("dispatch_batch_delay_ms", &self.dispatch_batch_delay_ms)
            .field("dispatch_run_budget_secs", &self.dispatch_run_budget_secs)
            .field("email_api_base_url", &self.email_api_base_url)
            .field(
                "email_api_key",
                &self.email_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("email_from", &self.email_from)
            .field("telegram_api_base_url", &self.telegram_api_base_url)
            .field(
                "telegram_bot_token",
                &self.telegram_bot_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
