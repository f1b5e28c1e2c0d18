//! Offline unit tests for hearsay-db pool configuration and row types.
//! These tests do not require a live database connection.

use hearsay_core::{AppConfig, Environment};
use hearsay_db::{MentionRow, PendingMentionRow, PoolConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        brands_path: PathBuf::from("./config/brands.yaml"),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        reddit_client_id: None,
        reddit_client_secret: None,
        reddit_user_agent: "ua".to_string(),
        reddit_proxy_url: None,
        hn_base_url: "https://hn.algolia.com/api/v1".to_string(),
        ingest_page_limit: 100,
        ingest_max_pages: 2,
        ingest_request_timeout_secs: 30,
        ingest_run_budget_secs: 50,
        ingest_max_retries: 2,
        ingest_retry_backoff_base_ms: 1_000,
        dispatch_run_cap: 50,
        dispatch_batch_size: 5,
        dispatch_batch_delay_ms: 1_000,
        dispatch_run_budget_secs: 50,
        email_api_base_url: "https://api.resend.com".to_string(),
        email_api_key: None,
        email_from: "Hearsay <mentions@hearsay.dev>".to_string(),
        telegram_api_base_url: "https://api.telegram.org".to_string(),
        telegram_bot_token: None,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`MentionRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn mention_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = MentionRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        brand_id: 7_i64,
        platform: "hackernews".to_string(),
        upstream_item_id: "123".to_string(),
        item_type: "story".to_string(),
        keyword_matched: "Acme".to_string(),
        title: Some("Acme launches".to_string()),
        content: "Acme launches".to_string(),
        snippet: "**Acme** launches".to_string(),
        author: None,
        url: "https://news.ycombinator.com/item?id=123".to_string(),
        permalink: None,
        upstream_score: 10_i32,
        num_comments: 0_i32,
        sentiment_score: 0.0_f64,
        sentiment_label: "neutral".to_string(),
        is_processed: true,
        unread: true,
        email_sent: false,
        email_sent_at: None,
        slack_sent: false,
        slack_sent_at: None,
        telegram_sent: false,
        telegram_sent_at: None,
        posted_at: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.platform, "hackernews");
    assert_eq!(row.upstream_item_id, "123");
    assert!(row.unread, "new mentions default to unread");
    assert!(!row.email_sent && !row.slack_sent && !row.telegram_sent);
}

#[test]
fn pending_mention_row_has_expected_fields() {
    let row = PendingMentionRow {
        id: 9_i64,
        brand_id: 7_i64,
        brand_name: "Acme".to_string(),
        destination: "https://hooks.slack.com/services/T/B/X".to_string(),
        platform: "reddit".to_string(),
        item_type: "post".to_string(),
        keyword_matched: "Acme".to_string(),
        title: None,
        snippet: "**Acme** is great".to_string(),
        sentiment_label: "positive".to_string(),
        url: "https://reddit.com/r/all/comments/x".to_string(),
    };

    assert_eq!(row.brand_name, "Acme");
    assert!(row.destination.starts_with("https://hooks.slack.com/"));
}
