//! Dispatch-loop integration tests: live Postgres via `sqlx::test`,
//! provider APIs mocked with wiremock.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use hearsay_core::{
    AppConfig, BrandConfig, ChannelConfig, Environment, ItemType, KeywordConfig,
    NotificationsConfig, Platform, SentimentLabel,
};
use hearsay_db::{self as db, NewMention};
use hearsay_notify::{run_email_dispatch, run_slack_dispatch, run_telegram_dispatch};
use sqlx::PgPool;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(email_base: &str, telegram_base: &str) -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        brands_path: PathBuf::from("./config/brands.yaml"),
        db_max_connections: 5,
        db_min_connections: 1,
        db_acquire_timeout_secs: 5,
        reddit_client_id: None,
        reddit_client_secret: None,
        reddit_user_agent: "hearsay-test/0.1".to_string(),
        reddit_proxy_url: None,
        hn_base_url: "http://unused.example".to_string(),
        ingest_page_limit: 25,
        ingest_max_pages: 2,
        ingest_request_timeout_secs: 5,
        ingest_run_budget_secs: 50,
        ingest_max_retries: 0,
        ingest_retry_backoff_base_ms: 0,
        dispatch_run_cap: 5,
        dispatch_batch_size: 2,
        dispatch_batch_delay_ms: 0,
        dispatch_run_budget_secs: 50,
        email_api_base_url: email_base.to_string(),
        email_api_key: Some("test-email-key".to_string()),
        email_from: "Hearsay <mentions@hearsay.dev>".to_string(),
        telegram_api_base_url: telegram_base.to_string(),
        telegram_bot_token: Some("42:test-token".to_string()),
    }
}

fn channel(destination: &str) -> ChannelConfig {
    ChannelConfig {
        enabled: true,
        destination: Some(destination.to_string()),
    }
}

async fn seed_brand(pool: &PgPool, notifications: NotificationsConfig) -> i64 {
    let brand = BrandConfig {
        name: "Acme".to_string(),
        keywords: vec![KeywordConfig {
            name: "Acme".to_string(),
            kind: "brand".to_string(),
        }],
        notifications,
    };
    db::seed_brands(pool, std::slice::from_ref(&brand))
        .await
        .expect("seeding should succeed");
    db::get_brand_by_slug(pool, "acme")
        .await
        .expect("lookup should succeed")
        .expect("brand should exist")
        .id
}

async fn insert_mention(pool: &PgPool, brand_id: i64, item_id: &str) {
    let mention = NewMention {
        brand_id,
        platform: Platform::Reddit,
        upstream_item_id: item_id.to_string(),
        item_type: ItemType::Post,
        keyword_matched: "Acme".to_string(),
        title: Some("Acme in production".to_string()),
        content: "Acme is great".to_string(),
        snippet: "**Acme** is great".to_string(),
        author: None,
        url: "https://example.com/post".to_string(),
        permalink: None,
        upstream_score: 0,
        num_comments: 0,
        sentiment_score: 3.0,
        sentiment_label: SentimentLabel::Positive,
        posted_at: None,
    };
    let inserted = db::insert_mention_if_absent(pool, &mention)
        .await
        .expect("insert should succeed");
    assert!(inserted, "test mention should be new");
}

#[sqlx::test(migrations = "../../migrations")]
async fn slack_dispatch_sends_and_marks_sent(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string_contains("*Acme* is great"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let brand_id = seed_brand(
        &pool,
        NotificationsConfig {
            slack: channel(&format!("{}/hook", server.uri())),
            ..NotificationsConfig::default()
        },
    )
    .await;
    insert_mention(&pool, brand_id, "t3_one").await;

    let config = test_config("http://unused.example", "http://unused.example");
    let summary = run_slack_dispatch(&pool, &config)
        .await
        .expect("dispatch should succeed");

    assert_eq!(summary.total, 1);
    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.remaining, 0);

    let rows = db::list_recent_mentions(&pool, None, 10)
        .await
        .expect("listing should succeed");
    assert!(rows[0].slack_sent);
    assert!(rows[0].slack_sent_at.is_some());
    assert!(!rows[0].email_sent, "channel sent-states are independent");
    assert!(!rows[0].telegram_sent);
}

#[sqlx::test(migrations = "../../migrations")]
async fn failed_send_still_marks_sent(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let brand_id = seed_brand(
        &pool,
        NotificationsConfig {
            slack: channel(&format!("{}/hook", server.uri())),
            ..NotificationsConfig::default()
        },
    )
    .await;
    insert_mention(&pool, brand_id, "t3_one").await;

    let config = test_config("http://unused.example", "http://unused.example");
    let summary = run_slack_dispatch(&pool, &config)
        .await
        .expect("a provider failure must not fail the run");
    assert_eq!(summary.total, 1);
    assert_eq!(summary.success, 0);
    assert_eq!(summary.failed, 1);

    let rows = db::list_recent_mentions(&pool, None, 10)
        .await
        .expect("listing should succeed");
    assert!(
        rows[0].slack_sent,
        "poison-pill policy: failed sends are still marked sent"
    );

    // Nothing left to pick up: the failed mention never comes back.
    let second = run_slack_dispatch(&pool, &config)
        .await
        .expect("dispatch should succeed");
    assert_eq!(second.total, 0);
    assert_eq!(second.remaining, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn telegram_chat_id_with_colon_is_a_counted_failure(pool: PgPool) {
    let server = MockServer::start().await;
    // The API must never be called for an invalid chat id.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let brand_id = seed_brand(
        &pool,
        NotificationsConfig {
            telegram: channel("123456:ABC-DEF"),
            ..NotificationsConfig::default()
        },
    )
    .await;
    insert_mention(&pool, brand_id, "t3_one").await;

    let config = test_config("http://unused.example", &server.uri());
    let summary = run_telegram_dispatch(&pool, &config)
        .await
        .expect("an invalid destination must not fail the run");

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.success, 0);

    let rows = db::list_recent_mentions(&pool, None, 10)
        .await
        .expect("listing should succeed");
    assert!(rows[0].telegram_sent, "invalid destination is still marked sent");
}

#[sqlx::test(migrations = "../../migrations")]
async fn run_cap_leaves_a_remainder_for_the_next_run(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(5)
        .mount(&server)
        .await;

    let brand_id = seed_brand(
        &pool,
        NotificationsConfig {
            slack: channel(&format!("{}/hook", server.uri())),
            ..NotificationsConfig::default()
        },
    )
    .await;
    for i in 0..7 {
        insert_mention(&pool, brand_id, &format!("t3_{i}")).await;
    }

    let config = test_config("http://unused.example", "http://unused.example");
    let summary = run_slack_dispatch(&pool, &config)
        .await
        .expect("dispatch should succeed");

    assert_eq!(summary.total, 5, "per-run cap");
    assert_eq!(summary.success, 5);
    assert_eq!(summary.remaining, 2, "backlog continues next run");
}

#[sqlx::test(migrations = "../../migrations")]
async fn email_dispatch_posts_to_the_provider(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(body_string_contains("ops@acme.example"))
        .and(body_string_contains("Sentiment: positive"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let brand_id = seed_brand(
        &pool,
        NotificationsConfig {
            email: channel("ops@acme.example"),
            ..NotificationsConfig::default()
        },
    )
    .await;
    insert_mention(&pool, brand_id, "t3_one").await;

    let config = test_config(&server.uri(), "http://unused.example");
    let summary = run_email_dispatch(&pool, &config)
        .await
        .expect("dispatch should succeed");

    assert_eq!(summary.success, 1);

    let rows = db::list_recent_mentions(&pool, None, 10)
        .await
        .expect("listing should succeed");
    assert!(rows[0].email_sent);
}

#[sqlx::test(migrations = "../../migrations")]
async fn disabled_channel_has_nothing_pending(pool: PgPool) {
    let brand_id = seed_brand(&pool, NotificationsConfig::default()).await;
    insert_mention(&pool, brand_id, "t3_one").await;

    let config = test_config("http://unused.example", "http://unused.example");
    let summary = run_telegram_dispatch(&pool, &config)
        .await
        .expect("dispatch should succeed");
    assert_eq!(summary.total, 0);
    assert_eq!(summary.remaining, 0);
}
