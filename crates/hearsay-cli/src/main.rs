mod commands;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "hearsay-cli")]
#[command(about = "Hearsay brand-mention monitoring CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the brands YAML file and upsert brands and keywords.
    Seed {
        /// Path to the brands file; defaults to BRANDS_PATH from config.
        #[arg(long)]
        path: Option<std::path::PathBuf>,
    },
    /// Run one ingestion pass against an upstream source.
    Ingest {
        #[command(subcommand)]
        source: IngestSource,
    },
    /// Run one notification dispatch pass for a channel.
    Notify {
        #[command(subcommand)]
        channel: NotifyChannel,
    },
    /// Delete mentions older than the retention window.
    Cleanup {
        /// Retention window in days.
        #[arg(long, default_value_t = 30)]
        days: i64,
        /// Count what would be deleted without deleting it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Inspect or override a stored pagination cursor.
    Cursor {
        #[command(subcommand)]
        action: CursorAction,
    },
    /// Print aggregate mention statistics.
    Stats,
}

#[derive(Debug, Subcommand)]
enum IngestSource {
    Reddit,
    Hackernews,
}

#[derive(Debug, Subcommand)]
enum NotifyChannel {
    Email,
    Slack,
    Telegram,
}

#[derive(Debug, Subcommand)]
enum CursorAction {
    Get { scope: String },
    Set { scope: String, cursor: String },
    Clear { scope: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = hearsay_core::load_app_config()?;
    let pool = hearsay_db::PoolConfig::from_app_config(&config)
        .connect(&config.database_url)
        .await?;

    match cli.command {
        Commands::Seed { path } => commands::seed(&pool, &config, path.as_deref()).await,
        Commands::Ingest { source } => match source {
            IngestSource::Reddit => commands::ingest_reddit(&pool, &config).await,
            IngestSource::Hackernews => commands::ingest_hackernews(&pool, &config).await,
        },
        Commands::Notify { channel } => match channel {
            NotifyChannel::Email => commands::notify_email(&pool, &config).await,
            NotifyChannel::Slack => commands::notify_slack(&pool, &config).await,
            NotifyChannel::Telegram => commands::notify_telegram(&pool, &config).await,
        },
        Commands::Cleanup { days, dry_run } => commands::cleanup(&pool, days, dry_run).await,
        Commands::Cursor { action } => match action {
            CursorAction::Get { scope } => commands::cursor_get(&pool, &scope).await,
            CursorAction::Set { scope, cursor } => {
                commands::cursor_set(&pool, &scope, &cursor).await
            }
            CursorAction::Clear { scope } => commands::cursor_clear(&pool, &scope).await,
        },
        Commands::Stats => commands::stats(&pool).await,
    }
}
