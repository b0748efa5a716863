//! Gamebot application composition root
//!
//! Wires the Teams domain to its stores and Slack collaborators from `Config`.

use gamebot_common::config::{Config, LogFormat};
use gamebot_common::{CursorCodec, Paginator};
use gamebot_slack::launcher::BotLauncher;
use gamebot_slack::{BotTeam, OAuthExchangeFactory, SlackConfig};
use gamebot_teams::{TeamsRepositories, TeamsState};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Number of pending bot starts the runtime may lag behind by
pub const BOT_QUEUE_CAPACITY: usize = 64;

/// Composed application
pub struct App {
    pub teams: TeamsState,
    /// Teams whose bots should be started, in registration order
    pub bot_starts: mpsc::Receiver<BotTeam>,
}

/// Install the global tracing subscriber
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.rust_log)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match config.log_format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Create the application state backed by `pool`
pub fn create_app(config: &Config, pool: PgPool) -> anyhow::Result<App> {
    create_app_with(config, TeamsRepositories::postgres(pool))
}

/// Create the application state over the given repositories
pub fn create_app_with(config: &Config, repos: TeamsRepositories) -> anyhow::Result<App> {
    let timeout = Duration::from_secs(config.slack_timeout_secs);

    let slack = OAuthExchangeFactory::create(SlackConfig {
        provider: config.slack_provider.clone(),
        api_url: config.slack_api_url.clone(),
        timeout,
    })?;

    let (launcher, bot_starts) = BotLauncher::channel(BOT_QUEUE_CAPACITY, timeout);

    let teams = TeamsState {
        repos,
        slack: Arc::from(slack),
        bots: Arc::new(launcher),
        paginator: Paginator::new(
            CursorCodec::new(&config.cursor_secret),
            config.default_page_size,
        ),
    };

    tracing::info!(
        slack_provider = %config.slack_provider,
        default_page_size = config.default_page_size,
        "Application composed"
    );

    Ok(App { teams, bot_starts })
}
