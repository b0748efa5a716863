// Gamebot - Local Development Runner
//
// Runs migrations, then drains the bot-start queue until shutdown. The teams
// operations are library calls with no transport here.

use sqlx::PgPool;
use tokio::signal;
use tracing::{error, info};

use gamebot_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    gamebot_app::init_tracing(&config)?;

    info!("Starting Gamebot local runner");

    let pool = PgPool::connect(&config.database_url).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        anyhow::anyhow!("Database connection failed: {}", e)
    })?;

    info!("Database connection established");

    gamebot_app::run_migrations(&pool).await?;

    let gamebot_app::App {
        teams: _teams,
        mut bot_starts,
    } = gamebot_app::create_app(&config, pool)?;

    let runtime = async {
        while let Some(team) = bot_starts.recv().await {
            info!(id = %team.id, team_id = %team.team_id, name = %team.name, "Starting bot");
        }
    };

    tokio::select! {
        _ = runtime => {
            info!("Bot queue closed");
        },
        _ = shutdown_signal() => {},
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
