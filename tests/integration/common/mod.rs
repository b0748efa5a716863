//! Common test utilities and fixtures for integration tests
//!
//! - In-memory application wired with mock Slack collaborators
//! - PostgreSQL application for opt-in store tests
//! - Game and team fixtures

#![allow(dead_code)]

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use gamebot_common::{CursorCodec, Paginator};
use gamebot_slack::mock::{MockBotService, MockOAuthExchange};
use gamebot_slack::{BotCredentials, OAuthAccess};
use gamebot_teams::{Game, InMemoryStore, Team, TeamsRepositories, TeamsState};
use sqlx::PgPool;
use uuid::Uuid;

static INIT: Once = Once::new();

pub const TEST_CURSOR_SECRET: &str = "integration-cursor-secret-0123456789";

/// Test environment configuration
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub database_url: Option<String>,
}

impl TestConfig {
    pub fn from_env() -> Self {
        INIT.call_once(|| {
            dotenvy::from_filename(".env.test").ok();
            dotenvy::dotenv().ok();
        });

        Self {
            database_url: env::var("TEST_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .ok(),
        }
    }
}

/// Application over the in-memory store with mock Slack collaborators
pub struct MemoryApp {
    pub state: TeamsState,
    pub store: InMemoryStore,
    pub slack: MockOAuthExchange,
    pub bots: MockBotService,
}

impl MemoryApp {
    pub fn new() -> Self {
        Self::with_page_size(10)
    }

    pub fn with_page_size(default_page_size: usize) -> Self {
        let store = InMemoryStore::new();
        let slack = MockOAuthExchange::new();
        let bots = MockBotService::new();

        let state = TeamsState {
            repos: TeamsRepositories::in_memory(store.clone()),
            slack: Arc::new(slack.clone()),
            bots: Arc::new(bots.clone()),
            paginator: Paginator::new(CursorCodec::new(TEST_CURSOR_SECRET), default_page_size),
        };

        Self {
            state,
            store,
            slack,
            bots,
        }
    }

    pub fn add_game(&self, name: &str, aliases: &[&str]) -> Game {
        self.store
            .insert_game(game(name, aliases))
            .expect("game fixture should insert")
    }

    /// Seed a team that is visible through the API
    pub fn add_api_team(&self, game: &Game, team_id: &str, active: bool) -> Team {
        let mut team = team(game, team_id, &format!("xoxb-{}", team_id));
        team.active = active;
        team.api = true;
        self.store
            .insert_team(team)
            .expect("team fixture should insert")
    }
}

/// Application over PostgreSQL, when a database is configured
pub struct PgApp {
    pub state: TeamsState,
    pub pool: PgPool,
    pub bots: MockBotService,
    pub slack: MockOAuthExchange,
}

impl PgApp {
    /// Connect and migrate, or `None` when no database is configured
    pub async fn connect() -> Result<Option<Self>> {
        let Some(url) = TestConfig::from_env().database_url else {
            return Ok(None);
        };

        let pool = PgPool::connect(&url).await?;
        gamebot_app::run_migrations(&pool).await?;

        let slack = MockOAuthExchange::new();
        let bots = MockBotService::new();
        let state = TeamsState {
            repos: TeamsRepositories::postgres(pool.clone()),
            slack: Arc::new(slack.clone()),
            bots: Arc::new(bots.clone()),
            paginator: Paginator::new(CursorCodec::new(TEST_CURSOR_SECRET), 10),
        };

        Ok(Some(Self {
            state,
            pool,
            bots,
            slack,
        }))
    }

    /// Insert a game with a unique name
    pub async fn add_game(&self, prefix: &str) -> Result<Game> {
        let game = game(&format!("{}-{}", prefix, Uuid::new_v4().simple()), &["bot"]);
        sqlx::query(
            r#"
            INSERT INTO games (id, name, client_id, client_secret, aliases, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(game.id)
        .bind(&game.name)
        .bind(&game.client_id)
        .bind(&game.client_secret)
        .bind(&game.aliases)
        .bind(game.created_at)
        .bind(game.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(game)
    }

    /// Expose a team through the API
    pub async fn publish(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE teams SET api = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE teams SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn cleanup(&self, game: &Game) -> Result<()> {
        sqlx::query("DELETE FROM teams WHERE game_id = $1")
            .bind(game.id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM games WHERE id = $1")
            .bind(game.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

pub fn game(name: &str, aliases: &[&str]) -> Game {
    Game::new(
        name.to_string(),
        format!("{}-client-id", name),
        format!("{}-client-secret", name),
        aliases.iter().map(|alias| alias.to_string()).collect(),
    )
    .expect("game fixture should be valid")
}

pub fn grant(team_id: &str, team_name: &str, token: &str) -> OAuthAccess {
    OAuthAccess {
        team_id: team_id.to_string(),
        team_name: team_name.to_string(),
        bot: BotCredentials {
            bot_user_id: Some(format!("U{}", team_id)),
            bot_access_token: token.to_string(),
        },
    }
}

pub fn team(game: &Game, team_id: &str, token: &str) -> Team {
    Team::new(game, &grant(team_id, &format!("{} workspace", team_id), token))
}
