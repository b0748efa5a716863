//! Gamebot Slack Integration
//!
//! Provides the two Slack-facing collaborators of team registration:
//! - OAuth code exchange against the Slack Web API (`oauth.access`)
//! - Launching the bot runtime for a registered team
//!
//! Each has a mock implementation for testing and development.

pub mod client;
pub mod launcher;
pub mod mock;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("Slack configuration error: {0}")]
    Configuration(String),

    #[error("Slack request error: {0}")]
    Request(String),

    #[error("Slack response error: {0}")]
    Response(String),

    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Bot launch error: {0}")]
    Launch(String),
}

/// Bot credentials granted by an OAuth exchange
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotCredentials {
    #[serde(default)]
    pub bot_user_id: Option<String>,
    pub bot_access_token: String,
}

impl std::fmt::Debug for BotCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotCredentials")
            .field("bot_user_id", &self.bot_user_id)
            .field("bot_access_token", &"[REDACTED]")
            .finish()
    }
}

/// Result of a successful `oauth.access` exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthAccess {
    /// Slack workspace identifier
    pub team_id: String,
    /// Slack workspace display name
    pub team_name: String,
    pub bot: BotCredentials,
}

/// Team handed to the bot runtime
#[derive(Clone, PartialEq, Eq)]
pub struct BotTeam {
    pub id: Uuid,
    pub team_id: String,
    pub name: String,
    pub token: String,
}

impl std::fmt::Debug for BotTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotTeam")
            .field("id", &self.id)
            .field("team_id", &self.team_id)
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Slack integration configuration.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// OAuth provider (slack, mock)
    pub provider: String,
    /// Base URL of the Slack Web API
    pub api_url: String,
    /// Upper bound on a single Slack call
    pub timeout: Duration,
}

/// Exchanges an OAuth authorization code for bot credentials.
///
/// Codes are single-use, so implementations must not retry.
#[async_trait::async_trait]
pub trait OAuthExchange: Send + Sync {
    async fn oauth_access(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<OAuthAccess, SlackError>;
}

/// Starts the bot runtime for a team.
#[async_trait::async_trait]
pub trait BotService: Send + Sync {
    async fn start(&self, team: &BotTeam) -> Result<(), SlackError>;
}

/// Factory for creating OAuthExchange implementations.
pub struct OAuthExchangeFactory;

impl OAuthExchangeFactory {
    /// Create an OAuthExchange based on configuration.
    pub fn create(config: SlackConfig) -> Result<Box<dyn OAuthExchange>, SlackError> {
        match config.provider.as_str() {
            "slack" => {
                tracing::info!(api_url = %config.api_url, "Creating Slack OAuth client");
                Ok(Box::new(client::SlackClient::new(config)?))
            }
            "mock" => {
                tracing::info!("Creating mock Slack OAuth exchange");
                Ok(Box::new(mock::MockOAuthExchange::new()))
            }
            provider => Err(SlackError::Configuration(format!(
                "Unknown Slack provider: {}. Supported providers: slack, mock",
                provider
            ))),
        }
    }
}
