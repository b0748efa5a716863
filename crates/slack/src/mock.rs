//! Mock Slack Implementations
//!
//! Canned OAuth grants and recorded bot starts for test assertions.
//! Thread-safe via `Arc<Mutex<>>`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{BotCredentials, BotService, BotTeam, OAuthAccess, OAuthExchange, SlackError};

/// An `oauth.access` call seen by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthCall {
    pub client_id: String,
    pub code: String,
}

/// Mock OAuth exchange that answers from registered grants.
///
/// Unknown codes fail with `invalid_code`, like Slack does.
#[derive(Debug, Clone, Default)]
pub struct MockOAuthExchange {
    grants: Arc<Mutex<HashMap<String, OAuthAccess>>>,
    calls: Arc<Mutex<Vec<OAuthCall>>>,
}

impl MockOAuthExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the result returned for `code`.
    pub fn grant(&self, code: &str, access: OAuthAccess) {
        self.grants
            .lock()
            .expect("grants lock poisoned — prior test panicked")
            .insert(code.to_string(), access);
    }

    /// Convenience grant built from its parts.
    pub fn grant_bot(&self, code: &str, team_id: &str, team_name: &str, bot_token: &str) {
        self.grant(
            code,
            OAuthAccess {
                team_id: team_id.to_string(),
                team_name: team_name.to_string(),
                bot: BotCredentials {
                    bot_user_id: None,
                    bot_access_token: bot_token.to_string(),
                },
            },
        );
    }

    /// Return all recorded calls.
    pub fn calls(&self) -> Vec<OAuthCall> {
        self.calls
            .lock()
            .expect("calls lock poisoned — prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl OAuthExchange for MockOAuthExchange {
    async fn oauth_access(
        &self,
        client_id: &str,
        _client_secret: &str,
        code: &str,
    ) -> Result<OAuthAccess, SlackError> {
        tracing::debug!(client_id, "Mock Slack: oauth.access");
        self.calls
            .lock()
            .map_err(|e| SlackError::Request(format!("calls lock poisoned: {e}")))?
            .push(OAuthCall {
                client_id: client_id.to_string(),
                code: code.to_string(),
            });

        self.grants
            .lock()
            .map_err(|e| SlackError::Request(format!("grants lock poisoned: {e}")))?
            .get(code)
            .cloned()
            .ok_or_else(|| SlackError::Api("invalid_code".to_string()))
    }
}

/// Mock bot service that records started teams.
#[derive(Debug, Clone, Default)]
pub struct MockBotService {
    started: Arc<Mutex<Vec<BotTeam>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockBotService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent start fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self
            .failure
            .lock()
            .expect("failure lock poisoned — prior test panicked") = Some(message.to_string());
    }

    /// Return all started teams.
    pub fn started(&self) -> Vec<BotTeam> {
        self.started
            .lock()
            .expect("started lock poisoned — prior test panicked")
            .clone()
    }
}

#[async_trait::async_trait]
impl BotService for MockBotService {
    async fn start(&self, team: &BotTeam) -> Result<(), SlackError> {
        if let Some(message) = self
            .failure
            .lock()
            .map_err(|e| SlackError::Launch(format!("failure lock poisoned: {e}")))?
            .clone()
        {
            return Err(SlackError::Launch(message));
        }

        tracing::debug!(team_id = %team.team_id, "Mock Slack: recording bot start");
        self.started
            .lock()
            .map_err(|e| SlackError::Launch(format!("started lock poisoned: {e}")))?
            .push(team.clone());
        Ok(())
    }
}
