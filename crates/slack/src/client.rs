//! Slack Web API Client Implementation
//!
//! Real HTTP client that POSTs authorization codes to
//! `{api_url}/oauth.access`.

use serde::Deserialize;

use crate::{OAuthAccess, OAuthExchange, SlackConfig, SlackError};

/// Envelope shared by every Slack Web API response
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Real Slack Web API client for OAuth code exchange.
pub struct SlackClient {
    http: reqwest::Client,
    oauth_url: String,
}

impl SlackClient {
    /// Create a new Slack client from configuration.
    pub fn new(config: SlackConfig) -> Result<Self, SlackError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SlackError::Configuration(e.to_string()))?;

        let oauth_url = format!("{}/oauth.access", config.api_url.trim_end_matches('/'));
        Ok(Self { http, oauth_url })
    }
}

#[async_trait::async_trait]
impl OAuthExchange for SlackClient {
    async fn oauth_access(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<OAuthAccess, SlackError> {
        let response = self
            .http
            .post(&self.oauth_url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
            ])
            .send()
            .await
            .map_err(|e| SlackError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            return Err(SlackError::Response(format!(
                "Slack API returned {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SlackError::Response(e.to_string()))?;

        let envelope: Envelope = serde_json::from_value(body.clone())
            .map_err(|e| SlackError::Response(e.to_string()))?;
        if !envelope.ok {
            return Err(SlackError::Api(
                envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
            ));
        }

        let access: OAuthAccess =
            serde_json::from_value(body).map_err(|e| SlackError::Response(e.to_string()))?;

        tracing::debug!(team_id = %access.team_id, "Slack OAuth exchange succeeded");
        Ok(access)
    }
}
