//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;

use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Minimum length of the cursor signing secret, in bytes
pub const MIN_CURSOR_SECRET_LEN: usize = 32;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// Secret used to sign pagination cursors
    pub cursor_secret: String,

    /// Slack configuration
    pub slack_provider: String,
    pub slack_api_url: String,
    pub slack_timeout_secs: u64,

    /// Listing configuration
    pub default_page_size: usize,

    /// Runtime configuration
    pub log_format: LogFormat,
    pub rust_log: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("cursor_secret", &"[REDACTED]")
            .field("slack_provider", &self.slack_provider)
            .field("slack_api_url", &self.slack_api_url)
            .field("slack_timeout_secs", &self.slack_timeout_secs)
            .field("default_page_size", &self.default_page_size)
            .field("log_format", &self.log_format)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let cursor_secret = env::var("CURSOR_SECRET")
            .map_err(|_| anyhow::anyhow!("CURSOR_SECRET is required"))?;
        if cursor_secret.len() < MIN_CURSOR_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "CURSOR_SECRET must be at least {} bytes",
                MIN_CURSOR_SECRET_LEN
            ));
        }

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => {
                return Err(anyhow::anyhow!(
                    "Unknown LOG_FORMAT: {}. Supported formats: pretty, json",
                    other
                ))
            }
        };

        let config = Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL is required"))?,

            cursor_secret,

            slack_provider: env::var("SLACK_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
            slack_api_url: env::var("SLACK_API_URL")
                .unwrap_or_else(|_| "https://slack.com/api".to_string()),
            slack_timeout_secs: env::var("SLACK_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            default_page_size: env::var("DEFAULT_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),

            log_format,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "gamebot=debug".to_string()),
        };

        Ok(config)
    }
}
