//! Teams domain operations and their shared state

pub mod reconciler;
pub mod teams;

use gamebot_common::Paginator;
use gamebot_slack::{BotService, OAuthExchange};
use std::sync::Arc;

use crate::TeamsRepositories;

/// Application state for the Teams domain
#[derive(Clone)]
pub struct TeamsState {
    pub repos: TeamsRepositories,
    pub slack: Arc<dyn OAuthExchange>,
    pub bots: Arc<dyn BotService>,
    pub paginator: Paginator,
}
