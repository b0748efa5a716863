//! Channel-backed bot launcher
//!
//! Hands registered teams to the bot runtime over a bounded channel. The
//! runtime owns the receiving end; a full channel blocks the sender for at
//! most the configured timeout.

use std::time::Duration;
use tokio::sync::mpsc::{self, error::SendTimeoutError};

use crate::{BotService, BotTeam, SlackError};

#[derive(Debug, Clone)]
pub struct BotLauncher {
    sender: mpsc::Sender<BotTeam>,
    timeout: Duration,
}

impl BotLauncher {
    /// Create a launcher and the receiver the bot runtime consumes.
    pub fn channel(capacity: usize, timeout: Duration) -> (Self, mpsc::Receiver<BotTeam>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, timeout }, receiver)
    }
}

#[async_trait::async_trait]
impl BotService for BotLauncher {
    async fn start(&self, team: &BotTeam) -> Result<(), SlackError> {
        match self.sender.send_timeout(team.clone(), self.timeout).await {
            Ok(()) => {
                tracing::debug!(team_id = %team.team_id, "Bot start queued");
                Ok(())
            }
            Err(SendTimeoutError::Timeout(_)) => Err(SlackError::Launch(format!(
                "bot runtime did not accept team {} within {:?}",
                team.team_id, self.timeout
            ))),
            Err(SendTimeoutError::Closed(_)) => Err(SlackError::Launch(
                "bot runtime is not running".to_string(),
            )),
        }
    }
}
