//! Team lifecycle state machine
//!
//! A team identity is `Absent` until first registered, then `Active`, and
//! `Inactive` once its bot is deactivated. Registering an OAuth grant is the
//! only event handled here:
//! - `Absent` -> `Active` (create)
//! - `Inactive` -> `Active` (reactivate), guarded by game identity
//! - `Active` -> rejected, guarded by game identity first

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{Game, Team};

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Guard condition failed: team {team} belongs to game {actual}, not {expected}")]
    GameMismatch {
        team: String,
        expected: Uuid,
        actual: Uuid,
    },

    #[error("Invalid transition: team {0} is already active")]
    AlreadyActive(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamState {
    Absent,
    Inactive,
    Active,
}

impl TeamState {
    /// Get all valid next states from current state on registration
    pub fn valid_transitions(&self) -> &'static [TeamState] {
        match self {
            Self::Absent => &[Self::Active],
            Self::Inactive => &[Self::Active],
            Self::Active => &[],
        }
    }
}

impl std::fmt::Display for TeamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Inactive => write!(f, "inactive"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// Outcome of looking up an existing team for an OAuth grant
#[derive(Debug, Clone, PartialEq)]
pub enum TeamMatch {
    /// Same bot token; takes precedence over a key match
    ByToken(Team),
    /// Same Slack workspace within the requested game
    ByKey(Team),
    Absent,
}

impl TeamMatch {
    pub fn team(&self) -> Option<&Team> {
        match self {
            Self::ByToken(team) | Self::ByKey(team) => Some(team),
            Self::Absent => None,
        }
    }

    pub fn state(&self) -> TeamState {
        self.team().map_or(TeamState::Absent, Team::state)
    }

    /// Short label for logs
    pub fn source(&self) -> &'static str {
        match self {
            Self::ByToken(_) => "token",
            Self::ByKey(_) => "team_id",
            Self::Absent => "none",
        }
    }
}

/// Write the registration requires
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    Create,
    Reactivate(Team),
}

/// Team lifecycle state machine
pub struct TeamStateMachine;

impl TeamStateMachine {
    /// Decide what registering a grant for `game` does to the matched team
    pub fn register(found: TeamMatch, game: &Game) -> Result<Registration, StateError> {
        let team = match found {
            TeamMatch::Absent => return Ok(Registration::Create),
            TeamMatch::ByToken(team) | TeamMatch::ByKey(team) => team,
        };

        // Guard: an existing team only ever re-registers under its own game
        if !team.belongs_to(game) {
            return Err(StateError::GameMismatch {
                team: team.name,
                expected: game.id,
                actual: team.game_id,
            });
        }

        if !team.state().valid_transitions().contains(&TeamState::Active) {
            return Err(StateError::AlreadyActive(team.name));
        }
        Ok(Registration::Reactivate(team))
    }
}
