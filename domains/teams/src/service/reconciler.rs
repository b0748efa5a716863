//! Team registration reconciler
//!
//! Turns a successful OAuth exchange into a persisted active team: create it,
//! reactivate a dormant one, or reject the registration. Every check runs
//! before the single write, and the bot runtime is only signalled once that
//! write has landed.

use gamebot_common::{Error, RepositoryError, Result};
use gamebot_slack::{BotService, OAuthAccess};

use crate::domain::entities::{Game, Team};
use crate::domain::state::{Registration, StateError, TeamMatch, TeamStateMachine};
use crate::repository::TeamStore;

pub struct TeamReconciler<'a> {
    teams: &'a dyn TeamStore,
    bots: &'a dyn BotService,
}

fn already_registered(name: &str) -> Error {
    Error::AlreadyRegistered(format!("Team {} is already registered.", name))
}

impl From<StateError> for Error {
    fn from(err: StateError) -> Self {
        match err {
            StateError::GameMismatch { .. } => Error::InvalidGame(err.to_string()),
            StateError::AlreadyActive(name) => already_registered(&name),
        }
    }
}

impl<'a> TeamReconciler<'a> {
    pub fn new(teams: &'a dyn TeamStore, bots: &'a dyn BotService) -> Self {
        Self { teams, bots }
    }

    /// Find the team a grant refers to: by bot token first, then by Slack
    /// workspace within `game`.
    pub async fn lookup(&self, game: &Game, access: &OAuthAccess) -> Result<TeamMatch> {
        if let Some(team) = self
            .teams
            .find_by_token(&access.bot.bot_access_token)
            .await?
        {
            return Ok(TeamMatch::ByToken(team));
        }

        if let Some(team) = self
            .teams
            .find_by_team_id_and_game(&access.team_id, game.id)
            .await?
        {
            return Ok(TeamMatch::ByKey(team));
        }

        Ok(TeamMatch::Absent)
    }

    #[tracing::instrument(skip_all, fields(game = %game.name, team_id = %access.team_id))]
    pub async fn reconcile(&self, game: &Game, access: &OAuthAccess) -> Result<Team> {
        let found = self.lookup(game, access).await?;
        let matched_by = found.source();
        let state = found.state();

        let registration = TeamStateMachine::register(found, game).map_err(|e| {
            tracing::warn!(matched_by, %state, error = %e, "Team registration rejected");
            Error::from(e)
        })?;

        let team = match registration {
            Registration::Create => {
                let team = Team::new(game, access);
                let created = self.teams.create(&team).await.map_err(|e| match e {
                    RepositoryError::AlreadyExists => {
                        tracing::warn!("Team registration lost a concurrent create");
                        already_registered(&team.name)
                    }
                    other => Error::from(other),
                })?;
                tracing::info!(id = %created.id, "Team created");
                created
            }
            Registration::Reactivate(team) => {
                let activated = match self.teams.activate(team.id).await {
                    Ok(Some(activated)) => activated,
                    Ok(None) | Err(RepositoryError::AlreadyExists) => {
                        tracing::warn!(id = %team.id, "Team registration lost a concurrent activation");
                        return Err(already_registered(&team.name));
                    }
                    Err(other) => return Err(other.into()),
                };
                tracing::info!(id = %activated.id, matched_by, "Team reactivated");
                activated
            }
        };

        self.bots
            .start(&team.as_bot())
            .await
            .map_err(|e| Error::ExternalService(e.to_string()))?;

        Ok(team)
    }
}
