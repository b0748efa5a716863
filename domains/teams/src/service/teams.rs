//! Team operations
//!
//! Fetch, list and register teams. Request parameters are checked before any
//! collaborator is called, so a rejected request never reaches the store or
//! Slack.

use gamebot_common::{Error, Page, Pagination, Result};
use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::entities::{Game, Team, DEFAULT_TEAM_SORT, TEAM_SORT_ORDERS};
use crate::domain::filter::TeamFilter;
use crate::repository::GameStore;
use crate::service::reconciler::TeamReconciler;
use crate::service::TeamsState;

/// Parameters for listing teams
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_game_scope"))]
pub struct ListTeamsParams {
    /// Only return active teams
    #[serde(default)]
    pub active: Option<bool>,

    /// Scope to a game by name
    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub game: Option<String>,

    /// Scope to a game by id
    #[serde(default)]
    pub game_id: Option<Uuid>,

    /// Sort key, e.g. `-created_at`
    #[serde(default)]
    pub sort: Option<String>,

    #[serde(flatten)]
    pub pagination: Pagination,
}

fn validate_game_scope(params: &ListTeamsParams) -> std::result::Result<(), ValidationError> {
    if params.game.is_some() && params.game_id.is_some() {
        return Err(ValidationError::new("game_and_game_id_are_mutually_exclusive"));
    }
    Ok(())
}

/// Parameters for registering a team through Slack OAuth
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_game_choice"))]
pub struct CreateTeamParams {
    /// Slack OAuth authorization code
    #[validate(length(min = 1))]
    pub code: String,

    #[validate(length(min = 1, max = 100))]
    #[serde(default)]
    pub game: Option<String>,

    #[serde(default)]
    pub game_id: Option<Uuid>,
}

fn validate_game_choice(params: &CreateTeamParams) -> std::result::Result<(), ValidationError> {
    match (&params.game, &params.game_id) {
        (Some(_), Some(_)) => Err(ValidationError::new("game_and_game_id_are_mutually_exclusive")),
        (None, None) => Err(ValidationError::new("game_or_game_id_is_required")),
        _ => Ok(()),
    }
}

fn check<T: Validate>(params: &T) -> Result<()> {
    params
        .validate()
        .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))
}

/// Resolve an optional game reference by id or by name
async fn resolve_game(
    games: &dyn GameStore,
    name: Option<&str>,
    id: Option<Uuid>,
) -> Result<Option<Game>> {
    let found = match (id, name) {
        (Some(id), _) => games
            .find(id)
            .await?
            .ok_or_else(|| Error::GameNotFound(id.to_string()))?,
        (None, Some(name)) => games
            .find_by_name(name)
            .await?
            .ok_or_else(|| Error::GameNotFound(name.to_string()))?,
        (None, None) => return Ok(None),
    };
    Ok(Some(found))
}

/// Get a single team
///
/// Teams that are not exposed through the API are reported as missing.
#[tracing::instrument(skip(state))]
pub async fn get_team(state: &TeamsState, id: Uuid) -> Result<Team> {
    state
        .repos
        .teams
        .find(id)
        .await?
        .filter(|team| team.api)
        .ok_or_else(|| Error::NotFound(format!("Team {} not found", id)))
}

/// List API-visible teams, one page at a time
#[tracing::instrument(skip_all, fields(sort = ?params.sort, game = ?params.game, game_id = ?params.game_id))]
pub async fn list_teams(state: &TeamsState, params: ListTeamsParams) -> Result<Page<Team>> {
    check(&params)?;

    let directive = TEAM_SORT_ORDERS.resolve(params.sort.as_deref(), DEFAULT_TEAM_SORT)?;
    let window = state.paginator.window(directive, &params.pagination)?;
    if let Some(after) = &window.after {
        directive.field.check_boundary(after)?;
    }

    let game = resolve_game(
        state.repos.games.as_ref(),
        params.game.as_deref(),
        params.game_id,
    )
    .await?;

    let filter = TeamFilter::api()
        .active_only(params.active.unwrap_or(false))
        .game(game.map(|game| game.id));

    let fetched = state.repos.teams.scan(&filter, &window).await?;
    let page = state.paginator.finish(&window, fetched)?;

    tracing::debug!(
        items = page.items.len(),
        has_more = page.next_cursor.is_some(),
        "Listed teams"
    );

    if params.pagination.wants_total_count() {
        let total = state.repos.teams.count(&filter).await?;
        return Ok(page.with_total_count(total));
    }
    Ok(page)
}

/// Register a team from a Slack OAuth code
///
/// The code is exchanged exactly once with the game's Slack app credentials.
/// The resulting grant is reconciled against existing teams and, on success,
/// the bot is started for the team.
#[tracing::instrument(skip_all, fields(game = ?params.game, game_id = ?params.game_id))]
pub async fn create_team(state: &TeamsState, params: CreateTeamParams) -> Result<Team> {
    check(&params)?;

    let game = resolve_game(
        state.repos.games.as_ref(),
        params.game.as_deref(),
        params.game_id,
    )
    .await?
    .ok_or_else(|| Error::Validation("game or game_id is required".to_string()))?;

    let access = state
        .slack
        .oauth_access(&game.client_id, &game.client_secret, &params.code)
        .await
        .map_err(|e| {
            tracing::warn!(game = %game.name, error = %e, "Slack OAuth exchange failed");
            Error::ExternalService(e.to_string())
        })?;

    TeamReconciler::new(state.repos.teams.as_ref(), state.bots.as_ref())
        .reconcile(&game, &access)
        .await
}
