//! Domain entities for the Gamebot teams domain
//!
//! A `Game` is a Slack app (its OAuth credentials plus default data for new
//! teams); a `Team` is one Slack workspace that installed a game's bot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use gamebot_common::{
    Boundary, CursorValue, Error, Paginated, Result, SortDirective, SortField, SortOrders,
};
use gamebot_slack::{BotTeam, OAuthAccess};

use crate::domain::state::TeamState;

/// Game entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    /// Default aliases copied onto every new team
    pub aliases: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Game {
    /// Create a new game with validation
    pub fn new(
        name: String,
        client_id: String,
        client_secret: String,
        aliases: Vec<String>,
    ) -> Result<Self> {
        if name.is_empty() || name.len() > 100 {
            return Err(Error::Validation(
                "Game name must be 1-100 characters".to_string(),
            ));
        }

        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::Validation(
                "Game OAuth credentials must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Game {
            id: Uuid::now_v7(),
            name,
            client_id,
            client_secret,
            aliases,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Team {
    /// Time-ordered (v7), so ordering by id follows creation order
    pub id: Uuid,
    /// Slack workspace identifier
    pub team_id: String,
    pub name: String,
    /// Bot access token; unique across all teams
    #[serde(skip_serializing)]
    pub token: String,
    pub game_id: Uuid,
    pub aliases: Vec<String>,
    pub active: bool,
    /// Visible through the public teams interface
    pub api: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Build a new active team for `game` from an OAuth grant
    pub fn new(game: &Game, access: &OAuthAccess) -> Self {
        let now = Utc::now();
        Team {
            id: Uuid::now_v7(),
            team_id: access.team_id.clone(),
            name: access.team_name.clone(),
            token: access.bot.bot_access_token.clone(),
            game_id: game.id,
            aliases: game.aliases.clone(),
            active: true,
            api: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lifecycle state of a persisted team
    pub fn state(&self) -> TeamState {
        if self.active {
            TeamState::Active
        } else {
            TeamState::Inactive
        }
    }

    pub fn belongs_to(&self, game: &Game) -> bool {
        self.game_id == game.id
    }

    /// Credentials handed to the bot runtime
    pub fn as_bot(&self) -> BotTeam {
        BotTeam {
            id: self.id,
            team_id: self.team_id.clone(),
            name: self.name.clone(),
            token: self.token.clone(),
        }
    }
}

/// Sortable team fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSortField {
    Id,
    CreatedAt,
    UpdatedAt,
}

impl TeamSortField {
    /// Column backing this field
    pub fn column(&self) -> &'static str {
        match self {
            TeamSortField::Id => "id",
            TeamSortField::CreatedAt => "created_at",
            TeamSortField::UpdatedAt => "updated_at",
        }
    }

    /// Reject cursor boundaries whose value types don't fit this field
    pub fn check_boundary(&self, boundary: &Boundary) -> Result<()> {
        let value_fits = matches!(
            (self, &boundary.value),
            (TeamSortField::Id, CursorValue::Uuid(_))
                | (TeamSortField::CreatedAt, CursorValue::Timestamp(_))
                | (TeamSortField::UpdatedAt, CursorValue::Timestamp(_))
        );
        if !value_fits || !matches!(boundary.tie, CursorValue::Uuid(_)) {
            return Err(Error::InvalidCursor(format!(
                "cursor boundary does not match sort field '{}'",
                self.name()
            )));
        }
        Ok(())
    }
}

impl SortField for TeamSortField {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(TeamSortField::Id),
            "created_at" => Some(TeamSortField::CreatedAt),
            "updated_at" => Some(TeamSortField::UpdatedAt),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        self.column()
    }
}

/// Sort keys accepted when listing teams
pub const TEAM_SORT_ORDERS: SortOrders<TeamSortField> = SortOrders::new(&[
    "id",
    "-id",
    "created_at",
    "-created_at",
    "updated_at",
    "-updated_at",
]);

/// Newest teams first
pub const DEFAULT_TEAM_SORT: SortDirective<TeamSortField> = SortDirective {
    field: TeamSortField::Id,
    direction: gamebot_common::SortDirection::Desc,
};

impl Paginated for Team {
    type Field = TeamSortField;

    fn sort_value(&self, field: TeamSortField) -> CursorValue {
        match field {
            TeamSortField::Id => CursorValue::Uuid(self.id),
            TeamSortField::CreatedAt => CursorValue::Timestamp(self.created_at),
            TeamSortField::UpdatedAt => CursorValue::Timestamp(self.updated_at),
        }
    }

    fn tie_breaker(&self) -> CursorValue {
        CursorValue::Uuid(self.id)
    }
}
