//! Repository implementations for the Teams domain

pub mod games;
pub mod memory;
pub mod teams;

use gamebot_common::{RepositoryError, Result, Window};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{Game, Team, TeamSortField};
use crate::domain::filter::TeamFilter;

pub use games::PgGameStore;
pub use memory::InMemoryStore;
pub use teams::PgTeamStore;

/// Persistence operations on teams
#[async_trait::async_trait]
pub trait TeamStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Team>>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Team>>;

    async fn find_by_team_id_and_game(&self, team_id: &str, game_id: Uuid)
        -> Result<Option<Team>>;

    /// Fetch up to `window.fetch_limit()` filtered teams strictly past the
    /// window's boundary, in scan order
    async fn scan(&self, filter: &TeamFilter, window: &Window<TeamSortField>)
        -> Result<Vec<Team>>;

    async fn count(&self, filter: &TeamFilter) -> Result<u64>;

    /// Insert a new team.
    ///
    /// Returns `RepositoryError::AlreadyExists` when the token, or the
    /// `(team_id, game_id)` pair of an active team, is already taken.
    async fn create(&self, team: &Team) -> std::result::Result<Team, RepositoryError>;

    /// Flip an inactive team to active.
    ///
    /// Returns `None` when the team is no longer inactive, and
    /// `RepositoryError::AlreadyExists` when another active team holds the
    /// same `(team_id, game_id)` pair.
    async fn activate(&self, id: Uuid) -> std::result::Result<Option<Team>, RepositoryError>;
}

/// Read-only lookups on games
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<Game>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Game>>;
}

/// Combined repository access for the Teams domain
#[derive(Clone)]
pub struct TeamsRepositories {
    pub teams: Arc<dyn TeamStore>,
    pub games: Arc<dyn GameStore>,
}

impl TeamsRepositories {
    /// PostgreSQL-backed repositories
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            teams: Arc::new(PgTeamStore::new(pool.clone())),
            games: Arc::new(PgGameStore::new(pool)),
        }
    }

    /// Repositories sharing one in-memory store
    pub fn in_memory(store: InMemoryStore) -> Self {
        Self {
            teams: Arc::new(store.clone()),
            games: Arc::new(store),
        }
    }
}
