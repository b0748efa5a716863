//! In-memory store
//!
//! Holds games and teams in process memory with the same uniqueness rules as
//! the PostgreSQL schema. Used for tests and local development.
//! Thread-safe via `Arc<Mutex<>>`.

use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use gamebot_common::{Error, RepositoryError, Result, Window};

use crate::domain::entities::{Game, Team, TeamSortField};
use crate::domain::filter::TeamFilter;
use crate::repository::{GameStore, TeamStore};

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    games: Arc<Mutex<Vec<Game>>>,
    teams: Arc<Mutex<Vec<Team>>>,
    writes: Arc<AtomicUsize>,
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> RepositoryError {
    RepositoryError::InvalidData("in-memory store lock poisoned".to_string())
}

/// Whether `candidate` would collide with any team in `teams` other than itself
fn collides(teams: &[Team], candidate: &Team) -> bool {
    teams.iter().any(|existing| {
        existing.id != candidate.id
            && (existing.token == candidate.token
                || (candidate.active
                    && existing.active
                    && existing.team_id == candidate.team_id
                    && existing.game_id == candidate.game_id))
    })
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_teams(&self) -> std::result::Result<MutexGuard<'_, Vec<Team>>, RepositoryError> {
        self.teams.lock().map_err(poisoned)
    }

    fn lock_games(&self) -> std::result::Result<MutexGuard<'_, Vec<Game>>, RepositoryError> {
        self.games.lock().map_err(poisoned)
    }

    /// Seed a game. Names are unique.
    pub fn insert_game(&self, game: Game) -> Result<Game> {
        let mut games = self.lock_games()?;
        if games.iter().any(|existing| existing.name == game.name) {
            return Err(Error::Conflict(format!("Game '{}' already exists", game.name)));
        }
        games.push(game.clone());
        Ok(game)
    }

    /// Seed a team without counting it as a write.
    pub fn insert_team(&self, team: Team) -> Result<Team> {
        let mut teams = self.lock_teams()?;
        if collides(&teams, &team) {
            return Err(RepositoryError::AlreadyExists.into());
        }
        teams.push(team.clone());
        Ok(team)
    }

    /// Snapshot of all stored teams, in insertion order.
    pub fn teams(&self) -> Result<Vec<Team>> {
        Ok(self.lock_teams()?.clone())
    }

    /// Number of writes made through `TeamStore`.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TeamStore for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Team>> {
        Ok(self.lock_teams()?.iter().find(|team| team.id == id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Team>> {
        Ok(self
            .lock_teams()?
            .iter()
            .find(|team| team.token == token)
            .cloned())
    }

    async fn find_by_team_id_and_game(
        &self,
        team_id: &str,
        game_id: Uuid,
    ) -> Result<Option<Team>> {
        Ok(self
            .lock_teams()?
            .iter()
            .filter(|team| team.team_id == team_id && team.game_id == game_id)
            .max_by_key(|team| (team.active, team.id))
            .cloned())
    }

    async fn scan(
        &self,
        filter: &TeamFilter,
        window: &Window<TeamSortField>,
    ) -> Result<Vec<Team>> {
        let teams = self.lock_teams()?;
        let matching = teams.iter().filter(|team| filter.matches(team)).cloned();
        Ok(window.apply(matching))
    }

    async fn count(&self, filter: &TeamFilter) -> Result<u64> {
        let teams = self.lock_teams()?;
        Ok(teams.iter().filter(|team| filter.matches(team)).count() as u64)
    }

    async fn create(&self, team: &Team) -> std::result::Result<Team, RepositoryError> {
        let mut teams = self.lock_teams()?;
        if collides(&teams, team) {
            return Err(RepositoryError::AlreadyExists);
        }
        teams.push(team.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(team.clone())
    }

    async fn activate(&self, id: Uuid) -> std::result::Result<Option<Team>, RepositoryError> {
        let mut teams = self.lock_teams()?;
        let index = teams
            .iter()
            .position(|team| team.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if teams[index].active {
            return Ok(None);
        }

        let mut activated = teams[index].clone();
        activated.active = true;
        activated.updated_at = Utc::now();
        if collides(&teams, &activated) {
            return Err(RepositoryError::AlreadyExists);
        }

        teams[index] = activated.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(Some(activated))
    }
}

#[async_trait::async_trait]
impl GameStore for InMemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Game>> {
        Ok(self.lock_games()?.iter().find(|game| game.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Game>> {
        Ok(self
            .lock_games()?
            .iter()
            .find(|game| game.name == name)
            .cloned())
    }
}
