//! Team collection filters
//!
//! Predicates compose conjunctively, so the order they are applied in never
//! changes the result set.

use uuid::Uuid;

use crate::domain::entities::Team;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamFilter {
    /// Only teams exposed through the public interface
    pub api_only: bool,
    /// Only teams with `active = true`
    pub active_only: bool,
    /// Only teams owned by this game
    pub game_id: Option<Uuid>,
}

impl TeamFilter {
    /// Filter used by public listings
    pub fn api() -> Self {
        Self {
            api_only: true,
            ..Self::default()
        }
    }

    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    pub fn game(mut self, game_id: Option<Uuid>) -> Self {
        self.game_id = game_id;
        self
    }

    pub fn matches(&self, team: &Team) -> bool {
        (!self.api_only || team.api)
            && (!self.active_only || team.active)
            && self.game_id.map_or(true, |game_id| team.game_id == game_id)
    }
}
