//! Teams domain: games, teams, listing and OAuth registration

pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::*;
pub use domain::filter::TeamFilter;
pub use domain::state::{Registration, StateError, TeamMatch, TeamState, TeamStateMachine};
// Re-export repository types
pub use repository::{
    GameStore, InMemoryStore, PgGameStore, PgTeamStore, TeamStore, TeamsRepositories,
};
// Re-export service types
pub use service::reconciler::TeamReconciler;
pub use service::teams::{create_team, get_team, list_teams, CreateTeamParams, ListTeamsParams};
pub use service::TeamsState;
