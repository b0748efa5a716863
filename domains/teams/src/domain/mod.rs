//! Teams domain layer: entities, state machine, filters

pub mod entities;
pub mod filter;
pub mod state;
