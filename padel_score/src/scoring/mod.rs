//! Padel scoring engine - pure match transitions and display helpers.
//!
//! This module provides:
//! - Match entities (teams, score counters, game flags)
//! - Match configuration (best-of, deuce mode, language, control mode)
//! - The scoring state machine: point → game → set → match cascade
//! - Pure display helpers (score labels, elapsed time)

pub mod config;
pub mod constants;
pub mod entities;
pub mod functional;
pub mod state_machine;

pub use config::{
    BestOf, ConfigError, ControlMode, GameMode, Language, MatchConfig, SideChangeRule,
};
pub use entities::{GameState, Match, Score, Team, TeamColor, TeamId, TeamSlot};
pub use functional::{format_elapsed, score_label};
pub use state_machine::{MatchError, MatchEvent, ScoringAction, Transition};
