//! # Padel Score
//!
//! A padel match scoring engine built as a pure state machine with an async
//! session wrapper for live scoreboards.
//!
//! Points propagate into games, sets and the match result under two deuce
//! variants: traditional advantage and golden point. Every transition takes a
//! `Match` value and returns the next one plus the events it produced, so the
//! engine can be driven and tested without any runtime.
//!
//! ## Core Modules
//!
//! - [`scoring`]: Match entities, configuration, transitions and display helpers
//! - [`session`]: Tokio actor owning the current match, status pulses and the
//!   post-match auto reset
//!
//! ## Example
//!
//! ```
//! use padel_score::{Match, MatchConfig, ScoringAction, Team, TeamSlot};
//!
//! let (team1, team2) = Team::default_pair();
//! let current = Match::new(team1, team2, MatchConfig::default()).unwrap();
//!
//! let next = current.apply(ScoringAction::Point("team1".into())).unwrap().next;
//! assert_eq!(next.score_display(TeamSlot::One), "15");
//! ```

/// Scoring rules, match entities and display helpers.
pub mod scoring;
pub use scoring::{
    BestOf, ConfigError, ControlMode, GameMode, GameState, Language, Match, MatchConfig,
    MatchError, MatchEvent, Score, ScoringAction, SideChangeRule, Team, TeamColor, TeamId,
    TeamSlot, Transition, format_elapsed, score_label,
};

/// Live match session with display timers.
pub mod session;
pub use session::{
    HandleError, MatchHandle, MatchSession, SessionResponse, SessionSnapshot, SessionTimings,
    StatusKind, StatusMessage,
};
