//! Match session providing the live, timer-driven wrapper around the engine.
//!
//! This module implements:
//! - MatchSession: async actor owning the current match
//! - MatchHandle: cloneable handle used by scoreboards and judge panels
//! - Status messages with auto-hide timers and the post-match auto reset
//!
//! ## Architecture
//!
//! The session runs in its own Tokio task with an mpsc inbox. Display timers
//! are spawned tasks that post messages back into that inbox, so the match is
//! only ever touched from the actor's loop. Dropping or closing the session
//! aborts every pending timer.
//!
//! ## Example
//!
//! ```no_run
//! use padel_score::scoring::{MatchConfig, Team};
//! use padel_score::session::{MatchSession, SessionTimings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = MatchSession::spawn(MatchConfig::default(), SessionTimings::default());
//!
//!     let (team1, team2) = Team::default_pair();
//!     handle.start_match(team1, team2).await?;
//!     handle.add_point("team1").await?;
//!
//!     let snapshot = handle.snapshot().await?;
//!     println!("{}", snapshot.to_json()?);
//!     Ok(())
//! }
//! ```

pub mod actor;
pub mod config;
pub mod messages;
pub mod status;

pub use actor::{HandleError, MatchHandle, MatchSession};
pub use config::SessionTimings;
pub use messages::{SessionResponse, SessionSnapshot, StateChangeNotification};
pub use status::{StatusKind, StatusMessage};
