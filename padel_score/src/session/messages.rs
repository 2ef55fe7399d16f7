//! Match session message types.

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use super::status::StatusMessage;
use crate::scoring::{Match, MatchError, Team, TeamId, score_label};

/// Messages handled by a MatchSession. Only [`MatchHandle`] and the
/// session's own timers create them.
///
/// [`MatchHandle`]: super::MatchHandle
#[derive(Debug)]
pub(crate) enum SessionMessage {
    /// Start a new match, replacing any current one
    StartMatch {
        team1: Team,
        team2: Team,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Point won by a team
    AddPoint {
        team_id: TeamId,
        response: oneshot::Sender<SessionResponse>,
    },

    /// Remove the last point of the current game
    UndoLastPoint {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Get the current match, status message and victory flag
    GetSnapshot {
        response: oneshot::Sender<SessionSnapshot>,
    },

    /// Subscribe to state change notifications
    Subscribe {
        subscriber_id: u64,
        sender: mpsc::Sender<StateChangeNotification>,
    },

    /// Unsubscribe from state change notifications
    Unsubscribe { subscriber_id: u64 },

    /// Stop the session and drop its pending timers
    Close {
        response: oneshot::Sender<SessionResponse>,
    },

    /// Internal: hide the status message (status timer)
    HideStatus,

    /// Internal: clear a finished match (victory timer)
    AutoReset { match_id: Uuid },
}

/// Notification sent when session state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChangeNotification {
    /// Score or game flags changed
    MatchChanged,
    /// Status message shown or hidden
    StatusChanged,
    /// The finished match was cleared from the board
    MatchCleared,
}

/// Response from session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResponse {
    /// Operation applied
    Success,

    /// Operation ignored, match state unchanged
    Ignored(MatchError),
}

impl SessionResponse {
    /// Check if response is success
    pub fn is_success(&self) -> bool {
        matches!(self, SessionResponse::Success)
    }

    /// Reason the operation was ignored, if it was
    pub fn error_message(&self) -> Option<String> {
        match self {
            SessionResponse::Success => None,
            SessionResponse::Ignored(reason) => Some(reason.to_string()),
        }
    }
}

/// Read-only view handed to scoreboard and judge panels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(rename = "match")]
    pub current_match: Option<Match>,
    pub status: StatusMessage,
    pub show_victory_screen: bool,
}

impl SessionSnapshot {
    /// Score label for a team, taking the tiebreak flag from the current match.
    pub fn score_display(
        &self,
        points: u32,
        is_deuce: bool,
        advantage: Option<&TeamId>,
        team_id: &TeamId,
    ) -> String {
        let tiebreak = self
            .current_match
            .as_ref()
            .is_some_and(|m| m.game_state.tiebreak);
        score_label(points, tiebreak, is_deuce, advantage, team_id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
