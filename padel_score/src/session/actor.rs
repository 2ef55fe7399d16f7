//! Match session actor with async message handling.

use super::{
    config::SessionTimings,
    messages::{SessionMessage, SessionResponse, SessionSnapshot, StateChangeNotification},
    status::StatusMessage,
};
use crate::scoring::{Match, MatchConfig, MatchError, ScoringAction, Team, TeamId, Transition};
use std::collections::HashMap;
use thiserror::Error;
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
    time::{Duration, sleep},
};
use uuid::Uuid;

/// Errors returned by a [`MatchHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("match session is closed")]
    SessionClosed,
}

/// Match session handle for sending messages
#[derive(Clone, Debug)]
pub struct MatchHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl MatchHandle {
    fn new(sender: mpsc::Sender<SessionMessage>) -> Self {
        Self { sender }
    }

    async fn send(&self, message: SessionMessage) -> Result<(), HandleError> {
        self.sender
            .send(message)
            .await
            .map_err(|_| HandleError::SessionClosed)
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> Result<T, HandleError> {
        let (response, receiver) = oneshot::channel();
        self.send(message(response)).await?;
        receiver.await.map_err(|_| HandleError::SessionClosed)
    }

    pub async fn start_match(
        &self,
        team1: Team,
        team2: Team,
    ) -> Result<SessionResponse, HandleError> {
        self.request(|response| SessionMessage::StartMatch {
            team1,
            team2,
            response,
        })
        .await
    }

    pub async fn add_point(
        &self,
        team_id: impl Into<TeamId>,
    ) -> Result<SessionResponse, HandleError> {
        let team_id = team_id.into();
        self.request(|response| SessionMessage::AddPoint { team_id, response })
            .await
    }

    pub async fn undo_last_point(&self) -> Result<SessionResponse, HandleError> {
        self.request(|response| SessionMessage::UndoLastPoint { response })
            .await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, HandleError> {
        self.request(|response| SessionMessage::GetSnapshot { response })
            .await
    }

    pub async fn subscribe(
        &self,
        subscriber_id: u64,
        sender: mpsc::Sender<StateChangeNotification>,
    ) -> Result<(), HandleError> {
        self.send(SessionMessage::Subscribe {
            subscriber_id,
            sender,
        })
        .await
    }

    pub async fn unsubscribe(&self, subscriber_id: u64) -> Result<(), HandleError> {
        self.send(SessionMessage::Unsubscribe { subscriber_id })
            .await
    }

    pub async fn close(&self) -> Result<SessionResponse, HandleError> {
        self.request(|response| SessionMessage::Close { response })
            .await
    }
}

/// Session actor owning the current match and its display timers.
///
/// The actor is the only writer of the match, so every mutation replaces the
/// snapshot in one step. Timers run as separate tasks and report back through
/// the inbox; they only ever hide the status message or clear the finished
/// match they were scheduled for.
pub struct MatchSession {
    /// Configuration applied to every match started here
    config: MatchConfig,

    /// Display timer delays
    timings: SessionTimings,

    /// Active match, if any
    current: Option<Match>,

    /// Status pulse
    status: StatusMessage,

    /// Raised when a match finishes, lowered by the victory timer
    show_victory_screen: bool,

    /// Message inbox
    inbox: mpsc::Receiver<SessionMessage>,

    /// Timers post back through this without keeping the inbox open
    timer_sender: mpsc::WeakSender<SessionMessage>,

    /// Pending timer tasks, aborted on teardown
    timers: Vec<JoinHandle<()>>,

    /// Subscribers for state change notifications
    subscribers: HashMap<u64, mpsc::Sender<StateChangeNotification>>,

    /// Is session closed
    is_closed: bool,
}

impl MatchSession {
    /// Create a new match session
    ///
    /// # Returns
    ///
    /// * `(MatchSession, MatchHandle)` - Actor and handle for sending messages
    pub fn new(config: MatchConfig, timings: SessionTimings) -> (Self, MatchHandle) {
        let (sender, inbox) = mpsc::channel(100);

        let session = Self {
            config,
            timings,
            current: None,
            status: StatusMessage::default(),
            show_victory_screen: false,
            inbox,
            timer_sender: sender.downgrade(),
            timers: Vec::new(),
            subscribers: HashMap::new(),
            is_closed: false,
        };

        (session, MatchHandle::new(sender))
    }

    /// Create a session and run it on the current Tokio runtime
    pub fn spawn(config: MatchConfig, timings: SessionTimings) -> MatchHandle {
        let (session, handle) = Self::new(config, timings);
        tokio::spawn(session.run());
        handle
    }

    /// Run the session event loop until it is closed or every handle is gone
    pub async fn run(mut self) {
        log::info!(
            "Match session starting (best of {}, {}, {} control)",
            self.config.best_of_sets,
            self.config.game_mode,
            self.config.control_mode
        );

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);

            if self.is_closed {
                break;
            }
        }

        self.abort_timers();
        log::info!("Match session closed");
    }

    fn handle_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::StartMatch {
                team1,
                team2,
                response,
            } => {
                let result = self.start_match(team1, team2);
                let _ = response.send(result);
            }

            SessionMessage::AddPoint { team_id, response } => {
                let result = self.apply(ScoringAction::Point(team_id));
                let _ = response.send(result);
            }

            SessionMessage::UndoLastPoint { response } => {
                let result = self.apply(ScoringAction::UndoLastPoint);
                let _ = response.send(result);
            }

            SessionMessage::GetSnapshot { response } => {
                let _ = response.send(self.snapshot());
            }

            SessionMessage::Subscribe {
                subscriber_id,
                sender,
            } => {
                self.subscribers.insert(subscriber_id, sender);
                log::debug!("Subscriber {} attached to match session", subscriber_id);
            }

            SessionMessage::Unsubscribe { subscriber_id } => {
                self.subscribers.remove(&subscriber_id);
                log::debug!("Subscriber {} detached from match session", subscriber_id);
            }

            SessionMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(SessionResponse::Success);
            }

            SessionMessage::HideStatus => {
                if self.status.visible {
                    self.status.visible = false;
                    self.notify_state_change(StateChangeNotification::StatusChanged);
                }
            }

            SessionMessage::AutoReset { match_id } => self.auto_reset(match_id),
        }
    }

    fn start_match(&mut self, team1: Team, team2: Team) -> SessionResponse {
        let new_match = match Match::new(team1, team2, self.config) {
            Ok(m) => m,
            Err(e) => return self.ignored(e),
        };

        log::info!(
            "Match {} started: {} vs {}",
            new_match.id,
            new_match.team1.name,
            new_match.team2.name
        );

        self.current = Some(new_match);
        self.show_victory_screen = false;
        self.notify_state_change(StateChangeNotification::MatchChanged);

        SessionResponse::Success
    }

    fn apply(&mut self, action: ScoringAction) -> SessionResponse {
        let Some(current) = self.current.as_ref() else {
            return self.ignored(MatchError::NoActiveMatch);
        };

        let hide_after = match action {
            ScoringAction::Point(_) => self.timings.point_status(),
            ScoringAction::UndoLastPoint => self.timings.undo_status(),
        };

        let transition = match current.apply(action) {
            Ok(transition) => transition,
            Err(e) => return self.ignored(e),
        };

        self.commit(transition, hide_after);
        SessionResponse::Success
    }

    fn commit(&mut self, transition: Transition, hide_after: Duration) {
        let finished = transition.finished_match();
        let Transition { next, events } = transition;

        if let Some(status) =
            StatusMessage::for_events(&events, &next, self.timings.side_change_countdown_secs)
        {
            self.status = status;
            self.schedule(hide_after, SessionMessage::HideStatus);
            self.notify_state_change(StateChangeNotification::StatusChanged);
        }

        if finished {
            log::info!(
                "Match {} finished, winner {}",
                next.id,
                next.winner_team().map_or("-", |team| team.name.as_str())
            );
            self.show_victory_screen = true;
            self.schedule(
                self.timings.victory_reset(),
                SessionMessage::AutoReset { match_id: next.id },
            );
        }

        self.current = Some(next);
        self.notify_state_change(StateChangeNotification::MatchChanged);
    }

    fn auto_reset(&mut self, match_id: Uuid) {
        match self.current.as_ref() {
            Some(current) if current.id == match_id => {
                log::info!("Match {} cleared from the board", match_id);
                self.current = None;
                self.show_victory_screen = false;
                self.notify_state_change(StateChangeNotification::MatchCleared);
            }
            _ => log::debug!("Skipping reset for replaced match {}", match_id),
        }
    }

    fn ignored(&self, reason: MatchError) -> SessionResponse {
        log::debug!("Ignoring scoring request: {}", reason);
        SessionResponse::Ignored(reason)
    }

    /// Post `message` back into the inbox after `delay`. Timers are never
    /// cancelled by later events, only by teardown.
    fn schedule(&mut self, delay: Duration, message: SessionMessage) {
        self.timers.retain(|timer| !timer.is_finished());

        let sender = self.timer_sender.clone();
        self.timers.push(tokio::spawn(async move {
            sleep(delay).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(message).await;
            }
        }));
    }

    fn abort_timers(&mut self) {
        for timer in self.timers.drain(..) {
            timer.abort();
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_match: self.current.clone(),
            status: self.status.clone(),
            show_victory_screen: self.show_victory_screen,
        }
    }

    /// Broadcast state change notification to all subscribers
    fn notify_state_change(&mut self, notification: StateChangeNotification) {
        self.subscribers.retain(|subscriber_id, sender| {
            match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!(
                        "Subscriber {} channel full, dropping notification",
                        subscriber_id
                    );
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", subscriber_id);
                    false
                }
            }
        });
    }
}

impl Drop for MatchSession {
    fn drop(&mut self) {
        self.abort_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MatchSession {
        let (session, _handle) =
            MatchSession::new(MatchConfig::default(), SessionTimings::default());
        session
    }

    fn start(session: &mut MatchSession) -> Uuid {
        let (team1, team2) = Team::default_pair();
        assert!(session.start_match(team1, team2).is_success());
        session.current.as_ref().map(|m| m.id).unwrap()
    }

    #[tokio::test]
    async fn test_hide_status_only_touches_visibility() {
        let mut session = session();
        start(&mut session);
        assert!(session.apply(ScoringAction::Point("team1".into())).is_success());
        assert!(session.status.visible);

        session.handle_message(SessionMessage::HideStatus);

        assert!(!session.status.visible);
        let current = session.current.as_ref().unwrap();
        assert_eq!(current.score.team1_points, 1);
    }

    #[tokio::test]
    async fn test_auto_reset_ignores_other_matches() {
        let mut session = session();
        let first = start(&mut session);
        let second = start(&mut session);
        assert_ne!(first, second);

        session.handle_message(SessionMessage::AutoReset { match_id: first });
        assert_eq!(session.current.as_ref().map(|m| m.id), Some(second));

        session.handle_message(SessionMessage::AutoReset { match_id: second });
        assert!(session.current.is_none());
        assert!(!session.show_victory_screen);
    }

    #[tokio::test]
    async fn test_timers_aborted_on_close() {
        let mut session = session();
        start(&mut session);
        session.apply(ScoringAction::Point("team2".into()));
        assert_eq!(session.timers.len(), 1);

        let (response, _receiver) = oneshot::channel();
        session.handle_message(SessionMessage::Close { response });
        assert!(session.is_closed);

        session.abort_timers();
        assert!(session.timers.is_empty());
    }
}
