//! Transient status messages shown on the scoreboard.

use serde::{Deserialize, Serialize};

use crate::scoring::{Language, Match, MatchEvent, TeamId};

/// Status message categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    Point,
    SideChange,
    SetWon,
    MatchWon,
    Info,
}

/// The status pulse: shown on an event, hidden by a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub text: String,
    /// Seconds to count down on screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<u32>,
    pub visible: bool,
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self {
            kind: StatusKind::Info,
            text: String::new(),
            countdown: None,
            visible: false,
        }
    }
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: String) -> Self {
        Self {
            kind,
            text,
            countdown: None,
            visible: true,
        }
    }

    pub fn with_countdown(mut self, secs: u32) -> Self {
        self.countdown = Some(secs);
        self
    }

    /// Builds the message for the most significant event of an action:
    /// match won, then side change, then set won, then point scored.
    pub fn for_events(
        events: &[MatchEvent],
        current: &Match,
        side_change_countdown_secs: u32,
    ) -> Option<Self> {
        let language = current.config.language;
        let name = |id: &TeamId| {
            current
                .team_by_id(id)
                .map(|team| team.name.clone())
                .unwrap_or_else(|| id.to_string())
        };

        events
            .iter()
            .filter_map(|event| {
                let message = match event {
                    MatchEvent::MatchWon(team) => Self::new(
                        StatusKind::MatchWon,
                        match_won_text(language, &name(team)),
                    ),
                    MatchEvent::SideChange => {
                        Self::new(StatusKind::SideChange, side_change_text(language))
                            .with_countdown(side_change_countdown_secs)
                    }
                    MatchEvent::SetWon { team, .. } => {
                        Self::new(StatusKind::SetWon, set_won_text(language, &name(team)))
                    }
                    MatchEvent::PointScored(team) => {
                        Self::new(StatusKind::Point, point_text(language, &name(team)))
                    }
                    MatchEvent::PointUndone(_) => {
                        Self::new(StatusKind::Info, undo_text(language))
                    }
                    _ => return None,
                };
                Some(message)
            })
            .max_by_key(|message| priority(message.kind))
    }
}

fn priority(kind: StatusKind) -> u8 {
    match kind {
        StatusKind::Info => 0,
        StatusKind::Point => 1,
        StatusKind::SetWon => 2,
        StatusKind::SideChange => 3,
        StatusKind::MatchWon => 4,
    }
}

fn point_text(language: Language, team: &str) -> String {
    match language {
        Language::Es => format!("Punto para {team}"),
        Language::En => format!("Point for {team}"),
    }
}

fn set_won_text(language: Language, team: &str) -> String {
    match language {
        Language::Es => format!("Set para {team}"),
        Language::En => format!("Set to {team}"),
    }
}

fn match_won_text(language: Language, team: &str) -> String {
    match language {
        Language::Es => format!("¡{team} ganó!"),
        Language::En => format!("{team} wins!"),
    }
}

fn side_change_text(language: Language) -> String {
    match language {
        Language::Es => "Cambio de lado".to_string(),
        Language::En => "Change sides".to_string(),
    }
}

fn undo_text(language: Language) -> String {
    match language {
        Language::Es => "Punto deshecho".to_string(),
        Language::En => "Point undone".to_string(),
    }
}
