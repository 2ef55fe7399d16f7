//! Match entities: teams, score counters, game flags and the match aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::config::MatchConfig;
use super::functional::{format_elapsed, score_label};

/// Identity of a team within a match. Surrounding whitespace is trimmed on
/// every construction path, deserialization included.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TeamId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<TeamId> for String {
    fn from(value: TeamId) -> Self {
        value.0
    }
}

/// Side/color tag of a team on the scoreboard
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColor {
    Blue,
    Red,
}

impl fmt::Display for TeamColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamColor::Blue => write!(f, "blue"),
            TeamColor::Red => write!(f, "red"),
        }
    }
}

/// A team taking part in the match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Player names in order. Blank names are never stored.
    #[serde(default)]
    pub players: Vec<String>,
    pub color: TeamColor,
}

impl Team {
    pub fn new(id: impl Into<TeamId>, name: &str, color: TeamColor) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            players: Vec::new(),
            color,
        }
    }

    /// Attach player names, dropping blank entries.
    pub fn with_players<I, S>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.players = players
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        self
    }

    /// The two teams offered by the configuration screen before any edits.
    pub fn default_pair() -> (Team, Team) {
        (
            Team::new("team1", "Equipo 1", TeamColor::Blue),
            Team::new("team2", "Equipo 2", TeamColor::Red),
        )
    }
}

/// Which of the two match teams a counter belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TeamSlot {
    One,
    Two,
}

impl TeamSlot {
    /// The slot with the larger value. Ties go to team two, as callers only
    /// ask once a strict lead exists.
    pub fn leader(team1: u32, team2: u32) -> Self {
        if team1 > team2 {
            TeamSlot::One
        } else {
            TeamSlot::Two
        }
    }
}

/// Point, game and set counters for both teams.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub team1_points: u32,
    pub team2_points: u32,
    pub team1_games: u32,
    pub team2_games: u32,
    pub team1_sets: u32,
    pub team2_sets: u32,
}

impl Score {
    pub fn points(&self, slot: TeamSlot) -> u32 {
        match slot {
            TeamSlot::One => self.team1_points,
            TeamSlot::Two => self.team2_points,
        }
    }

    pub fn games(&self, slot: TeamSlot) -> u32 {
        match slot {
            TeamSlot::One => self.team1_games,
            TeamSlot::Two => self.team2_games,
        }
    }

    pub fn sets(&self, slot: TeamSlot) -> u32 {
        match slot {
            TeamSlot::One => self.team1_sets,
            TeamSlot::Two => self.team2_sets,
        }
    }

    pub(crate) fn points_mut(&mut self, slot: TeamSlot) -> &mut u32 {
        match slot {
            TeamSlot::One => &mut self.team1_points,
            TeamSlot::Two => &mut self.team2_points,
        }
    }

    pub(crate) fn games_mut(&mut self, slot: TeamSlot) -> &mut u32 {
        match slot {
            TeamSlot::One => &mut self.team1_games,
            TeamSlot::Two => &mut self.team2_games,
        }
    }

    pub(crate) fn sets_mut(&mut self, slot: TeamSlot) -> &mut u32 {
        match slot {
            TeamSlot::One => &mut self.team1_sets,
            TeamSlot::Two => &mut self.team2_sets,
        }
    }

    pub(crate) fn reset_points(&mut self) {
        self.team1_points = 0;
        self.team2_points = 0;
    }

    pub(crate) fn reset_games(&mut self) {
        self.team1_games = 0;
        self.team2_games = 0;
    }
}

/// Flags describing where the match currently stands.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// 1-based number of the set being played
    pub current_set: u32,
    pub is_finished: bool,
    /// Set if and only if `is_finished` is true
    pub winner: Option<TeamId>,
    /// The current game is a 7-point tiebreak
    pub tiebreak: bool,
    /// Both teams are level at 40 or beyond in a standard game
    pub deuce: bool,
    /// Team holding advantage, traditional mode only
    pub advantage: Option<TeamId>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_set: 1,
            is_finished: false,
            winner: None,
            tiebreak: false,
            deuce: false,
            advantage: None,
        }
    }
}

/// The match aggregate.
///
/// Every scoring action produces a new `Match` value (see [`Match::apply`]);
/// a `Match` that has been handed out is never mutated behind the holder's
/// back.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub team1: Team,
    pub team2: Team,
    pub score: Score,
    pub game_state: GameState,
    pub config: MatchConfig,
    pub start_time: DateTime<Utc>,
    /// When the deciding set was won
    pub finished_at: Option<DateTime<Utc>>,
    /// Flips every time the teams are asked to change ends
    pub side_changed: bool,
}

impl Match {
    pub fn team(&self, slot: TeamSlot) -> &Team {
        match slot {
            TeamSlot::One => &self.team1,
            TeamSlot::Two => &self.team2,
        }
    }

    /// Slot of the team with this id, if it plays in this match
    pub fn slot_of(&self, team_id: &TeamId) -> Option<TeamSlot> {
        if *team_id == self.team1.id {
            Some(TeamSlot::One)
        } else if *team_id == self.team2.id {
            Some(TeamSlot::Two)
        } else {
            None
        }
    }

    pub fn team_by_id(&self, team_id: &TeamId) -> Option<&Team> {
        self.slot_of(team_id).map(|slot| self.team(slot))
    }

    pub fn winner_team(&self) -> Option<&Team> {
        self.game_state
            .winner
            .as_ref()
            .and_then(|id| self.team_by_id(id))
    }

    /// Scoreboard label for one team's points in the current game
    pub fn score_display(&self, slot: TeamSlot) -> String {
        score_label(
            self.score.points(slot),
            self.game_state.tiebreak,
            self.game_state.deuce,
            self.game_state.advantage.as_ref(),
            &self.team(slot).id,
        )
    }

    /// Whole seconds played, frozen once the match is finished
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let end = self.finished_at.unwrap_or(now);
        (end - self.start_time).num_seconds().max(0) as u64
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn elapsed_display(&self, now: DateTime<Utc>) -> String {
        format_elapsed(self.elapsed_secs(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_match() -> Match {
        let (team1, team2) = Team::default_pair();
        Match::new(team1, team2, MatchConfig::default()).unwrap()
    }

    #[test]
    fn test_team_id_trims() {
        assert_eq!(TeamId::new("  team1 "), TeamId::from("team1"));
        assert_eq!(TeamId::from("team1".to_string()).as_str(), "team1");
    }

    #[test]
    fn test_team_id_trimmed_when_deserialized() {
        let json = r#"{"id":" court-a ","name":"Pista A","color":"blue"}"#;
        let team: Team = serde_json::from_str(json).unwrap();
        assert_eq!(team.id, TeamId::from(" court-a "));
        assert_eq!(team.id.as_str(), "court-a");
        assert_eq!(serde_json::to_value(&team.id).unwrap(), "court-a");
    }

    #[test]
    fn test_team_with_players_filters_blanks() {
        let team = Team::new("a", "Alpha", TeamColor::Blue).with_players(["Ana", "  ", "Luis "]);
        assert_eq!(team.players, vec!["Ana".to_string(), "Luis".to_string()]);
    }

    #[test]
    fn test_default_pair() {
        let (team1, team2) = Team::default_pair();
        assert_eq!(team1.id.as_str(), "team1");
        assert_eq!(team1.color, TeamColor::Blue);
        assert_eq!(team2.name, "Equipo 2");
        assert_eq!(team2.color, TeamColor::Red);
    }

    #[test]
    fn test_leader() {
        assert_eq!(TeamSlot::leader(4, 2), TeamSlot::One);
        assert_eq!(TeamSlot::leader(2, 4), TeamSlot::Two);
    }

    #[test]
    fn test_slot_lookup() {
        let m = sample_match();
        assert_eq!(m.slot_of(&TeamId::new("team1")), Some(TeamSlot::One));
        assert_eq!(m.slot_of(&TeamId::new("team2")), Some(TeamSlot::Two));
        assert_eq!(m.slot_of(&TeamId::new("team3")), None);
        assert!(m.winner_team().is_none());
    }

    #[test]
    fn test_elapsed_freezes_when_finished() {
        let mut m = sample_match();
        let later = m.start_time + Duration::seconds(3_725);
        assert_eq!(m.elapsed_secs(later), 3_725);
        assert_eq!(m.elapsed_display(later), "01:02:05");

        m.finished_at = Some(m.start_time + Duration::seconds(90));
        assert_eq!(m.elapsed_secs(later), 90);
    }

    #[test]
    fn test_match_serializes_camel_case() {
        let m = sample_match();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["gameState"]["currentSet"], 1);
        assert_eq!(json["score"]["team1Points"], 0);
        assert_eq!(json["team1"]["color"], "blue");
        assert_eq!(json["sideChanged"], false);
    }
}
