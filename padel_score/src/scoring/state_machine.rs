//! Scoring state machine.
//!
//! A point propagates through game, set and match outcomes in that order.
//! Transitions are pure: [`Match::apply`] never touches `self` and returns the
//! next match value together with the events the action produced.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use super::config::{GameMode, MatchConfig};
use super::constants::{
    DEUCE_THRESHOLD, GAME_POINTS, MIN_LEAD, SET_GAMES, TIEBREAK_AT_GAMES, TIEBREAK_POINTS,
};
use super::entities::{GameState, Match, Score, Team, TeamId, TeamSlot};

/// Reasons a scoring action leaves the match untouched.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum MatchError {
    #[error("no active match")]
    NoActiveMatch,
    #[error("match already finished")]
    MatchFinished,
    #[error("team {0} is not playing this match")]
    UnknownTeam(TeamId),
    #[error("both teams use the id {0}")]
    DuplicateTeamId(TeamId),
}

/// Actions an operator or a sensor can take on a running match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ScoringAction {
    Point(TeamId),
    UndoLastPoint,
}

/// Things that happened while applying an action, in the order they happened.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum MatchEvent {
    PointScored(TeamId),
    Deuce,
    Advantage(TeamId),
    GameWon { team: TeamId, tiebreak: bool },
    TiebreakStarted,
    SetWon { team: TeamId, set_number: u32 },
    SideChange,
    MatchWon(TeamId),
    /// The team whose point was removed, if any point could be removed
    PointUndone(Option<TeamId>),
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PointScored(team) => format!("point for {team}"),
            Self::Deuce => "deuce".to_string(),
            Self::Advantage(team) => format!("advantage {team}"),
            Self::GameWon { team, tiebreak } => {
                if *tiebreak {
                    format!("{team} won the tiebreak")
                } else {
                    format!("game {team}")
                }
            }
            Self::TiebreakStarted => "tiebreak at 6-6".to_string(),
            Self::SetWon { team, set_number } => format!("set {set_number} to {team}"),
            Self::SideChange => "change sides".to_string(),
            Self::MatchWon(team) => format!("{team} won the match"),
            Self::PointUndone(Some(team)) => format!("point removed from {team}"),
            Self::PointUndone(None) => "nothing to undo".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// Result of applying a [`ScoringAction`].
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub next: Match,
    pub events: Vec<MatchEvent>,
}

impl Transition {
    pub fn finished_match(&self) -> bool {
        self.events
            .iter()
            .any(|event| matches!(event, MatchEvent::MatchWon(_)))
    }
}

impl Match {
    /// Creates a match with zeroed counters, starting now.
    pub fn new(team1: Team, team2: Team, config: MatchConfig) -> Result<Self, MatchError> {
        Self::new_at(team1, team2, config, Utc::now())
    }

    pub fn new_at(
        team1: Team,
        team2: Team,
        config: MatchConfig,
        start_time: DateTime<Utc>,
    ) -> Result<Self, MatchError> {
        if team1.id == team2.id {
            return Err(MatchError::DuplicateTeamId(team1.id));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            team1,
            team2,
            score: Score::default(),
            game_state: GameState::default(),
            config,
            start_time,
            finished_at: None,
            side_changed: false,
        })
    }

    /// Applies an action at the current time.
    pub fn apply(&self, action: ScoringAction) -> Result<Transition, MatchError> {
        self.apply_at(action, Utc::now())
    }

    /// Applies an action, stamping `now` as the finish time if it ends the
    /// match.
    pub fn apply_at(
        &self,
        action: ScoringAction,
        now: DateTime<Utc>,
    ) -> Result<Transition, MatchError> {
        if self.game_state.is_finished {
            return Err(MatchError::MatchFinished);
        }

        let mut next = self.clone();
        let mut events = Vec::new();

        match action {
            ScoringAction::Point(team_id) => {
                let slot = self
                    .slot_of(&team_id)
                    .ok_or(MatchError::UnknownTeam(team_id))?;
                next.point_won(slot, now, &mut events);
            }
            ScoringAction::UndoLastPoint => next.undo_last_point(&mut events),
        }

        debug!("Match {}: {:?}", self.id, events);
        Ok(Transition { next, events })
    }

    fn point_won(&mut self, slot: TeamSlot, now: DateTime<Utc>, events: &mut Vec<MatchEvent>) {
        *self.score.points_mut(slot) += 1;
        events.push(MatchEvent::PointScored(self.team(slot).id.clone()));

        let team1 = self.score.team1_points;
        let team2 = self.score.team2_points;

        if self.game_state.tiebreak {
            if team1.max(team2) >= TIEBREAK_POINTS && team1.abs_diff(team2) >= MIN_LEAD {
                self.game_state.tiebreak = false;
                self.award_game(TeamSlot::leader(team1, team2), true, now, events);
            }
            return;
        }

        if team1 >= DEUCE_THRESHOLD && team2 >= DEUCE_THRESHOLD {
            match (self.config.game_mode, team1.abs_diff(team2)) {
                (_, 0) => {
                    self.game_state.deuce = true;
                    self.game_state.advantage = None;
                    events.push(MatchEvent::Deuce);
                }
                (GameMode::Traditional, 1) => {
                    let leader = self.team(TeamSlot::leader(team1, team2)).id.clone();
                    self.game_state.deuce = true;
                    self.game_state.advantage = Some(leader.clone());
                    events.push(MatchEvent::Advantage(leader));
                }
                // Golden point decides on the first point after 40-40, a
                // traditional game needs the two-point lead.
                _ => self.award_game(TeamSlot::leader(team1, team2), false, now, events),
            }
        } else if team1 >= GAME_POINTS || team2 >= GAME_POINTS {
            self.award_game(TeamSlot::leader(team1, team2), false, now, events);
        }
    }

    fn award_game(
        &mut self,
        slot: TeamSlot,
        tiebreak: bool,
        now: DateTime<Utc>,
        events: &mut Vec<MatchEvent>,
    ) {
        *self.score.games_mut(slot) += 1;
        self.score.reset_points();
        self.game_state.deuce = false;
        self.game_state.advantage = None;
        events.push(MatchEvent::GameWon {
            team: self.team(slot).id.clone(),
            tiebreak,
        });

        self.check_set_won(tiebreak, now, events);
    }

    fn check_set_won(
        &mut self,
        after_tiebreak: bool,
        now: DateTime<Utc>,
        events: &mut Vec<MatchEvent>,
    ) {
        let team1 = self.score.team1_games;
        let team2 = self.score.team2_games;

        if team1 == TIEBREAK_AT_GAMES && team2 == TIEBREAK_AT_GAMES {
            self.game_state.tiebreak = true;
            events.push(MatchEvent::TiebreakStarted);
            return;
        }

        // A won tiebreak closes the set at 7-6.
        let set_won = after_tiebreak
            || (team1.max(team2) >= SET_GAMES && team1.abs_diff(team2) >= MIN_LEAD);
        if !set_won {
            return;
        }

        let slot = TeamSlot::leader(team1, team2);
        let winner = self.team(slot).id.clone();
        *self.score.sets_mut(slot) += 1;
        self.score.reset_games();
        events.push(MatchEvent::SetWon {
            team: winner.clone(),
            set_number: self.game_state.current_set,
        });

        if self.score.sets(slot) >= self.config.sets_to_win() {
            self.finish(slot, now, events);
            return;
        }

        self.game_state.current_set += 1;

        if self.config.side_change.triggers(team1 + team2) {
            self.side_changed = !self.side_changed;
            events.push(MatchEvent::SideChange);
        }
    }

    fn finish(&mut self, slot: TeamSlot, now: DateTime<Utc>, events: &mut Vec<MatchEvent>) {
        let winner = self.team(slot).id.clone();
        self.game_state.is_finished = true;
        self.game_state.winner = Some(winner.clone());
        self.finished_at = Some(now);
        events.push(MatchEvent::MatchWon(winner));
    }

    /// Removes one point from the current game. Team one is checked first;
    /// completed games, sets and tiebreak transitions are never reverted.
    fn undo_last_point(&mut self, events: &mut Vec<MatchEvent>) {
        let undone = if self.score.team1_points > 0 {
            Some(TeamSlot::One)
        } else if self.score.team2_points > 0 {
            Some(TeamSlot::Two)
        } else {
            None
        };

        if let Some(slot) = undone {
            *self.score.points_mut(slot) -= 1;
        }

        if self.score.team1_points < DEUCE_THRESHOLD || self.score.team2_points < DEUCE_THRESHOLD {
            self.game_state.deuce = false;
            self.game_state.advantage = None;
        }

        events.push(MatchEvent::PointUndone(
            undone.map(|slot| self.team(slot).id.clone()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::config::{BestOf, SideChangeRule};

    fn new_match(config: MatchConfig) -> Match {
        let (team1, team2) = Team::default_pair();
        Match::new(team1, team2, config).unwrap()
    }

    fn team1() -> TeamId {
        TeamId::new("team1")
    }

    fn team2() -> TeamId {
        TeamId::new("team2")
    }

    fn play(m: Match, points: &[&TeamId]) -> Match {
        points.iter().fold(m, |m, team| {
            m.apply(ScoringAction::Point((*team).clone())).unwrap().next
        })
    }

    fn play_games(m: Match, team: &TeamId, games: usize) -> Match {
        (0..games * 4).fold(m, |m, _| play(m, &[team]))
    }

    #[test]
    fn test_duplicate_team_ids_rejected() {
        let (team, _) = Team::default_pair();
        let result = Match::new(team.clone(), team, MatchConfig::default());
        assert_eq!(result, Err(MatchError::DuplicateTeamId(TeamId::new("team1"))));
    }

    #[test]
    fn test_apply_is_pure() {
        let m = new_match(MatchConfig::default());
        let transition = m.apply(ScoringAction::Point(team1())).unwrap();
        assert_eq!(m.score.team1_points, 0);
        assert_eq!(transition.next.score.team1_points, 1);
        assert_eq!(transition.events, vec![MatchEvent::PointScored(team1())]);
    }

    #[test]
    fn test_unknown_team_rejected() {
        let m = new_match(MatchConfig::default());
        let err = m
            .apply(ScoringAction::Point(TeamId::new("ghosts")))
            .unwrap_err();
        assert_eq!(err, MatchError::UnknownTeam(TeamId::new("ghosts")));
    }

    #[test]
    fn test_love_game() {
        let m = play(new_match(MatchConfig::default()), &[&team1(); 4]);
        assert_eq!(m.score.team1_games, 1);
        assert_eq!(m.score.team1_points, 0);
        assert!(!m.game_state.deuce);
    }

    #[test]
    fn test_game_at_forty_thirty() {
        let t1 = team1();
        let t2 = team2();
        let m = play(
            new_match(MatchConfig::default()),
            &[&t1, &t1, &t1, &t2, &t2],
        );
        assert_eq!((m.score.team1_points, m.score.team2_points), (3, 2));
        let m = play(m, &[&t1]);
        assert_eq!(m.score.team1_games, 1);
        assert_eq!((m.score.team1_points, m.score.team2_points), (0, 0));
    }

    #[test]
    fn test_advantage_lost_returns_to_deuce() {
        let t1 = team1();
        let t2 = team2();
        let m = play(
            new_match(MatchConfig::default()),
            &[&t1, &t1, &t1, &t2, &t2, &t2, &t2],
        );
        assert!(m.game_state.deuce);
        assert_eq!(m.game_state.advantage, Some(team2()));

        let m = play(m, &[&t1]);
        assert!(m.game_state.deuce);
        assert_eq!(m.game_state.advantage, None);
    }

    #[test]
    fn test_golden_point_never_gives_advantage() {
        let config = MatchConfig {
            game_mode: GameMode::GoldenPoint,
            ..MatchConfig::default()
        };
        let t1 = team1();
        let t2 = team2();
        let m = play(new_match(config), &[&t1, &t1, &t1, &t2, &t2, &t2]);
        assert!(m.game_state.deuce);

        let transition = m.apply(ScoringAction::Point(team1())).unwrap();
        assert!(transition.events.contains(&MatchEvent::GameWon {
            team: team1(),
            tiebreak: false
        }));
        assert_eq!(transition.next.game_state.advantage, None);
        assert!(!transition.next.game_state.deuce);
    }

    #[test]
    fn test_six_four_wins_set() {
        let t1 = team1();
        let t2 = team2();
        let mut m = new_match(MatchConfig::default());
        for _ in 0..4 {
            m = play_games(m, &t1, 1);
            m = play_games(m, &t2, 1);
        }
        assert_eq!((m.score.team1_games, m.score.team2_games), (4, 4));
        m = play_games(m, &t1, 2);
        assert_eq!(m.score.team1_sets, 1);
        assert_eq!((m.score.team1_games, m.score.team2_games), (0, 0));
        assert_eq!(m.game_state.current_set, 2);
    }

    #[test]
    fn test_six_five_does_not_win_set() {
        let t1 = team1();
        let t2 = team2();
        let mut m = new_match(MatchConfig::default());
        for _ in 0..5 {
            m = play_games(m, &t1, 1);
            m = play_games(m, &t2, 1);
        }
        m = play_games(m, &t1, 1);
        assert_eq!((m.score.team1_games, m.score.team2_games), (6, 5));
        assert_eq!(m.score.team1_sets, 0);
        assert!(!m.game_state.tiebreak);
    }

    #[test]
    fn test_tiebreak_needs_two_point_lead() {
        let t1 = team1();
        let t2 = team2();
        let mut m = new_match(MatchConfig::default());
        for _ in 0..6 {
            m = play_games(m, &t1, 1);
            m = play_games(m, &t2, 1);
        }
        assert!(m.game_state.tiebreak);

        for _ in 0..6 {
            m = play(m, &[&t1, &t2]);
        }
        m = play(m, &[&t1]);
        assert_eq!((m.score.team1_points, m.score.team2_points), (7, 6));
        assert!(m.game_state.tiebreak);
        assert_eq!(m.score_display(TeamSlot::One), "7");

        m = play(m, &[&t1]);
        assert!(!m.game_state.tiebreak);
        assert_eq!(m.score.team1_sets, 1);
        assert_eq!((m.score.team1_points, m.score.team2_points), (0, 0));
    }

    #[test]
    fn test_side_change_after_odd_set() {
        let config = MatchConfig {
            side_change: SideChangeRule::CompletedSetOddTotal,
            ..MatchConfig::default()
        };
        let t1 = team1();
        let t2 = team2();
        let mut m = new_match(config);
        m = play_games(m, &t2, 3);
        m = play_games(m, &t1, 5);
        assert_eq!((m.score.team1_games, m.score.team2_games), (5, 3));
        assert!(!m.side_changed);

        m = play(m, &[&t1, &t1, &t1]);
        let transition = m.apply(ScoringAction::Point(t1.clone())).unwrap();
        assert!(transition.events.contains(&MatchEvent::SideChange));
        assert!(transition.next.side_changed);
    }

    #[test]
    fn test_default_rule_never_signals_side_change() {
        let t1 = team1();
        let t2 = team2();
        let mut m = new_match(MatchConfig::default());
        m = play_games(m, &t2, 3);
        m = play_games(m, &t1, 5);
        m = play(m, &[&t1, &t1, &t1]);
        let transition = m.apply(ScoringAction::Point(t1)).unwrap();
        assert!(!transition.events.contains(&MatchEvent::SideChange));
        assert!(!transition.next.side_changed);
    }

    #[test]
    fn test_best_of_five_needs_three_sets() {
        let config = MatchConfig {
            best_of_sets: BestOf::Five,
            ..MatchConfig::default()
        };
        let t1 = team1();
        let mut m = play_games(new_match(config), &t1, 12);
        assert_eq!(m.score.team1_sets, 2);
        assert!(!m.game_state.is_finished);
        assert_eq!(m.game_state.current_set, 3);

        m = play_games(m, &t1, 6);
        assert!(m.game_state.is_finished);
        assert_eq!(m.game_state.winner, Some(team1()));
        assert_eq!(m.game_state.current_set, 3);
        assert!(m.finished_at.is_some());
    }

    #[test]
    fn test_finished_match_rejects_actions() {
        let t2 = team2();
        let m = play_games(new_match(MatchConfig::default()), &t2, 12);
        assert!(m.game_state.is_finished);
        assert_eq!(
            m.apply(ScoringAction::Point(team1())),
            Err(MatchError::MatchFinished)
        );
        assert_eq!(
            m.apply(ScoringAction::UndoLastPoint),
            Err(MatchError::MatchFinished)
        );
    }

    #[test]
    fn test_undo_prefers_team_one() {
        let t1 = team1();
        let t2 = team2();
        let m = play(new_match(MatchConfig::default()), &[&t2, &t1, &t2]);
        let transition = m.apply(ScoringAction::UndoLastPoint).unwrap();
        assert_eq!(transition.next.score.team1_points, 0);
        assert_eq!(transition.next.score.team2_points, 2);
        assert_eq!(transition.events, vec![MatchEvent::PointUndone(Some(team1()))]);
    }

    #[test]
    fn test_undo_with_no_points() {
        let m = new_match(MatchConfig::default());
        let transition = m.apply(ScoringAction::UndoLastPoint).unwrap();
        assert_eq!(transition.next.score, m.score);
        assert_eq!(transition.events, vec![MatchEvent::PointUndone(None)]);
    }

    #[test]
    fn test_undo_out_of_deuce_clears_flags() {
        let t1 = team1();
        let t2 = team2();
        let m = play(
            new_match(MatchConfig::default()),
            &[&t1, &t1, &t1, &t2, &t2, &t2],
        );
        assert!(m.game_state.deuce);
        let m = m.apply(ScoringAction::UndoLastPoint).unwrap().next;
        assert_eq!((m.score.team1_points, m.score.team2_points), (2, 3));
        assert!(!m.game_state.deuce);
        assert_eq!(m.game_state.advantage, None);
    }

    #[test]
    fn test_event_display() {
        assert_eq!(MatchEvent::PointScored(team1()).to_string(), "point for team1");
        assert_eq!(
            MatchEvent::SetWon {
                team: team2(),
                set_number: 2
            }
            .to_string(),
            "set 2 to team2"
        );
        assert_eq!(MatchEvent::PointUndone(None).to_string(), "nothing to undo");
    }
}
