//! Judge console commands and scoreboard rendering.

use chrono::{DateTime, Utc};
use padel_score::{Match, SessionSnapshot, TeamSlot};
use std::fmt::Write;
use thiserror::Error;

pub const COMMANDS_HELP: &str = "\
  1  point for team 1
  2  point for team 2
  u  undo last point
  s  show scoreboard
  n  start a new match
  h  show this help
  q  quit";

/// A line typed by the judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Point(TeamSlot),
    Undo,
    Status,
    NewMatch,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Empty command. Type 'h' to see available commands")]
    Empty,

    #[error("Unrecognized command '{0}'. Type 'h' to see available commands")]
    UnrecognizedCommand(String),
}

/// Parse a console line into a [`Command`].
///
/// Single-letter shortcuts and their long names are both accepted, case
/// insensitive.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    match trimmed.to_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "1" => Ok(Command::Point(TeamSlot::One)),
        "2" => Ok(Command::Point(TeamSlot::Two)),
        "u" | "undo" => Ok(Command::Undo),
        "s" | "status" => Ok(Command::Status),
        "n" | "new" => Ok(Command::NewMatch),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Render the scoreboard for a snapshot as plain text.
pub fn render(snapshot: &SessionSnapshot, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let Some(current) = snapshot.current_match.as_ref() else {
        out.push_str("No match in progress. Type 'n' to start one.\n");
        return out;
    };

    let name_width = current
        .team1
        .name
        .chars()
        .count()
        .max(current.team2.name.chars().count());

    let _ = writeln!(
        out,
        "{:name_width$}  SETS  GAMES  POINTS",
        "",
        name_width = name_width
    );
    for slot in [TeamSlot::One, TeamSlot::Two] {
        let _ = writeln!(out, "{}", team_row(current, slot, name_width));
    }

    let _ = writeln!(out, "{}", match_line(current, now));

    if snapshot.show_victory_screen
        && let Some(winner) = current.winner_team()
    {
        let _ = writeln!(out, "*** {} ***", winner.name.to_uppercase());
    }

    let status = &snapshot.status;
    if status.visible {
        match status.countdown {
            Some(secs) => {
                let _ = writeln!(out, ">> {} ({}s)", status.text, secs);
            }
            None => {
                let _ = writeln!(out, ">> {}", status.text);
            }
        }
    }

    out
}

fn team_row(current: &Match, slot: TeamSlot, name_width: usize) -> String {
    let team = current.team(slot);
    let mut row = format!(
        "{:name_width$}  {:>4}  {:>5}  {:>6}",
        team.name,
        current.score.sets(slot),
        current.score.games(slot),
        current.score_display(slot),
        name_width = name_width
    );

    if !team.players.is_empty() {
        let _ = write!(row, "   ({})", team.players.join(" / "));
    }

    row
}

fn match_line(current: &Match, now: DateTime<Utc>) -> String {
    let state = &current.game_state;

    let phase = if state.is_finished {
        "finished"
    } else if state.tiebreak {
        "tiebreak"
    } else if state.advantage.is_some() {
        "advantage"
    } else if state.deuce {
        "deuce"
    } else {
        "in play"
    };

    format!(
        "Set {} of {} | {} | {} | {}",
        state.current_set,
        current.config.best_of_sets,
        current.config.game_mode,
        current.elapsed_display(now),
        phase
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use padel_score::{MatchConfig, ScoringAction, StatusMessage, Team};

    fn snapshot_of(current: Option<Match>) -> SessionSnapshot {
        SessionSnapshot {
            current_match: current,
            status: StatusMessage::default(),
            show_victory_screen: false,
        }
    }

    fn new_match() -> Match {
        let (team1, team2) = Team::default_pair();
        Match::new(team1.with_players(["Ana", "Bea"]), team2, MatchConfig::default()).unwrap()
    }

    // === Command parsing ===

    #[test]
    fn test_parse_points() {
        assert_eq!(parse_command("1"), Ok(Command::Point(TeamSlot::One)));
        assert_eq!(parse_command(" 2 "), Ok(Command::Point(TeamSlot::Two)));
    }

    #[test]
    fn test_parse_shortcuts_and_names() {
        assert_eq!(parse_command("u"), Ok(Command::Undo));
        assert_eq!(parse_command("UNDO"), Ok(Command::Undo));
        assert_eq!(parse_command("s"), Ok(Command::Status));
        assert_eq!(parse_command("n"), Ok(Command::NewMatch));
        assert_eq!(parse_command("?"), Ok(Command::Help));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   "), Err(ParseError::Empty));
        assert_eq!(
            parse_command("3"),
            Err(ParseError::UnrecognizedCommand("3".to_string()))
        );
        let msg = parse_command("lob").unwrap_err().to_string();
        assert!(msg.contains("'lob'"));
    }

    // === Rendering ===

    #[test]
    fn test_render_without_match() {
        let out = render(&snapshot_of(None), Utc::now());
        assert!(out.contains("No match in progress"));
    }

    #[test]
    fn test_render_scores_and_players() {
        let m = new_match();
        let now = m.start_time + Duration::seconds(754);
        let m = m.apply(ScoringAction::Point("team1".into())).unwrap().next;

        let out = render(&snapshot_of(Some(m)), now);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[1].starts_with("Equipo 1"));
        assert!(lines[1].trim_end().ends_with("(Ana / Bea)"));
        assert!(lines[1].contains("15"));
        assert!(lines[2].starts_with("Equipo 2"));
        assert!(lines[3].contains("Set 1 of 3"));
        assert!(lines[3].contains("00:12:34"));
        assert!(lines[3].ends_with("in play"));
    }

    #[test]
    fn test_render_visible_status_with_countdown() {
        let mut snapshot = snapshot_of(Some(new_match()));
        snapshot.status = StatusMessage::new(
            padel_score::StatusKind::SideChange,
            "Cambio de lado".to_string(),
        )
        .with_countdown(60);

        let out = render(&snapshot, Utc::now());
        assert!(out.contains(">> Cambio de lado (60s)"));

        snapshot.status.visible = false;
        let out = render(&snapshot, Utc::now());
        assert!(!out.contains(">>"));
    }

    #[test]
    fn test_render_victory() {
        let mut m = new_match();
        while !m.game_state.is_finished {
            m = m.apply(ScoringAction::Point("team2".into())).unwrap().next;
        }
        let mut snapshot = snapshot_of(Some(m));
        snapshot.show_victory_screen = true;

        let out = render(&snapshot, Utc::now());
        assert!(out.contains("*** EQUIPO 2 ***"));
        assert!(out.contains("finished"));
    }
}
