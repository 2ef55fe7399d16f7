//! Structured logging configuration.
//!
//! Library records emitted through the `log` facade are forwarded into the
//! same subscriber, so session and console logs share one output.

use padel_score::{Match, TeamSlot};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var and default to
/// `info`. Logs go to stderr so they don't interleave with the scoreboard.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a scoring action together with the resulting score
///
/// # Arguments
///
/// * `action` - What the judge did (`point`, `undo`, `start`)
/// * `current` - Match state after the action
pub fn log_match_event(action: &str, current: &Match) {
    tracing::info!(
        action = action,
        match_id = %current.id,
        set = current.game_state.current_set,
        sets = %format!(
            "{}-{}",
            current.score.sets(TeamSlot::One),
            current.score.sets(TeamSlot::Two)
        ),
        games = %format!(
            "{}-{}",
            current.score.games(TeamSlot::One),
            current.score.games(TeamSlot::Two)
        ),
        points = %format!(
            "{}-{}",
            current.score_display(TeamSlot::One),
            current.score_display(TeamSlot::Two)
        ),
        tiebreak = current.game_state.tiebreak,
        finished = current.game_state.is_finished,
        "Match event"
    );
}

/// Log an action the engine refused
pub fn log_ignored(action: &str, reason: &str) {
    tracing::warn!(action = action, reason = reason, "Action ignored");
}

#[cfg(test)]
mod tests {
    use super::*;
    use padel_score::{MatchConfig, ScoringAction, Team};

    #[test]
    fn test_log_match_event() {
        // Just ensure it doesn't panic
        let (team1, team2) = Team::default_pair();
        let m = Match::new(team1, team2, MatchConfig::default()).unwrap();
        log_match_event("start", &m);

        let m = m.apply(ScoringAction::Point("team2".into())).unwrap().next;
        log_match_event("point", &m);
    }

    #[test]
    fn test_log_ignored() {
        log_ignored("point", "no active match");
    }
}
