//! Pure helpers for rendering score state.

use super::constants::{ADVANTAGE_LABEL, DEUCE_THRESHOLD, POINT_LABELS};
use super::entities::TeamId;

/// Scoreboard label for one team's points.
///
/// - tiebreak: the raw point count
/// - deuce: "AD" for the team holding advantage, "40" otherwise
/// - 3 points or more: "40"
/// - otherwise the conventional 0/15/30 ladder
#[must_use]
pub fn score_label(
    points: u32,
    tiebreak: bool,
    deuce: bool,
    advantage: Option<&TeamId>,
    team_id: &TeamId,
) -> String {
    if tiebreak {
        return points.to_string();
    }

    if deuce {
        return if advantage == Some(team_id) {
            ADVANTAGE_LABEL.to_string()
        } else {
            POINT_LABELS[DEUCE_THRESHOLD as usize].to_string()
        };
    }

    if points >= DEUCE_THRESHOLD {
        return POINT_LABELS[DEUCE_THRESHOLD as usize].to_string();
    }

    POINT_LABELS
        .get(points as usize)
        .copied()
        .unwrap_or(POINT_LABELS[0])
        .to_string()
}

/// Formats a number of seconds as `HH:MM:SS`.
#[must_use]
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
