//! Rule constants shared by the scoring transitions and the display helpers.

/// Conventional labels for 0, 1, 2 and 3 points in a standard game.
pub const POINT_LABELS: [&str; 4] = ["0", "15", "30", "40"];

/// Label shown for the team holding advantage.
pub const ADVANTAGE_LABEL: &str = "AD";

/// Points both teams need before the game enters deuce (40-40).
pub const DEUCE_THRESHOLD: u32 = 3;

/// Points that win a standard game when the opponent is below deuce.
pub const GAME_POINTS: u32 = 4;

/// Points required to take a tiebreak game.
pub const TIEBREAK_POINTS: u32 = 7;

/// Games required to take a set.
pub const SET_GAMES: u32 = 6;

/// Games-all score that starts a tiebreak.
pub const TIEBREAK_AT_GAMES: u32 = 6;

/// Minimum lead to close a tiebreak, a traditional game or a set.
pub const MIN_LEAD: u32 = 2;
