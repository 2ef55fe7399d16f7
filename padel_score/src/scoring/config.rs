//! Match configuration models.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Only best-of-3 and best-of-5 matches are played
    #[error("best of {0} sets is not supported (expected 3 or 5)")]
    InvalidBestOf(u8),

    /// A textual setting didn't match any known variant
    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    /// A setting is out of its allowed range
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Number of sets the match is played over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BestOf {
    Three,
    Five,
}

impl BestOf {
    /// Total number of sets that can be played
    pub fn sets(self) -> u32 {
        match self {
            BestOf::Three => 3,
            BestOf::Five => 5,
        }
    }

    /// Sets a team needs to win the match
    pub fn sets_to_win(self) -> u32 {
        self.sets().div_ceil(2)
    }
}

impl TryFrom<u8> for BestOf {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(BestOf::Three),
            5 => Ok(BestOf::Five),
            other => Err(ConfigError::InvalidBestOf(other)),
        }
    }
}

impl From<BestOf> for u8 {
    fn from(value: BestOf) -> Self {
        match value {
            BestOf::Three => 3,
            BestOf::Five => 5,
        }
    }
}

impl fmt::Display for BestOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sets())
    }
}

impl FromStr for BestOf {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s.trim().parse().map_err(|_| ConfigError::UnknownValue {
            field: "best of sets",
            value: s.to_string(),
        })?;
        BestOf::try_from(value)
    }
}

/// Deuce handling variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    /// Advantage must be won and then converted
    Traditional,
    /// At 40-40 the next point decides the game
    GoldenPoint,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Traditional => write!(f, "traditional"),
            GameMode::GoldenPoint => write!(f, "golden-point"),
        }
    }
}

impl FromStr for GameMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "traditional" => Ok(GameMode::Traditional),
            "golden-point" | "golden_point" | "golden" => Ok(GameMode::GoldenPoint),
            _ => Err(ConfigError::UnknownValue {
                field: "game mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Language of the status message texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Es,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Es => write!(f, "es"),
            Language::En => write!(f, "en"),
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" => Ok(Language::Es),
            "en" => Ok(Language::En),
            _ => Err(ConfigError::UnknownValue {
                field: "language",
                value: s.to_string(),
            }),
        }
    }
}

/// Where point events come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    /// Court sensors report points
    Sensors,
    /// A judge enters points manually
    Judge,
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlMode::Sensors => write!(f, "sensors"),
            ControlMode::Judge => write!(f, "judge"),
        }
    }
}

impl FromStr for ControlMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sensors" => Ok(ControlMode::Sensors),
            "judge" => Ok(ControlMode::Judge),
            _ => Err(ConfigError::UnknownValue {
                field: "control mode",
                value: s.to_string(),
            }),
        }
    }
}

/// When a completed set asks the teams to change ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SideChangeRule {
    /// Odd total of the game counters after they were reset for the new set.
    /// The counters are always 0 at that point, so this never signals.
    #[default]
    ResetGameTotal,
    /// Odd total of games played in the set that just finished
    CompletedSetOddTotal,
}

impl SideChangeRule {
    /// Whether a finished set with these game counts triggers a side change
    pub fn triggers(self, completed_set_games: u32) -> bool {
        match self {
            SideChangeRule::ResetGameTotal => {
                let reset_total = 0u32;
                reset_total % 2 == 1
            }
            SideChangeRule::CompletedSetOddTotal => completed_set_games % 2 == 1,
        }
    }
}

impl fmt::Display for SideChangeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SideChangeRule::ResetGameTotal => write!(f, "reset-game-total"),
            SideChangeRule::CompletedSetOddTotal => write!(f, "completed-set-odd-total"),
        }
    }
}

impl FromStr for SideChangeRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reset-game-total" => Ok(SideChangeRule::ResetGameTotal),
            "completed-set-odd-total" => Ok(SideChangeRule::CompletedSetOddTotal),
            _ => Err(ConfigError::UnknownValue {
                field: "side change rule",
                value: s.to_string(),
            }),
        }
    }
}

/// Match configuration, fixed for the lifetime of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchConfig {
    /// Best of 3 or 5 sets
    pub best_of_sets: BestOf,

    /// Traditional advantage or golden point
    pub game_mode: GameMode,

    /// Language of status messages
    pub language: Language,

    /// Sensors or judge input
    pub control_mode: ControlMode,

    /// Side change signalling after a set
    #[serde(default)]
    pub side_change: SideChangeRule,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            best_of_sets: BestOf::Three,
            game_mode: GameMode::Traditional,
            language: Language::Es,
            control_mode: ControlMode::Sensors,
            side_change: SideChangeRule::default(),
        }
    }
}

impl MatchConfig {
    /// Sets a team needs to win the match
    pub fn sets_to_win(&self) -> u32 {
        self.best_of_sets.sets_to_win()
    }
}
