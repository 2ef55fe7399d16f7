//! Judge console configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use padel_score::{
    ControlMode, GameMode, Language, MatchConfig, SessionTimings, SideChangeRule, Team, TeamColor,
};
use std::str::FromStr;

/// Complete console configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Rules for every match started from this console
    pub match_config: MatchConfig,
    /// Display timer delays
    pub timings: SessionTimings,
    /// Left-hand team
    pub team1: Team,
    /// Right-hand team
    pub team2: Team,
}

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub best_of: Option<String>,
    pub game_mode: Option<String>,
    pub language: Option<String>,
    pub team1_name: Option<String>,
    pub team2_name: Option<String>,
}

impl JudgeConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable holds a value that can't be parsed
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F, overrides: CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = MatchConfig::default();

        let match_config = MatchConfig {
            best_of_sets: parse_setting(&lookup, "PADEL_BEST_OF", overrides.best_of)?
                .unwrap_or(defaults.best_of_sets),
            game_mode: parse_setting::<GameMode>(&lookup, "PADEL_GAME_MODE", overrides.game_mode)?
                .unwrap_or(defaults.game_mode),
            language: parse_setting::<Language>(&lookup, "PADEL_LANGUAGE", overrides.language)?
                .unwrap_or(defaults.language),
            control_mode: parse_setting::<ControlMode>(&lookup, "PADEL_CONTROL_MODE", None)?
                .unwrap_or(defaults.control_mode),
            side_change: parse_setting::<SideChangeRule>(&lookup, "PADEL_SIDE_CHANGE", None)?
                .unwrap_or(defaults.side_change),
        };

        let default_timings = SessionTimings::default();
        let timings = SessionTimings {
            point_status_ms: parse_env_or(
                &lookup,
                "PADEL_POINT_STATUS_MS",
                default_timings.point_status_ms,
            ),
            undo_status_ms: parse_env_or(
                &lookup,
                "PADEL_UNDO_STATUS_MS",
                default_timings.undo_status_ms,
            ),
            victory_reset_secs: parse_env_or(
                &lookup,
                "PADEL_VICTORY_RESET_SECS",
                default_timings.victory_reset_secs,
            ),
            side_change_countdown_secs: parse_env_or(
                &lookup,
                "PADEL_SIDE_CHANGE_COUNTDOWN_SECS",
                default_timings.side_change_countdown_secs,
            ),
        };

        let (default1, default2) = Team::default_pair();
        let team1 = team_from(
            &lookup,
            "PADEL_TEAM1",
            overrides.team1_name,
            default1,
            TeamColor::Blue,
        );
        let team2 = team_from(
            &lookup,
            "PADEL_TEAM2",
            overrides.team2_name,
            default2,
            TeamColor::Red,
        );

        Ok(JudgeConfig {
            match_config,
            timings,
            team1,
            team2,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timings
            .validate()
            .map_err(|e| ConfigError::Invalid {
                var: "session timings".to_string(),
                reason: e.to_string(),
            })?;

        if self.team1.name == self.team2.name {
            return Err(ConfigError::Invalid {
                var: "PADEL_TEAM2_NAME".to_string(),
                reason: format!("Must differ from team 1 ({})", self.team1.name),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a setting that must be valid when present
fn parse_setting<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    cli_value: Option<String>,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match cli_value.or_else(|| lookup(key)) {
        Some(raw) => raw.parse().map(Some).map_err(|e: T::Err| ConfigError::Invalid {
            var: key.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Build a team from `<prefix>_NAME` and a comma separated `<prefix>_PLAYERS`
fn team_from(
    lookup: &impl Fn(&str) -> Option<String>,
    prefix: &str,
    cli_name: Option<String>,
    default: Team,
    color: TeamColor,
) -> Team {
    let name = cli_name
        .or_else(|| lookup(&format!("{prefix}_NAME")))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or(default.name);

    let players = lookup(&format!("{prefix}_PLAYERS")).unwrap_or_default();

    Team::new(default.id, &name, color).with_players(players.split(','))
}
