//! Session timing configuration.

use serde::{Deserialize, Serialize};
use tokio::time::Duration;

use crate::scoring::ConfigError;

/// Delays used by the session's display timers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimings {
    /// How long a point (or set/match) status message stays visible
    pub point_status_ms: u64,

    /// How long the "point undone" message stays visible
    pub undo_status_ms: u64,

    /// How long a finished match stays on the board before it is cleared
    pub victory_reset_secs: u64,

    /// Countdown attached to the side change message
    pub side_change_countdown_secs: u32,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            point_status_ms: 2_000,
            undo_status_ms: 1_500,
            victory_reset_secs: 60,
            side_change_countdown_secs: 60,
        }
    }
}

impl SessionTimings {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_status_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "point status duration",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.undo_status_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "undo status duration",
                reason: "must be greater than 0".to_string(),
            });
        }

        if self.victory_reset_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "victory reset delay",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn point_status(&self) -> Duration {
        Duration::from_millis(self.point_status_ms)
    }

    pub fn undo_status(&self) -> Duration {
        Duration::from_millis(self.undo_status_ms)
    }

    pub fn victory_reset(&self) -> Duration {
        Duration::from_secs(self.victory_reset_secs)
    }
}
