//! Configuration file loading for game sessions.
//!
//! Settings live in `games.toml` in the working directory. Every field has a
//! default, so a missing file or a partial one is fine.

use board_engine::ai::DEFAULT_SEARCH_DEPTH;
use board_engine::Difficulty;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Artificial delay before the computer moves, per difficulty.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ThinkDelays {
    #[serde(default = "default_easy_delay")]
    pub easy: u64,
    #[serde(default = "default_medium_delay")]
    pub medium: u64,
    #[serde(default = "default_hard_delay")]
    pub hard: u64,
}

fn default_easy_delay() -> u64 {
    500
}

fn default_medium_delay() -> u64 {
    1000
}

fn default_hard_delay() -> u64 {
    1500
}

impl Default for ThinkDelays {
    fn default() -> Self {
        ThinkDelays {
            easy: default_easy_delay(),
            medium: default_medium_delay(),
            hard: default_hard_delay(),
        }
    }
}

impl ThinkDelays {
    /// Returns the delay for a difficulty.
    pub fn for_difficulty(&self, difficulty: Difficulty) -> Duration {
        let ms = match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        };
        Duration::from_millis(ms)
    }

    /// No delay at any difficulty.
    pub fn none() -> Self {
        ThinkDelays {
            easy: 0,
            medium: 0,
            hard: 0,
        }
    }
}

/// Computer opponent settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// Search depth of the hard opponent. Defaults to 3.
    #[serde(default = "default_search_depth")]
    pub search_depth: u8,
    /// Think delays in milliseconds.
    #[serde(default)]
    pub think_delay_ms: ThinkDelays,
}

fn default_search_depth() -> u8 {
    DEFAULT_SEARCH_DEPTH
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            search_depth: default_search_depth(),
            think_delay_ms: ThinkDelays::default(),
        }
    }
}

/// Per-move clock for the human player.
///
/// When enabled and the limit passes without a move, a random legal move is
/// played on the player's behalf.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_move_time_limit")]
    pub move_time_limit_secs: u64,
}

fn default_move_time_limit() -> u64 {
    30
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            enabled: false,
            move_time_limit_secs: default_move_time_limit(),
        }
    }
}

impl ClockConfig {
    /// Returns the limit if the clock is enabled.
    pub fn limit(&self) -> Option<Duration> {
        self.enabled
            .then(|| Duration::from_secs(self.move_time_limit_secs))
    }
}

/// Main session configuration structure.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Starting difficulty of the computer opponent.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// SQLite file holding the high-score lists.
    #[serde(default = "default_scores_db")]
    pub scores_db: PathBuf,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

fn default_scores_db() -> PathBuf {
    PathBuf::from("data/scores.db")
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            difficulty: Difficulty::default(),
            scores_db: default_scores_db(),
            ai: AiConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Loads the configuration from [`Self::config_path()`].
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from a specific file, falling back to the
    /// defaults when it does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        PathBuf::from("games.toml")
    }
}
