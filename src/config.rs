//! Server configuration.

use crate::games::morpion::Mark;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strum::EnumCount;
use tracing::{debug, info, instrument};

/// Largest accepted grid side length.
pub const MAX_GRID_SIZE: usize = 100;

/// Rules every new match is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct MatchSettings {
    /// Seats per match.
    #[serde(default = "default_max_players")]
    max_players: usize,

    /// Side length of the square grid.
    #[serde(default = "default_grid_size")]
    grid_size: usize,

    /// Run length needed to win.
    #[serde(default = "default_win_condition")]
    win_condition: usize,
}

fn default_max_players() -> usize {
    2
}

fn default_grid_size() -> usize {
    3
}

fn default_win_condition() -> usize {
    3
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self::new(
            default_max_players(),
            default_grid_size(),
            default_win_condition(),
        )
    }
}

impl MatchSettings {
    /// Seats per match.
    pub fn max_players(&self) -> usize {
        self.max_players
    }

    /// Side length of the square grid.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Run length needed to win.
    pub fn win_condition(&self) -> usize {
        self.win_condition
    }

    /// Checks the settings describe a playable match.
    #[instrument]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_players < 2 || self.max_players > Mark::COUNT {
            return Err(ConfigError::new(format!(
                "max_players must be between 2 and {}, got {}",
                Mark::COUNT,
                self.max_players
            )));
        }
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(ConfigError::new(format!(
                "grid_size must be between 1 and {}, got {}",
                MAX_GRID_SIZE, self.grid_size
            )));
        }
        if self.win_condition == 0 || self.win_condition > self.grid_size {
            return Err(ConfigError::new(format!(
                "win_condition must be between 1 and grid_size ({}), got {}",
                self.grid_size, self.win_condition
            )));
        }
        Ok(())
    }
}

/// Configuration for the game server.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds an unfinished match may go without a join or move before it is closed.
    #[serde(default = "default_lobby_idle_timeout_secs")]
    lobby_idle_timeout_secs: u64,

    /// Seconds between sweeps for idle or deserted matches.
    #[serde(default = "default_sweep_interval_secs")]
    sweep_interval_secs: u64,

    /// Match rules.
    #[serde(default)]
    game: MatchSettings,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_lobby_idle_timeout_secs() -> u64 {
    600
}

fn default_sweep_interval_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            lobby_idle_timeout_secs: default_lobby_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
            game: MatchSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Replaces host and port with command-line values when given.
    #[instrument(skip(self))]
    pub fn with_address(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Checks every field is usable.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lobby_idle_timeout_secs == 0 {
            return Err(ConfigError::new(
                "lobby_idle_timeout_secs must be positive".to_string(),
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::new(
                "sweep_interval_secs must be positive".to_string(),
            ));
        }
        self.game.validate()
    }

    /// How long an unfinished match may go without a join or move.
    pub fn lobby_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.lobby_idle_timeout_secs)
    }

    /// Period of the idle-lobby sweep.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
