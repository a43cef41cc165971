//! Configuration loading and persistence.
//!
//! Settings come from `config.json` in the config directory, then environment
//! variables override individual fields. The CLI applies its own flags on top.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::time::Duration;
use std::{fs, path::PathBuf};

use crate::constants;
use crate::hub::ConnectionInfo;

/// Configuration for the erl-comm client.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Hub endpoint URL.
    pub hub_url: String,
    /// Robot identifier issued by the competition.
    pub robot_id: String,
    /// Competition identifier.
    pub competition: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hub_url: constants::DEFAULT_HUB_URL.to_string(),
            robot_id: String::new(),
            competition: constants::DEFAULT_COMPETITION.to_string(),
            request_timeout_secs: constants::HTTP_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Returns the configuration directory path, creating it if necessary.
    ///
    /// `ERL_COMM_CONFIG_DIR` overrides the platform config dir
    /// (e.g. `~/.config/erl-comm` on Linux).
    pub fn config_dir() -> Result<PathBuf> {
        let dir = if let Ok(dir) = std::env::var(constants::ENV_CONFIG_DIR) {
            PathBuf::from(dir)
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("erl-comm")
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {}", dir.display()))?;
        Ok(dir)
    }

    /// Loads configuration from file, with environment variable overrides.
    ///
    /// A missing file yields the defaults; an unreadable or invalid file is an error.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?.unwrap_or_default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn load_from_file() -> Result<Option<Self>> {
        let config_path = Self::config_dir()?.join("config.json");
        if !config_path.exists() {
            log::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        check_timeout_secs(config.request_timeout_secs)
            .with_context(|| format!("Invalid request_timeout_secs in {}", config_path.display()))?;
        Ok(Some(config))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(hub_url) = std::env::var(constants::ENV_HUB_URL) {
            self.hub_url = hub_url;
        }

        if let Ok(robot_id) = std::env::var(constants::ENV_ROBOT_ID) {
            self.robot_id = robot_id;
        }

        if let Ok(competition) = std::env::var(constants::ENV_COMPETITION) {
            self.competition = competition;
        }

        if let Ok(timeout) = std::env::var(constants::ENV_HTTP_TIMEOUT) {
            match timeout.parse::<u64>() {
                Ok(secs) if check_timeout_secs(secs).is_ok() => self.request_timeout_secs = secs,
                _ => log::warn!("Ignoring invalid {}={:?}", constants::ENV_HTTP_TIMEOUT, timeout),
            }
        }
    }

    /// Persists the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_dir()?.join("config.json");
        fs::write(&config_path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;

        #[cfg(unix)]
        fs::set_permissions(&config_path, fs::Permissions::from_mode(0o600))?;

        Ok(())
    }

    /// Sets the request timeout, rejecting values the HTTP client cannot use.
    pub fn set_request_timeout_secs(&mut self, secs: u64) -> Result<()> {
        check_timeout_secs(secs)?;
        self.request_timeout_secs = secs;
        Ok(())
    }

    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Connection info for hub calls.
    ///
    /// Fails if no robot id has been configured.
    pub fn connection_info(&self) -> Result<ConnectionInfo> {
        if self.robot_id.trim().is_empty() {
            anyhow::bail!(
                "No robot id configured. Set {} or pass --robot-id.",
                constants::ENV_ROBOT_ID
            );
        }
        Ok(ConnectionInfo::new(
            self.hub_url.clone(),
            self.robot_id.clone(),
            self.competition.clone(),
        ))
    }
}

/// Accepts 1 second up to `MAX_HTTP_REQUEST_TIMEOUT`.
fn check_timeout_secs(secs: u64) -> Result<()> {
    let max = constants::MAX_HTTP_REQUEST_TIMEOUT.as_secs();
    if secs == 0 || secs > max {
        anyhow::bail!("Request timeout must be between 1 and {} seconds, got {}", max, secs);
    }
    Ok(())
}
