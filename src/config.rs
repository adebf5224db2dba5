//! Runtime configuration: defaults, then `config.toml`, then `GIT_USER_*`
//! environment variables (a `.env` file is honored through dotenvy).

use crate::ui::components::theme::ThemeName;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_CONFIG: &str = "GIT_USER_CONFIG";
pub const ENV_DB: &str = "GIT_USER_DB";
pub const ENV_TIMEOUT_MS: &str = "GIT_USER_TIMEOUT_MS";
pub const ENV_GIT: &str = "GIT_USER_GIT";
pub const ENV_THEME: &str = "GIT_USER_THEME";
pub const ENV_LOG: &str = "GIT_USER_LOG";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "users.sqlite3";

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite file holding saved identities.
    pub db_path: PathBuf,
    /// Bound on every store call and git invocation.
    pub timeout_ms: u64,
    pub git_binary: String,
    pub theme: ThemeName,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Import the current git author(s) before the session starts.
    pub hydrate_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_config_dir().join(DB_FILE_NAME),
            timeout_ms: 2000,
            git_binary: "git".to_string(),
            theme: ThemeName::Dark,
            log_level: "info".to_string(),
            hydrate_on_start: true,
        }
    }
}

impl Config {
    /// Load from the process environment and the config file it points at.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| dotenvy::var(key).ok())
    }

    /// Load with an explicit environment lookup.
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = env(ENV_CONFIG)
            .filter(|p| !p.trim().is_empty())
            .map_or_else(default_config_file, PathBuf::from);
        let mut config = Self::from_file(&path)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path`; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let set = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(db) = set(ENV_DB) {
            self.db_path = PathBuf::from(db);
        }
        if let Some(raw) = set(ENV_TIMEOUT_MS) {
            self.timeout_ms = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_MS,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(git) = set(ENV_GIT) {
            self.git_binary = git;
        }
        if let Some(raw) = set(ENV_THEME) {
            self.theme = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                key: ENV_THEME,
                value: raw.clone(),
                reason,
            })?;
        }
        if let Some(level) = set(ENV_LOG) {
            self.log_level = level;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_ms",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.git_binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "git_binary",
                value: self.git_binary.clone(),
                reason: "must name an executable".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

pub fn default_config_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "git-user", "git-user").map_or_else(
        || PathBuf::from(".git-user"),
        |dirs| dirs.config_dir().to_path_buf(),
    )
}

pub fn default_config_file() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}
