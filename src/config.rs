use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Which notification channel surfaces submit results. Exactly one is
/// active per run; the three are functionally equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Inline transient banner, auto-dismissed after five seconds.
    #[default]
    Banner,
    /// Leave the view and surface the message on the way out.
    Redirect,
    /// Blocking popup that must be acknowledged with a keypress.
    Modal,
}

impl FromStr for NotifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banner" => Ok(Self::Banner),
            "redirect" => Ok(Self::Redirect),
            "modal" => Ok(Self::Modal),
            other => Err(format!(
                "unknown notifier '{}' (expected banner, redirect, or modal)",
                other
            )),
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Banner => write!(f, "banner"),
            Self::Redirect => write!(f, "redirect"),
            Self::Modal => write!(f, "modal"),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct Config {
    pub base_url: String,
    pub csrf_token: String,
    #[serde(default)]
    pub notifier: NotifierKind,
    /// Hide the email column in the member list. Persisted so the choice
    /// survives restarts, like the dashboard's collapsed-sidebar flag.
    #[serde(default)]
    pub compact: bool,
}

pub const CONFIG_KEYS: &[&str] = &["base_url", "csrf_token", "notifier", "compact"];

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = get_config_file_path()?;

        if !config_path.exists() {
            return Err(ConfigError::ConfigNotFound);
        }

        let content =
            fs::read_to_string(&config_path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = get_config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content =
            toml::to_string(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(&config_path, content).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "base_url" => self.base_url = value.trim_end_matches('/').to_string(),
            "csrf_token" => self.csrf_token = value.to_string(),
            "notifier" => {
                self.notifier = value
                    .parse()
                    .map_err(|e: String| ConfigError::InvalidValue(e))?
            }
            "compact" => {
                self.compact = value.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!("'{}' is not a boolean", value))
                })?
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        match key {
            "base_url" => Ok(self.base_url.clone()),
            "csrf_token" => Ok(self.csrf_token.clone()),
            "notifier" => Ok(self.notifier.to_string()),
            "compact" => Ok(self.compact.to_string()),
            other => Err(ConfigError::UnknownKey(other.to_string())),
        }
    }
}

fn get_config_file_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    Ok(config_dir.join("sysassign").join("config.toml"))
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "configuration not found. Run 'sysassign config set base_url <url>' and 'sysassign config set csrf_token <token>' first"
    )]
    ConfigNotFound,
    #[error("could not find config directory")]
    ConfigDirNotFound,
    #[error("failed to read config file: {0}")]
    ReadError(String),
    #[error("failed to write config file: {0}")]
    WriteError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("failed to serialize config: {0}")]
    SerializeError(String),
    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}
