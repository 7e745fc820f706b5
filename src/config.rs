use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::npc_import::{CommitMode, ValidationPolicy, DEFAULT_COMMAND, DEFAULT_SENDER};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "NPC_BRIDGE_CONFIG";
/// Prefix for per-key environment overrides, `__` separating sections.
pub const ENV_PREFIX: &str = "NPC_BRIDGE_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub command: CommandConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

/// Chat command behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandConfig {
    /// Command token recognised on the api channel.
    pub token: String,
    /// Sender name on whispered replies.
    pub sender: String,
    pub policy: ValidationPolicy,
    pub commit: CommitMode,
}

/// Input bounds. `0` disables a limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_payload_bytes: usize,
    pub max_list_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    pub format: LogFormat,
    /// Also write daily-rolling JSON logs here.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command: CommandConfig::default(),
            limits: LimitsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            token: DEFAULT_COMMAND.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            policy: ValidationPolicy::Presence,
            commit: CommitMode::Direct,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_payload_bytes: 64 * 1024,
            max_list_len: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Compact,
            log_dir: None,
        }
    }
}

impl LimitsConfig {
    pub fn payload_limit(&self) -> Option<usize> {
        (self.max_payload_bytes > 0).then_some(self.max_payload_bytes)
    }

    pub fn list_limit(&self) -> Option<usize> {
        (self.max_list_len > 0).then_some(self.max_list_len)
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then `NPC_BRIDGE_*` variables.
    ///
    /// A file that exists but does not parse is an error, never a silent
    /// fallback to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        let config = Self::from_sources(Some(&path))?;
        tracing::debug!("Configuration resolved (file: {})", path.display());
        Ok(config)
    }

    /// Merge defaults, an optional TOML file, and the environment.
    pub fn from_sources(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .map(|d| d.join("npc-bridge").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
