use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::generate::DEFAULT_MODEL;
use crate::hevy::DEFAULT_BASE_URL as DEFAULT_HEVY_URL;
use crate::sync::SyncSettings;

const APP_DIR: &str = "aitrainer";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_SYNC_INTERVAL_HOURS: u64 = 6;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// YAML file holding the prompt templates
    pub prompts_path: ConfigValue<PathBuf>,
    /// HTTP API port
    pub port: ConfigValue<u16>,
    /// Hevy API token; sync and matching are disabled without one
    #[serde(serialize_with = "mask_secret")]
    pub hevy_token: Option<ConfigValue<String>>,
    pub hevy_base_url: ConfigValue<String>,
    /// Hours between background sync runs
    pub sync_interval_hours: ConfigValue<u64>,
    pub openrouter_model: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    prompts_path: Option<PathBuf>,
    port: Option<u16>,
    hevy_token: Option<String>,
    hevy_base_url: Option<String>,
    sync_interval_hours: Option<u64>,
    openrouter_model: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_db_path = Self::default_data_dir().join("aitrainer.db");
        let default_prompts_path = Self::default_config_dir().join("prompts.yaml");

        // Start with defaults
        let mut database_path = ConfigValue::new(default_db_path, ConfigSource::Default);
        let mut prompts_path = ConfigValue::new(default_prompts_path, ConfigSource::Default);
        let mut port = ConfigValue::new(DEFAULT_PORT, ConfigSource::Default);
        let mut hevy_token = None;
        let mut hevy_base_url =
            ConfigValue::new(DEFAULT_HEVY_URL.to_string(), ConfigSource::Default);
        let mut sync_interval_hours =
            ConfigValue::new(DEFAULT_SYNC_INTERVAL_HOURS, ConfigSource::Default);
        let mut openrouter_model =
            ConfigValue::new(DEFAULT_MODEL.to_string(), ConfigSource::Default);
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            let file_config: ConfigFile = if contents.trim().is_empty() {
                ConfigFile::default()
            } else {
                serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path.clone(), e))?
            };

            if let Some(db_path) = file_config.database_path {
                database_path.set(resolve_relative(&path, db_path), ConfigSource::File);
            }
            if let Some(prompts) = file_config.prompts_path {
                prompts_path.set(resolve_relative(&path, prompts), ConfigSource::File);
            }
            if let Some(p) = file_config.port {
                port.set(p, ConfigSource::File);
            }
            if let Some(token) = file_config.hevy_token.filter(|t| !t.trim().is_empty()) {
                hevy_token = Some(ConfigValue::new(token, ConfigSource::File));
            }
            if let Some(url) = file_config.hevy_base_url {
                hevy_base_url.set(url, ConfigSource::File);
            }
            if let Some(hours) = file_config.sync_interval_hours {
                sync_interval_hours.set(hours, ConfigSource::File);
            }
            if let Some(model) = file_config.openrouter_model {
                openrouter_model.set(model, ConfigSource::File);
            }

            config_file = Some(path);
        }

        // Apply environment variable overrides
        if let Some(db_path) = env("AITRAINER_DATABASE_PATH") {
            database_path.set(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Some(prompts) = env("AITRAINER_PROMPTS_PATH") {
            prompts_path.set(PathBuf::from(prompts), ConfigSource::Environment);
        }
        if let Some(raw) = env("AITRAINER_PORT") {
            port.set(parse_env("AITRAINER_PORT", &raw)?, ConfigSource::Environment);
        }
        if let Some(token) = env("HEVY_TOKEN").filter(|t| !t.trim().is_empty()) {
            hevy_token = Some(ConfigValue::new(token, ConfigSource::Environment));
        }
        if let Some(url) = env("HEVY_BASE_URL") {
            hevy_base_url.set(url, ConfigSource::Environment);
        }
        if let Some(raw) = env("HEVY_SYNC_INTERVAL_HOURS") {
            let hours = parse_env("HEVY_SYNC_INTERVAL_HOURS", &raw)?;
            sync_interval_hours.set(hours, ConfigSource::Environment);
        }
        if let Some(model) = env("OPENROUTER_MODEL") {
            openrouter_model.set(model, ConfigSource::Environment);
        }

        if sync_interval_hours.value == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync_interval_hours".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_path,
            prompts_path,
            port,
            hevy_token,
            hevy_base_url,
            sync_interval_hours,
            openrouter_model,
            config_file,
        })
    }

    pub fn hevy_token(&self) -> Option<&str> {
        self.hevy_token.as_ref().map(|t| t.value.as_str())
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings::default().with_interval_hours(self.sync_interval_hours.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/aitrainer/
    /// - macOS: ~/Library/Application Support/aitrainer/
    /// - Windows: %APPDATA%/aitrainer/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/aitrainer/
    /// - macOS: ~/Library/Application Support/aitrainer/
    /// - Windows: %APPDATA%/aitrainer/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Resolve relative paths against the config file's directory
fn resolve_relative(config_path: &Path, value: PathBuf) -> PathBuf {
    if value.is_relative() {
        config_path
            .parent()
            .map(|p| p.join(&value))
            .unwrap_or(value)
    } else {
        value
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

fn mask_secret<S: Serializer>(
    value: &Option<ConfigValue<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    value
        .as_ref()
        .map(|v| ConfigValue::new("********", v.source.clone()))
        .serialize(serializer)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),

    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, serde_yaml::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}
