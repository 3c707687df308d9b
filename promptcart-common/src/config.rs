//! Bootstrap configuration loaded from a TOML file
//!
//! Resolution order for the configuration file:
//! 1. Explicit path (command-line `--config`)
//! 2. `<config dir>/promptcart/promptcart.toml`
//! 3. Compiled defaults
//!
//! A missing file is never fatal: the service logs a warning and starts with
//! the compiled defaults. A file that exists but fails to parse is an error.
//!
//! Runtime preferences (credential, endpoint, theme, language) do NOT live
//! here; they are stored in the `settings` table and change while running.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name used under the platform config/data dirs
pub const APP_DIR_NAME: &str = "promptcart";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "promptcart.toml";

/// Bootstrap configuration
///
/// These settings cannot change while the service runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Directory holding the preferences database
    ///
    /// Defaults to the platform data dir when not specified.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Taxonomy JSON document (bundled sample taxonomy when not specified)
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    /// Event bus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Translation service configuration
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Prompt optimizer configuration
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Translation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Base URL of the translation API
    #[serde(default = "default_translation_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,
}

/// Prompt optimizer configuration
///
/// The endpoint and credential are user preferences, not bootstrap config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Generative model identifier
    #[serde(default = "default_optimizer_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_optimizer_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_bind_address() -> String {
    "127.0.0.1:5306".to_string()
}

fn default_event_capacity() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_translation_base_url() -> String {
    "https://api.mymemory.translated.net".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    20
}

fn default_optimizer_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_optimizer_timeout_secs() -> u64 {
    60
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            data_dir: None,
            taxonomy_path: None,
            event_capacity: default_event_capacity(),
            logging: LoggingConfig::default(),
            translation: TranslationConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            base_url: default_translation_base_url(),
            timeout_secs: default_translation_timeout_secs(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            model: default_optimizer_model(),
            timeout_secs: default_optimizer_timeout_secs(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration, falling back to defaults when no file exists
    ///
    /// `explicit` is the command-line path; when given it must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => default_config_path().filter(|p| p.exists()),
        };

        match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
                let config = Self::from_toml_str(&content)?;
                info!("Configuration loaded from {}", path.display());
                Ok(config)
            }
            None => {
                warn!("No configuration file found, using compiled defaults");
                Ok(Self::default())
            }
        }
    }

    /// Directory holding the preferences database
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Path of the preferences database file
    pub fn database_path(&self) -> PathBuf {
        self.resolve_data_dir().join("promptcart.db")
    }
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// OS-dependent default data directory
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("./promptcart_data"))
}
