//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/contextual-date/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/contextual-date/` (~/.config/contextual-date/)
//! - State/Logs: `$XDG_STATE_HOME/contextual-date/` (~/.local/state/contextual-date/)
//!
//! Example:
//!
//! ```toml
//! language = "fr_FR"
//! template = "%fullDate% (%relativeDate%)"
//! buffer_ms = 250
//!
//! [thresholds]
//! week = 1.5
//!
//! [full_date_formats]
//! today = "HH:mm"
//!
//! [languages.fr_FR]
//! prefix = "il y a"
//! # ... every field of a language pack is required
//! ```

use crate::absolute::FullDateFormats;
use crate::error::{Error, Result};
use crate::language::LanguagePack;
use crate::relative::Thresholds;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Placeholder replaced by the absolute phrase in [`Config::template`].
pub const FULL_DATE_PLACEHOLDER: &str = "%fullDate%";
/// Placeholder replaced by the relative phrase in [`Config::template`].
pub const RELATIVE_DATE_PLACEHOLDER: &str = "%relativeDate%";

const APP_DIR: &str = "contextual-date";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
///
/// Every field may be changed at any time through
/// [`ContextualDate::config_mut`](crate::ContextualDate::config_mut); changes
/// apply from the next formatting call.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Language code override; unknown codes are ignored
    #[serde(default)]
    pub language: Option<String>,

    /// Unit promotion thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Absolute patterns per display category
    #[serde(default)]
    pub full_date_formats: FullDateFormats,

    /// Combined output, with `%fullDate%` and `%relativeDate%` placeholders
    #[serde(default = "default_template")]
    pub template: String,

    /// Return only the relative phrase from `format`
    #[serde(default)]
    pub hide_full_date: bool,

    /// How long (ms) a cached "now" stays valid
    #[serde(default = "default_buffer_ms")]
    pub buffer_ms: u64,

    /// Extra language packs, registered over the built-ins
    #[serde(default)]
    pub languages: HashMap<String, LanguagePack>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: None,
            thresholds: Thresholds::default(),
            full_date_formats: FullDateFormats::default(),
            template: default_template(),
            hide_full_date: false,
            buffer_ms: default_buffer_ms(),
            languages: HashMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_template() -> String {
    format!("{} ({})", FULL_DATE_PLACEHOLDER, RELATIVE_DATE_PLACEHOLDER)
}

fn default_buffer_ms() -> u64 {
    250
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {}", e)))
    }

    /// The configured language, treating an empty string as unset
    pub fn language_code(&self) -> Option<&str> {
        self.language.as_deref().filter(|code| !code.is_empty())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/contextual-date/config.toml` (~/.config/contextual-date/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/contextual-date/` (~/.local/state/contextual-date/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }
}
