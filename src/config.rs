//! Configuration loading and management.
//!
//! Configuration is loaded with the following precedence:
//! 1. Environment variables (`MEMKEEPER_*`)
//! 2. Config file (`~/.memkeeper/config.toml`)
//! 3. Defaults

use crate::core::FinalizeOptions;
use crate::error::{Error, Result};
use crate::storage::file::get_memkeeper_home;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,

    /// Interview behavior.
    pub interview: InterviewConfig,

    /// Signal provider configuration.
    pub signals: SignalsConfig,

    /// Extra questions.
    pub questions: QuestionsConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding `stories/`.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: get_memkeeper_home(),
        }
    }
}

/// Interview configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Answers with at most this many words count as short.
    pub short_response_words: usize,

    /// Characters of the opening answer kept in a story title.
    pub title_chars: usize,

    /// Estimated minutes of speech per user turn.
    pub minutes_per_turn: u32,

    /// Seed for question selection; random when unset.
    pub seed: Option<u64>,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            short_response_words: 20,
            title_chars: 40,
            minutes_per_turn: 2,
            seed: None,
        }
    }
}

impl InterviewConfig {
    /// Story construction options.
    #[must_use]
    pub fn finalize_options(&self) -> FinalizeOptions {
        FinalizeOptions {
            title_chars: self.title_chars,
            minutes_per_turn: self.minutes_per_turn,
        }
    }
}

/// Signal provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalsConfig {
    /// Whether to run the providers at all.
    pub enabled: bool,

    /// Per-provider budget in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 2000,
        }
    }
}

impl SignalsConfig {
    /// Provider budget as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Extra questions, appended to the built-in pools.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QuestionsConfig {
    /// Topic name → additional questions.
    pub extra: HashMap<String, Vec<String>>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load configuration with precedence: env vars → file → defaults.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
pub fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let config_path = get_config_path();
    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        config = parse_config(&contents)?;
    }

    apply_overrides(&mut config, |key| env::var(key).ok());

    Ok(config)
}

/// Parse a TOML config document.
///
/// # Errors
///
/// Returns `Error::Config` if the document is invalid.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))
}

/// Get the path to the config file.
fn get_config_path() -> PathBuf {
    if let Ok(path) = env::var("MEMKEEPER_CONFIG") {
        return PathBuf::from(path);
    }
    get_memkeeper_home().join("config.toml")
}

/// Apply `MEMKEEPER_*` overrides read through `lookup`. Unparsable numbers are ignored.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("MEMKEEPER_STORAGE_PATH") {
        config.storage.path = PathBuf::from(path);
    } else if let Some(home) = lookup("MEMKEEPER_HOME") {
        config.storage.path = PathBuf::from(home);
    }

    if let Some(words) = lookup("MEMKEEPER_SHORT_RESPONSE_WORDS").and_then(|v| v.parse().ok()) {
        config.interview.short_response_words = words;
    }

    if let Some(ms) = lookup("MEMKEEPER_SIGNAL_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        config.signals.timeout_ms = ms;
    }

    if let Some(seed) = lookup("MEMKEEPER_SEED").and_then(|v| v.parse().ok()) {
        config.interview.seed = Some(seed);
    }

    if let Some(level) = lookup("MEMKEEPER_LOG") {
        config.log.level = level;
    }
}
