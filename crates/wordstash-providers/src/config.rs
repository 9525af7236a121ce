//! Configuration loading and definition source factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use wordstash_core::traits::DefinitionSource;

use crate::dictionary::{DictionaryApiSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variable overriding `database_path`.
pub const ENV_DB: &str = "WORDSTASH_DB";
/// Environment variable overriding `dictionary_url`.
pub const ENV_DICTIONARY_URL: &str = "WORDSTASH_DICTIONARY_URL";

/// Top-level wordstash configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordstashConfig {
    /// SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Base URL of the dictionary; the word is appended as a path segment.
    #[serde(default = "default_dictionary_url")]
    pub dictionary_url: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Pause between fetches during a bulk refresh.
    #[serde(default = "default_refresh_pause")]
    pub refresh_pause_ms: u64,
    /// Offset used to derive a lookup's calendar date. Unset means the
    /// machine's local offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
    /// Question cap applied when `quiz` is run without `-n`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_quiz_questions: Option<usize>,
}

fn default_database_path() -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(".local").join("share"))
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("wordstash")
        .join("wordstash.db")
}
fn default_dictionary_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_refresh_pause() -> u64 {
    500
}

impl Default for WordstashConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            dictionary_url: default_dictionary_url(),
            request_timeout_secs: default_timeout(),
            refresh_pause_ms: default_refresh_pause(),
            utc_offset_minutes: None,
            default_quiz_questions: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `wordstash.toml` in the current directory
/// 2. `~/.config/wordstash/config.toml`
///
/// Environment variable overrides: `WORDSTASH_DB`, `WORDSTASH_DICTIONARY_URL`.
pub fn load_config() -> Result<WordstashConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<WordstashConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("wordstash.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<WordstashConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => WordstashConfig::default(),
    };

    // Apply env var overrides
    if let Ok(db) = std::env::var(ENV_DB) {
        config.database_path = PathBuf::from(db);
    }
    if let Ok(url) = std::env::var(ENV_DICTIONARY_URL) {
        config.dictionary_url = url;
    }

    config.dictionary_url = resolve_env_vars(&config.dictionary_url);
    config.database_path = PathBuf::from(resolve_env_vars(&config.database_path.to_string_lossy()));

    if let Some(minutes) = config.utc_offset_minutes {
        anyhow::ensure!(
            minutes.abs() < 24 * 60,
            "utc_offset_minutes must be within ±1439, got {minutes}"
        );
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("wordstash"))
}

/// Create the definition source described by the configuration.
pub fn create_source(config: &WordstashConfig) -> Result<Box<dyn DefinitionSource>> {
    let source = DictionaryApiSource::new(&config.dictionary_url, config.request_timeout_secs)?;
    Ok(Box::new(source))
}

/// Starter configuration written by `wordstash init`.
pub const SAMPLE_CONFIG: &str = r#"# wordstash configuration

# database_path = "${HOME}/.local/share/wordstash/wordstash.db"
dictionary_url = "https://api.dictionaryapi.dev/api/v2/entries/en"
request_timeout_secs = 10

# Pause between requests when refreshing many cached definitions.
refresh_pause_ms = 500

# Minutes east of UTC used to date lookups. Defaults to the local offset.
# utc_offset_minutes = 0

# default_quiz_questions = 10
"#;
