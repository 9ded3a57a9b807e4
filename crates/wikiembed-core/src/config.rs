//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys split on `__`, e.g. `APP_EMBED__CHECKPOINT__INTERVAL=500`).
//! The `[embed]` table is extracted into [`EmbedSettings`], with every missing
//! key falling back to its default.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{CheckpointBoundary, RowLimit};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        debug!(env = %env_name, "configuration loaded");

        Ok(Self { figment })
    }

    /// Build a config from an in-memory TOML document (no files, no env).
    pub fn from_toml_str(toml: &str) -> Self {
        Self { figment: Figment::new().merge(Toml::string(toml)) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Extract the `[embed]` table. Type errors (e.g. a negative interval)
    /// surface as `Error::InvalidConfig`.
    pub fn embed_settings(&self) -> Result<EmbedSettings> {
        let settings = self
            .figment
            .focus("embed")
            .extract::<EmbedSettings>()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        debug!(endpoint = %settings.endpoint, input_column = %settings.input_column, checkpointing = settings.checkpoint.enabled, "embed settings resolved");
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub endpoint: String,
    pub wiki_language: String,
    pub input_column: String,
    pub process_all: bool,
    pub sample_rows: usize,
    pub timeout_secs: Option<u64>,
    pub show_progress: bool,
    pub checkpoint: CheckpointSettings,
    pub retry: RetrySettings,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/embed".to_string(),
            wiki_language: "enwiki".to_string(),
            input_column: "Abstract".to_string(),
            process_all: false,
            sample_rows: 50,
            timeout_secs: None,
            show_progress: true,
            checkpoint: CheckpointSettings::default(),
            retry: RetrySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointSettings {
    pub enabled: bool,
    pub interval: usize,
    pub dir: String,
    pub boundary: CheckpointBoundary,
}

impl Default for CheckpointSettings {
    fn default() -> Self {
        Self { enabled: false, interval: 1000, dir: "checkpoints".to_string(), boundary: CheckpointBoundary::Successes }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self { max_attempts: 1, initial_backoff_ms: 500, max_backoff_ms: 16_000 }
    }
}

impl EmbedSettings {
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::InvalidConfig("embedding endpoint is empty".into()));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!("embedding endpoint must be http(s): {endpoint}")));
        }
        if self.input_column.trim().is_empty() {
            return Err(Error::InvalidConfig("input column name is empty".into()));
        }
        if !self.process_all && self.sample_rows == 0 {
            return Err(Error::InvalidConfig("sample_rows must be a positive integer".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::InvalidConfig("retry.max_attempts must be a positive integer".into()));
        }
        if self.checkpoint.enabled {
            if self.checkpoint.interval == 0 {
                return Err(Error::InvalidConfig("checkpoint.interval must be a positive integer".into()));
            }
            if self.checkpoint.dir.trim().is_empty() {
                return Err(Error::InvalidConfig("checkpoint.dir is required when checkpointing is enabled".into()));
            }
        }
        Ok(())
    }

    pub fn row_limit(&self) -> RowLimit {
        if self.process_all { RowLimit::All } else { RowLimit::Sample(self.sample_rows) }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Checkpoint directory after `~`/`$VAR` expansion, or `None` when
    /// checkpointing is disabled.
    pub fn checkpoint_dir(&self) -> Option<PathBuf> {
        self.checkpoint.enabled.then(|| expand_path(&self.checkpoint.dir))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
