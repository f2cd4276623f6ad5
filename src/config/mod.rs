//! Process-wide generator configuration.
//!
//! Everything the generator needs is carried by an explicit [`GeneratorConfig`]
//! passed in at construction time. It can be assembled from the environment
//! (optionally seeded by a `.env` file) or from a TOML file.
//!
//! ## Environment Variables
//! - `LAYOUT_API_URL`: chat-completions endpoint of the model provider (required)
//! - `LAYOUT_API_KEY`: bearer credential (required)
//! - `LAYOUT_MODEL`: model identifier (required)
//! - `LAYOUT_MAX_RETRIES`: retries after the first call, defaults to 2, at most 10
//! - `LAYOUT_TIMEOUT_SECS`: per-call timeout, defaults to 15
//! - `LAYOUT_MIN_BLOCKS` / `LAYOUT_MAX_BLOCKS`: block count policy, defaults to 1 and 8

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const ENV_API_URL: &str = "LAYOUT_API_URL";
pub const ENV_API_KEY: &str = "LAYOUT_API_KEY";
pub const ENV_MODEL: &str = "LAYOUT_MODEL";
pub const ENV_MAX_RETRIES: &str = "LAYOUT_MAX_RETRIES";
pub const ENV_TIMEOUT_SECS: &str = "LAYOUT_TIMEOUT_SECS";
pub const ENV_MIN_BLOCKS: &str = "LAYOUT_MIN_BLOCKS";
pub const ENV_MAX_BLOCKS: &str = "LAYOUT_MAX_BLOCKS";

/// Upper bound on `max_retries`; every retry is a paid model call.
pub const MAX_RETRY_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Bounds on the number of blocks a layout may contain.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutPolicy {
    pub min_blocks: usize,
    pub max_blocks: usize,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            min_blocks: 1,
            max_blocks: 8,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    /// Model calls after the first one. `2` means at most three calls per query.
    pub max_retries: u32,
    pub request_timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_retries: 2,
            request_timeout_seconds: 15,
            temperature: 0.9,
            max_tokens: 2048,
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct GeneratorConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    pub model: String,
    #[serde(default)]
    pub generation: GenerationSettings,
    #[serde(default)]
    pub policy: LayoutPolicy,
}

// Keeps the credential out of logs and panic messages.
impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .field("model", &self.model)
            .field("generation", &self.generation)
            .field("policy", &self.policy)
            .finish()
    }
}

impl GeneratorConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            generation: GenerationSettings::default(),
            policy: LayoutPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: LayoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.generation.max_retries = max_retries;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generation.request_timeout_seconds = timeout.as_secs().max(1);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.generation.request_timeout_seconds)
    }

    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    ///
    /// All missing required variables are reported in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let required = [ENV_API_URL, ENV_API_KEY, ENV_MODEL];
        let missing: Vec<String> = required
            .iter()
            .filter(|name| read(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        let mut config = Self::new(
            read(ENV_API_URL).unwrap_or_default(),
            read(ENV_API_KEY).unwrap_or_default(),
            read(ENV_MODEL).unwrap_or_default(),
        );

        if let Some(raw) = read(ENV_MAX_RETRIES) {
            config.generation.max_retries = parse_number(ENV_MAX_RETRIES, &raw)?;
        }
        if let Some(raw) = read(ENV_TIMEOUT_SECS) {
            config.generation.request_timeout_seconds = parse_number(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = read(ENV_MIN_BLOCKS) {
            config.policy.min_blocks = parse_number(ENV_MIN_BLOCKS, &raw)?;
        }
        if let Some(raw) = read(ENV_MAX_BLOCKS) {
            config.policy.max_blocks = parse_number(ENV_MAX_BLOCKS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses a TOML document. A missing `api_key` is taken from `LAYOUT_API_KEY`.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::from_toml_with_lookup(content, |name| std::env::var(name).ok())
    }

    pub fn from_toml_with_lookup<F>(content: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: GeneratorConfig = toml::from_str(content)?;
        if config.api_key.trim().is_empty() {
            config.api_key = lookup(ENV_API_KEY).unwrap_or_default();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVariables(vec![ENV_API_KEY.to_string()]));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("model", "must not be empty"));
        }

        let url = Url::parse(&self.api_url)
            .map_err(|e| ConfigError::invalid("api_url", e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::invalid(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.generation.request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "request_timeout_seconds",
                "must be at least one second",
            ));
        }
        if self.generation.max_retries > MAX_RETRY_LIMIT {
            return Err(ConfigError::invalid(
                "max_retries",
                format!(
                    "{} exceeds the limit of {}",
                    self.generation.max_retries, MAX_RETRY_LIMIT
                ),
            ));
        }
        if self.policy.min_blocks == 0 {
            return Err(ConfigError::invalid("min_blocks", "must be at least 1"));
        }
        if self.policy.min_blocks > self.policy.max_blocks {
            return Err(ConfigError::invalid(
                "max_blocks",
                format!(
                    "{} is below min_blocks {}",
                    self.policy.max_blocks, self.policy.min_blocks
                ),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("'{}' is not a valid number", raw)))
}

#[cfg(test)]
mod tests;
