//! Server configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! `taskcal-server.toml` in the working directory, and environment variables
//! (a `.env` file is loaded first if present).

use chrono::Duration;
use serde::Deserialize;
use taskcal_core::cache::DEFAULT_CACHE_TTL_SECS;

const CONFIG_FILE: &str = "taskcal-server";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TODOIST_API_URL: &str = "https://api.todoist.com/rest/v2";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_todoist_api_url() -> String {
    DEFAULT_TODOIST_API_URL.to_string()
}

fn default_cache_ttl_secs() -> i64 {
    DEFAULT_CACHE_TTL_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Todoist API token (`API_TOKEN`)
    #[serde(default)]
    api_token: Option<String>,

    /// Older name for the API token (`TODOIST_API_TOKEN`)
    #[serde(default)]
    todoist_api_token: Option<String>,

    /// Shared secret expected in the webhook verification header
    #[serde(default)]
    verification_token: Option<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_todoist_api_url")]
    pub todoist_api_url: String,

    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            api_token: None,
            todoist_api_token: None,
            verification_token: None,
            host: default_host(),
            port: default_port(),
            todoist_api_url: default_todoist_api_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, the optional config file and the
    /// process environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_sources(None)
    }

    /// `env` replaces the process environment when given.
    ///
    /// Environment values stay strings until deserialized so that tokens
    /// made of digits keep their exact text.
    fn from_sources(env: Option<config::Map<String, String>>) -> Result<Self, config::ConfigError> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(config::Environment::default().source(env))
            .build()?
            .try_deserialize()?;

        if loaded.cache_ttl_secs < 0 || Duration::try_seconds(loaded.cache_ttl_secs).is_none() {
            return Err(config::ConfigError::Message(format!(
                "cache_ttl_secs out of range: {}",
                loaded.cache_ttl_secs
            )));
        }

        Ok(loaded)
    }

    /// How long a generated calendar stays fresh.
    pub fn cache_ttl(&self) -> Duration {
        Duration::try_seconds(self.cache_ttl_secs)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_CACHE_TTL_SECS))
    }

    /// The Todoist API token, if one is configured and non-empty.
    pub fn api_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .or(self.todoist_api_token.as_deref())
            .filter(|token| !token.is_empty())
    }

    /// The webhook secret, if one is configured and non-empty.
    pub fn verification_token(&self) -> Option<&str> {
        self.verification_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[cfg(test)]
impl ServerConfig {
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_verification_token(mut self, token: impl Into<String>) -> Self {
        self.verification_token = Some(token.into());
        self
    }
}
