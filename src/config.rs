//! Configuration management for the Gmail agent
//!
//! Handles `.env` loading, environment variables, and configuration defaults.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{ConfigError, Result};

/// Configuration for the Gmail agent
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key
    pub openai_api_key: SecretString,

    /// OpenAI API base URL
    pub openai_base_url: String,

    /// Chat completions model
    pub openai_model: String,

    /// Composio API key
    pub composio_api_key: SecretString,

    /// Composio API base URL
    pub composio_base_url: String,

    /// User id used by the HTTP service when a request names none
    pub default_user_id: String,

    /// How long the CLI waits for an authorization flow to complete
    pub connection_timeout: Duration,

    /// How often a pending connection is polled
    pub poll_interval: Duration,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = get("OPENAI_API_KEY")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar {
                var: "OPENAI_API_KEY".to_string(),
            })?;

        let composio_api_key = get("COMPOSIO_API_KEY")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar {
                var: "COMPOSIO_API_KEY".to_string(),
            })?;

        let connection_timeout = parse_secs(
            "GMAIL_AGENT_CONNECTION_TIMEOUT_SECS",
            get("GMAIL_AGENT_CONNECTION_TIMEOUT_SECS"),
            defaults::CONNECTION_TIMEOUT_SECS,
        )?;

        let poll_interval = parse_secs(
            "GMAIL_AGENT_POLL_INTERVAL_SECS",
            get("GMAIL_AGENT_POLL_INTERVAL_SECS"),
            defaults::POLL_INTERVAL_SECS,
        )?;

        Ok(Self {
            openai_api_key,
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_string()),
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| defaults::OPENAI_MODEL.to_string()),
            composio_api_key,
            composio_base_url: get("COMPOSIO_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| defaults::COMPOSIO_BASE_URL.to_string()),
            default_user_id: get("GMAIL_AGENT_DEFAULT_USER_ID")
                .unwrap_or_else(|| defaults::USER_ID.to_string()),
            connection_timeout,
            poll_interval,
        })
    }
}

fn parse_secs(var: &str, value: Option<String>, default: u64) -> Result<Duration> {
    let secs = match value {
        Some(v) => v.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
            var: var.to_string(),
            message: e.to_string(),
        })?,
        None => default,
    };

    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            var: var.to_string(),
            message: "must be greater than zero".to_string(),
        }
        .into());
    }

    Ok(Duration::from_secs(secs))
}

/// Path to the agent-specific `.env` file: `~/.gmail-agent/.env`
pub fn agent_env_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gmail-agent")
        .join(".env")
}

/// Load `./.env`, then `~/.gmail-agent/.env`.
///
/// dotenvy never overwrites variables that are already set, so explicit
/// environment variables win over `./.env`, which wins over the home file.
pub fn load_env() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!("Failed to load .env: {}", e);
        }
    }

    let path = agent_env_path();
    if path.exists() {
        if let Err(e) = dotenvy::from_path(&path) {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
        }
    }
}

/// Configuration defaults
pub mod defaults {
    /// OpenAI API base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

    /// Model used for the single agent turn
    pub const OPENAI_MODEL: &str = "gpt-4.1";

    /// Composio API base URL
    pub const COMPOSIO_BASE_URL: &str = "https://backend.composio.dev";

    /// Placeholder identity for the HTTP service
    pub const USER_ID: &str = "default";

    pub const CONNECTION_TIMEOUT_SECS: u64 = 300;

    pub const POLL_INTERVAL_SECS: u64 = 2;
}
