//! Error types for the Gmail agent
//!
//! This module defines the error hierarchy for all operations in the agent.

use thiserror::Error;

/// Main error type for the Gmail agent
#[derive(Error, Debug)]
pub enum GmailAgentError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connected account errors
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Tool platform API errors
    #[error("Tool platform error: {0}")]
    Platform(#[from] PlatformError),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}")]
    MissingEnvVar { var: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Connected account errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("No connected account found for the user id: {user_id}")]
    NotConnected {
        user_id: String,
        connection_id: String,
        redirect_url: Option<String>,
    },

    #[error("Connection {connection_id} ended in status {status}")]
    AuthorizationFailed { connection_id: String, status: String },

    #[error("Timed out after {waited_secs}s waiting for connection {connection_id}")]
    Timeout { connection_id: String, waited_secs: u64 },
}

/// Tool platform API errors
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("API request failed: {message}")]
    RequestFailed { message: String },

    #[error("Connected account not found: {connection_id}")]
    ConnectionNotFound { connection_id: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },
}

/// LLM provider errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed for {provider}")]
    AuthFailed { provider: String },

    #[error("Request to {provider} failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },
}

/// Validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ValidationError::InvalidRequest {
            message: errors.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for GmailAgentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        GmailAgentError::Validation(ValidationError::from(errors))
    }
}

/// Result type alias for Gmail agent operations
pub type Result<T> = std::result::Result<T, GmailAgentError>;
