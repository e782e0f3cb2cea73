//! Composio API type definitions
//!
//! These types mirror the Composio v3 API responses and are used for serialization/deserialization.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status of a connected account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Active,
    Inactive,
    Initiated,
    Initializing,
    Failed,
    Expired,
    #[serde(other)]
    Unknown,
}

impl ConnectionStatus {
    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Active => "ACTIVE",
            ConnectionStatus::Inactive => "INACTIVE",
            ConnectionStatus::Initiated => "INITIATED",
            ConnectionStatus::Initializing => "INITIALIZING",
            ConnectionStatus::Failed => "FAILED",
            ConnectionStatus::Expired => "EXPIRED",
            ConnectionStatus::Unknown => "UNKNOWN",
        }
    }

    /// Only active connections can execute tools
    pub fn is_active(&self) -> bool {
        matches!(self, ConnectionStatus::Active)
    }

    /// A pending authorization can no longer complete
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, ConnectionStatus::Failed | ConnectionStatus::Expired)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toolkit reference embedded in other resources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolkitRef {
    pub slug: String,
}

/// Auth config reference embedded in a connected account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfigRef {
    pub id: String,
}

/// A connected account (link between a user id and an external mailbox)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectedAccount {
    /// Connected account ID
    pub id: String,

    /// Current status
    pub status: ConnectionStatus,

    /// Owning toolkit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolkit: Option<ToolkitRef>,

    /// Auth config used to create this account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_config: Option<AuthConfigRef>,
}

/// Paged list of connected accounts
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectedAccountList {
    #[serde(default)]
    pub items: Vec<ConnectedAccount>,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Handle for an authorization flow that was just started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
    /// Connected account ID, used to poll the status
    pub id: String,

    /// URL the end user must visit to authorize
    #[serde(default, alias = "redirect_uri")]
    pub redirect_url: Option<String>,

    /// Initial status
    #[serde(default = "default_request_status")]
    pub status: ConnectionStatus,
}

fn default_request_status() -> ConnectionStatus {
    ConnectionStatus::Initiated
}

/// Body for initiating a connected account
#[derive(Debug, Clone, Serialize)]
pub struct InitiateConnectionRequest {
    pub auth_config: AuthConfigRef,
    pub connection: ConnectionUser,
}

/// User section of [`InitiateConnectionRequest`]
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionUser {
    pub user_id: String,
}

/// An auth config registered for a toolkit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolkit: Option<ToolkitRef>,
}

/// Paged list of auth configs
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfigList {
    #[serde(default)]
    pub items: Vec<AuthConfig>,
}

/// Response when an auth config is created
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthConfigResponse {
    pub auth_config: AuthConfig,
}

/// A tool schema as published by the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool slug, e.g. `GMAIL_SEND_EMAIL`
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// JSON schema of the tool arguments
    #[serde(default = "empty_object_schema")]
    pub input_parameters: Value,
}

fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Paged list of tool schemas
#[derive(Debug, Clone, Deserialize)]
pub struct ToolSchemaList {
    #[serde(default)]
    pub items: Vec<ToolSchema>,
}

/// Function declaration in OpenAI tool format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    pub parameters: Value,
}

/// A callable tool definition handed to the LLM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,

    pub function: FunctionDefinition,
}

impl From<ToolSchema> for ToolDefinition {
    fn from(schema: ToolSchema) -> Self {
        Self {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: schema.slug,
                description: schema.description,
                parameters: schema.input_parameters,
            },
        }
    }
}

/// Body for executing a tool
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteToolRequest {
    pub user_id: String,
    pub arguments: Value,
}

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionResponse {
    /// Tool output (shape depends on the tool)
    #[serde(default)]
    pub data: Value,

    /// Error message, `None` on success
    #[serde(default)]
    pub error: Option<String>,

    /// Success flag reported by the platform
    #[serde(default)]
    pub successful: bool,

    /// Platform log reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_id: Option<String>,
}

impl ToolExecutionResponse {
    /// A successful result carrying `data`
    pub fn success(data: Value) -> Self {
        Self {
            data,
            error: None,
            successful: true,
            log_id: None,
        }
    }

    /// A failed result carrying `message`
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            data: Value::Null,
            error: Some(message.into()),
            successful: false,
            log_id: None,
        }
    }
}
