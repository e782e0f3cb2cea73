//! Request and response bodies for the HTTP service

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::composio::types::ConnectionStatus;

/// Body of `POST /agent`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RunGmailAgentRequest {
    /// User to run the agent for; the configured default when omitted
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,

    /// Free-text instruction for the agent
    #[validate(length(min = 1))]
    pub prompt: String,
}

/// Body of `POST /connection/create`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateConnectionRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,

    /// Auth config to connect through; resolved from the toolkit when omitted
    #[validate(length(min = 1))]
    #[serde(default)]
    pub auth_config_id: Option<String>,
}

/// Body of `POST /connection/status`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConnectionStatusRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,

    #[validate(length(min = 1))]
    pub connection_id: String,
}

/// Body of `POST /connection/exists`
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ConnectionExistsRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of `POST /actions/fetch_emails`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FetchEmailsRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,

    /// Number of emails to fetch (default 5)
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Body of `POST /actions/send_email` and `POST /actions/create_email_draft`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComposeEmailRequest {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub user_id: Option<String>,

    #[validate(email)]
    #[serde(alias = "email_recipient")]
    pub recipient_email: String,

    #[serde(alias = "email_subject")]
    pub subject: String,

    #[serde(alias = "email_body")]
    pub body: String,
}

/// Response of `POST /connection/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectionResponse {
    pub connection_id: String,
    pub redirect_url: Option<String>,
}

/// Response of `POST /connection/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatusResponse {
    pub status: ConnectionStatus,
}
