//! Composio API client
//!
//! REST client for the Composio v3 API: connected accounts, auth configs,
//! tool schemas and tool execution.

use std::collections::HashSet;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::composio::types::*;
use crate::composio::ToolPlatform;
use crate::error::{GmailAgentError, PlatformError, Result};

/// Header carrying the Composio API key
const API_KEY_HEADER: &str = "x-api-key";

/// Composio API client
pub struct ComposioClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// API base URL (without the `/api/v3` suffix)
    base_url: String,

    /// API key
    api_key: SecretString,
}

impl ComposioClient {
    /// Create a new Composio client
    pub fn new(api_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .post(url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
    }

    /// Send a request and decode a successful JSON body
    async fn send_json<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
        action: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        Self::decode_json(response, action).await
    }

    /// Decode a response body, or turn an error status into `RequestFailed`
    async fn decode_json<T: DeserializeOwned>(
        response: reqwest::Response,
        action: &str,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            tracing::debug!("Composio {} response: {}", action, text);
            serde_json::from_str(&text).map_err(|e| {
                GmailAgentError::from(PlatformError::UnexpectedResponse {
                    message: format!("Failed to {} ({}): {}", action, e, text),
                })
            })
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(PlatformError::RequestFailed {
                message: format!("Failed to {} ({}): {}", action, status, text),
            }
            .into())
        }
    }

    /// Create a platform-managed auth config for a toolkit
    async fn create_auth_config(&self, toolkit: &str) -> Result<AuthConfig> {
        let body = json!({
            "toolkit": {"slug": toolkit},
            "auth_config": {"type": "use_composio_managed_auth"},
        });

        let created: CreateAuthConfigResponse = Self::send_json(
            self.post(&self.api_url("auth_configs")).json(&body),
            "create auth config",
        )
        .await?;

        tracing::info!(toolkit, auth_config_id = %created.auth_config.id, "Created auth config");
        Ok(created.auth_config)
    }

    /// Initiate a connected account with a known auth config
    async fn initiate_connection(
        &self,
        user_id: &str,
        auth_config_id: &str,
    ) -> Result<ConnectionRequest> {
        let body = InitiateConnectionRequest {
            auth_config: AuthConfigRef {
                id: auth_config_id.to_string(),
            },
            connection: ConnectionUser {
                user_id: user_id.to_string(),
            },
        };

        Self::send_json(
            self.post(&self.api_url("connected_accounts")).json(&body),
            "initiate connection",
        )
        .await
    }
}

#[async_trait]
impl ToolPlatform for ComposioClient {
    async fn list_connected_accounts(
        &self,
        user_id: &str,
        toolkit: &str,
    ) -> Result<Vec<ConnectedAccount>> {
        let mut accounts = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let mut url = format!(
                "{}?user_ids={}&toolkit_slugs={}",
                self.api_url("connected_accounts"),
                urlencoding::encode(user_id),
                urlencoding::encode(toolkit)
            );
            if let Some(ref c) = cursor {
                url.push_str(&format!("&cursor={}", urlencoding::encode(c)));
            }

            let page: ConnectedAccountList =
                Self::send_json(self.get(&url), "list connected accounts").await?;
            accounts.extend(page.items);

            match page.next_cursor {
                Some(next) if !next.is_empty() && seen_cursors.insert(next.clone()) => {
                    cursor = Some(next)
                }
                _ => break,
            }
        }

        Ok(accounts)
    }

    async fn get_connected_account(&self, connection_id: &str) -> Result<ConnectedAccount> {
        let url = self.api_url(&format!(
            "connected_accounts/{}",
            urlencoding::encode(connection_id)
        ));

        let response = self.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PlatformError::ConnectionNotFound {
                connection_id: connection_id.to_string(),
            }
            .into());
        }

        Self::decode_json(response, "get connected account").await
    }

    async fn list_auth_configs(&self, toolkit: &str) -> Result<Vec<AuthConfig>> {
        let url = format!(
            "{}?toolkit_slug={}",
            self.api_url("auth_configs"),
            urlencoding::encode(toolkit)
        );

        let list: AuthConfigList = Self::send_json(self.get(&url), "list auth configs").await?;
        Ok(list.items)
    }

    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest> {
        let auth_config_id = match auth_config_id {
            Some(id) => id.to_string(),
            None => match self.list_auth_configs(toolkit).await?.into_iter().next() {
                Some(config) => config.id,
                None => self.create_auth_config(toolkit).await?.id,
            },
        };

        let request = self.initiate_connection(user_id, &auth_config_id).await?;
        tracing::info!(
            user_id,
            toolkit,
            connection_id = %request.id,
            "Initiated connection"
        );
        Ok(request)
    }

    async fn get_tools(&self, user_id: &str, slugs: &[&str]) -> Result<Vec<ToolDefinition>> {
        tracing::debug!(user_id, ?slugs, "Fetching tool schemas");

        let url = format!(
            "{}?tool_slugs={}",
            self.api_url("tools"),
            urlencoding::encode(&slugs.join(","))
        );

        let list: ToolSchemaList = Self::send_json(self.get(&url), "get tools").await?;
        Ok(list.items.into_iter().map(ToolDefinition::from).collect())
    }

    async fn execute_tool(
        &self,
        user_id: &str,
        slug: &str,
        arguments: Value,
    ) -> Result<ToolExecutionResponse> {
        let url = self.api_url(&format!("tools/execute/{}", urlencoding::encode(slug)));
        let body = ExecuteToolRequest {
            user_id: user_id.to_string(),
            arguments,
        };

        tracing::info!(user_id, tool = slug, "Executing tool");
        Self::send_json(self.post(&url).json(&body), "execute tool").await
    }
}
