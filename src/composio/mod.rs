//! Composio tool platform module
//!
//! Contains types and the REST client for the tool platform that brokers
//! Gmail connections and executes Gmail tools on behalf of a user.

pub mod client;
pub mod types;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use types::{
    AuthConfig, ConnectedAccount, ConnectionRequest, ToolDefinition, ToolExecutionResponse,
};

/// Toolkit slug for Gmail
pub const GMAIL_TOOLKIT: &str = "gmail";

/// Operations the agent needs from the tool platform.
///
/// Implemented by [`client::ComposioClient`] and by the in-memory fake in
/// [`crate::testing`].
#[async_trait]
pub trait ToolPlatform: Send + Sync {
    /// List connected accounts for a user within a toolkit
    async fn list_connected_accounts(
        &self,
        user_id: &str,
        toolkit: &str,
    ) -> Result<Vec<ConnectedAccount>>;

    /// Get a connected account by ID
    async fn get_connected_account(&self, connection_id: &str) -> Result<ConnectedAccount>;

    /// List auth configs registered for a toolkit
    async fn list_auth_configs(&self, toolkit: &str) -> Result<Vec<AuthConfig>>;

    /// Start an authorization flow for a user.
    ///
    /// Without an auth config id the toolkit's first auth config is used,
    /// creating a platform-managed one if none exists.
    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest>;

    /// Get tool definitions for the given slugs, scoped to a user
    async fn get_tools(&self, user_id: &str, slugs: &[&str]) -> Result<Vec<ToolDefinition>>;

    /// Execute a tool for a user
    async fn execute_tool(
        &self,
        user_id: &str,
        slug: &str,
        arguments: Value,
    ) -> Result<ToolExecutionResponse>;
}
