//! In-memory fakes for tests.
//!
//! Provides:
//! - [`FakeToolPlatform`]: scripted connected accounts and tool results, with
//!   every call recorded
//! - [`StubLlm`]: returns a fixed chat completion and records requests
//!
//! # Usage
//!
//! ```rust,no_run
//! use gmail_agent::composio::types::ConnectionStatus;
//! use gmail_agent::testing::FakeToolPlatform;
//!
//! let platform = FakeToolPlatform::new().with_account("u1", "ca_1", ConnectionStatus::Active);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::composio::types::{
    AuthConfig, ConnectedAccount, ConnectionRequest, ConnectionStatus, FunctionDefinition,
    ToolDefinition, ToolExecutionResponse, ToolkitRef,
};
use crate::composio::ToolPlatform;
use crate::error::{GmailAgentError, LlmError, PlatformError, Result};
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::llm::LlmProvider;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A recorded `authorize` call
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizeCall {
    pub user_id: String,
    pub toolkit: String,
    pub auth_config_id: Option<String>,
}

/// A recorded `execute_tool` call
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteCall {
    pub user_id: String,
    pub slug: String,
    pub arguments: Value,
}

enum ScriptedResult {
    Response(ToolExecutionResponse),
    TransportError(String),
}

/// Tool platform fake with scripted state
#[derive(Default)]
pub struct FakeToolPlatform {
    accounts: Mutex<HashMap<String, Vec<ConnectedAccount>>>,
    pending_statuses: Mutex<HashMap<String, VecDeque<ConnectionStatus>>>,
    new_connection_statuses: Vec<ConnectionStatus>,
    tool_results: HashMap<String, ScriptedResult>,
    authorize_calls: Mutex<Vec<AuthorizeCall>>,
    execute_calls: Mutex<Vec<ExecuteCall>>,
    get_tools_calls: Mutex<Vec<Vec<String>>>,
}

impl FakeToolPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connected account for a user
    pub fn with_account(self, user_id: &str, id: &str, status: ConnectionStatus) -> Self {
        lock(&self.accounts)
            .entry(user_id.to_string())
            .or_default()
            .push(ConnectedAccount {
                id: id.to_string(),
                status,
                toolkit: Some(ToolkitRef {
                    slug: crate::composio::GMAIL_TOOLKIT.to_string(),
                }),
                auth_config: None,
            });
        self
    }

    /// Statuses reported, in order, for a connection created by `authorize`.
    /// The last status repeats. Defaults to `[INITIATED]`.
    pub fn with_new_connection_statuses(mut self, statuses: Vec<ConnectionStatus>) -> Self {
        self.new_connection_statuses = statuses;
        self
    }

    /// Return `response` whenever `slug` is executed
    pub fn with_tool_result(mut self, slug: &str, response: ToolExecutionResponse) -> Self {
        self.tool_results
            .insert(slug.to_string(), ScriptedResult::Response(response));
        self
    }

    /// Fail the request whenever `slug` is executed
    pub fn with_tool_transport_error(mut self, slug: &str, message: &str) -> Self {
        self.tool_results.insert(
            slug.to_string(),
            ScriptedResult::TransportError(message.to_string()),
        );
        self
    }

    pub fn authorize_calls(&self) -> Vec<AuthorizeCall> {
        lock(&self.authorize_calls).clone()
    }

    pub fn execute_calls(&self) -> Vec<ExecuteCall> {
        lock(&self.execute_calls).clone()
    }

    pub fn get_tools_calls(&self) -> Vec<Vec<String>> {
        lock(&self.get_tools_calls).clone()
    }
}

#[async_trait]
impl ToolPlatform for FakeToolPlatform {
    async fn list_connected_accounts(
        &self,
        user_id: &str,
        _toolkit: &str,
    ) -> Result<Vec<ConnectedAccount>> {
        Ok(lock(&self.accounts).get(user_id).cloned().unwrap_or_default())
    }

    async fn get_connected_account(&self, connection_id: &str) -> Result<ConnectedAccount> {
        if let Some(queue) = lock(&self.pending_statuses).get_mut(connection_id) {
            let status = if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().copied()
            }
            .unwrap_or(ConnectionStatus::Initiated);

            return Ok(ConnectedAccount {
                id: connection_id.to_string(),
                status,
                toolkit: None,
                auth_config: None,
            });
        }

        lock(&self.accounts)
            .values()
            .flatten()
            .find(|a| a.id == connection_id)
            .cloned()
            .ok_or_else(|| {
                GmailAgentError::from(PlatformError::ConnectionNotFound {
                    connection_id: connection_id.to_string(),
                })
            })
    }

    async fn list_auth_configs(&self, toolkit: &str) -> Result<Vec<AuthConfig>> {
        Ok(vec![AuthConfig {
            id: "ac_fake".to_string(),
            toolkit: Some(ToolkitRef {
                slug: toolkit.to_string(),
            }),
        }])
    }

    async fn authorize(
        &self,
        user_id: &str,
        toolkit: &str,
        auth_config_id: Option<&str>,
    ) -> Result<ConnectionRequest> {
        let mut calls = lock(&self.authorize_calls);
        calls.push(AuthorizeCall {
            user_id: user_id.to_string(),
            toolkit: toolkit.to_string(),
            auth_config_id: auth_config_id.map(str::to_string),
        });

        let id = format!("ca_new_{}", calls.len());
        let statuses: VecDeque<ConnectionStatus> = if self.new_connection_statuses.is_empty() {
            VecDeque::from(vec![ConnectionStatus::Initiated])
        } else {
            self.new_connection_statuses.iter().copied().collect()
        };
        lock(&self.pending_statuses).insert(id.clone(), statuses);

        Ok(ConnectionRequest {
            redirect_url: Some(format!("https://connect.example/{}", id)),
            id,
            status: ConnectionStatus::Initiated,
        })
    }

    async fn get_tools(&self, _user_id: &str, slugs: &[&str]) -> Result<Vec<ToolDefinition>> {
        lock(&self.get_tools_calls).push(slugs.iter().map(|s| s.to_string()).collect());

        Ok(slugs
            .iter()
            .map(|slug| ToolDefinition {
                kind: "function".to_string(),
                function: FunctionDefinition {
                    name: slug.to_string(),
                    description: String::new(),
                    parameters: json!({"type": "object", "properties": {}}),
                },
            })
            .collect())
    }

    async fn execute_tool(
        &self,
        user_id: &str,
        slug: &str,
        arguments: Value,
    ) -> Result<ToolExecutionResponse> {
        lock(&self.execute_calls).push(ExecuteCall {
            user_id: user_id.to_string(),
            slug: slug.to_string(),
            arguments: arguments.clone(),
        });

        match self.tool_results.get(slug) {
            Some(ScriptedResult::Response(response)) => Ok(response.clone()),
            Some(ScriptedResult::TransportError(message)) => {
                Err(PlatformError::RequestFailed {
                    message: message.clone(),
                }
                .into())
            }
            None => Ok(ToolExecutionResponse::success(
                json!({"tool": slug, "arguments": arguments}),
            )),
        }
    }
}

/// LLM stub returning a fixed response
pub struct StubLlm {
    model_name: String,
    response: ChatCompletionResponse,
    should_fail: AtomicBool,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl StubLlm {
    pub fn new(response: ChatCompletionResponse) -> Self {
        Self {
            model_name: "stub-model".to_string(),
            response,
            should_fail: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent calls fail with a transport error
    pub fn set_failing(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::Relaxed);
    }

    pub fn requests(&self) -> Vec<ChatCompletionRequest> {
        lock(&self.requests).clone()
    }
}

impl Default for StubLlm {
    fn default() -> Self {
        Self::new(ChatCompletionResponse::default())
    }
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        lock(&self.requests).push(request);

        if self.should_fail.load(Ordering::Relaxed) {
            return Err(LlmError::RequestFailed {
                provider: "stub".to_string(),
                reason: "stub configured to fail".to_string(),
            }
            .into());
        }

        Ok(self.response.clone())
    }
}
