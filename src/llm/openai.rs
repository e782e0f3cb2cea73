//! OpenAI chat completions provider
//!
//! Bearer-authenticated client for `POST {base_url}/chat/completions`.
//! Requests are sent once; transport and status errors are returned as-is.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{GmailAgentError, LlmError, Result};
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse};
use crate::llm::LlmProvider;

const PROVIDER: &str = "openai";

/// OpenAI chat completions client
pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(api_key: SecretString, base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: model.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = self.api_url("chat/completions");

        if tracing::enabled!(tracing::Level::DEBUG) {
            if let Ok(json) = serde_json::to_string(&request) {
                tracing::debug!("OpenAI request body: {}", json);
            }
        }

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();

        tracing::debug!("OpenAI response status: {}", status);
        tracing::debug!("OpenAI response body: {}", response_text);

        if status.as_u16() == 401 {
            return Err(LlmError::AuthFailed {
                provider: PROVIDER.to_string(),
            }
            .into());
        }

        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                provider: PROVIDER.to_string(),
                reason: format!("HTTP {}: {}", status, response_text),
            }
            .into());
        }

        serde_json::from_str(&response_text).map_err(|e| {
            GmailAgentError::from(LlmError::InvalidResponse {
                provider: PROVIDER.to_string(),
                reason: format!("JSON parse error: {}. Raw: {}", e, response_text),
            })
        })
    }
}
