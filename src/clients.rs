//! Client construction
//!
//! Builds the tool platform and LLM clients once at process start. The
//! handles are immutable and shared by reference afterwards. Keys and base
//! URLs come from [`Config`], which reads them from the environment.

use std::sync::Arc;

use crate::composio::client::ComposioClient;
use crate::composio::ToolPlatform;
use crate::config::Config;
use crate::llm::openai::OpenAiClient;
use crate::llm::LlmProvider;

/// The two remote clients used by every surface
#[derive(Clone)]
pub struct Clients {
    pub platform: Arc<dyn ToolPlatform>,
    pub llm: Arc<dyn LlmProvider>,
}

impl Clients {
    /// Build both clients from a loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            platform: Arc::new(create_composio_client(config)),
            llm: Arc::new(create_openai_client(config)),
        }
    }
}

/// Create an OpenAI client for the configured endpoint and model
pub fn create_openai_client(config: &Config) -> OpenAiClient {
    OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_base_url.clone(),
        config.openai_model.clone(),
    )
}

/// Create a Composio client for the configured endpoint
pub fn create_composio_client(config: &Config) -> ComposioClient {
    ComposioClient::new(
        config.composio_api_key.clone(),
        config.composio_base_url.clone(),
    )
}
