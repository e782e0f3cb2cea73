//! Gmail agent
//!
//! One LLM turn over the Gmail tools: fetch the tool definitions, let the
//! model pick tool calls for the prompt, execute them and return the results.

use crate::actions::slugs;
use crate::composio::types::ToolExecutionResponse;
use crate::composio::ToolPlatform;
use crate::error::Result;
use crate::llm::types::{ChatCompletionRequest, ChatMessage, ToolCall};
use crate::llm::LlmProvider;

/// Run the Gmail agent for a user and prompt.
///
/// Returns one result per tool call, in the order the model emitted them.
/// A failing tool call, or one naming a tool outside the Gmail set, yields an
/// unsuccessful result; the others still run.
pub async fn run_gmail_agent(
    platform: &dyn ToolPlatform,
    llm: &dyn LlmProvider,
    user_id: &str,
    prompt: &str,
) -> Result<Vec<ToolExecutionResponse>> {
    let tools = platform.get_tools(user_id, &slugs::AGENT_TOOLS).await?;

    let request = ChatCompletionRequest {
        model: llm.model_name().to_string(),
        messages: vec![ChatMessage::user(prompt)],
        tools,
    };
    let response = llm.complete(request).await?;

    let mut results = Vec::new();
    for call in response.tool_calls() {
        results.push(execute_tool_call(platform, user_id, call).await);
    }

    tracing::info!(user_id, tool_calls = results.len(), "Agent run finished");
    Ok(results)
}

async fn execute_tool_call(
    platform: &dyn ToolPlatform,
    user_id: &str,
    call: &ToolCall,
) -> ToolExecutionResponse {
    if !slugs::AGENT_TOOLS.contains(&call.function.name.as_str()) {
        tracing::warn!(tool = %call.function.name, call_id = %call.id, "Model requested a tool it was not offered");
        return ToolExecutionResponse::failure(format!(
            "Tool {} is not available to the agent",
            call.function.name
        ));
    }

    let arguments = match call.parsed_arguments() {
        Ok(args) => args,
        Err(e) => {
            tracing::warn!(tool = %call.function.name, call_id = %call.id, "Invalid tool arguments: {}", e);
            return ToolExecutionResponse::failure(format!(
                "Invalid arguments for {}: {}",
                call.function.name, e
            ));
        }
    };

    match platform
        .execute_tool(user_id, &call.function.name, arguments)
        .await
    {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(tool = %call.function.name, call_id = %call.id, "Tool execution failed: {}", e);
            ToolExecutionResponse::failure(e.to_string())
        }
    }
}
