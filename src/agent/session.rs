//! One tool-calling conversation with the summarization model.
//!
//! Sends the summary prompt together with the GitHub tool schemas, dispatches
//! every tool call the model makes through the MCP client, and loops until
//! the model answers with text only. A turn cap guards against a model that
//! never stops calling tools.

use futures::StreamExt;
use genai::chat::{
    ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent, Tool, ToolCall, ToolResponse,
};
use genai::Client;

use crate::agent::mcp::{McpClient, ToolSpec};
use crate::error::AgentError;

/// Upper bound on model turns per summary.
const MAX_TURNS: u64 = 16;

/// Convert MCP tool specs into genai chat tool schemas.
pub fn chat_tools(specs: &[ToolSpec]) -> Vec<Tool> {
    specs
        .iter()
        .map(|spec| {
            Tool::new(spec.name.clone())
                .with_description(spec.description.clone())
                .with_schema(spec.input_schema.clone())
        })
        .collect()
}

/// Map a configured model id to the name genai expects.
///
/// Config keeps litellm-style ids ("openai/gpt-4o-mini"); genai resolves the
/// provider from the bare model name.
pub fn chat_model_name(model_id: &str) -> &str {
    model_id.rsplit('/').next().unwrap_or(model_id)
}

/// Run the conversation to completion and return the model's final text.
pub async fn run_summary_session(
    client: &Client,
    model_id: &str,
    mcp: &mut McpClient,
    prompt: &str,
) -> Result<String, AgentError> {
    let tools = chat_tools(&mcp.list_tools().await?);
    let model = chat_model_name(model_id);

    let mut chat_req = ChatRequest::default()
        .with_tools(tools)
        .append_message(ChatMessage::user(prompt));

    let chat_options = ChatOptions::default()
        .with_capture_content(true)
        .with_capture_tool_calls(true);

    for turn in 1..=MAX_TURNS {
        let stream_res = client
            .exec_chat_stream(model, chat_req.clone(), Some(&chat_options))
            .await
            .map_err(|e| AgentError::Llm(e.to_string()))?;

        let mut stream = stream_res.stream;
        let mut captured_text: Option<String> = None;
        let mut captured_tool_calls: Vec<ToolCall> = Vec::new();

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::End(end)) => {
                    if let Some(text) = end.captured_first_text() {
                        captured_text = Some(text.to_string());
                    }
                    if let Some(calls) = end.captured_tool_calls() {
                        captured_tool_calls = calls.into_iter().cloned().collect();
                    }
                }
                Ok(_) => {
                    // Start, Chunk, ToolCallChunk, reasoning events -- the
                    // End event carries everything we need.
                }
                Err(e) => return Err(AgentError::Llm(e.to_string())),
            }
        }

        if captured_tool_calls.is_empty() {
            // Text-only response: the summary is done.
            return match captured_text {
                Some(text) if !text.trim().is_empty() => Ok(text),
                _ => Err(AgentError::Llm("model returned an empty response".to_string())),
            };
        }

        // Append the assistant tool-call message, then each tool's output.
        chat_req = chat_req.append_message(ChatMessage::from(captured_tool_calls.clone()));

        for call in &captured_tool_calls {
            tracing::info!(turn, tool = %call.fn_name, "Querying GitHub");
            let result = mcp
                .call_tool(&call.fn_name, call.fn_arguments.clone())
                .await?;
            chat_req = chat_req.append_message(ToolResponse::new(call.call_id.clone(), result));
        }
    }

    Err(AgentError::TurnLimit { max_turns: MAX_TURNS })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_name_strips_provider_prefix() {
        assert_eq!(chat_model_name("openai/gpt-4o-mini"), "gpt-4o-mini");
        assert_eq!(chat_model_name("gpt-4o-mini"), "gpt-4o-mini");
    }

    #[test]
    fn tool_specs_become_chat_tools() {
        let specs = vec![ToolSpec {
            name: "list_commits".to_string(),
            description: "List commits".to_string(),
            input_schema: json!({ "type": "object" }),
        }];

        let tools = chat_tools(&specs);
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "list_commits");
    }
}
