//! Minimal MCP streamable-HTTP client for the GitHub tool backend.
//!
//! Speaks just enough of the protocol for one summarization session:
//! `initialize`, the `notifications/initialized` notification, `tools/list`,
//! `tools/call`, and session teardown via HTTP DELETE. Responses may arrive
//! as plain JSON or as a single-message SSE body; both are handled.
//!
//! Tool-call failures reported by the server are returned as strings (never
//! `Err`) so the model can observe the error and react.

use std::time::Duration;

use serde_json::{json, Value};

use crate::error::AgentError;

/// The hosted GitHub MCP endpoint.
pub const GITHUB_MCP_URL: &str = "https://api.githubcopilot.com/mcp/";

/// Read-only GitHub tools the agent is allowed to use. Everything else the
/// server advertises (including anything that writes) is filtered out.
pub const GITHUB_TOOLS: &[&str] = &[
    "get_me",
    "list_pull_requests",
    "get_pull_request",
    "list_commits",
    "get_commit",
    "list_branches",
    "list_issues",
    "get_issue",
    "search_repositories",
    "search_issues",
    "search_pull_requests",
    "list_notifications",
    "get_notification_details",
];

/// A tool advertised by the MCP server, in the shape the chat layer needs.
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// One MCP session against the GitHub endpoint.
///
/// `connect` must be called before `list_tools`/`call_tool`; `disconnect`
/// tears the session down and is a no-op when no session exists.
pub struct McpClient {
    http: reqwest::Client,
    url: String,
    session_id: Option<String>,
    next_request_id: u64,
}

impl McpClient {
    /// Build a client for `url`, authenticating every request with the
    /// given GitHub token.
    pub fn new(url: impl Into<String>, github_token: &str) -> Result<Self, AgentError> {
        let url = url.into();

        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {github_token}"))
            .map_err(|e| AgentError::McpProtocol(format!("invalid token for auth header: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .map_err(|e| AgentError::McpUnavailable {
                url: url.clone(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            url,
            session_id: None,
            next_request_id: 1,
        })
    }

    /// Perform the MCP handshake: `initialize` (capturing the session id
    /// header) followed by the `notifications/initialized` notification.
    pub async fn connect(&mut self) -> Result<(), AgentError> {
        let result = self
            .rpc(
                "initialize",
                json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {
                        "name": "dailysum",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                }),
            )
            .await?;

        tracing::debug!(
            server = %result
                .pointer("/serverInfo/name")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown"),
            "MCP session established"
        );

        self.notify("notifications/initialized").await
    }

    /// List the server's tools, filtered to the read-only GitHub allowlist.
    pub async fn list_tools(&mut self) -> Result<Vec<ToolSpec>, AgentError> {
        let result = self.rpc("tools/list", json!({})).await?;

        let tools = result
            .get("tools")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AgentError::McpProtocol("tools/list result missing `tools` array".to_string())
            })?;

        let specs: Vec<ToolSpec> = tools
            .iter()
            .filter_map(|tool| {
                let name = tool.get("name")?.as_str()?;
                if !GITHUB_TOOLS.contains(&name) {
                    return None;
                }
                Some(ToolSpec {
                    name: name.to_string(),
                    description: tool
                        .get("description")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    input_schema: tool
                        .get("inputSchema")
                        .cloned()
                        .unwrap_or_else(|| json!({ "type": "object" })),
                })
            })
            .collect();

        if specs.is_empty() {
            return Err(AgentError::McpProtocol(
                "server advertised none of the expected GitHub tools".to_string(),
            ));
        }

        tracing::debug!(count = specs.len(), "GitHub tools available");
        Ok(specs)
    }

    /// Invoke a tool and return its textual output. Server-side tool errors
    /// come back as the error text, not as `Err`.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<String, AgentError> {
        let result = self
            .rpc("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        Ok(tool_result_text(&result))
    }

    /// Tear down the session. Idempotent: only the first call after a
    /// successful `connect` sends the DELETE.
    pub async fn disconnect(&mut self) -> Result<(), AgentError> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };

        let resp = self
            .http
            .delete(&self.url)
            .header("Mcp-Session-Id", &session_id)
            .send()
            .await;

        match resp {
            // Some servers don't support explicit teardown; the session
            // expires server-side either way.
            Ok(r) if !r.status().is_success() => {
                tracing::debug!(status = %r.status(), "MCP session delete refused");
            }
            Ok(_) => tracing::debug!("MCP session closed"),
            Err(e) => tracing::debug!(error = %e, "MCP session delete failed"),
        }
        Ok(())
    }

    /// Send one JSON-RPC request and return its `result` value.
    async fn rpc(&mut self, method: &str, params: Value) -> Result<Value, AgentError> {
        let id = self.next_request_id;
        self.next_request_id += 1;

        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let mut request = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .json(&body);
        if let Some(session_id) = &self.session_id {
            request = request.header("Mcp-Session-Id", session_id);
        }

        let response = request.send().await.map_err(|e| AgentError::McpUnavailable {
            url: self.url.clone(),
            message: format!("Is the GitHub MCP endpoint reachable? {e}"),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::McpProtocol(format!(
                "HTTP {status} from `{method}`"
            )));
        }

        if let Some(session_id) = response
            .headers()
            .get("mcp-session-id")
            .and_then(|v| v.to_str().ok())
        {
            self.session_id = Some(session_id.to_string());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let text = response
            .text()
            .await
            .map_err(|e| AgentError::McpProtocol(format!("failed to read `{method}` body: {e}")))?;

        let message = if content_type.starts_with("text/event-stream") {
            parse_sse_message(&text).ok_or_else(|| {
                AgentError::McpProtocol(format!("no JSON-RPC message in `{method}` SSE body"))
            })?
        } else {
            serde_json::from_str(&text)
                .map_err(|e| AgentError::McpProtocol(format!("bad `{method}` response: {e}")))?
        };

        if let Some(error) = message.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let msg = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(AgentError::McpProtocol(format!(
                "`{method}` failed ({code}): {msg}"
            )));
        }

        Ok(message.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Send a JSON-RPC notification (no id, no response body expected).
    async fn notify(&self, method: &str) -> Result<(), AgentError> {
        let body = json!({ "jsonrpc": "2.0", "method": method });

        let mut request = self
            .http
            .post(&self.url)
            .header(reqwest::header::ACCEPT, "application/json, text/event-stream")
            .json(&body);
        if let Some(session_id) = &self.session_id {
            request = request.header("Mcp-Session-Id", session_id);
        }

        let response = request.send().await.map_err(|e| AgentError::McpUnavailable {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::McpProtocol(format!(
                "HTTP {status} from `{method}` notification"
            )));
        }
        Ok(())
    }
}

/// Extract the first JSON-RPC message from an SSE body.
fn parse_sse_message(body: &str) -> Option<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .filter_map(|data| serde_json::from_str::<Value>(data.trim()).ok())
        .find(|v| v.get("result").is_some() || v.get("error").is_some())
}

/// Flatten a `tools/call` result into plain text for the model.
///
/// Text content blocks are concatenated; anything else is serialized as-is
/// so the model still sees something useful.
fn tool_result_text(result: &Value) -> String {
    let blocks = result.get("content").and_then(Value::as_array);
    let text = blocks
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| block.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    if text.is_empty() {
        result.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_body_yields_the_rpc_message() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"ok\":true}}\n\n";
        let message = parse_sse_message(body).unwrap();
        assert_eq!(message["result"]["ok"], true);
    }

    #[test]
    fn sse_parsing_skips_non_rpc_events() {
        let body = "data: ping\ndata: {\"notification\":true}\ndata: {\"jsonrpc\":\"2.0\",\"error\":{\"code\":-1,\"message\":\"nope\"}}\n";
        let message = parse_sse_message(body).unwrap();
        assert_eq!(message["error"]["message"], "nope");
    }

    #[test]
    fn sse_parsing_handles_empty_body() {
        assert!(parse_sse_message("").is_none());
    }

    #[test]
    fn tool_text_concatenates_content_blocks() {
        let result = json!({
            "content": [
                { "type": "text", "text": "first" },
                { "type": "text", "text": "second" },
            ]
        });
        assert_eq!(tool_result_text(&result), "first\nsecond");
    }

    #[test]
    fn tool_text_falls_back_to_raw_json() {
        let result = json!({ "structured": { "count": 3 } });
        assert_eq!(tool_result_text(&result), result.to_string());
    }

    #[test]
    fn allowlist_contains_only_read_tools() {
        for name in GITHUB_TOOLS {
            assert!(
                name.starts_with("get_")
                    || name.starts_with("list_")
                    || name.starts_with("search_"),
                "unexpected tool {name}"
            );
        }
    }
}
