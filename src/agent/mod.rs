//! The summary agent: LLM conversation plus GitHub MCP tool backend.
//!
//! [`SummaryAgent`] owns the connection lifecycle explicitly: it starts
//! `Uninitialized`, connects to the MCP endpoint on first [`SummaryAgent::run`],
//! and returns to `Uninitialized` after [`SummaryAgent::cleanup`]. Cleanup is
//! idempotent so callers can release resources unconditionally on every exit
//! path.

pub mod mcp;
pub mod prompt;
pub mod session;

pub use mcp::{McpClient, GITHUB_MCP_URL, GITHUB_TOOLS};
pub use prompt::build_summary_prompt;

use genai::Client;

use crate::config::Config;
use crate::error::AgentError;

enum AgentState {
    Uninitialized,
    Ready { client: Client, mcp: McpClient },
}

/// Generates daily summaries from GitHub activity.
pub struct SummaryAgent {
    config: Config,
    endpoint: String,
    state: AgentState,
}

impl SummaryAgent {
    pub fn new(config: Config) -> Self {
        Self::with_endpoint(config, GITHUB_MCP_URL)
    }

    /// Build an agent against a non-default MCP endpoint.
    pub fn with_endpoint(config: Config, endpoint: impl Into<String>) -> Self {
        Self {
            config,
            endpoint: endpoint.into(),
            state: AgentState::Uninitialized,
        }
    }

    /// Whether the MCP session is currently established.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, AgentState::Ready { .. })
    }

    /// Run the agent with the given prompt and return the summary text.
    ///
    /// Connects to the GitHub MCP endpoint on first use.
    pub async fn run(&mut self, prompt: &str) -> Result<String, AgentError> {
        self.ensure_ready().await?;

        match &mut self.state {
            AgentState::Ready { client, mcp } => {
                session::run_summary_session(client, &self.config.model_id, mcp, prompt).await
            }
            AgentState::Uninitialized => unreachable!("ensure_ready leaves the agent Ready"),
        }
    }

    /// Release the MCP session, if one was established.
    ///
    /// Safe to call multiple times; only the first call after a connect
    /// performs the disconnect.
    pub async fn cleanup(&mut self) -> Result<(), AgentError> {
        match std::mem::replace(&mut self.state, AgentState::Uninitialized) {
            AgentState::Ready { mut mcp, .. } => mcp.disconnect().await,
            AgentState::Uninitialized => Ok(()),
        }
    }

    async fn ensure_ready(&mut self) -> Result<(), AgentError> {
        if self.is_ready() {
            return Ok(());
        }

        // Config construction already rejects empty tokens; re-check here
        // since this is the last point before the credential leaves the
        // process.
        if self.config.github_token.is_empty() {
            return Err(AgentError::McpProtocol(
                "refusing to connect with an empty GitHub token".to_string(),
            ));
        }

        let mut mcp = McpClient::new(self.endpoint.as_str(), &self.config.github_token)?;
        mcp.connect().await?;

        self.state = AgentState::Ready {
            client: Client::default(),
            mcp,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            github_token: "ghp_test".to_string(),
            model_id: "openai/gpt-4o-mini".to_string(),
            company: None,
        }
    }

    #[test]
    fn new_agent_starts_uninitialized() {
        let agent = SummaryAgent::new(test_config());
        assert!(!agent.is_ready());
    }

    #[tokio::test]
    async fn cleanup_without_connect_is_a_noop() {
        let mut agent = SummaryAgent::new(test_config());
        agent.cleanup().await.unwrap();
        assert!(!agent.is_ready());

        // Calling again stays a no-op.
        agent.cleanup().await.unwrap();
        assert!(!agent.is_ready());
    }

    #[tokio::test]
    async fn empty_token_is_rejected_before_connecting() {
        let mut agent = SummaryAgent::new(Config {
            github_token: String::new(),
            ..test_config()
        });
        let err = agent.run("prompt").await.unwrap_err();
        assert!(matches!(err, AgentError::McpProtocol(_)));
    }
}
