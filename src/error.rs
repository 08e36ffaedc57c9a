use std::path::PathBuf;

/// Errors related to configuration loading, validation, and persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid configuration at {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("GitHub token not found. Set the GITHUB_TOKEN or GITHUB_PAT environment variable.")]
    MissingCredential,

    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    #[error("Failed to write configuration to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the summary agent and its GitHub tool backend.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("GitHub MCP endpoint not reachable at {url}: {message}")]
    McpUnavailable { url: String, message: String },

    #[error("GitHub MCP protocol error: {0}")]
    McpProtocol(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Summary generation did not finish within {max_turns} turns")]
    TurnLimit { max_turns: u64 },

    #[error("Operation cancelled by user")]
    Cancelled,
}
