//! Configuration loading, validation, and persistence.
//!
//! A `Config` comes from exactly one of two sources per invocation: the TOML
//! config file or the process environment. The caller picks the source
//! explicitly; the two are never merged, so provenance is always unambiguous.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Model used for summarization when none is configured.
pub const DEFAULT_MODEL_ID: &str = "openai/gpt-4o-mini";

/// Resolved configuration for a single invocation.
///
/// Immutable after construction. Equality is structural; there is no
/// identity beyond the field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GitHub personal access token. Required; never defaulted.
    pub github_token: String,

    /// Model identifier for summarization, e.g. "openai/gpt-4o-mini".
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Free-text company context embedded in the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

impl Config {
    /// Load configuration from the TOML file at `path`, or from the default
    /// location when `path` is `None`.
    pub fn from_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_config_path(path)?;

        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound { path });
            }
            Err(e) => {
                return Err(ConfigError::Invalid {
                    path,
                    message: e.to_string(),
                });
            }
        };

        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Invalid {
            path: path.clone(),
            message: e.to_string(),
        })?;

        if config.github_token.is_empty() {
            return Err(ConfigError::Invalid {
                path,
                message: "github_token must not be empty".to_string(),
            });
        }

        tracing::debug!(path = %path.display(), "Loaded config from file");
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// The token comes from `GITHUB_TOKEN`, falling back to `GITHUB_PAT`.
    /// `MODEL_ID` defaults to [`DEFAULT_MODEL_ID`] when unset; `COMPANY` is
    /// optional. Empty-string values count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_lookup(|key| std::env::var(key).ok())
    }

    /// Environment resolution over an explicit lookup function, so tests can
    /// supply variables without mutating process-global state.
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let github_token = get("GITHUB_TOKEN")
            .or_else(|| get("GITHUB_PAT"))
            .ok_or(ConfigError::MissingCredential)?;

        Ok(Self {
            github_token,
            model_id: get("MODEL_ID").unwrap_or_else(default_model_id),
            company: get("COMPANY"),
        })
    }

    /// Persist this configuration as TOML at `path`, or at the default
    /// location when `path` is `None`. Parent directories are created as
    /// needed. Returns the resolved destination path.
    ///
    /// `company` is omitted from the document entirely when absent.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = resolve_config_path(path)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Persistence {
                path: path.clone(),
                source: e,
            })?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| ConfigError::Persistence {
            path: path.clone(),
            source: std::io::Error::other(e),
        })?;

        std::fs::write(&path, contents).map_err(|e| ConfigError::Persistence {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Saved config");
        Ok(path)
    }
}

/// Resolve the effective config file path.
/// Linux: ~/.config/dailysum/config.toml
/// macOS: ~/Library/Application Support/dailysum/config.toml
pub fn resolve_config_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => default_config_path().ok_or(ConfigError::NoConfigDir),
    }
}

/// Platform-specific default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "dailysum")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Mask a token for display: all but the last four characters become `*`,
/// preserving the total length. Tokens of four characters or fewer are
/// returned unchanged.
pub fn redact_token(token: &str) -> String {
    let len = token.chars().count();
    if len <= 4 {
        return token.to_string();
    }
    let tail: String = token.chars().skip(len - 4).collect();
    format!("{}{tail}", "*".repeat(len - 4))
}
