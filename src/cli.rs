use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_MODEL_ID;

#[derive(Parser, Debug)]
#[command(
    name = "dailysum",
    version,
    about = "Generate daily work summaries from your GitHub activity"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration
    Init {
        /// GitHub personal access token (prompted for, hidden, when omitted)
        #[arg(long)]
        github_token: Option<String>,

        /// Model to use for summarization
        #[arg(long, default_value = DEFAULT_MODEL_ID)]
        model_id: String,

        /// Your company name (optional)
        #[arg(long)]
        company: Option<String>,

        /// Where to save the config file (default: platform config dir)
        #[arg(long)]
        config_path: Option<PathBuf>,
    },
    /// Generate a daily work summary from your GitHub activity
    Generate {
        /// Path to the config file (default: platform config dir)
        #[arg(long)]
        config_path: Option<PathBuf>,

        /// Read configuration from environment variables instead of a file
        #[arg(long)]
        use_env: bool,
    },
    /// Display the current configuration
    ShowConfig {
        /// Path to the config file to display
        #[arg(long)]
        config_path: Option<PathBuf>,
    },
}
