//! `dailysum generate` -- run the summary agent and print the result.

use std::io::Write;
use std::path::PathBuf;

use console::style;

use crate::agent::{build_summary_prompt, SummaryAgent};
use crate::commands::render_panel;
use crate::config::Config;
use crate::error::AgentError;

pub async fn run(
    config_path: Option<PathBuf>,
    use_env: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let config = if use_env {
        Config::from_env()?
    } else {
        Config::from_file(config_path.as_deref())?
    };

    let prompt = build_summary_prompt(config.company.as_deref());
    let mut agent = SummaryAgent::new(config);

    writeln!(
        out,
        "{}",
        style("Analyzing your GitHub activity...").green().bold()
    )?;

    // Race the agent against Ctrl-C so an interrupt still reaches the
    // cleanup below.
    let result = tokio::select! {
        res = agent.run(&prompt) => res,
        _ = tokio::signal::ctrl_c() => Err(AgentError::Cancelled),
    };

    // Release the MCP session on every path: success, failure, interrupt.
    if let Err(e) = agent.cleanup().await {
        tracing::warn!(error = %e, "Agent cleanup failed");
    }

    let summary = result?;

    writeln!(out)?;
    render_panel(out, "Your Daily Summary", &summary)?;
    Ok(())
}
