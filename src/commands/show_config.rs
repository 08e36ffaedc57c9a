//! `dailysum show-config` -- display the persisted configuration, redacted.

use std::io::Write;
use std::path::PathBuf;

use console::style;

use crate::commands::render_panel;
use crate::config::{redact_token, resolve_config_path, Config};

pub fn run(config_path: Option<PathBuf>, out: &mut impl Write) -> anyhow::Result<()> {
    let config = Config::from_file(config_path.as_deref())?;
    let resolved = resolve_config_path(config_path.as_deref())?;

    writeln!(
        out,
        "\nConfiguration from: {}",
        style(resolved.display()).cyan()
    )?;

    let body = format!(
        "Model: {}\nCompany: {}\nGitHub Token: {}",
        config.model_id,
        config.company.as_deref().unwrap_or("Not set"),
        redact_token(&config.github_token),
    );
    render_panel(out, "Current Configuration", &body)?;
    Ok(())
}
