//! `dailysum init` -- collect credentials and write the config file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::bail;
use console::style;
use dialoguer::{theme::ColorfulTheme, Password};

use crate::config::Config;

pub fn run(
    github_token: Option<String>,
    model_id: String,
    company: Option<String>,
    config_path: Option<PathBuf>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // Token is a secret: prompt with hidden input when not given as a flag.
    let github_token = match github_token {
        Some(token) => token,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("GitHub Token")
            .interact()?,
    };

    if github_token.is_empty() {
        bail!("GitHub token must not be empty");
    }

    let config = Config {
        github_token,
        model_id,
        company,
    };

    let saved_path = config.save(config_path.as_deref())?;

    writeln!(
        out,
        "{} Configuration saved to {}",
        style("✓").green(),
        style(saved_path.display()).cyan()
    )?;
    writeln!(
        out,
        "{}",
        style("Run `dailysum generate` to create your daily summary!").blue()
    )?;
    Ok(())
}
