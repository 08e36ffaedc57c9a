use clap::Parser;
use console::style;

use dailysum::cli::{Cli, Commands};
use dailysum::commands;
use dailysum::error::ConfigError;

#[tokio::main]
async fn main() {
    // Diagnostics go to stderr so the summary panel on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut out = std::io::stdout();

    let result = match cli.command {
        Commands::Init {
            github_token,
            model_id,
            company,
            config_path,
        } => commands::init::run(github_token, model_id, company, config_path, &mut out),
        Commands::Generate {
            config_path,
            use_env,
        } => commands::generate::run(config_path, use_env, &mut out).await,
        Commands::ShowConfig { config_path } => commands::show_config::run(config_path, &mut out),
    };

    if let Err(e) = result {
        eprintln!("{}", style(format!("✗ {e:#}")).red());
        if needs_init_hint(&e) {
            eprintln!(
                "{}",
                style("Run `dailysum init` to set up your configuration.").blue()
            );
        }
        std::process::exit(1);
    }
}

/// Whether the failure is one `dailysum init` would fix.
fn needs_init_hint(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<ConfigError>(),
        Some(
            ConfigError::NotFound { .. }
                | ConfigError::Invalid { .. }
                | ConfigError::MissingCredential
        )
    )
}
