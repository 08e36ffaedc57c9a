//! Command implementations for the CLI.
//!
//! Each command writes user-facing output to an explicit sink instead of a
//! process-global console, so tests can capture it. Error rendering (red
//! line, optional blue hint, exit code) happens once, in `main`.

pub mod generate;
pub mod init;
pub mod show_config;

use std::io::Write;

use console::{measure_text_width, style};

/// Render `body` inside a labeled, blue-bordered panel.
pub(crate) fn render_panel(out: &mut impl Write, title: &str, body: &str) -> std::io::Result<()> {
    let title_width = measure_text_width(title);
    let inner = body
        .lines()
        .map(measure_text_width)
        .max()
        .unwrap_or(0)
        .max(title_width + 2);

    let top = format!(
        "╭─ {title} {}╮",
        "─".repeat(inner.saturating_sub(title_width + 1))
    );
    writeln!(out, "{}", style(top).blue())?;
    for line in body.lines() {
        let pad = " ".repeat(inner.saturating_sub(measure_text_width(line)));
        writeln!(
            out,
            "{} {line}{pad} {}",
            style("│").blue(),
            style("│").blue()
        )?;
    }
    writeln!(out, "{}", style(format!("╰{}╯", "─".repeat(inner + 2))).blue())?;
    Ok(())
}
