//! Screen command implementation.

use anyhow::{Context, Result};
use laggard::Pipeline;

use crate::report;

/// Screen the most recent months, ending with the upcoming one.
pub(crate) fn run_screen(pipeline: &Pipeline) -> Result<()> {
    let config = pipeline.config();
    let prepared = pipeline
        .prepare(&pipeline.store(), true)
        .context("Failed to prepare screen inputs")?;

    let screen = pipeline.screen(&prepared);
    let cap = pipeline.strategy().config().cap;
    let text = report::screen_markdown(&screen, cap);

    let path = config.report.output_dir.join("screen.md");
    report::write_text(&path, &text)?;

    println!("{text}");
    if let Some((month, picks)) = screen.iter().next_back() {
        println!("Picks for {month}: {}", picks.join(", "));
    }
    println!("Written to {}", path.display());
    Ok(())
}
