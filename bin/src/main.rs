//! laggard CLI binary.
//!
//! Provides the command-line interface for the laggard backtester and
//! screener.

mod cmd;
mod report;

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use laggard::{Pipeline, RunConfig, Variant};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "laggard")]
#[command(about = "Point-in-time S&P 500 laggard backtester and screener", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./laggard.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download daily bars into the bar store
    Fetch {
        /// Ticker symbols (defaults to every roster symbol)
        #[arg(value_delimiter = ',')]
        symbols: Vec<String>,

        /// Refetch even if the cached file is fresh
        #[arg(long)]
        force: bool,
    },

    /// Run the monthly backtest and write reports
    Backtest {
        /// Strategy preset (classic, screener, balanced, reversion)
        #[arg(short, long)]
        variant: Option<Variant>,

        /// Evaluate only the last N months
        #[arg(short, long)]
        months: Option<usize>,

        /// Initial capital
        #[arg(long)]
        capital: Option<f64>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write per-month debug frames and the feature table
        #[arg(long)]
        debug: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List picks for the recent months and the upcoming one
    Screen {
        /// Strategy preset (classic, screener, balanced, reversion)
        #[arg(short, long)]
        variant: Option<Variant>,

        /// Number of months to screen
        #[arg(short, long)]
        months: Option<usize>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List strategy presets
    Variants {
        /// Show the rule sets
        #[arg(short, long)]
        verbose: bool,
    },

    /// List indicators and features
    Indicators {
        /// Filter by stage (daily, monthly, lagged)
        #[arg(short, long)]
        stage: Option<String>,

        /// Describe a single lagged feature
        #[arg(short, long)]
        name: Option<String>,

        /// Show descriptions and warm-up
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = RunConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Fetch { symbols, force } => {
            cmd::fetch::fetch(&Pipeline::new(config), symbols, force).await?;
        }
        Commands::Backtest {
            variant,
            months,
            capital,
            output,
            debug,
            format,
        } => {
            apply_common(&mut config, variant, output);
            if months.is_some() {
                config.backtest.months = months;
            }
            if let Some(capital) = capital {
                config.backtest.initial_capital = capital;
            }
            config.report.debug |= debug;
            config.validate()?;
            cmd::backtest::run_backtest(&Pipeline::new(config), &format)?;
        }
        Commands::Screen {
            variant,
            months,
            output,
        } => {
            apply_common(&mut config, variant, output);
            if let Some(months) = months {
                config.report.screen_months = months;
            }
            cmd::screen::run_screen(&Pipeline::new(config))?;
        }
        Commands::Variants { verbose } => {
            cmd::variants::list_variants(verbose)?;
        }
        Commands::Indicators {
            stage,
            name,
            verbose,
        } => match name {
            Some(name) => cmd::indicators::describe(&name)?,
            None => cmd::indicators::list_indicators(stage, verbose)?,
        },
        Commands::Config => {
            cmd::config::show_config(&config)?;
        }
    }

    Ok(())
}

/// Command-line flags take precedence over the configuration file. A preset
/// chosen on the command line replaces any inline rule set.
fn apply_common(config: &mut RunConfig, variant: Option<Variant>, output: Option<PathBuf>) {
    if let Some(variant) = variant {
        config.strategy.variant = variant;
        config.strategy.custom = None;
    }
    if let Some(output) = output {
        config.report.output_dir = output;
    }
}
