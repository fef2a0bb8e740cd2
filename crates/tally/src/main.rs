//! Tally - Sales chart analytics
//!
//! # Usage
//!
//! ```bash
//! # Run the API server (default)
//! tally
//! tally --config configs/example.toml serve
//!
//! # Fill the database with random sales
//! tally seed --count 5000 --reset
//!
//! # Render a chart to stdout
//! tally chart pie --start 2024-01-01 --end 2024-06-30 --dimension category
//! ```

mod backend;
mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tally_config::{Config, LogFormat};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Tally - Sales chart analytics
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (error if specified but not found)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). Overrides config file.
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the API server
    Serve,

    /// Insert randomly generated sales into the SQLite database
    Seed(cmd::seed::SeedArgs),

    /// Render a chart and print it as JSON
    Chart(cmd::chart::ChartArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let log_level = resolve_log_level(cli.log_level.as_deref(), &config);
    init_logging(&config.log.directive(&log_level), config.log.format)?;

    match cli.command {
        // No subcommand = run server (default behavior)
        Some(Command::Serve) | None => cmd::serve::run(config).await,
        Some(Command::Seed(args)) => cmd::seed::run(config, args).await,
        Some(Command::Chart(args)) => cmd::chart::run(config, args).await,
    }
}

/// Resolve log level: CLI flag > config file > default "info"
fn resolve_log_level(cli_level: Option<&str>, config: &Config) -> String {
    match cli_level {
        Some(level) => level.to_string(),
        None => config.log.level.as_str().to_string(),
    }
}

/// Initialize the tracing subscriber for logging
///
/// Logs go to stderr so `tally chart` output stays pipeable.
fn init_logging(directive: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_new(directive)
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|e| anyhow::anyhow!("invalid log level: {}", e))?;

    let (console, json) = match format {
        LogFormat::Console => (
            Some(fmt::layer().with_target(true).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(fmt::layer().json().with_writer(std::io::stderr)),
        ),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(json)
        .with(filter)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["tally", "--log-level", "debug", "seed", "--count", "10"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Some(Command::Seed(ref args)) if args.count == 10));

        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_log_level_precedence() {
        let config = Config::from_str("[log]\nlevel = \"warn\"").unwrap();
        assert_eq!(resolve_log_level(Some("trace"), &config), "trace");
        assert_eq!(resolve_log_level(None, &config), "warn");
        assert_eq!(resolve_log_level(None, &Config::default()), "info");
    }
}
