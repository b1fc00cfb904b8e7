//! `call-status` - resolve recorded call sessions from the command line
//!
//! ```text
//! call-status resolve session.json --now 1700000000000
//! call-status resolve session.json --json
//! call-status format-duration 3725 --config status.toml
//! ```

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rvoip_call_status_core::{
    Clock, DurationFormatter, Resolution, ResolverConfig, SessionDocument, StatusResolver,
    SystemClock, UnitDurationFormatter,
};

use crate::logging::{parse_log_level, setup_logging, LoggingConfig};

#[derive(Debug, Parser)]
#[command(name = "call-status", version, about = "Resolve rvoip call sessions into presentation status")]
struct Cli {
    /// Resolver configuration file (TOML)
    #[arg(long, global = true, env = "CALL_STATUS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a session document
    Resolve {
        /// Path to the session document (JSON)
        session: PathBuf,

        /// Resolution time in milliseconds since the epoch; defaults to now
        #[arg(long)]
        now: Option<i64>,

        /// Print the full resolution as JSON
        #[arg(long)]
        json: bool,
    },
    /// Format a duration the way resolutions do
    FormatDuration {
        /// Duration in seconds
        seconds: f64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ResolverConfig> {
    match path {
        Some(path) => ResolverConfig::from_file(path)
            .with_context(|| format!("loading resolver config from {}", path.display())),
        None => Ok(ResolverConfig::default()),
    }
}

fn render(resolution: &Resolution) -> String {
    let mut lines = vec![format!("status:   {}", resolution.status)];
    if let Some(message) = &resolution.message {
        lines.push(format!("message:  {}", message));
    }
    lines.push(format!("duration: {}s", resolution.duration_seconds));
    if !resolution.actions.is_empty() {
        let actions: Vec<String> = resolution
            .actions
            .iter()
            .map(|action| action.kind.identifier().to_string())
            .collect();
        lines.push(format!("actions:  {}", actions.join(", ")));
    }
    lines.join("\n")
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Resolve { session, now, json } => {
            let document = SessionDocument::from_file(&session)
                .with_context(|| format!("reading session {}", session.display()))?;
            let now = now.unwrap_or_else(|| SystemClock.now_millis());
            let resolution = document
                .resolve(&StatusResolver::new(&config), now)
                .with_context(|| format!("resolving call {}", document.call_id))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&resolution)?);
            } else {
                println!("{}", render(&resolution));
            }
        }
        Command::FormatDuration { seconds } => {
            let formatter = UnitDurationFormatter::new(config.duration);
            println!("{}", formatter.format(seconds));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = parse_log_level(&cli.log_level)?;
    setup_logging(LoggingConfig::new(level).with_json(cli.log_json))?;
    tracing::debug!("call-status v{}", rvoip_call_status_core::VERSION);

    run(cli)
}
