//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Counting station CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/tally_config.toml")]
    pub config: PathBuf,

    /// Emit results and errors as JSON instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulated counting session end to end
    Run {
        /// Number of simulated crossings to apply before finalizing
        #[arg(long, default_value_t = 12)]
        crossings: u32,
        /// Capture a partial every N applied crossings (overrides config)
        #[arg(long, value_name = "N")]
        partial_every: Option<u32>,
        /// Lot tag attached to the session
        #[arg(long)]
        lot: Option<String>,
        /// RNG seed for both simulators (overrides config; makes runs reproducible)
        #[arg(long)]
        seed: Option<u64>,
        /// CSV file the finalized summary is appended to (overrides config)
        #[arg(long, value_name = "FILE")]
        history: Option<PathBuf>,
        /// Override the detector polling rate in Hz
        #[arg(long, value_name = "HZ")]
        rate_hz: Option<u32>,
    },
    /// Quick health check (simulators respond, config is valid)
    SelfCheck,
}
