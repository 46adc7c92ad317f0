//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "statusdial", version, about = "Six-station status dial controller")]
pub struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE", default_value = "etc/dial_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
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
    /// Drive the dial from uniformly random targets (soak/load-test mode)
    Random {
        /// API key for the smart machine
        #[arg(long, value_name = "KEY")]
        api_key: String,
        /// API key id for the smart machine
        #[arg(long, value_name = "ID")]
        api_key_id: String,
        /// Domain of the smart machine; falls back to [connection].address
        #[arg(long, value_name = "DOMAIN")]
        smart_machine_domain: Option<String>,
    },
    /// Drive the dial from the next calendar event
    Calendar {
        /// Robot location secret
        #[arg(long, value_name = "SECRET")]
        location_secret: String,
        /// Robot address; falls back to [connection].address
        #[arg(long, value_name = "ADDR")]
        robot_address: Option<String>,
    },
    /// Quick health check (config parses, simulated controller responds)
    SelfCheck,
}
