use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Terminal client for a remote task prioritisation service.
/// Runs the interactive UI when no subcommand is given.
#[derive(Parser)]
#[command(name = "tp", version, about = "Task prioritisation client")]
pub struct Cli {
    /// Base URL of the prioritisation service.
    #[arg(long, global = true, env = "TASK_PRIORITIZER_URL")]
    pub server: Option<String>,

    /// Prioritisation strategy: smart | deadline | fastest | impact (passed through as given).
    #[arg(long, global = true, env = "TASK_PRIORITIZER_STRATEGY")]
    pub strategy: Option<String>,

    /// Tracing filter for the log file, e.g. "info" or "task_prioritizer=debug".
    #[arg(long, global = true, env = "TASK_PRIORITIZER_LOG")]
    pub log_level: Option<String>,

    /// Directory for the log file.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
