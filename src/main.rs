//! # tp - Task Prioritisation Client
//!
//! A terminal client for a remote task prioritisation service. Tasks are
//! captured through an entry form (or typed directly as JSON), sent to the
//! service for scoring under a chosen strategy, and the ranked results are
//! shown as cards classified by severity.
//!
//! ## Key Features
//!
//! - **Task Intake**: Form with title, due date, estimated hours, importance and
//!   dependencies. Due dates accept natural language ("tomorrow", "in 3d", "fri").
//! - **Editable Payload**: The task list is kept as pretty-printed JSON that can be
//!   hand-edited before analysis.
//! - **Strategies**: `smart`, `deadline`, `fastest` and `impact`, passed through to
//!   the service as a query parameter.
//! - **Severity Cards**: Scores >= 120 are HIGH, >= 80 MEDIUM, everything else LOW.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! tp
//!
//! # Analyze a task file with the deadline strategy
//! tp analyze --file tasks.json --strategy deadline
//!
//! # Rank the tasks already stored on the service
//! tp suggest --server http://127.0.0.1:8000
//! ```
//!
//! ## Key Commands
//!
//! - `tp ui` - Interactive UI (the default)
//! - `tp analyze` - Score a JSON task array from a file or stdin
//! - `tp suggest` - Score the tasks held by the service
//! - `tp completions <shell>` - Shell completion scripts
//!
//! Logs are written to `~/.task-prioritizer/logs/task-prioritizer.log`.

use clap::Parser;
use tokio::runtime::{Builder, Runtime};

pub mod cli;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod form;
pub mod input;
pub mod logging;
pub mod parse;
pub mod render;
pub mod session;
pub mod severity;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod keymap;
    pub mod run;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use logging::init_logging;

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Ui) {
        // Completions print to stdout and need neither logging nor a runtime
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Ui => cmd_ui(&config, &start_runtime(&config)),
        Commands::Analyze { file, json } => {
            cmd_analyze(&config, &start_runtime(&config), file, json)
        }
        Commands::Suggest { json } => cmd_suggest(&config, &start_runtime(&config), json),
    }
}

/// Install logging and build the async runtime for commands that talk to the service.
fn start_runtime(config: &Config) -> Runtime {
    if let Err(e) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("Warning: logging disabled: {e}");
    }

    match Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    }
}
