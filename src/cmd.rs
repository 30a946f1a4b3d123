//! Command implementations for the CLI interface.
//!
//! `ui` runs the interactive session; `analyze` and `suggest` run one service
//! request and print the rendered cards (or the raw JSON with `--json`).

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use tokio::runtime::Runtime;
use tracing::error;

use crate::client::PriorityClient;
use crate::config::Config;
use crate::error::ClientError;
use crate::render::{render, write_text, ResultsPane};
use crate::session::{RequestKind, NO_STORED_TASKS};
use crate::task::ScoredTask;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Analyze a JSON array of tasks.
    Analyze {
        /// File holding the task JSON. Reads stdin when omitted or "-".
        #[arg(long, short)]
        file: Option<PathBuf>,
        /// Print the service response as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Rank the tasks held by the service.
    Suggest {
        /// Print the service response as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(config: &Config, runtime: &Runtime) {
    let client = PriorityClient::new(config.server_url.clone());
    if let Err(e) = run_tui(client, &config.strategy, runtime.handle().clone()) {
        error!(error = %e, "terminal UI failed");
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Analyze task JSON read from a file or stdin.
pub fn cmd_analyze(config: &Config, runtime: &Runtime, file: Option<PathBuf>, json: bool) {
    let text = match read_input(file.as_ref()) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read tasks: {e}");
            std::process::exit(1);
        }
    };

    let client = PriorityClient::new(config.server_url.clone());
    let outcome = runtime.block_on(client.analyze(&text, &config.strategy));
    finish(RequestKind::Analyze, outcome, json);
}

/// Fetch suggestions for the tasks held by the service.
pub fn cmd_suggest(config: &Config, runtime: &Runtime, json: bool) {
    let client = PriorityClient::new(config.server_url.clone());
    let outcome = runtime.block_on(client.suggest(&config.strategy));
    if matches!(&outcome, Ok(tasks) if tasks.is_empty()) {
        eprintln!("{NO_STORED_TASKS}");
    }
    finish(RequestKind::Suggest, outcome, json);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut io::stdout());
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn finish(kind: RequestKind, outcome: Result<Vec<ScoredTask>, ClientError>, json: bool) {
    let tasks = match outcome {
        Ok(tasks) => tasks,
        Err(e) => {
            error!(?kind, error = %e, "request failed");
            eprintln!("{}", kind.failure_message(&e));
            std::process::exit(1);
        }
    };

    if let Err(e) = write_results(&mut io::stdout().lock(), &tasks, json) {
        eprintln!("Failed to write results: {e}");
        std::process::exit(1);
    }
}

/// Print results as text cards, or as the service's JSON array with `json`.
fn write_results<W: Write>(out: &mut W, tasks: &[ScoredTask], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, tasks)?;
        writeln!(out)
    } else {
        let mut pane = ResultsPane::new();
        render(&mut pane, Some(tasks));
        write_text(out, pane.nodes())
    }
}
