//! TUI entry point and terminal setup.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tracing::info;

use crate::client::PriorityClient;
use crate::tui::app::App;

/// Initialise and run the terminal user interface until the user quits.
/// Service requests run on `runtime`.
pub fn run_tui(client: PriorityClient, strategy: &str, runtime: Handle) -> io::Result<()> {
    info!(server = client.base_url(), strategy, "starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client, strategy, runtime);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
