//! Main application logic for the terminal user interface.
//!
//! `App` wraps a `Session` with a screen: it routes key presses to the focused
//! pane or to a session action, runs service requests on the tokio runtime and
//! applies their outcomes as they arrive, and draws the form, the task JSON
//! editor, the strategy selector and the result cards.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::client::PriorityClient;
use crate::fields::Strategy;
use crate::form::{TaskForm, FIELD_COUNT};
use crate::render::ResultNode;
use crate::session::{Action, Completion, Notifier, PendingRequest, Session};
use crate::store::TaskStore;
use crate::tui::{
    colors::{severity_color, text_on, DARK_GREEN, DARK_PURPLE, DARK_RED, GOLD},
    enums::{AppState, Focus},
    keymap::{lookup, TuiCommand, KEY_BINDINGS},
    utils::centered_rect,
};

/// Alert and status text produced by the session.
#[derive(Debug, Default)]
struct Notices {
    alert: Option<String>,
    status: String,
}

impl Notifier for Notices {
    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_string());
    }

    fn info(&mut self, message: &str) {
        self.status = message.to_string();
    }
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    focus: Focus,
    session: Session,
    client: PriorityClient,
    runtime: Handle,
    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,
    notices: Notices,
    results_scroll: u16,
}

impl App {
    pub fn new(client: PriorityClient, strategy: &str, runtime: Handle) -> Self {
        let (completions_tx, completions_rx) = unbounded_channel();
        let mut session = Session::new(TaskStore::new(), strategy);
        session.form.focus(0);
        App {
            state: AppState::Main,
            focus: Focus::Form(0),
            session,
            client,
            runtime,
            completions_tx,
            completions_rx,
            notices: Notices::default(),
            results_scroll: 0,
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if let Focus::Form(order) = focus {
            self.session.form.focus(order);
        }
    }

    /// Show a pending alert as a modal.
    fn sync_alert(&mut self) {
        if self.notices.alert.is_some() {
            self.state = AppState::Alert;
        }
    }

    fn run_action(&mut self, action: Action) {
        if let Some(request) = self.session.dispatch(action, &mut self.notices) {
            self.spawn(request);
        }
        self.sync_alert();
    }

    /// Run a request on the runtime; its outcome comes back through the channel.
    fn spawn(&self, request: PendingRequest) {
        let client = self.client.clone();
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let completion = request.execute(&client).await;
            if tx.send(completion).is_err() {
                debug!("UI closed before the response arrived");
            }
        });
    }

    /// Apply every outcome that has arrived since the last frame.
    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            if self.session.complete(completion, &mut self.notices) {
                self.results_scroll = 0;
            }
        }
        self.sync_alert();
    }

    /// Handle one key press. Returns true if the application should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.state {
            AppState::Alert => {
                self.notices.alert = None;
                self.state = AppState::Main;
                false
            }
            AppState::Help => {
                self.state = AppState::Main;
                false
            }
            AppState::Main => self.handle_main_key(key),
        }
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> bool {
        self.notices.status.clear();

        match lookup(&key) {
            Some(TuiCommand::Quit) => return true,
            Some(TuiCommand::Help) => {
                self.state = AppState::Help;
                return false;
            }
            Some(TuiCommand::Session(action)) => {
                self.run_action(action);
                return false;
            }
            None => {}
        }

        match key.code {
            KeyCode::Tab => self.set_focus(self.focus.next()),
            KeyCode::BackTab => self.set_focus(self.focus.prev()),
            _ => match self.focus {
                Focus::Form(_) => self.handle_form_key(key),
                Focus::TaskJson => self.handle_editor_key(key),
                Focus::Results => self.handle_results_key(key),
            },
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let form = &mut self.session.form;
        match key.code {
            KeyCode::Enter => self.run_action(Action::AddTask),
            KeyCode::Up => {
                form.prev_field();
                self.focus = Focus::Form(form.current_field);
            }
            KeyCode::Down => {
                form.next_field();
                self.focus = Focus::Form(form.current_field);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.active_field().handle_char(c)
            }
            KeyCode::Backspace => form.active_field().handle_backspace(),
            KeyCode::Delete => form.active_field().handle_delete(),
            KeyCode::Left => form.active_field().move_cursor_left(),
            KeyCode::Right => form.active_field().move_cursor_right(),
            KeyCode::Home => form.active_field().move_home(),
            KeyCode::End => form.active_field().move_end(),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let editor = &mut self.session.task_json;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                editor.insert_char(c)
            }
            KeyCode::Enter => editor.insert_newline(),
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Delete if key.modifiers.contains(KeyModifiers::CONTROL) => editor.clear(),
            KeyCode::Delete => editor.delete(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Up => editor.move_up(),
            KeyCode::Down => editor.move_down(),
            KeyCode::Home => editor.move_home(),
            KeyCode::End => editor.move_end(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.results_scroll = self.results_scroll.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.results_scroll = self.results_scroll.saturating_add(1)
            }
            KeyCode::PageUp => self.results_scroll = self.results_scroll.saturating_sub(10),
            KeyCode::PageDown => self.results_scroll = self.results_scroll.saturating_add(10),
            KeyCode::Home => self.results_scroll = 0,
            _ => {}
        }
    }

    /// Poll for and handle keyboard events.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn border_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(GOLD)
        } else {
            Style::default()
        }
    }

    fn render_form(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3); FIELD_COUNT])
            .split(area);

        let focus = self.focus;
        let styles: Vec<Style> = (0..FIELD_COUNT)
            .map(|order| self.border_style(Focus::Form(order)))
            .collect();

        for (order, field) in self.session.form.fields_mut().into_iter().enumerate() {
            let input = Paragraph::new(field.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(TaskForm::label(order))
                    .border_style(styles[order]),
            );
            f.render_widget(input, chunks[order]);

            if focus == Focus::Form(order) {
                let max_x = chunks[order].width.saturating_sub(2) as usize;
                f.set_cursor_position((
                    chunks[order].x + 1 + field.cursor.min(max_x) as u16,
                    chunks[order].y + 1,
                ));
            }
        }
    }

    fn render_strategy(&self, f: &mut Frame, area: Rect) {
        let current = self.session.strategy();
        let description = Strategy::from_name(current)
            .map(Strategy::description)
            .unwrap_or("custom");
        let line = Line::from(vec![
            Span::styled(
                format!("< {current} >"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {description}")),
        ]);
        let selector = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Strategy (Ctrl+T)"),
        );
        f.render_widget(selector, area);
    }

    /// Multi-line JSON editor with scrolling and a visible cursor.
    fn render_task_json(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Input Tasks JSON")
            .border_style(self.border_style(Focus::TaskJson));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let visible_height = inner.height as usize;
        let editor = &mut self.session.task_json;
        editor.scroll_to_cursor(visible_height);

        let visible_lines: Vec<Line> = editor
            .lines()
            .into_iter()
            .skip(editor.scroll_y)
            .take(visible_height)
            .map(Line::from)
            .collect();
        f.render_widget(Paragraph::new(visible_lines), inner);

        if self.focus == Focus::TaskJson {
            let cursor_y_visible = editor.cursor_y.saturating_sub(editor.scroll_y);
            let cursor_x_clamped = editor.cursor_x.min(inner.width as usize);
            if cursor_y_visible < visible_height {
                f.set_cursor_position((
                    inner.x + cursor_x_clamped as u16,
                    inner.y + cursor_y_visible as u16,
                ));
            }
        }
    }

    fn render_results(&self, f: &mut Frame, area: Rect) {
        let results = self.session.results();
        let mut lines: Vec<Line> = Vec::new();

        for node in results.nodes() {
            match node {
                ResultNode::Placeholder(text) => lines.push(Line::from(Span::styled(
                    text.as_str(),
                    Style::default().add_modifier(Modifier::ITALIC),
                ))),
                ResultNode::Card(card) => {
                    let color = severity_color(card.severity);
                    lines.push(Line::from(vec![
                        Span::styled(
                            format!(" {} ", card.severity.label()),
                            Style::default().bg(color).fg(text_on(color)),
                        ),
                        Span::raw(" "),
                        Span::styled(
                            card.title.as_str(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]));
                    lines.push(Line::from(Span::styled(
                        card.meta.as_str(),
                        Style::default().fg(Color::Gray),
                    )));
                    lines.push(Line::from(Span::styled(
                        card.score_line(),
                        Style::default().fg(color),
                    )));
                    if !card.explanation.is_empty() {
                        lines.push(Line::from(card.explanation.as_str()));
                    }
                    lines.push(Line::from(""));
                }
            }
        }

        let title = format!("Results ({})", results.cards().count());
        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(self.border_style(Focus::Results)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.results_scroll, 0));
        f.render_widget(paragraph, area);
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3 * FIELD_COUNT as u16),
                Constraint::Length(3),
                Constraint::Min(3),
            ])
            .split(columns[0]);

        self.render_form(f, left[0]);
        self.render_strategy(f, left[1]);
        self.render_task_json(f, left[2]);
        self.render_results(f, columns[1]);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let heading = |text: &'static str| {
            Line::from(Span::styled(
                text,
                Style::default().add_modifier(Modifier::BOLD),
            ))
        };

        let mut help_text = vec![heading("Task Prioritizer Help"), Line::from(""), heading("Actions:")];
        help_text.extend(KEY_BINDINGS.iter().map(|b| Line::from(format!("  {}", b.hint))));
        help_text.extend([
            Line::from(""),
            heading("Navigation:"),
            Line::from("  Tab/Shift+Tab  Move between form fields, JSON editor and results"),
            Line::from("  Up/Down        Previous/next form field, or scroll results"),
            Line::from("  Enter          Add task (in the form) or new line (in the editor)"),
            Line::from("  Ctrl+Delete    Clear the JSON editor"),
            Line::from(""),
            heading("Due Date Formats:"),
            Line::from("  YYYY-MM-DD     Specific date (e.g., 2024-12-25)"),
            Line::from("  today, tomorrow, eow, eom, weekend"),
            Line::from("  in 3d, in 2w, in 1m"),
            Line::from("  fri, next mon"),
            Line::from(""),
            heading("Severity:"),
            Line::from("  HIGH >= 120, MEDIUM >= 80, LOW otherwise"),
        ]);

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Modal for blocking notifications.
    fn render_alert(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Alert")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED).fg(Color::White));

        let area = centered_rect(60, 25, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                self.notices.alert.as_deref().unwrap_or(""),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Press any key to continue"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let in_flight = self.session.in_flight();
        let (text, bg) = if !self.notices.status.is_empty() {
            (self.notices.status.clone(), DARK_GREEN)
        } else if in_flight > 0 {
            (format!("Waiting for the server ({in_flight} in flight)..."), DARK_PURPLE)
        } else {
            (
                format!(
                    "Tasks: {} | Strategy: {} | F1 for help",
                    self.session.store().len(),
                    self.session.strategy()
                ),
                DARK_GREEN,
            )
        };

        let status = Paragraph::new(text)
            .style(Style::default().bg(bg).fg(text_on(bg)))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(f.area());

        match self.state {
            AppState::Main => self.render_main(f, chunks[0]),
            AppState::Help => self.render_help(f, chunks[0]),
            AppState::Alert => {
                self.render_main(f, chunks[0]);
                self.render_alert(f, chunks[0]);
            }
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering, input and arriving responses until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            self.drain_completions();
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        if self.session.in_flight() > 0 {
            warn!(in_flight = self.session.in_flight(), "quitting with requests in flight");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use tokio::runtime::Runtime;

    fn app(runtime: &Runtime) -> App {
        // Nothing listens on port 9; no test here waits for a response
        App::new(
            PriorityClient::new("http://127.0.0.1:9"),
            "smart",
            runtime.handle().clone(),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typing_fills_form_and_enter_adds_task() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);

        type_text(&mut app, "Write report");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "2030-01-15");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::Main);
        assert_eq!(app.session.store().len(), 1);
        assert_eq!(app.notices.status, "Task 1 added");
        assert!(app.session.task_json.text().contains("\"title\": \"Write report\""));
        assert!(app.session.task_json.text().contains("\"due_date\": \"2030-01-15\""));
    }

    #[test]
    fn test_invalid_form_opens_alert_until_key_pressed() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::Alert);
        assert!(screen(&mut app).contains("Please fill Title"));

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::Main);
        assert!(app.notices.alert.is_none());
        assert!(app.session.store().is_empty());
    }

    #[test]
    fn test_analyze_empty_list_alerts_without_request() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);

        ctrl(&mut app, 'r');
        assert_eq!(app.state, AppState::Alert);
        assert_eq!(
            app.notices.alert.as_deref(),
            Some("Please add at least one task (via the form or JSON).")
        );
        assert_eq!(app.session.in_flight(), 0);
    }

    #[test]
    fn test_strategy_cycles_and_shows_in_selector() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);

        ctrl(&mut app, 't');
        assert_eq!(app.session.strategy(), "deadline");
        assert!(screen(&mut app).contains("< deadline >"));
    }

    #[test]
    fn test_json_editor_receives_text() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);
        app.set_focus(Focus::TaskJson);

        app.handle_key(KeyEvent::new(KeyCode::Delete, KeyModifiers::CONTROL));
        type_text(&mut app, "[]");
        assert_eq!(app.session.task_json.text(), "[]");
        assert!(app.session.form.title.value.is_empty());
    }

    #[test]
    fn test_help_and_quit() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);

        press(&mut app, KeyCode::F(1));
        assert_eq!(app.state, AppState::Help);
        assert!(screen(&mut app).contains("Ctrl+R"));
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state, AppState::Main);

        assert!(ctrl(&mut app, 'q'));
    }

    #[test]
    fn test_completion_is_applied_on_drain() {
        let runtime = Runtime::new().unwrap();
        let mut app = app(&runtime);
        let request = app.session.dispatch(Action::Suggest, &mut app.notices).unwrap();

        let task = serde_json::from_value(serde_json::json!({"title": "Ranked", "score": 99})).unwrap();
        app.completions_tx
            .send(Completion {
                seq: request.seq,
                kind: request.kind,
                outcome: Ok(vec![task]),
            })
            .unwrap();
        app.drain_completions();

        assert_eq!(app.session.in_flight(), 0);
        let rendered = screen(&mut app);
        assert!(rendered.contains("MEDIUM"));
        assert!(rendered.contains("Ranked"));
        assert!(rendered.contains("Score: 99"));
    }
}
