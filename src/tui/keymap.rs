//! Global key bindings.
//!
//! Bindings here work from every pane of the main screen. Everything else is
//! routed to the focused pane as text input or navigation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::session::Action;

/// What a global binding does.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TuiCommand {
    Session(Action),
    Help,
    Quit,
}

pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub command: TuiCommand,
    pub hint: &'static str,
}

pub const KEY_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        code: KeyCode::Char('a'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Session(Action::AddTask),
        hint: "Ctrl+A  Add task from the form",
    },
    KeyBinding {
        code: KeyCode::Char('r'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Session(Action::Analyze),
        hint: "Ctrl+R  Analyze the task JSON",
    },
    KeyBinding {
        code: KeyCode::Char('s'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Session(Action::Suggest),
        hint: "Ctrl+S  Suggest from the server's tasks",
    },
    KeyBinding {
        code: KeyCode::Char('t'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Session(Action::CycleStrategy),
        hint: "Ctrl+T  Next strategy",
    },
    KeyBinding {
        code: KeyCode::F(1),
        modifiers: KeyModifiers::NONE,
        command: TuiCommand::Help,
        hint: "F1      Show this help",
    },
    KeyBinding {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Quit,
        hint: "Ctrl+C  Quit",
    },
    KeyBinding {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::CONTROL,
        command: TuiCommand::Quit,
        hint: "Ctrl+Q  Quit",
    },
];

/// Look up the global command bound to a key press.
pub fn lookup(key: &KeyEvent) -> Option<TuiCommand> {
    // Shift is ignored so Ctrl+Shift+R behaves like Ctrl+R
    let modifiers = key.modifiers.difference(KeyModifiers::SHIFT);
    let code = match key.code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    };
    KEY_BINDINGS
        .iter()
        .find(|b| b.code == code && b.modifiers == modifiers)
        .map(|b| b.command)
}
