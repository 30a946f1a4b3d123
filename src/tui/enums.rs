//! Enumerations for TUI state management.

use crate::form::{FIELD_COUNT, TITLE_ORDER};

/// Which screen (or modal) receives input.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Main,
    /// Blocking notification; any key dismisses it.
    Alert,
    Help,
}

/// Focusable panes of the main screen, in Tab order.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    /// A form field, by its visual order.
    Form(usize),
    TaskJson,
    Results,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Form(order) if order + 1 < FIELD_COUNT => Focus::Form(order + 1),
            Focus::Form(_) => Focus::TaskJson,
            Focus::TaskJson => Focus::Results,
            Focus::Results => Focus::Form(TITLE_ORDER),
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Form(0) => Focus::Results,
            Focus::Form(order) => Focus::Form(order - 1),
            Focus::TaskJson => Focus::Form(FIELD_COUNT - 1),
            Focus::Results => Focus::TaskJson,
        }
    }
}
