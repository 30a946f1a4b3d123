//! Task entry form and intake validation.
//!
//! This module provides the `TaskForm` structure: the five entry fields, the
//! field navigation used by the terminal UI, and `submit`, which validates the
//! raw values and appends a new task to the store. Acceptance is all-or-nothing.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{FormField, ValidationError};
use crate::input::InputField;
use crate::parse::{parse_dependencies, parse_due_input, parse_leading_int};
use crate::store::TaskStore;
use crate::task::TaskRecord;

/// Default value of the estimated hours field after a reset.
pub const DEFAULT_HOURS: &str = "1";
/// Default value of the importance field after a reset.
pub const DEFAULT_IMPORTANCE: &str = "5";

/// Visual order of the entry fields.
pub const TITLE_ORDER: usize = 0;
pub const DUE_DATE_ORDER: usize = 1;
pub const HOURS_ORDER: usize = 2;
pub const IMPORTANCE_ORDER: usize = 3;
pub const DEPENDENCIES_ORDER: usize = 4;
pub const FIELD_COUNT: usize = 5;

/// Task entry form.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub title: InputField,
    pub due_date: InputField,
    pub estimated_hours: InputField,
    pub importance: InputField,
    pub dependencies: InputField,
    pub current_field: usize,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    pub fn new() -> Self {
        let mut form = Self {
            title: InputField::new(),
            due_date: InputField::new(),
            estimated_hours: InputField::with_value(DEFAULT_HOURS),
            importance: InputField::with_value(DEFAULT_IMPORTANCE),
            dependencies: InputField::new(),
            current_field: TITLE_ORDER,
        };
        form.update_active_field();
        form
    }

    /// Validate the form against today's date and append the task on success.
    pub fn submit(&mut self, store: &mut TaskStore) -> Result<TaskRecord, ValidationError> {
        self.submit_on(store, Local::now().date_naive())
    }

    /// Validate the form and append the task on success.
    ///
    /// On failure the store and the form are left untouched. On success the
    /// transient fields are reset; the due date is kept for the next entry.
    pub fn submit_on(
        &mut self,
        store: &mut TaskStore,
        today: NaiveDate,
    ) -> Result<TaskRecord, ValidationError> {
        let title = self.title.value.trim();
        let due = parse_due_input(&self.due_date.value, today);
        let hours = parse_leading_int(&self.estimated_hours.value);
        let importance = parse_leading_int(&self.importance.value);

        let (false, Some(due), Some(hours), Some(importance)) =
            (title.is_empty(), due, hours, importance)
        else {
            let invalid: Vec<FormField> = [
                (title.is_empty(), FormField::Title),
                (due.is_none(), FormField::DueDate),
                (hours.is_none(), FormField::EstimatedHours),
                (importance.is_none(), FormField::Importance),
            ]
            .into_iter()
            .filter_map(|(bad, field)| bad.then_some(field))
            .collect();
            debug!(fields = ?invalid, "task form rejected");
            return Err(ValidationError { fields: invalid });
        };

        let task = TaskRecord {
            id: store.allocate_id(),
            title: title.to_string(),
            due_date: due.format("%Y-%m-%d").to_string(),
            estimated_hours: hours,
            importance,
            dependencies: parse_dependencies(self.dependencies.value.as_str()),
        };
        store.append(task.clone());
        info!(
            id = task.id,
            dependencies = task.dependencies.len(),
            "task added to session store"
        );

        self.reset_transient();
        Ok(task)
    }

    /// Reset every field except the due date to its default.
    pub fn reset_transient(&mut self) {
        self.title.set_value("");
        self.estimated_hours.set_value(DEFAULT_HOURS);
        self.importance.set_value(DEFAULT_IMPORTANCE);
        self.dependencies.set_value("");
    }

    /// Input fields in visual order.
    pub fn fields_mut(&mut self) -> [&mut InputField; FIELD_COUNT] {
        [
            &mut self.title,
            &mut self.due_date,
            &mut self.estimated_hours,
            &mut self.importance,
            &mut self.dependencies,
        ]
    }

    /// The field that currently receives keystrokes.
    pub fn active_field(&mut self) -> &mut InputField {
        match self.current_field {
            DUE_DATE_ORDER => &mut self.due_date,
            HOURS_ORDER => &mut self.estimated_hours,
            IMPORTANCE_ORDER => &mut self.importance,
            DEPENDENCIES_ORDER => &mut self.dependencies,
            _ => &mut self.title,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Focus a field by its visual order.
    pub fn focus(&mut self, order: usize) {
        self.current_field = order.min(FIELD_COUNT - 1);
        self.update_active_field();
    }

    /// Mark only the current field as active.
    pub fn update_active_field(&mut self) {
        let current = self.current_field;
        for (i, field) in self.fields_mut().into_iter().enumerate() {
            field.active = i == current;
        }
    }

    /// Label of a field for display, with a marker on required fields.
    pub fn label(order: usize) -> &'static str {
        match order {
            TITLE_ORDER => "Title *",
            DUE_DATE_ORDER => "Due date *",
            HOURS_ORDER => "Estimated hours *",
            IMPORTANCE_ORDER => "Importance *",
            _ => "Dependencies (ids, comma separated)",
        }
    }
}
