//! Session-scoped task store.
//!
//! This module provides the `TaskStore` that holds every task authored during
//! the current session. The store is append-only: ids come from a monotonic
//! counter starting at 1 and are never reused. Nothing is persisted.

use crate::task::TaskRecord;

/// In-memory, append-only collection of user-authored tasks.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<TaskRecord>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        TaskStore {
            tasks: Vec::new(),
            next_id: 1,
        }
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next task id and advance the counter.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a task in insertion order.
    pub fn append(&mut self, task: TaskRecord) {
        self.tasks.push(task);
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Serialise all tasks as pretty-printed JSON, the text shown in the task editor.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.tasks)
    }
}
