//! Interactive session state and action dispatch.
//!
//! A `Session` owns everything one UI session works on: the task store, the
//! entry form, the editable task JSON, the selected strategy and the rendered
//! results. UI actions are dispatched through `Session::dispatch`; actions that
//! need the service come back as a `PendingRequest` which the caller runs on
//! its async runtime and feeds back through `Session::complete`.
//!
//! Every request is tagged with a sequence number. Only the outcome of the most
//! recently issued request is applied; older outcomes that arrive late are
//! dropped so they cannot overwrite newer results. Requests are never cancelled.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, error, info};

use crate::client::{parse_task_payload, PriorityClient};
use crate::error::ClientError;
use crate::fields::next_strategy;
use crate::form::TaskForm;
use crate::input::TextArea;
use crate::render::{render, ResultsPane};
use crate::store::TaskStore;
use crate::task::ScoredTask;

/// Informational notice shown when suggest finds nothing on the server.
pub const NO_STORED_TASKS: &str = "No tasks found in the store. Add tasks on the server first.";

/// User-facing notification boundary.
pub trait Notifier {
    /// Blocking notification the user must acknowledge.
    fn alert(&mut self, message: &str);
    /// Non-blocking informational notification.
    fn info(&mut self, message: &str);
}

/// Session actions, independent of how the UI triggers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    AddTask,
    Analyze,
    Suggest,
    CycleStrategy,
}

/// Which service operation a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analyze,
    Suggest,
}

impl RequestKind {
    /// Message shown to the user when the request fails.
    pub fn failure_message(self, err: &ClientError) -> String {
        if err.is_local() {
            return err.to_string();
        }
        match self {
            RequestKind::Analyze => format!("Failed to analyze tasks: {err}"),
            RequestKind::Suggest => format!("Failed to fetch suggestions: {err}"),
        }
    }
}

/// Issues increasing request numbers and remembers the latest one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, seq: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == seq
    }
}

/// A service request ready to run on the async runtime.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub seq: u64,
    pub kind: RequestKind,
    pub strategy: String,
    tasks: Vec<Value>,
}

impl PendingRequest {
    /// Run the request. Exactly one round trip, no retry.
    pub async fn execute(self, client: &PriorityClient) -> Completion {
        let outcome = match self.kind {
            RequestKind::Analyze => client.submit_analysis(&self.tasks, &self.strategy).await,
            RequestKind::Suggest => client.suggest(&self.strategy).await,
        };
        Completion {
            seq: self.seq,
            kind: self.kind,
            outcome,
        }
    }
}

/// Outcome of a request, delivered back to the session.
#[derive(Debug)]
pub struct Completion {
    pub seq: u64,
    pub kind: RequestKind,
    pub outcome: Result<Vec<ScoredTask>, ClientError>,
}

/// State of one interactive session.
#[derive(Debug)]
pub struct Session {
    store: TaskStore,
    pub form: TaskForm,
    pub task_json: TextArea,
    strategy: String,
    results: ResultsPane,
    sequencer: RequestSequencer,
    in_flight: usize,
}

impl Session {
    pub fn new(store: TaskStore, strategy: impl Into<String>) -> Self {
        let mut session = Session {
            store,
            form: TaskForm::new(),
            task_json: TextArea::new(),
            strategy: strategy.into(),
            results: ResultsPane::new(),
            sequencer: RequestSequencer::default(),
            in_flight: 0,
        };
        session.refresh_task_json();
        session
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn results(&self) -> &ResultsPane {
        &self.results
    }

    /// Number of requests dispatched whose outcome has not come back yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run an action. Returns the request to execute when the action needs the service.
    pub fn dispatch(&mut self, action: Action, notifier: &mut dyn Notifier) -> Option<PendingRequest> {
        match action {
            Action::AddTask => {
                self.add_task(notifier);
                None
            }
            Action::Analyze => self.prepare_analyze(notifier),
            Action::Suggest => Some(self.issue(RequestKind::Suggest, Vec::new())),
            Action::CycleStrategy => {
                self.strategy = next_strategy(&self.strategy).as_str().to_string();
                debug!(strategy = %self.strategy, "strategy changed");
                None
            }
        }
    }

    /// Submit the entry form; on success re-serialise the store into the task editor.
    pub fn add_task(&mut self, notifier: &mut dyn Notifier) {
        match self.form.submit(&mut self.store) {
            Ok(task) => {
                self.refresh_task_json();
                notifier.info(&format!("Task {} added", task.id));
            }
            Err(err) => notifier.alert(&err.to_string()),
        }
    }

    fn prepare_analyze(&mut self, notifier: &mut dyn Notifier) -> Option<PendingRequest> {
        match parse_task_payload(self.task_json.text()) {
            Ok(tasks) => Some(self.issue(RequestKind::Analyze, tasks)),
            Err(err) => {
                debug!(error = %err, "analyze rejected before sending");
                notifier.alert(&RequestKind::Analyze.failure_message(&err));
                None
            }
        }
    }

    fn issue(&mut self, kind: RequestKind, tasks: Vec<Value>) -> PendingRequest {
        let seq = self.sequencer.issue();
        self.in_flight += 1;
        info!(seq, ?kind, strategy = %self.strategy, "dispatching request");
        PendingRequest {
            seq,
            kind,
            strategy: self.strategy.clone(),
            tasks,
        }
    }

    /// Apply a finished request. Returns false when the outcome was stale and dropped.
    pub fn complete(&mut self, completion: Completion, notifier: &mut dyn Notifier) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if !self.sequencer.is_current(completion.seq) {
            debug!(seq = completion.seq, kind = ?completion.kind, "dropping stale response");
            return false;
        }

        match completion.outcome {
            Ok(tasks) => {
                if completion.kind == RequestKind::Suggest && tasks.is_empty() {
                    notifier.info(NO_STORED_TASKS);
                }
                render(&mut self.results, Some(tasks.as_slice()));
            }
            Err(err) => {
                error!(seq = completion.seq, kind = ?completion.kind, error = %err, "request failed");
                notifier.alert(&completion.kind.failure_message(&err));
            }
        }
        true
    }

    fn refresh_task_json(&mut self) {
        match self.store.to_json_pretty() {
            Ok(text) => self.task_json.set_text(&text),
            Err(err) => error!(error = %err, "failed to serialise task store"),
        }
    }
}
