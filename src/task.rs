//! Task data structures exchanged with the prioritisation service.
//!
//! `TaskRecord` is what the user authors locally through the entry form.
//! `ScoredTask` is what the service sends back: the submitted fields echoed
//! verbatim plus a `score` and an `explanation`. Because the service echoes
//! whatever JSON the user hand-edited, every echoed field is kept as a raw
//! JSON value and only interpreted at display time.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A user-authored work item.
///
/// Field order matches the serialised layout shown in the task JSON editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: u64,
    pub title: String,
    pub due_date: String,
    pub estimated_hours: i64,
    pub importance: i64,
    /// Ids of other tasks this one waits on. Never checked against the store.
    pub dependencies: Vec<i64>,
}

/// A task as returned by the service, augmented with its priority score.
///
/// Fields the service sends are kept exactly as sent, explicit `null`s and
/// unknown members included, so the task serialises back to the same object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
    /// Members the client does not display.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A member that is present deserialises to `Some`, even when it is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ScoredTask {
    /// Numeric score, if the service sent one.
    pub fn score_value(&self) -> Option<f64> {
        self.score.as_ref().and_then(Value::as_f64)
    }
}

/// JavaScript-style truthiness, used for the display fallbacks of echoed fields.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text for an echoed value: strings unquoted, everything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
