//! Error types for form intake, service requests and start-up configuration.

use thiserror::Error;

/// A required entry form field that was missing or unparseable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    DueDate,
    EstimatedHours,
    Importance,
}

/// The entry form was rejected. Nothing was added to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fill Title, Due date, Estimated hours and Importance.")]
pub struct ValidationError {
    /// Offending fields, in form order.
    pub fields: Vec<FormField>,
}

/// Errors raised by the analyze and suggest requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The task text is not valid JSON. No request was sent.
    #[error("Invalid JSON. Please check Input Tasks JSON.")]
    MalformedInput(#[source] serde_json::Error),

    /// The task text is not a non-empty array. No request was sent.
    #[error("Please add at least one task (via the form or JSON).")]
    EmptyInput,

    /// The service answered with a non-success status.
    #[error("{message}")]
    ServerError { status: u16, message: String },

    /// The request could not complete.
    #[error("{0}")]
    NetworkFailure(#[from] reqwest::Error),

    /// A success response whose body is not an array of tasks.
    #[error("Unexpected response from server: {0}")]
    UnexpectedResponse(String),
}

impl ClientError {
    /// True for failures detected before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, ClientError::MalformedInput(_) | ClientError::EmptyInput)
    }
}

/// Invalid start-up configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server URL `{url}`: {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("server URL `{0}` must use http or https")]
    UnsupportedScheme(String),
}
