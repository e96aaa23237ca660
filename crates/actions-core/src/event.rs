//! The webhook event that triggered the workflow run.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::ActionError;

/// Raw triggering event: the event name plus the untouched webhook payload.
///
/// Serializes as `{ "eventName": ..., "payload": ... }`, which is the shape
/// dumped into failure reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    /// Event name, e.g. `issues` or `pull_request`
    pub event_name: String,
    /// Webhook payload as delivered
    pub payload: Value,
}

impl ActionEvent {
    /// Create an event from already-parsed parts.
    #[must_use]
    pub fn new(event_name: impl Into<String>, payload: Value) -> Self {
        Self {
            event_name: event_name.into(),
            payload,
        }
    }

    /// Load the payload from the runner's event file.
    pub fn from_file(
        event_name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, ActionError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ActionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let payload: Value = serde_json::from_str(&raw)?;
        let event = Self::new(event_name, payload);

        debug!(
            event_name = %event.event_name,
            action = event.action().unwrap_or("none"),
            path = %path.display(),
            "Loaded event payload"
        );
        Ok(event)
    }

    /// The payload's `action` field (`labeled`, `unlabeled`, ...), if any.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.payload.get("action").and_then(Value::as_str)
    }

    /// Pretty JSON rendering for diagnostics.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
