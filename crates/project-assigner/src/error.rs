//! Error types for card reconciliation.

use thiserror::Error;

use crate::context::ItemType;
use crate::graphql::GraphQlError;
use crate::query::ProjectScope;

/// Broad class of an [`AssignerError`].
///
/// Configuration errors are never worth retrying; remote errors might be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad mapping entry, bad scope, or an event this action cannot handle
    Configuration,
    /// A column or project named by the configuration does not exist
    Resolution,
    /// The GraphQL executor failed
    RemoteOperation,
}

/// Errors raised while reconciling project cards.
#[derive(Debug, Error)]
pub enum AssignerError {
    /// A mapping entry lacks a value the handler needs
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// The event is neither `issues` nor `pull_request`
    #[error("Unrecognized event: {event_name}")]
    UnrecognizedEvent { event_name: String },

    /// Scope string outside `repo`, `org`, `user`
    #[error("Invalid projectScope {scope}. Expected: org, user, or repo")]
    InvalidScope { scope: String },

    /// The payload lacks the objects its event name promises
    #[error("Malformed {event_name} event: {reason}")]
    MalformedEvent { event_name: String, reason: String },

    /// The mappings input is not a JSON array of mapping entries
    #[error("Invalid issue mappings: {0}")]
    InvalidMappings(#[source] serde_json::Error),

    /// No column with the configured name in the target project
    #[error(
        "Error adding {item_type} to {scope} project {project_number}: column \"{column_name}\" \
         was not found (searched the first 50 columns)"
    )]
    ColumnNotFound {
        item_type: ItemType,
        scope: ProjectScope,
        project_number: u64,
        column_name: String,
    },

    /// A query or mutation failed; `operation` names what was being done
    #[error("{operation}: {source}")]
    Remote {
        operation: String,
        #[source]
        source: GraphQlError,
    },
}

impl AssignerError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField { .. }
            | Self::UnrecognizedEvent { .. }
            | Self::InvalidScope { .. }
            | Self::MalformedEvent { .. }
            | Self::InvalidMappings(_) => ErrorKind::Configuration,
            Self::ColumnNotFound { .. } => ErrorKind::Resolution,
            Self::Remote { .. } => ErrorKind::RemoteOperation,
        }
    }

    /// Wrap an executor failure with a description of the operation.
    pub(crate) fn remote(operation: impl Into<String>) -> impl FnOnce(GraphQlError) -> Self {
        let operation = operation.into();
        move |source| Self::Remote { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            AssignerError::MissingField {
                field: "columnName"
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            AssignerError::InvalidScope {
                scope: "team".to_string()
            }
            .kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            AssignerError::ColumnNotFound {
                item_type: ItemType::Issue,
                scope: ProjectScope::Org,
                project_number: 4,
                column_name: "Done".to_string(),
            }
            .kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            AssignerError::remote("Error removing card C")(GraphQlError::MissingData).kind(),
            ErrorKind::RemoteOperation
        );
    }

    #[test]
    fn test_column_not_found_message() {
        let err = AssignerError::ColumnNotFound {
            item_type: ItemType::PullRequest,
            scope: ProjectScope::User,
            project_number: 17,
            column_name: "In progress".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with(
            "Error adding Pull request to user project 17: column \"In progress\" was not found"
        ));
        assert!(msg.contains("first 50 columns"));
    }

    #[test]
    fn test_remote_message_keeps_operation_and_cause() {
        let err = AssignerError::remote("Error removing card pancakes")(GraphQlError::Errors {
            messages: vec!["Could not resolve to a node with the global id of 'pancakes'.".into()],
        });
        assert_eq!(
            err.to_string(),
            "Error removing card pancakes: GraphQL errors: Could not resolve to a node with the \
             global id of 'pancakes'."
        );
    }
}
