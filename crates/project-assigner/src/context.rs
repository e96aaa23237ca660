//! Normalization of `issues` / `pull_request` label events.
//!
//! The raw webhook payload differs between the two event kinds only in which
//! object carries the item (`issue` or `pull_request`). [`NormalizedContext`]
//! erases that difference once, up front, and is passed explicitly to every
//! locator and mutator call afterwards.

use std::fmt;

use actions_core::ActionEvent;
use serde::Deserialize;

use crate::error::AssignerError;

/// Kind of item a label event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Issue,
    PullRequest,
}

impl ItemType {
    /// Map a workflow event name to the item kind it carries.
    #[must_use]
    pub fn from_event_name(event_name: &str) -> Option<Self> {
        match event_name {
            "issues" => Some(Self::Issue),
            "pull_request" => Some(Self::PullRequest),
            _ => None,
        }
    }

    /// Key of the item object inside the webhook payload.
    #[must_use]
    pub const fn payload_key(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pull_request",
        }
    }

    /// Field selecting the item under `repository` in GraphQL.
    #[must_use]
    pub const fn graphql_field(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::PullRequest => "pullRequest",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue => write!(f, "Issue"),
            Self::PullRequest => write!(f, "Pull request"),
        }
    }
}

/// Uniform description of the labeled item, derived once per event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContext {
    /// Repository owner login
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Label that was added or removed
    pub label_name: String,
    /// Issue or pull request
    pub item_type: ItemType,
    /// Repository-scoped item number
    pub item_number: u64,
    /// Global node id, used as card content
    pub item_node_id: String,
}

impl NormalizedContext {
    /// Normalize a raw workflow event.
    ///
    /// Fails with [`AssignerError::UnrecognizedEvent`] for anything other than
    /// `issues` and `pull_request`, and with [`AssignerError::MalformedEvent`]
    /// when the payload lacks the label or the item object.
    pub fn from_event(event: &ActionEvent) -> Result<Self, AssignerError> {
        let item_type = ItemType::from_event_name(&event.event_name).ok_or_else(|| {
            AssignerError::UnrecognizedEvent {
                event_name: event.event_name.clone(),
            }
        })?;

        let malformed = |reason: String| AssignerError::MalformedEvent {
            event_name: event.event_name.clone(),
            reason,
        };

        let payload =
            LabelPayload::deserialize(&event.payload).map_err(|e| malformed(e.to_string()))?;
        let label = payload
            .label
            .ok_or_else(|| malformed("payload has no label".to_string()))?;
        let item = match item_type {
            ItemType::Issue => payload.issue,
            ItemType::PullRequest => payload.pull_request,
        }
        .ok_or_else(|| malformed(format!("payload has no {}", item_type.payload_key())))?;

        Ok(Self {
            owner: payload.repository.owner.login,
            repo: payload.repository.name,
            label_name: label.name,
            item_type,
            item_number: item.number,
            item_node_id: item.node_id,
        })
    }

    /// Sub-query selecting the item by number, bound to `$number`.
    #[must_use]
    pub fn item_query_selector(&self) -> String {
        format!("{}(number: $number)", self.item_type.graphql_field())
    }

    /// JSON pointer to the item's project card edges in a card lookup response.
    #[must_use]
    pub fn cards_result_path(&self) -> String {
        format!(
            "/repository/{}/projectCards/edges",
            self.item_type.graphql_field()
        )
    }
}

// Only the parts of the webhook payload the normalizer reads.
#[derive(Debug, Deserialize)]
struct LabelPayload {
    repository: PayloadRepository,
    #[serde(default)]
    label: Option<PayloadLabel>,
    #[serde(default)]
    issue: Option<PayloadItem>,
    #[serde(default)]
    pull_request: Option<PayloadItem>,
}

#[derive(Debug, Deserialize)]
struct PayloadRepository {
    owner: PayloadOwner,
    name: String,
}

#[derive(Debug, Deserialize)]
struct PayloadOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct PayloadLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PayloadItem {
    number: u64,
    node_id: String,
}
