//! Write-side operations: creating and deleting project cards.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::graphql::{GraphQlError, GraphQlExecutor};

const ADD_PROJECT_CARD: &str = r"mutation AddProjectCard($columnId: ID!, $contentId: ID!) {
    addProjectCard(input: { projectColumnId: $columnId, contentId: $contentId }) {
        cardEdge {
            node {
                id
            }
        }
    }
}";

const DELETE_PROJECT_CARD: &str = r"mutation DeleteProjectCard($cardId: ID!) {
    deleteProjectCard(input: { cardId: $cardId }) {
        deletedCardId
    }
}";

/// Creates and removes project cards through a [`GraphQlExecutor`].
#[derive(Clone)]
pub struct CardMutator {
    executor: Arc<dyn GraphQlExecutor>,
}

impl CardMutator {
    #[must_use]
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }

    /// Add a card for `content_id` to column `column_id`.
    ///
    /// Returns the new card id, or `None` when the mutation succeeded but the
    /// response did not carry it.
    pub async fn create_card(
        &self,
        column_id: &str,
        content_id: &str,
    ) -> Result<Option<String>, GraphQlError> {
        debug!(
            mutation = ADD_PROJECT_CARD,
            column_id, content_id, "Creating project card"
        );

        let data = self
            .executor
            .execute(
                ADD_PROJECT_CARD,
                json!({ "columnId": column_id, "contentId": content_id }),
            )
            .await?;
        debug!(%data, "addProjectCard response");

        let card_id = string_at(&data, "/addProjectCard/cardEdge/node/id");
        match &card_id {
            Some(card_id) => debug!(card_id = %card_id, "Project card created"),
            None => warn!(
                column_id,
                content_id, "Project card created without an id in the response"
            ),
        }
        Ok(card_id)
    }

    /// Delete card `card_id`. Returns the id the API reports as deleted, if any.
    pub async fn remove_card(&self, card_id: &str) -> Result<Option<String>, GraphQlError> {
        debug!(mutation = DELETE_PROJECT_CARD, card_id, "Removing project card");

        let data = self
            .executor
            .execute(DELETE_PROJECT_CARD, json!({ "cardId": card_id }))
            .await?;
        debug!(%data, "deleteProjectCard response");

        let deleted = string_at(&data, "/deleteProjectCard/deletedCardId");
        if deleted.is_none() {
            warn!(card_id, "Project card removed without an id in the response");
        }
        Ok(deleted)
    }
}

fn string_at(data: &Value, pointer: &str) -> Option<String> {
    data.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}
