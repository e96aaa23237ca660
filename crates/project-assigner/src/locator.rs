//! Read-side lookups: existing cards and column ids.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::context::NormalizedContext;
use crate::error::AssignerError;
use crate::graphql::GraphQlExecutor;
use crate::query::{self, ProjectScope};

/// One project card of an item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardEdge {
    pub node: CardNode,
}

/// Card node: its id and the project it sits on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardNode {
    pub id: String,
    #[serde(default)]
    pub project: Option<CardProject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CardProject {
    pub number: u64,
}

impl CardEdge {
    /// Number of the project holding this card, if the API returned one.
    #[must_use]
    pub fn project_number(&self) -> Option<u64> {
        self.node.project.as_ref().map(|p| p.number)
    }
}

/// Id of the first card sitting on project `project_number`.
#[must_use]
pub fn find_card_in_project(edges: &[CardEdge], project_number: u64) -> Option<&str> {
    edges
        .iter()
        .find(|edge| edge.project_number() == Some(project_number))
        .map(|edge| edge.node.id.as_str())
}

#[derive(Debug, Deserialize)]
struct ColumnNode {
    name: String,
    id: String,
}

/// Looks up cards and columns through a [`GraphQlExecutor`].
#[derive(Clone)]
pub struct CardLocator {
    executor: Arc<dyn GraphQlExecutor>,
}

impl CardLocator {
    #[must_use]
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self { executor }
    }

    /// Every project card of the item.
    ///
    /// `None` when the response has no edges list at the expected path (for
    /// example a null `projectCards`), which callers treat like no cards.
    #[instrument(skip(self, ctx), fields(item = ctx.item_number))]
    pub async fn find_project_cards_for_item(
        &self,
        ctx: &NormalizedContext,
    ) -> Result<Option<Vec<CardEdge>>, AssignerError> {
        let query = query::project_cards_query(ctx);
        let variables = query::project_cards_variables(ctx);
        debug!(%query, %variables, "Finding project cards");

        let data = self
            .executor
            .execute(&query, variables)
            .await
            .map_err(AssignerError::remote(format!(
                "Error finding project cards for {} number {}",
                ctx.item_type, ctx.item_number
            )))?;

        let Some(edges) = data.pointer(&ctx.cards_result_path()) else {
            return Ok(None);
        };
        if edges.is_null() {
            return Ok(None);
        }

        let edges = Vec::<CardEdge>::deserialize(edges).map_err(|e| AssignerError::Remote {
            operation: format!(
                "Error reading project cards for {} number {}",
                ctx.item_type, ctx.item_number
            ),
            source: e.into(),
        })?;
        Ok(Some(edges))
    }

    /// Id of the item's card on project `project_number`, if it has one.
    pub async fn find_project_card_id(
        &self,
        project_number: u64,
        ctx: &NormalizedContext,
    ) -> Result<Option<String>, AssignerError> {
        let edges = self.find_project_cards_for_item(ctx).await?;
        Ok(edges.and_then(|edges| {
            find_card_in_project(&edges, project_number).map(ToString::to_string)
        }))
    }

    /// Id of the column named exactly `column_name` in the scoped project.
    ///
    /// Only the first page of columns is searched.
    #[instrument(skip(self, ctx))]
    pub async fn find_column_id(
        &self,
        scope: ProjectScope,
        project_number: u64,
        column_name: &str,
        ctx: &NormalizedContext,
    ) -> Result<Option<String>, AssignerError> {
        let query = query::project_columns_query(scope);
        let variables = query::project_columns_variables(scope, ctx, project_number);
        debug!(%query, %variables, "Finding column id");

        let data = self
            .executor
            .execute(&query, variables)
            .await
            .map_err(AssignerError::remote(format!(
                "Error finding column ID for column name {column_name}"
            )))?;

        let columns = match data.pointer(&scope.columns_path()) {
            Some(Value::Null) | None => return Ok(None),
            Some(nodes) => Vec::<ColumnNode>::deserialize(nodes).map_err(|e| {
                AssignerError::Remote {
                    operation: format!("Error reading columns of project {project_number}"),
                    source: e.into(),
                }
            })?,
        };

        Ok(columns
            .into_iter()
            .find(|column| column.name == column_name)
            .map(|column| column.id))
    }
}
