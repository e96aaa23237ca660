//! Label/unlabel decision procedure.
//!
//! Per mapping and event:
//!
//! ```text
//! label mismatch ─────────────────────────────► LabelMismatch
//! validate ── missing field ──────────────────► error (Configuration)
//! locate ──── card found (labeled) ───────────► AlreadyAssigned
//!        └─── no card to remove (unlabeled) ──► NoCards / NoMatchingCard
//! resolve ─── column unknown ─────────────────► error (Resolution)
//! mutate ─────────────────────────────────────► Created / Removed
//! ```

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::IssueMapping;
use crate::context::NormalizedContext;
use crate::error::AssignerError;
use crate::graphql::GraphQlExecutor;
use crate::locator::{find_card_in_project, CardLocator};
use crate::mutator::CardMutator;

/// Terminal state reached for one mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event's label is not the mapping's label
    LabelMismatch,
    /// The item already has a card on the project
    AlreadyAssigned { card_id: String },
    /// A card was created; `card_id` is `None` when the API did not echo it
    Created { card_id: Option<String> },
    /// The item has no project cards at all
    NoCards,
    /// The item has cards, none on the mapping's project
    NoMatchingCard,
    /// A card was deleted
    Removed { card_id: String },
}

impl Outcome {
    /// Whether a mutation was performed.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Removed { .. })
    }
}

/// Label transition carried by the event's `action` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelAction {
    Labeled,
    Unlabeled,
}

impl LabelAction {
    #[must_use]
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "labeled" => Some(Self::Labeled),
            "unlabeled" => Some(Self::Unlabeled),
            _ => None,
        }
    }
}

/// Reconciles project cards with label transitions.
#[derive(Clone)]
pub struct ProjectAssigner {
    locator: CardLocator,
    mutator: CardMutator,
}

impl ProjectAssigner {
    #[must_use]
    pub fn new(executor: Arc<dyn GraphQlExecutor>) -> Self {
        Self {
            locator: CardLocator::new(Arc::clone(&executor)),
            mutator: CardMutator::new(executor),
        }
    }

    /// Ensure the item has a card in the mapping's column.
    #[instrument(skip_all, fields(label = ?mapping.label, project = ?mapping.project_number))]
    pub async fn handle_labeled(
        &self,
        mapping: &IssueMapping,
        ctx: &NormalizedContext,
    ) -> Result<Outcome, AssignerError> {
        if !mapping.matches_label(&ctx.label_name) {
            info!(
                event_label = %ctx.label_name,
                "Label does not match the mapping, nothing to do"
            );
            return Ok(Outcome::LabelMismatch);
        }

        let project_number = required_project_number(mapping)?;
        let column_name = mapping
            .column_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(AssignerError::MissingField {
                field: "columnName",
            })?;
        let scope = mapping.scope()?;

        if let Some(card_id) = self
            .locator
            .find_project_card_id(project_number, ctx)
            .await?
        {
            info!(
                card_id = %card_id,
                "{} number {} already exists in project {project_number}",
                ctx.item_type, ctx.item_number
            );
            return Ok(Outcome::AlreadyAssigned { card_id });
        }

        let column_id = self
            .locator
            .find_column_id(scope, project_number, column_name, ctx)
            .await?
            .ok_or_else(|| AssignerError::ColumnNotFound {
                item_type: ctx.item_type,
                scope,
                project_number,
                column_name: column_name.to_string(),
            })?;

        let card_id = self
            .mutator
            .create_card(&column_id, &ctx.item_node_id)
            .await
            .map_err(AssignerError::remote(format!(
                "Error adding {} number {} to {scope} project {project_number}",
                ctx.item_type, ctx.item_number
            )))?;

        info!(
            card_id = card_id.as_deref().unwrap_or("unknown"),
            column = %column_name,
            "Added {} number {} to project {project_number}",
            ctx.item_type, ctx.item_number
        );
        Ok(Outcome::Created { card_id })
    }

    /// Ensure the item has no card on the mapping's project.
    #[instrument(skip_all, fields(label = ?mapping.label, project = ?mapping.project_number))]
    pub async fn handle_unlabeled(
        &self,
        mapping: &IssueMapping,
        ctx: &NormalizedContext,
    ) -> Result<Outcome, AssignerError> {
        if !mapping.matches_label(&ctx.label_name) {
            info!(
                event_label = %ctx.label_name,
                "Label does not match the mapping, nothing to do"
            );
            return Ok(Outcome::LabelMismatch);
        }

        let project_number = required_project_number(mapping)?;

        let edges = match self.locator.find_project_cards_for_item(ctx).await? {
            Some(edges) if !edges.is_empty() => edges,
            _ => {
                info!(
                    "{} number {} has no project cards",
                    ctx.item_type, ctx.item_number
                );
                return Ok(Outcome::NoCards);
            }
        };

        let Some(card_id) = find_card_in_project(&edges, project_number) else {
            info!(
                "{} number {} has no card in project {project_number}",
                ctx.item_type, ctx.item_number
            );
            return Ok(Outcome::NoMatchingCard);
        };

        let card_id = self
            .mutator
            .remove_card(card_id)
            .await
            .map_err(AssignerError::remote(format!(
                "Error removing card {card_id} of {} number {} from project {project_number}",
                ctx.item_type, ctx.item_number
            )))?
            .unwrap_or_else(|| card_id.to_string());

        info!(
            card_id = %card_id,
            "Removed {} number {} from project {project_number}",
            ctx.item_type, ctx.item_number
        );
        Ok(Outcome::Removed { card_id })
    }

    /// Apply every mapping in order for the event's `action`.
    ///
    /// Stops at the first failing mapping; mutations made for earlier mappings
    /// are kept. Actions other than `labeled`/`unlabeled` do nothing.
    pub async fn run(
        &self,
        action: &str,
        mappings: &[IssueMapping],
        ctx: &NormalizedContext,
    ) -> Result<Vec<Outcome>, AssignerError> {
        let Some(action) = LabelAction::from_action(action) else {
            info!(action, "Event action is not a label transition, nothing to do");
            return Ok(Vec::new());
        };

        let mut outcomes = Vec::with_capacity(mappings.len());
        for mapping in mappings {
            let outcome = match action {
                LabelAction::Labeled => self.handle_labeled(mapping, ctx).await?,
                LabelAction::Unlabeled => self.handle_unlabeled(mapping, ctx).await?,
            };
            outcomes.push(outcome);
        }

        info!(
            mappings = mappings.len(),
            changed = outcomes.iter().filter(|o| o.is_change()).count(),
            "Processed label mappings"
        );
        Ok(outcomes)
    }
}

fn required_project_number(mapping: &IssueMapping) -> Result<u64, AssignerError> {
    mapping
        .project_number
        .filter(|n| *n != 0)
        .ok_or(AssignerError::MissingField {
            field: "projectNumber",
        })
}
