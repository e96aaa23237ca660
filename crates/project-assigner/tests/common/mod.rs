//! In-memory project board behind the `GraphQlExecutor` trait.
//!
//! Dispatches on the operation name of each document, keeps card state so
//! mutations are visible to later lookups, and records every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use project_assigner::{GraphQlError, GraphQlExecutor, ItemType, NormalizedContext};
use serde_json::{json, Value};

/// One executed document.
#[derive(Debug, Clone)]
pub struct Call {
    pub operation: &'static str,
    pub query: String,
    pub variables: Value,
}

#[derive(Debug, Clone)]
struct Card {
    id: String,
    content_id: String,
    project_number: u64,
}

#[derive(Debug, Clone)]
struct Column {
    id: String,
    name: String,
    project_number: u64,
}

#[derive(Default)]
struct BoardState {
    /// item number -> node id
    items: HashMap<u64, String>,
    /// owner root field ("repository", "organization", "user") -> columns
    columns: HashMap<&'static str, Vec<Column>>,
    cards: Vec<Card>,
    calls: Vec<Call>,
    failures: HashMap<&'static str, String>,
    null_project_cards: bool,
    bare_mutation_responses: bool,
    next_card: u32,
}

/// Fake GitHub project board.
#[derive(Default)]
pub struct FakeBoard {
    state: Mutex<BoardState>,
}

const OPERATIONS: [&str; 4] = [
    "ProjectCardsForItem",
    "ProjectColumns",
    "AddProjectCard",
    "DeleteProjectCard",
];

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an issue or pull request by number and node id.
    pub fn with_item(self, number: u64, node_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .items
            .insert(number, node_id.to_string());
        self
    }

    /// Add a column to a project owned at `root` (`repository`, `organization`, `user`).
    pub fn with_column(
        self,
        root: &'static str,
        project_number: u64,
        name: &str,
        id: &str,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .columns
            .entry(root)
            .or_default()
            .push(Column {
                id: id.to_string(),
                name: name.to_string(),
                project_number,
            });
        self
    }

    /// Place an existing card for `content_id` on a project.
    pub fn with_card(self, content_id: &str, project_number: u64, card_id: &str) -> Self {
        self.state.lock().unwrap().cards.push(Card {
            id: card_id.to_string(),
            content_id: content_id.to_string(),
            project_number,
        });
        self
    }

    /// Answer card lookups with `projectCards: null`.
    pub fn with_null_project_cards(self) -> Self {
        self.state.lock().unwrap().null_project_cards = true;
        self
    }

    /// Apply mutations but answer them with empty payloads.
    pub fn with_bare_mutation_responses(self) -> Self {
        self.state.lock().unwrap().bare_mutation_responses = true;
        self
    }

    /// Make every call to `operation` fail with a GraphQL error.
    pub fn failing(self, operation: &'static str, message: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(operation, message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.operation == operation)
            .collect()
    }

    /// Ids of the cards currently on the board for `content_id`.
    pub fn cards_of(&self, content_id: &str) -> Vec<(u64, String)> {
        self.state
            .lock()
            .unwrap()
            .cards
            .iter()
            .filter(|c| c.content_id == content_id)
            .map(|c| (c.project_number, c.id.clone()))
            .collect()
    }
}

fn operation_of(query: &str) -> &'static str {
    OPERATIONS
        .into_iter()
        .find(|op| query.contains(&format!("{op}(")))
        .unwrap_or_else(|| panic!("unknown operation in query: {query}"))
}

fn root_of(query: &str) -> &'static str {
    if query.contains("organization(login: $owner)") {
        "organization"
    } else if query.contains("user(login: $owner)") {
        "user"
    } else {
        "repository"
    }
}

#[async_trait]
impl GraphQlExecutor for FakeBoard {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GraphQlError> {
        let operation = operation_of(query);
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            operation,
            query: query.to_string(),
            variables: variables.clone(),
        });

        if let Some(message) = state.failures.get(operation) {
            return Err(GraphQlError::Errors {
                messages: vec![message.clone()],
            });
        }

        let data = match operation {
            "ProjectCardsForItem" => {
                let field = if query.contains("pullRequest(number: $number)") {
                    "pullRequest"
                } else {
                    "issue"
                };
                let number = variables["number"].as_u64().unwrap();
                let node_id = state.items.get(&number).cloned().unwrap_or_default();
                let project_cards = if state.null_project_cards {
                    Value::Null
                } else {
                    let edges: Vec<Value> = state
                        .cards
                        .iter()
                        .filter(|c| c.content_id == node_id)
                        .map(|c| {
                            json!({ "node": { "project": { "number": c.project_number }, "id": c.id } })
                        })
                        .collect();
                    json!({ "edges": edges })
                };
                json!({ "repository": { field: { "projectCards": project_cards } } })
            }
            "ProjectColumns" => {
                let root = root_of(query);
                let project_number = variables["projectNumber"].as_u64().unwrap();
                let nodes: Vec<Value> = state
                    .columns
                    .get(root)
                    .into_iter()
                    .flatten()
                    .filter(|c| c.project_number == project_number)
                    .map(|c| json!({ "name": c.name, "id": c.id }))
                    .collect();
                json!({ root: { "project": { "columns": { "nodes": nodes } } } })
            }
            "AddProjectCard" => {
                let column_id = variables["columnId"].as_str().unwrap().to_string();
                let content_id = variables["contentId"].as_str().unwrap().to_string();
                let project_number = state
                    .columns
                    .values()
                    .flatten()
                    .find(|c| c.id == column_id)
                    .map(|c| c.project_number)
                    .unwrap();
                state.next_card += 1;
                let id = format!("NEW_CARD_{}", state.next_card);
                state.cards.push(Card {
                    id: id.clone(),
                    content_id,
                    project_number,
                });
                if state.bare_mutation_responses {
                    json!({ "addProjectCard": null })
                } else {
                    json!({ "addProjectCard": { "cardEdge": { "node": { "id": id } } } })
                }
            }
            "DeleteProjectCard" => {
                let card_id = variables["cardId"].as_str().unwrap().to_string();
                state.cards.retain(|c| c.id != card_id);
                if state.bare_mutation_responses {
                    json!({ "deleteProjectCard": {} })
                } else {
                    json!({ "deleteProjectCard": { "deletedCardId": card_id } })
                }
            }
            _ => unreachable!(),
        };
        Ok(data)
    }
}

/// Context for `item_type` number `item_number` labeled `label` in mocked_owner/repo1.
pub fn context(
    item_type: ItemType,
    item_number: u64,
    node_id: &str,
    label: &str,
) -> NormalizedContext {
    NormalizedContext {
        owner: "mocked_owner".to_string(),
        repo: "repo1".to_string(),
        label_name: label.to_string(),
        item_type,
        item_number,
        item_node_id: node_id.to_string(),
    }
}
