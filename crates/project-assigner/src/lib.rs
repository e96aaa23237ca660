//! Project board card reconciliation for labeled issues and pull requests.
//!
//! When a label is added to an issue or pull request, the item gets a card in
//! the configured column of a (classic) project board. When the label is
//! removed, the card is deleted again. Projects can be owned by the
//! repository, an organization or a user.
//!
//! # Architecture
//!
//! Data flows one way, raw event to normalized context to queries to mutations:
//!
//! - [`NormalizedContext`] turns the raw webhook event into an item descriptor
//! - [`ProjectScope`] and the [`query`] builders produce scope-aware GraphQL reads
//! - [`CardLocator`] finds existing cards and resolves column names to ids
//! - [`CardMutator`] creates and deletes cards
//! - [`ProjectAssigner`] runs the label/unlabel decision procedure per mapping
//!
//! All remote access goes through the [`GraphQlExecutor`] trait;
//! [`GitHubGraphQlClient`] is the production implementation.
//!
//! Cards are only ever created after a lookup found none for the same
//! `(item, project number)` pair, which makes re-delivered events harmless.
//! Two concurrent deliveries for the same item can still both observe "no
//! card" and both create one; that window is not guarded.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Every remote call can fail

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod graphql;
pub mod locator;
pub mod mutator;
pub mod query;

pub use config::{parse_mappings, IssueMapping};
pub use context::{ItemType, NormalizedContext};
pub use engine::{LabelAction, Outcome, ProjectAssigner};
pub use error::{AssignerError, ErrorKind};
pub use graphql::{GitHubGraphQlClient, GraphQlError, GraphQlExecutor};
pub use locator::{CardEdge, CardLocator};
pub use mutator::CardMutator;
pub use query::ProjectScope;
