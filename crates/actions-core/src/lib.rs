//! Shared plumbing for binaries that run as GitHub Actions steps.
//!
//! This crate provides:
//! - Loading the triggering webhook event from the runner's event file
//! - Workflow commands (`::error::`) and step outputs (`GITHUB_OUTPUT`)
//! - Tracing subscriber setup suited to runner logs
//!
//! # Runner environment
//!
//! - `GITHUB_EVENT_NAME`: name of the triggering event (`issues`, `pull_request`, ...)
//! - `GITHUB_EVENT_PATH`: path to the JSON webhook payload
//! - `GITHUB_OUTPUT`: file that step outputs are appended to
//! - `RUST_LOG`: overrides the default log filter

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod telemetry;
pub mod workflow;

pub use error::ActionError;
pub use event::ActionEvent;
pub use telemetry::{init_tracing, LogFormat};
