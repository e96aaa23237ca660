//! detect-secrets baseline to SARIF conversion.
//!
//! A detect-secrets baseline lists the plugins a scan ran with and every
//! potential secret it found, per file. This crate turns that into a SARIF
//! 2.1.0 log that code scanning can ingest: one rule per known plugin, one
//! `error` result per unverified finding.
//!
//! - [`baseline`]: the baseline file model
//! - [`plugins`]: detect-secrets plugin names and the secret types they report
//! - [`sarif`]: the SARIF model and [`convert`]
//! - [`source`]: reading the baseline from disk or the repository contents API
//! - [`publish`]: writing the log to the runner temp dir and committing it back

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod baseline;
pub mod error;
pub mod plugins;
pub mod publish;
pub mod sarif;
pub mod source;

pub use baseline::{Baseline, Finding, PluginConfig};
pub use error::SarifError;
pub use sarif::{convert, SarifLog};
pub use source::{BaselineLocation, ContentsClient, Repository};
