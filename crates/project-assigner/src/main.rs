//! Project assigner action.
//!
//! Reads the triggering label event from the runner and adds or removes the
//! item's project cards according to the configured mappings.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use actions_core::{init_tracing, workflow, ActionEvent, LogFormat};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use project_assigner::{
    parse_mappings, GitHubGraphQlClient, NormalizedContext, Outcome, ProjectAssigner,
};

#[derive(Parser)]
#[command(name = "project-assigner")]
#[command(about = "Add labeled issues and pull requests to project boards", long_about = None)]
#[command(version)]
struct Cli {
    /// Token with access to the target projects
    #[arg(long, env = "INPUT_GHTOKEN", hide_env_values = true)]
    gh_token: String,

    /// JSON array of {projectNumber, columnName, label, projectScope} entries
    #[arg(long, env = "INPUT_ISSUE-MAPPINGS")]
    issue_mappings: String,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the webhook payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: PathBuf,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = GitHubGraphQlClient::DEFAULT_API_URL)]
    graphql_url: String,

    /// Log at debug level (includes every GraphQL query)
    #[arg(short, long, env = "INPUT_VERBOSE")]
    verbose: bool,

    /// Log line format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_format) {
        workflow::error(&format!("Failed to initialize logging: {e}"));
        return ExitCode::FAILURE;
    }

    let event = match ActionEvent::from_file(&cli.event_name, &cli.event_path) {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "Failed to load event payload");
            workflow::error(&format!("Action failed with error: {e}"));
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &event).await {
        Ok(outcomes) => {
            info!(
                changed = outcomes.iter().filter(|o| o.is_change()).count(),
                "Project assignment finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let event_json = event.to_pretty_json();
            error!(error = %format!("{e:#}"), event = %event_json, "Action failed");
            workflow::error(&format!(
                "Action failed with error: {e:#}\n Event context:\n\n{event_json}"
            ));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, event: &ActionEvent) -> Result<Vec<Outcome>> {
    let mappings = parse_mappings(&cli.issue_mappings)?;
    let ctx = NormalizedContext::from_event(event)?;
    info!(
        item_type = %ctx.item_type,
        item_number = ctx.item_number,
        label = %ctx.label_name,
        mappings = mappings.len(),
        "Processing label event"
    );

    let client = GitHubGraphQlClient::with_url(&cli.gh_token, &cli.graphql_url)
        .context("Failed to create GitHub GraphQL client")?;
    let assigner = ProjectAssigner::new(Arc::new(client));

    let action = event.action().unwrap_or_default();
    let outcomes = assigner.run(action, &mappings, &ctx).await?;
    Ok(outcomes)
}
