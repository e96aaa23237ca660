//! detect-secrets baseline to SARIF action.

use std::path::PathBuf;
use std::process::ExitCode;

use actions_core::{init_tracing, workflow, LogFormat};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use secrets_sarif::publish::{self, SARIF_OUTPUT};
use secrets_sarif::source::{load_baseline, DEFAULT_API_URL};
use secrets_sarif::{convert, BaselineLocation, ContentsClient, Repository, SarifError};

#[derive(Parser)]
#[command(name = "secrets-sarif")]
#[command(about = "Convert a detect-secrets baseline to SARIF", long_about = None)]
#[command(version)]
struct Cli {
    /// Read the baseline from the checkout or from the repository
    #[arg(long, env = "INPUT_BASELINE-FILE-LOCATION", value_enum, default_value_t = BaselineLocation::Repo)]
    baseline_file_location: BaselineLocation,

    /// Baseline path, relative to the checkout or repository root
    #[arg(long, env = "INPUT_BASELINE-FILE-PATH", default_value = ".secrets.baseline")]
    baseline_file_path: String,

    /// Directory the scan ran in; prefixes every result path
    #[arg(long, env = "INPUT_SCAN-DIR")]
    scan_dir: Option<String>,

    /// Repository path to also commit the SARIF file to
    #[arg(long, env = "INPUT_SARIF-FILE-PATH")]
    sarif_file_path: Option<String>,

    /// Token for the contents API
    #[arg(long, env = "MGH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Fallback token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, hide = true)]
    github_token: Option<String>,

    /// owner/name of the repository
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Directory the SARIF file is written to
    #[arg(long, env = "RUNNER_TEMP")]
    runner_temp: Option<PathBuf>,

    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Log at debug level (includes the SARIF document)
    #[arg(short, long, env = "INPUT_VERBOSE")]
    verbose: bool,

    /// Log line format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    /// Runners pass unset inputs as empty strings.
    fn sarif_repo_path(&self) -> Option<&str> {
        self.sarif_file_path.as_deref().filter(|p| !p.is_empty())
    }

    fn needs_repository(&self) -> bool {
        self.baseline_file_location == BaselineLocation::Repo || self.sarif_repo_path().is_some()
    }

    fn contents_client(&self) -> Result<ContentsClient, SarifError> {
        let non_empty = |t: &&str| !t.is_empty();
        let token = self
            .token
            .as_deref()
            .filter(non_empty)
            .or_else(|| self.github_token.as_deref().filter(non_empty))
            .ok_or(SarifError::MissingSetting("MGH_TOKEN or GITHUB_TOKEN"))?;
        let repository: Repository = self
            .repository
            .as_deref()
            .ok_or(SarifError::MissingSetting("GITHUB_REPOSITORY"))?
            .parse()?;
        ContentsClient::new(token, &self.api_url, repository)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose, cli.log_format) {
        workflow::error(&format!("Failed to initialize logging: {e}"));
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(path) => {
            info!(path = %path.display(), "Conversion finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Conversion failed");
            workflow::error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<PathBuf> {
    let client = if cli.needs_repository() {
        Some(cli.contents_client().context("Repository access is not configured")?)
    } else {
        None
    };

    let baseline = load_baseline(
        cli.baseline_file_location,
        &cli.baseline_file_path,
        client.as_ref(),
    )
    .await
    .with_context(|| format!("Failed to load baseline {}", cli.baseline_file_path))?;

    let sarif = convert(&baseline, cli.scan_dir.as_deref());
    let content = publish::render(&sarif)?;
    debug!(sarif = %content, "SARIF document");

    let dir = cli.runner_temp.clone().unwrap_or_else(std::env::temp_dir);
    let path = publish::write_to_dir(&content, &dir)?;
    workflow::set_output(SARIF_OUTPUT, &path.to_string_lossy())?;

    if let (Some(repo_path), Some(client)) = (cli.sarif_repo_path(), client.as_ref()) {
        publish::commit_to_repo(client, repo_path, &content, &cli.baseline_file_path)
            .await
            .with_context(|| format!("Failed to commit SARIF to {repo_path}"))?;
    }

    Ok(path)
}
