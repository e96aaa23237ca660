//! Writing the SARIF log where later workflow steps can pick it up.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::SarifError;
use crate::sarif::SarifLog;
use crate::source::ContentsClient;

/// Step output carrying the written file's path.
pub const SARIF_OUTPUT: &str = "sarif-file-path";

/// `<dir>/<unix millis>_sarif.json`
#[must_use]
pub fn sarif_file_name(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    dir.join(format!("{}_sarif.json", now.timestamp_millis()))
}

/// Pretty-printed JSON rendering of `log`.
pub fn render(log: &SarifLog) -> Result<String, SarifError> {
    serde_json::to_string_pretty(log).map_err(SarifError::Serialize)
}

/// Write `content` to a fresh file in `dir` and return its path.
pub fn write_to_dir(content: &str, dir: &Path) -> Result<PathBuf, SarifError> {
    let path = sarif_file_name(dir, Utc::now());
    std::fs::write(&path, content).map_err(|source| SarifError::Io {
        path: path.clone(),
        source,
    })?;
    info!(path = %path.display(), "SARIF saved");
    Ok(path)
}

/// Commit `content` to `repo_path`, replacing the file if it exists.
pub async fn commit_to_repo(
    client: &ContentsClient,
    repo_path: &str,
    content: &str,
    baseline_path: &str,
) -> Result<(), SarifError> {
    let existing = client.get_file(repo_path).await?;
    let message = format!("converted from {baseline_path}");

    client
        .put_file(
            repo_path,
            content.as_bytes(),
            &message,
            existing.as_ref().map(|file| file.sha.as_str()),
        )
        .await?;

    info!(
        repository = %client.repository(),
        path = repo_path,
        updated = existing.is_some(),
        "SARIF committed"
    );
    Ok(())
}
