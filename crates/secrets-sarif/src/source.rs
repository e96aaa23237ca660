//! Where the baseline comes from: the checkout or the repository contents API.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::baseline::Baseline;
use crate::error::SarifError;

/// GitHub REST API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Where to read the baseline from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum BaselineLocation {
    /// The runner's working copy
    Local,
    /// The default branch, through the contents API
    #[default]
    Repo,
}

/// `owner/name` of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repository {
    type Err = SarifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(SarifError::InvalidRepository {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A file fetched from the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFile {
    /// Blob sha, needed to update the file
    pub sha: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
    /// Base64 with embedded newlines; absent for large files
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Client for the repository contents endpoints.
#[derive(Debug, Clone)]
pub struct ContentsClient {
    client: reqwest::Client,
    api_url: String,
    repository: Repository,
}

impl ContentsClient {
    pub fn new(token: &str, api_url: &str, repository: Repository) -> Result<Self, SarifError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| SarifError::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("secrets-sarif/1.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
        })
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn contents_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            self.repository.owner,
            self.repository.name,
            encoded.join("/")
        )
    }

    /// Fetch a file. `None` when it does not exist.
    #[instrument(skip(self), fields(repository = %self.repository))]
    pub async fn get_file(&self, path: &str) -> Result<Option<RepoFile>, SarifError> {
        let url = self.contents_url(path);
        debug!(url = %url, "Fetching file from GitHub");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SarifError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let content_response: ContentResponse = response.json().await?;
        let content = content_response
            .content
            .ok_or_else(|| SarifError::MissingContent {
                path: path.to_string(),
            })?;

        // GitHub wraps base64 at 60 columns
        let content_clean: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        let decoded = base64::engine::general_purpose::STANDARD.decode(content_clean)?;

        Ok(Some(RepoFile {
            sha: content_response.sha,
            content: decoded,
        }))
    }

    /// Fetch a file that must exist, as UTF-8 text.
    pub async fn read_to_string(&self, path: &str) -> Result<String, SarifError> {
        let file = self
            .get_file(path)
            .await?
            .ok_or_else(|| SarifError::MissingContent {
                path: path.to_string(),
            })?;
        String::from_utf8(file.content).map_err(|_| SarifError::NotUtf8 {
            path: path.to_string(),
        })
    }

    /// Create or update a file with a single commit.
    ///
    /// `sha` must be the current blob sha when the file already exists.
    #[instrument(skip(self, content), fields(repository = %self.repository, bytes = content.len()))]
    pub async fn put_file(
        &self,
        path: &str,
        content: &[u8],
        message: &str,
        sha: Option<&str>,
    ) -> Result<(), SarifError> {
        let request = PutContentRequest {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            sha,
        };

        let response = self
            .client
            .put(self.contents_url(path))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SarifError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        info!(path, "Committed file to repository");
        Ok(())
    }
}

/// Read and parse a baseline from `location`.
///
/// `client` is only used for [`BaselineLocation::Repo`] and must be present then.
pub async fn load_baseline(
    location: BaselineLocation,
    path: &str,
    client: Option<&ContentsClient>,
) -> Result<Baseline, SarifError> {
    let raw = match location {
        BaselineLocation::Local => read_local(Path::new(path))?,
        BaselineLocation::Repo => {
            let client = client.ok_or(SarifError::MissingSetting("MGH_TOKEN or GITHUB_TOKEN"))?;
            client.read_to_string(path).await?
        }
    };

    let baseline: Baseline = raw.parse()?;
    info!(
        ?location,
        path,
        version = baseline.version.as_deref().unwrap_or("unknown"),
        findings = baseline.finding_count(),
        "Loaded detect-secrets baseline"
    );
    Ok(baseline)
}

fn read_local(path: &Path) -> Result<String, SarifError> {
    std::fs::read_to_string(path).map_err(|source| SarifError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_parse() {
        let repo: Repository = "elastic/harp".parse().unwrap();
        assert_eq!(repo.owner, "elastic");
        assert_eq!(repo.name, "harp");
        assert_eq!(repo.to_string(), "elastic/harp");

        for bad in ["", "elastic", "/harp", "elastic/", "a/b/c"] {
            assert!(bad.parse::<Repository>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_contents_url_encodes_segments() {
        let client = ContentsClient::new(
            "token",
            "https://api.github.com/",
            "o/r".parse().unwrap(),
        )
        .unwrap();
        assert_eq!(
            client.contents_url("/reports/my scan.sarif"),
            "https://api.github.com/repos/o/r/contents/reports/my%20scan.sarif"
        );
    }

    #[tokio::test]
    async fn test_load_local_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".secrets.baseline");
        std::fs::write(&path, r#"{"version": "1.4.0", "plugins_used": [], "results": {}}"#).unwrap();

        let baseline = load_baseline(BaselineLocation::Local, path.to_str().unwrap(), None)
            .await
            .unwrap();
        assert_eq!(baseline.version.as_deref(), Some("1.4.0"));
    }

    #[tokio::test]
    async fn test_repo_location_needs_client() {
        let err = load_baseline(BaselineLocation::Repo, ".secrets.baseline", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SarifError::MissingSetting(_)));
    }
}
