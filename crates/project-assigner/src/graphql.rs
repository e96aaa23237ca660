//! GraphQL execution against the GitHub API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Errors raised by a [`GraphQlExecutor`].
#[derive(Debug, Error)]
pub enum GraphQlError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("GitHub API returned error status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response carried GraphQL errors (possibly next to partial data)
    #[error("GraphQL errors: {}", messages.join(", "))]
    Errors { messages: Vec<String> },

    /// Neither data nor errors in the response
    #[error("No data in GraphQL response")]
    MissingData,

    /// Response body is not the expected JSON
    #[error("Failed to decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Token cannot be used as a header value
    #[error("Invalid access token")]
    InvalidToken,
}

/// Executes a GraphQL document with bound variables.
///
/// Resolves to the response's `data` object. Implementations must fail on
/// any GraphQL `errors` entry, not only on transport failures.
#[async_trait]
pub trait GraphQlExecutor: Send + Sync {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GraphQlError>;
}

/// GitHub GraphQL endpoint
const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// GitHub GraphQL client
#[derive(Debug, Clone)]
pub struct GitHubGraphQlClient {
    client: reqwest::Client,
    api_url: String,
}

/// GraphQL request body
#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

impl GitHubGraphQlClient {
    /// Default endpoint, also used as the CLI default.
    pub const DEFAULT_API_URL: &'static str = GITHUB_GRAPHQL_URL;

    /// Create a client for api.github.com.
    pub fn new(token: &str) -> Result<Self, GraphQlError> {
        Self::with_url(token, GITHUB_GRAPHQL_URL)
    }

    /// Create a client for another endpoint (GHES, tests).
    pub fn with_url(token: &str, api_url: &str) -> Result<Self, GraphQlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| GraphQlError::InvalidToken)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("project-assigner/1.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
        })
    }
}

#[async_trait]
impl GraphQlExecutor for GitHubGraphQlClient {
    async fn execute(&self, query: &str, variables: Value) -> Result<Value, GraphQlError> {
        let request = GraphQlRequest { query, variables };

        let response = self.client.post(&self.api_url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphQlError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let gql_response: GraphQlResponse = serde_json::from_str(&body)?;

        if let Some(errors) = gql_response.errors.filter(|e| !e.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            debug!(?messages, "GraphQL response carried errors");
            return Err(GraphQlError::Errors { messages });
        }

        gql_response
            .data
            .filter(|data| !data.is_null())
            .ok_or(GraphQlError::MissingData)
    }
}
