//! SARIF 2.1.0 log model and baseline conversion.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::baseline::{Baseline, PluginConfig};
use crate::plugins;

pub const SARIF_VERSION: &str = "2.1.0";
pub const SARIF_SCHEMA: &str =
    "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";

const TOOL_NAME: &str = "detect-secrets";
const TOOL_URI: &str = "https://github.com/Yelp/detect-secrets";
const CWE_TAG: &str = "CWE-798";
const CWE_URI: &str = "https://cwe.mitre.org/data/definitions/798.html";
const CWE_DESCRIPTION: &str = "Hard-coded secrets, such as passwords or keys, create a \
     significant hole that allows an attacker with source code access to bypass authentication \
     or authorization";
const HELP_TEXT: &str = "Please use Harp (https://github.com/elastic/harp) to manage your secrets.";
const HELP_MARKDOWN: &str =
    "Please use [Harp](https://github.com/elastic/harp) to manage your secrets.";

/// Top-level SARIF document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarifLog {
    pub version: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub tool: Tool,
    pub invocations: Vec<Invocation>,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    pub driver: Driver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
    pub information_uri: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub execution_successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time_utc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub short_description: Message,
    pub full_description: Message,
    pub help_uri: String,
    pub help: Help,
    /// `tags` plus the plugin's options
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Help {
    pub text: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
}

impl Message {
    fn hard_coded(secret_type: &str) -> Self {
        Self {
            text: format!("Hard-coded {secret_type}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SarifResult {
    pub rule_id: String,
    pub level: Level,
    pub message: Message,
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalLocation {
    pub artifact_location: ArtifactLocation,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub start_line: u64,
}

/// Convert a baseline into a single-run SARIF log.
///
/// `scan_dir` prefixes every result path; without it paths are used as-is.
/// Plugins and findings of unknown secret types are left out, as are
/// findings an auditor marked verified.
#[must_use]
pub fn convert(baseline: &Baseline, scan_dir: Option<&str>) -> SarifLog {
    let rules: Vec<Rule> = baseline.plugins_used.iter().filter_map(rule_for).collect();

    let mut results = Vec::new();
    for (path, findings) in &baseline.results {
        for finding in findings.iter().filter(|f| !f.is_verified) {
            let Some(plugin) = plugins::plugin_for(&finding.secret_type) else {
                debug!(
                    path = %path,
                    secret_type = %finding.secret_type,
                    "Skipping finding of unknown type"
                );
                continue;
            };
            results.push(SarifResult {
                rule_id: plugin.to_string(),
                level: Level::Error,
                message: Message::hard_coded(&finding.secret_type),
                locations: vec![Location {
                    physical_location: PhysicalLocation {
                        artifact_location: ArtifactLocation {
                            uri: artifact_uri(scan_dir, path),
                        },
                        region: Region {
                            start_line: finding.line_number,
                        },
                    },
                }],
            });
        }
    }

    debug!(
        rules = rules.len(),
        results = results.len(),
        findings = baseline.finding_count(),
        "Converted baseline"
    );

    SarifLog {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![Run {
            tool: Tool {
                driver: Driver {
                    name: TOOL_NAME.to_string(),
                    semantic_version: baseline.version.clone(),
                    information_uri: TOOL_URI.to_string(),
                    rules,
                },
            },
            invocations: vec![Invocation {
                execution_successful: true,
                end_time_utc: baseline.generated_at.clone(),
            }],
            results,
        }],
    }
}

fn rule_for(plugin: &PluginConfig) -> Option<Rule> {
    let Some(secret_type) = plugins::secret_type(&plugin.name) else {
        warn!(plugin = %plugin.name, "Unknown detect-secrets plugin");
        return None;
    };

    let mut properties = Map::new();
    properties.insert("tags".to_string(), Value::from(vec![CWE_TAG]));
    for (key, value) in &plugin.options {
        properties.insert(key.clone(), value.clone());
    }

    Some(Rule {
        id: plugin.name.clone(),
        name: format!("{} detects hard-coded {secret_type}", plugin.name),
        short_description: Message::hard_coded(secret_type),
        full_description: Message {
            text: CWE_DESCRIPTION.to_string(),
        },
        help_uri: CWE_URI.to_string(),
        help: Help {
            text: HELP_TEXT.to_string(),
            markdown: HELP_MARKDOWN.to_string(),
        },
        properties,
    })
}

fn artifact_uri(scan_dir: Option<&str>, path: &str) -> String {
    match scan_dir.map(|dir| dir.trim_end_matches('/')) {
        Some(dir) if !dir.is_empty() => format!("{dir}/{path}"),
        _ => path.to_string(),
    }
}
