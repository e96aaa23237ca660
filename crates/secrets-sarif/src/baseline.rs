//! detect-secrets baseline file model.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::SarifError;

/// A `.secrets.baseline` file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Baseline {
    /// detect-secrets version that wrote the file
    #[serde(default)]
    pub version: Option<String>,
    /// Scan timestamp as written by detect-secrets
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub plugins_used: Vec<PluginConfig>,
    /// Findings per file path; ordered by path
    #[serde(default)]
    pub results: BTreeMap<String, Vec<Finding>>,
}

/// A plugin entry of `plugins_used`: its name plus any tuning options.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

/// One potential secret.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Finding {
    /// Secret type, e.g. `Secret Keyword`
    #[serde(rename = "type")]
    pub secret_type: String,
    pub line_number: u64,
    /// Set when an auditor confirmed the secret is live
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub hashed_secret: Option<String>,
}

impl Baseline {
    /// Total number of findings over all files.
    #[must_use]
    pub fn finding_count(&self) -> usize {
        self.results.values().map(Vec::len).sum()
    }
}

impl FromStr for Baseline {
    type Err = SarifError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(SarifError::InvalidBaseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_baseline() {
        let baseline: Baseline = r#"{
            "version": "1.4.0",
            "generated_at": "2022-03-01T10:00:00Z",
            "plugins_used": [
                { "name": "Base64HighEntropyString", "limit": 4.5 },
                { "name": "KeywordDetector" }
            ],
            "results": {
                "src/b.py": [
                    { "type": "Secret Keyword", "line_number": 3, "hashed_secret": "abc" }
                ],
                "src/a.py": [
                    { "type": "Base64 High Entropy String", "line_number": 10, "is_verified": true }
                ]
            },
            "filters_used": []
        }"#
        .parse()
        .unwrap();

        assert_eq!(baseline.version.as_deref(), Some("1.4.0"));
        assert_eq!(baseline.plugins_used[0].options["limit"], 4.5);
        assert!(baseline.plugins_used[1].options.is_empty());
        assert_eq!(baseline.finding_count(), 2);
        let paths: Vec<&String> = baseline.results.keys().collect();
        assert_eq!(paths, ["src/a.py", "src/b.py"]);
        assert!(!baseline.results["src/b.py"][0].is_verified);
    }

    #[test]
    fn test_invalid_baseline() {
        let err = "[1, 2]".parse::<Baseline>().unwrap_err();
        assert!(matches!(err, SarifError::InvalidBaseline(_)));
    }
}
