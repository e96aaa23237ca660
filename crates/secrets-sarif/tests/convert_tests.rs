//! Baseline to SARIF conversion over a realistic detect-secrets baseline.

use secrets_sarif::{convert, Baseline};
use serde_json::{json, Value};

const BASELINE: &str = r#"{
  "custom_plugin_paths": [],
  "exclude": { "files": null, "lines": null },
  "generated_at": "2022-03-01T10:00:00Z",
  "plugins_used": [
    { "name": "AWSKeyDetector" },
    { "base64_limit": 4.5, "name": "Base64HighEntropyString" },
    { "name": "GitHubTokenDetector" },
    { "keyword_exclude": null, "name": "KeywordDetector" }
  ],
  "results": {
    "config/settings.py": [
      { "hashed_secret": "1111", "is_verified": false, "line_number": 12, "type": "Secret Keyword" },
      { "hashed_secret": "2222", "is_verified": true, "line_number": 20, "type": "AWS Access Key" }
    ],
    "app/main.py": [
      { "hashed_secret": "3333", "is_verified": false, "line_number": 4, "type": "AWS Access Key" },
      { "hashed_secret": "4444", "is_verified": false, "line_number": 9, "type": "GitHub Token" }
    ]
  },
  "version": "0.14.3",
  "word_list": { "file": null, "hash": null }
}"#;

fn sarif(scan_dir: Option<&str>) -> Value {
    let baseline: Baseline = BASELINE.parse().unwrap();
    serde_json::to_value(convert(&baseline, scan_dir)).unwrap()
}

#[test]
fn test_document_header() {
    let doc = sarif(None);
    assert_eq!(doc["version"], "2.1.0");
    assert_eq!(
        doc["$schema"],
        "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json"
    );
    assert_eq!(doc["runs"].as_array().unwrap().len(), 1);

    let run = &doc["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "detect-secrets");
    assert_eq!(run["tool"]["driver"]["semanticVersion"], "0.14.3");
    assert_eq!(
        run["tool"]["driver"]["informationUri"],
        "https://github.com/Yelp/detect-secrets"
    );
    assert_eq!(
        run["invocations"],
        json!([{ "executionSuccessful": true, "endTimeUtc": "2022-03-01T10:00:00Z" }])
    );
}

#[test]
fn test_rules_skip_unknown_plugins() {
    let doc = sarif(None);
    let rules = doc["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap();
    let ids: Vec<&str> = rules.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["AWSKeyDetector", "Base64HighEntropyString", "KeywordDetector"]);

    assert_eq!(
        rules[1],
        json!({
            "id": "Base64HighEntropyString",
            "name": "Base64HighEntropyString detects hard-coded Base64 High Entropy String",
            "shortDescription": { "text": "Hard-coded Base64 High Entropy String" },
            "fullDescription": {
                "text": "Hard-coded secrets, such as passwords or keys, create a significant hole \
                         that allows an attacker with source code access to bypass authentication \
                         or authorization"
            },
            "helpUri": "https://cwe.mitre.org/data/definitions/798.html",
            "help": {
                "text": "Please use Harp (https://github.com/elastic/harp) to manage your secrets.",
                "markdown": "Please use [Harp](https://github.com/elastic/harp) to manage your secrets."
            },
            "properties": { "tags": ["CWE-798"], "base64_limit": 4.5 }
        })
    );
    assert_eq!(
        rules[2]["properties"],
        json!({ "tags": ["CWE-798"], "keyword_exclude": null })
    );
}

#[test]
fn test_results_sorted_by_path_without_verified_or_unknown() {
    let doc = sarif(Some("workspace"));
    let results = doc["runs"][0]["results"].as_array().unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(
        results[0],
        json!({
            "ruleId": "AWSKeyDetector",
            "level": "error",
            "message": { "text": "Hard-coded AWS Access Key" },
            "locations": [{
                "physicalLocation": {
                    "artifactLocation": { "uri": "workspace/app/main.py" },
                    "region": { "startLine": 4 }
                }
            }]
        })
    );
    assert_eq!(results[1]["ruleId"], "KeywordDetector");
    assert_eq!(
        results[1]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
        "workspace/config/settings.py"
    );
    assert_eq!(
        results[1]["locations"][0]["physicalLocation"]["region"]["startLine"],
        12
    );
}

#[test]
fn test_minimal_baseline_omits_version() {
    let baseline: Baseline = r#"{"plugins_used": [], "results": {}}"#.parse().unwrap();
    let doc = serde_json::to_value(convert(&baseline, None)).unwrap();

    let driver = &doc["runs"][0]["tool"]["driver"];
    assert!(driver.get("semanticVersion").is_none());
    assert_eq!(driver["rules"], json!([]));
    assert_eq!(doc["runs"][0]["results"], json!([]));
}
