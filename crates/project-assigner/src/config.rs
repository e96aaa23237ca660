//! Mapping configuration: which label puts items into which project column.

use serde::Deserialize;

use crate::error::AssignerError;
use crate::query::ProjectScope;

/// One label-to-project association.
///
/// Fields stay loosely typed here; the engine validates them only when a
/// mapping's label actually matches, so a broken mapping for some other label
/// never stops the mappings around it. A mapping without a label never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueMapping {
    pub project_number: Option<u64>,
    pub column_name: Option<String>,
    pub label: Option<String>,
    pub project_scope: Option<String>,
}

impl IssueMapping {
    /// Fully populated mapping.
    #[must_use]
    pub fn new(
        project_number: u64,
        column_name: impl Into<String>,
        label: impl Into<String>,
        project_scope: ProjectScope,
    ) -> Self {
        Self {
            project_number: Some(project_number),
            column_name: Some(column_name.into()),
            label: Some(label.into()),
            project_scope: Some(project_scope.to_string()),
        }
    }

    /// Whether an event carrying `label` concerns this mapping.
    #[must_use]
    pub fn matches_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    /// The mapping's scope, parsed.
    ///
    /// Absent is a missing field; anything outside `repo`, `org`, `user` is
    /// [`AssignerError::InvalidScope`].
    pub fn scope(&self) -> Result<ProjectScope, AssignerError> {
        self.project_scope
            .as_deref()
            .ok_or(AssignerError::MissingField {
                field: "projectScope",
            })?
            .parse()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMapping {
    #[serde(default)]
    project_number: Option<u64>,
    #[serde(default)]
    column_name: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    project_scope: Option<String>,
}

impl From<RawMapping> for IssueMapping {
    fn from(raw: RawMapping) -> Self {
        let project_scope = raw
            .project_scope
            .filter(|scope| !scope.is_empty())
            .unwrap_or_else(|| ProjectScope::default().to_string());

        Self {
            project_number: raw.project_number,
            column_name: raw.column_name,
            label: raw.label,
            project_scope: Some(project_scope),
        }
    }
}

/// Parse the `issue-mappings` input, a JSON array of mapping objects.
///
/// A missing or empty `projectScope` means `repo`. Scope values are checked
/// when the mapping is applied, not here.
pub fn parse_mappings(json: &str) -> Result<Vec<IssueMapping>, AssignerError> {
    let raw: Vec<RawMapping> = serde_json::from_str(json).map_err(AssignerError::InvalidMappings)?;
    Ok(raw.into_iter().map(IssueMapping::from).collect())
}
