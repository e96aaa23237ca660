//! Scope-aware GraphQL read queries.
//!
//! Numbered projects live under a repository, an organization or a user, and
//! each owner type needs a different root selector. [`ProjectScope`] is the
//! closed set of owners; every scope-specific string comes from one `match`.
//!
//! Values are never interpolated into query text. Queries declare variables
//! (`$owner`, `$repo`, `$number`, `$projectNumber`) and the executor binds them.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Map, Value};

use crate::context::NormalizedContext;
use crate::error::AssignerError;

/// Number of columns fetched per project. Columns past this are never found.
pub const COLUMN_PAGE_SIZE: u32 = 50;

/// Owner of a numbered project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectScope {
    #[default]
    Repo,
    Org,
    User,
}

impl ProjectScope {
    /// Every scope, in configuration order.
    pub const ALL: [Self; 3] = [Self::Repo, Self::Org, Self::User];

    /// Configuration spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repo => "repo",
            Self::Org => "org",
            Self::User => "user",
        }
    }

    /// Root field the scope's data hangs off in a response.
    #[must_use]
    pub const fn root_field(self) -> &'static str {
        match self {
            Self::Repo => "repository",
            Self::Org => "organization",
            Self::User => "user",
        }
    }

    /// Root selector with bound owner (and repository) variables.
    #[must_use]
    pub const fn root_selector(self) -> &'static str {
        match self {
            Self::Repo => "repository(owner: $owner, name: $repo)",
            Self::Org => "organization(login: $owner)",
            Self::User => "user(login: $owner)",
        }
    }

    /// Variable definitions the root selector needs.
    ///
    /// GraphQL rejects declared-but-unused variables, so `$repo` is only
    /// declared for repository scope.
    #[must_use]
    pub const fn variable_definitions(self) -> &'static str {
        match self {
            Self::Repo => "$owner: String!, $repo: String!",
            Self::Org | Self::User => "$owner: String!",
        }
    }

    /// Bound values for [`Self::variable_definitions`].
    #[must_use]
    pub fn root_variables(self, owner: &str, repo: &str) -> Map<String, Value> {
        let mut variables = Map::new();
        variables.insert("owner".to_string(), Value::from(owner));
        if self == Self::Repo {
            variables.insert("repo".to_string(), Value::from(repo));
        }
        variables
    }

    /// JSON pointer to the column nodes in a column lookup response.
    #[must_use]
    pub fn columns_path(self) -> String {
        format!("/{}/project/columns/nodes", self.root_field())
    }
}

impl fmt::Display for ProjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectScope {
    type Err = AssignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| AssignerError::InvalidScope {
                scope: s.to_string(),
            })
    }
}

/// Query listing every project card of the context's item.
///
/// Cards are always looked up through the item's repository, whatever scope
/// the target project has.
#[must_use]
pub fn project_cards_query(ctx: &NormalizedContext) -> String {
    format!(
        r"query ProjectCardsForItem({definitions}, $number: Int!) {{
    {root} {{
        {item} {{
            projectCards {{
                edges {{
                    node {{
                        project {{
                            number
                        }},
                        id
                    }}
                }}
            }}
        }}
    }}
}}",
        definitions = ProjectScope::Repo.variable_definitions(),
        root = ProjectScope::Repo.root_selector(),
        item = ctx.item_query_selector(),
    )
}

/// Variables for [`project_cards_query`].
#[must_use]
pub fn project_cards_variables(ctx: &NormalizedContext) -> Value {
    let mut variables = ProjectScope::Repo.root_variables(&ctx.owner, &ctx.repo);
    variables.insert("number".to_string(), json!(ctx.item_number));
    Value::Object(variables)
}

/// Query listing the first [`COLUMN_PAGE_SIZE`] columns of a scoped project.
#[must_use]
pub fn project_columns_query(scope: ProjectScope) -> String {
    format!(
        r"query ProjectColumns({definitions}, $projectNumber: Int!) {{
    {root} {{
        project(number: $projectNumber) {{
            columns(first: {COLUMN_PAGE_SIZE}) {{
                nodes {{
                    name,
                    id
                }}
            }}
        }}
    }}
}}",
        definitions = scope.variable_definitions(),
        root = scope.root_selector(),
    )
}

/// Variables for [`project_columns_query`].
#[must_use]
pub fn project_columns_variables(
    scope: ProjectScope,
    ctx: &NormalizedContext,
    project_number: u64,
) -> Value {
    let mut variables = scope.root_variables(&ctx.owner, &ctx.repo);
    variables.insert("projectNumber".to_string(), json!(project_number));
    Value::Object(variables)
}
