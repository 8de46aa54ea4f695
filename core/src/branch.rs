//! Branches and the `?branch=` URL convention

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Query parameter carrying the active branch in UI and API URLs
pub const BRANCH_QUERY_PARAM: &str = "branch";

/// Branch used when none is selected
pub const DEFAULT_BRANCH: &str = "main";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub origin_branch: Option<String>,
    #[serde(default)]
    pub branched_from: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub sync_with_git: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub has_schema_changes: bool,
}

impl Branch {
    /// Parse the `Branch` list of [`crate::query::branches_query`]
    pub fn list_from_response(data: &Value) -> Result<Vec<Self>, SchemaError> {
        let list = data
            .get("Branch")
            .cloned()
            .ok_or_else(|| SchemaError::missing("Branch", "response data"))?;
        Ok(serde_json::from_value(list)?)
    }

    /// Variables of [`crate::query::branch_create_mutation`]
    pub fn create_variables(name: &str, description: Option<&str>, sync_with_git: bool) -> Value {
        serde_json::json!({
            "name": name,
            "description": description,
            "sync_with_git": sync_with_git,
        })
    }
}

/// Detail route of a branch
pub fn branch_route(name: &str) -> String {
    format!("/branches/{}", urlencoding::encode(name))
}

/// `url` with its `branch` query parameter set to `branch`, replacing any
/// existing value. The default branch removes the parameter.
pub fn with_branch_param(url: &str, branch: Option<&str>) -> String {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };
    let prefix = format!("{BRANCH_QUERY_PARAM}=");
    let mut params: Vec<String> = query
        .split('&')
        .filter(|p| !p.is_empty() && !p.starts_with(&prefix))
        .map(String::from)
        .collect();
    if let Some(branch) = branch.filter(|b| !b.is_empty() && *b != DEFAULT_BRANCH) {
        params.push(format!("{prefix}{}", urlencoding::encode(branch)));
    }
    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

/// Branch named by the query string of `url`, if any
pub fn branch_from_url(url: &str) -> Option<String> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == BRANCH_QUERY_PARAM)
            .then(|| urlencoding::decode(value).ok().map(|v| v.into_owned()))
            .flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_branch_route() {
        assert_eq!(branch_route("test-branch"), "/branches/test-branch");
        assert_eq!(branch_route("a/b"), "/branches/a%2Fb");
    }

    #[test]
    fn test_with_branch_param() {
        assert_eq!(with_branch_param("/graphql", Some("dev")), "/graphql?branch=dev");
        assert_eq!(
            with_branch_param("/objects/InfraDevice?tab=x&branch=old", Some("new")),
            "/objects/InfraDevice?tab=x&branch=new"
        );
        assert_eq!(with_branch_param("/graphql?branch=dev", Some("main")), "/graphql");
        assert_eq!(with_branch_param("/graphql", None), "/graphql");
    }

    #[test]
    fn test_branch_from_url() {
        assert_eq!(
            branch_from_url("http://localhost:8080/?branch=test-branch").as_deref(),
            Some("test-branch")
        );
        assert_eq!(branch_from_url("http://localhost:8080/branches"), None);
        assert_eq!(branch_from_url("/x?tab=1&branch=a%2Fb#top").as_deref(), Some("a/b"));
    }

    #[test]
    fn test_branch_list() {
        let data = json!({"Branch": [
            {"id": "1", "name": "main", "is_default": true},
            {"id": "2", "name": "test-branch", "sync_with_git": true, "description": null}
        ]});
        let branches = Branch::list_from_response(&data).unwrap();
        assert_eq!(branches.len(), 2);
        assert!(branches[0].is_default);
        assert!(branches[1].sync_with_git);
        assert!(Branch::list_from_response(&json!({})).is_err());
    }

    #[test]
    fn test_create_variables() {
        let vars = Branch::create_variables("test-branch", None, false);
        assert_eq!(vars, json!({"name": "test-branch", "description": null, "sync_with_git": false}));
    }
}
