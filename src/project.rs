//! Projects.

use crate::{types::null_as_default, Client, Result};
use serde::{Deserialize, Serialize};

const PROJECT_BASE_PATH: &str = "/project";

/// A project followed on CircleCI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub organization_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vcs_info: VcsInfo,
}

/// Version control details of a [`Project`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub vcs_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub default_branch: String,
}

/// Project operations, obtained from [`Client::projects`].
#[derive(Clone, Copy)]
pub struct Projects<'a> {
    client: &'a Client,
}

impl Client {
    /// Project operations.
    pub fn projects(&self) -> Projects<'_> {
        Projects { client: self }
    }
}

impl Projects<'_> {
    /// Fetches a project by slug.
    pub async fn get(&self, project_slug: &str) -> Result<Project> {
        self.client.get(&project_path(project_slug)).await
    }
}

pub(crate) fn project_path(project_slug: &str) -> String {
    format!("{}/{}", PROJECT_BASE_PATH, project_slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_path() {
        assert_eq!(project_path("gh/acme/widgets"), "/project/gh/acme/widgets");
    }

    #[test]
    fn test_project_decodes_partial_payload() {
        let project: Project =
            serde_json::from_str(r#"{"slug":"gh/acme/widgets","vcs_info":{"provider":"GitHub"}}"#)
                .unwrap();
        assert_eq!(project.slug, "gh/acme/widgets");
        assert_eq!(project.vcs_info.provider, "GitHub");
        assert_eq!(project.vcs_info.default_branch, "");
        assert_eq!(project.name, "");
    }
}
