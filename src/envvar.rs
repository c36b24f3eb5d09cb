//! Project environment variables.
//!
//! Values returned by CircleCI are masked; only the name is meaningful on
//! read.

use crate::{
    project::project_path,
    types::{null_as_default, List, ListOptions},
    Client, Result,
};
use serde::{Deserialize, Serialize};

/// An environment variable set on a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectEnvVar {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: String,
}

/// Project environment variable operations, obtained from
/// [`Client::env_vars`].
#[derive(Clone, Copy)]
pub struct ProjectEnvVars<'a> {
    client: &'a Client,
}

impl Client {
    /// Project environment variable operations.
    pub fn env_vars(&self) -> ProjectEnvVars<'_> {
        ProjectEnvVars { client: self }
    }
}

impl ProjectEnvVars<'_> {
    /// Creates the variable, or replaces the value of an existing one.
    pub async fn create(&self, project_slug: &str, name: &str, value: &str) -> Result<ProjectEnvVar> {
        let body = ProjectEnvVar {
            name: name.to_string(),
            value: value.to_string(),
        };
        self.client.post(&env_vars_path(project_slug), &body).await
    }

    /// Fetches one variable by name. The value comes back masked.
    pub async fn get(&self, project_slug: &str, name: &str) -> Result<ProjectEnvVar> {
        self.client.get(&env_var_path(project_slug, name)).await
    }

    /// Lists the first page of variables.
    pub async fn list(&self, project_slug: &str) -> Result<List<ProjectEnvVar>> {
        self.list_with(project_slug, &ListOptions::default()).await
    }

    /// Lists one page of variables.
    pub async fn list_with(
        &self,
        project_slug: &str,
        options: &ListOptions,
    ) -> Result<List<ProjectEnvVar>> {
        self.client
            .get_with_query(&env_vars_path(project_slug), options)
            .await
    }

    /// Deletes a variable.
    pub async fn delete(&self, project_slug: &str, name: &str) -> Result<()> {
        self.client.delete(&env_var_path(project_slug, name)).await
    }
}

fn env_vars_path(project_slug: &str) -> String {
    format!("{}/envvar", project_path(project_slug))
}

fn env_var_path(project_slug: &str, name: &str) -> String {
    format!("{}/{}", env_vars_path(project_slug), name)
}
