//! Pipelines.

use crate::{
    project::project_path,
    types::{null_as_default, List, ListOptions},
    workflow::Workflow,
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const PIPELINE_BASE_PATH: &str = "/pipeline";

/// A pipeline run of a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub errors: Vec<PipelineError>,
    #[serde(deserialize_with = "null_as_default")]
    pub project_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub number: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub trigger: Trigger,
    #[serde(deserialize_with = "null_as_default")]
    pub vcs: PipelineVcs,
}

/// A configuration or setup error attached to a [`Pipeline`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineError {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

/// What started a [`Pipeline`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trigger {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub actor: Actor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

/// Version control state a [`Pipeline`] ran against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineVcs {
    #[serde(deserialize_with = "null_as_default")]
    pub provider_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub target_repository_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub branch: String,
    #[serde(deserialize_with = "null_as_default")]
    pub review_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub review_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub revision: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub commit: Commit,
    #[serde(deserialize_with = "null_as_default")]
    pub origin_repository_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
}

/// Query options for [`Pipelines::list_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineListOptions {
    /// Only pipelines of this branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Continuation token from a previous page.
    #[serde(rename = "page-token", skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
}

/// Pipeline operations, obtained from [`Client::pipelines`].
#[derive(Clone, Copy)]
pub struct Pipelines<'a> {
    client: &'a Client,
}

impl Client {
    /// Pipeline operations.
    pub fn pipelines(&self) -> Pipelines<'_> {
        Pipelines { client: self }
    }
}

impl Pipelines<'_> {
    /// Fetches a pipeline by id.
    pub async fn get(&self, id: &str) -> Result<Pipeline> {
        self.client.get(&pipeline_path(id)).await
    }

    /// Lists the most recent pipelines of a project.
    pub async fn list(&self, project_slug: &str) -> Result<List<Pipeline>> {
        self.list_with(project_slug, &PipelineListOptions::default())
            .await
    }

    /// Lists one page of a project's pipelines, optionally filtered by branch.
    pub async fn list_with(
        &self,
        project_slug: &str,
        options: &PipelineListOptions,
    ) -> Result<List<Pipeline>> {
        let path = format!("{}{}", project_path(project_slug), PIPELINE_BASE_PATH);
        self.client.get_with_query(&path, options).await
    }

    /// Lists the workflows a pipeline started.
    pub async fn workflows(&self, id: &str) -> Result<List<Workflow>> {
        self.workflows_with(id, &ListOptions::default()).await
    }

    /// Lists one page of a pipeline's workflows.
    pub async fn workflows_with(&self, id: &str, options: &ListOptions) -> Result<List<Workflow>> {
        let path = format!("{}/workflow", pipeline_path(id));
        self.client.get_with_query(&path, options).await
    }
}

fn pipeline_path(id: &str) -> String {
    format!("{}/{}", PIPELINE_BASE_PATH, id)
}
