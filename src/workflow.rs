//! Workflows and their jobs.

use crate::{
    types::{null_as_default, List, Message},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const WORKFLOW_BASE_PATH: &str = "/workflow";

/// A workflow started by a pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workflow {
    #[serde(deserialize_with = "null_as_default")]
    pub pipeline_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub canceled_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub errored_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub started_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub pipeline_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

/// A job as seen from its workflow, including approval jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowJob {
    #[serde(deserialize_with = "null_as_default")]
    pub canceled_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dependencies: Vec<String>,
    /// Absent for approval jobs and jobs that have not started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_number: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub approved_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project_slug: String,
    pub status: serde_json::Value,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub approval_request_id: String,
}

/// Body of a rerun request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RerunWorkflow {
    /// Jobs to rerun; empty reruns the whole workflow.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub jobs: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub from_failed: bool,
}

/// Workflow operations, obtained from [`Client::workflows`].
#[derive(Clone, Copy)]
pub struct Workflows<'a> {
    client: &'a Client,
}

impl Client {
    /// Workflow operations.
    pub fn workflows(&self) -> Workflows<'_> {
        Workflows { client: self }
    }
}

impl Workflows<'_> {
    /// Fetches a workflow by id.
    pub async fn get(&self, id: &str) -> Result<Workflow> {
        self.client.get(&workflow_path(id)).await
    }

    /// Approves a pending approval job.
    pub async fn approve(&self, id: &str, approval_request_id: &str) -> Result<Message> {
        let path = format!("{}/approve/{}", workflow_path(id), approval_request_id);
        self.client.post_empty(&path).await
    }

    /// Cancels a running workflow.
    pub async fn cancel(&self, id: &str) -> Result<Message> {
        self.client
            .post_empty(&format!("{}/cancel", workflow_path(id)))
            .await
    }

    /// Lists the jobs of a workflow.
    ///
    /// Sent as a POST, which is how this endpoint has always been called by
    /// this client.
    pub async fn jobs(&self, id: &str) -> Result<List<WorkflowJob>> {
        self.client
            .post_empty(&format!("{}/job", workflow_path(id)))
            .await
    }

    /// Reruns a workflow, optionally limited to `job_ids` or to the jobs that
    /// failed.
    pub async fn rerun(&self, id: &str, job_ids: &[&str], from_failed: bool) -> Result<Message> {
        let body = RerunWorkflow {
            jobs: job_ids.iter().map(|j| j.to_string()).collect(),
            from_failed,
        };
        self.client
            .post(&format!("{}/rerun", workflow_path(id)), &body)
            .await
    }
}

fn workflow_path(id: &str) -> String {
    format!("{}/{}", WORKFLOW_BASE_PATH, id)
}
