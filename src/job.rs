//! Jobs, their artifacts and their test results.

use crate::{
    context::Context,
    project::{project_path, Project},
    types::{null_as_default, List, ListOptions, Message},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Details of a single job run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    #[serde(deserialize_with = "null_as_default")]
    pub web_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub project: Project,
    #[serde(deserialize_with = "null_as_default")]
    pub parallel_runs: Vec<ParallelRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub latest_workflow: LatestWorkflow,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub executor: Executor,
    #[serde(deserialize_with = "null_as_default")]
    pub parallelism: u32,
    pub status: serde_json::Value,
    #[serde(deserialize_with = "null_as_default")]
    pub number: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pipeline: PipelineRef,
    /// Run time in milliseconds; zero while the job is running.
    #[serde(deserialize_with = "null_as_default")]
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    #[serde(deserialize_with = "null_as_default")]
    pub contexts: Vec<Context>,
    #[serde(deserialize_with = "null_as_default")]
    pub organization: Organization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelRun {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestWorkflow {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Executor {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resource_class: String,
}

/// The pipeline a [`Job`] belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineRef {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// A file stored by a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub node_index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// One test case reported by a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    /// Seconds.
    #[serde(deserialize_with = "null_as_default")]
    pub run_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub classname: String,
}

/// Job operations, obtained from [`Client::jobs`].
#[derive(Clone, Copy)]
pub struct Jobs<'a> {
    client: &'a Client,
}

impl Client {
    /// Job operations.
    pub fn jobs(&self) -> Jobs<'_> {
        Jobs { client: self }
    }
}

impl Jobs<'_> {
    /// Fetches a job by its number within the project.
    pub async fn get(&self, project_slug: &str, job_number: &str) -> Result<Job> {
        self.client.get(&job_path(project_slug, job_number)).await
    }

    /// Cancels a running job.
    pub async fn cancel(&self, project_slug: &str, job_number: &str) -> Result<Message> {
        let path = format!("{}/cancel", job_path(project_slug, job_number));
        self.client.post_empty(&path).await
    }

    /// Lists the first page of a job's artifacts.
    pub async fn artifacts(&self, project_slug: &str, job_number: &str) -> Result<List<Artifact>> {
        self.artifacts_with(project_slug, job_number, &ListOptions::default())
            .await
    }

    /// Lists one page of a job's artifacts.
    pub async fn artifacts_with(
        &self,
        project_slug: &str,
        job_number: &str,
        options: &ListOptions,
    ) -> Result<List<Artifact>> {
        let path = format!("{}/artifacts", job_path(project_slug, job_number));
        self.client.get_with_query(&path, options).await
    }

    /// Lists the first page of a job's test results.
    pub async fn test_metadata(
        &self,
        project_slug: &str,
        job_number: &str,
    ) -> Result<List<TestMetadata>> {
        self.test_metadata_with(project_slug, job_number, &ListOptions::default())
            .await
    }

    /// Lists one page of a job's test results.
    pub async fn test_metadata_with(
        &self,
        project_slug: &str,
        job_number: &str,
        options: &ListOptions,
    ) -> Result<List<TestMetadata>> {
        let path = format!("{}/tests", job_path(project_slug, job_number));
        self.client.get_with_query(&path, options).await
    }
}

fn job_path(project_slug: &str, job_number: &str) -> String {
    format!("{}/job/{}", project_path(project_slug), job_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_path() {
        assert_eq!(job_path("gh/a/b", "17"), "/project/gh/a/b/job/17");
    }

    #[test]
    fn test_job_decodes_nested_shapes() {
        let job: Job = serde_json::from_value(json!({
            "web_url": "https://circleci.com/gh/acme/widgets/17",
            "project": {"slug": "gh/acme/widgets", "name": "widgets"},
            "parallel_runs": [{"index": 0, "status": "success"}],
            "latest_workflow": {"id": "wf1", "name": "build"},
            "name": "test",
            "executor": {"type": "docker", "resource_class": "medium"},
            "parallelism": 1,
            "status": "success",
            "number": 17,
            "pipeline": {"id": "p1"},
            "duration": null,
            "contexts": [{"name": "org-global"}],
            "organization": {"name": "acme"}
        }))
        .unwrap();

        assert_eq!(job.project.name, "widgets");
        assert_eq!(job.parallel_runs[0].status, "success");
        assert_eq!(job.executor.kind, "docker");
        assert_eq!(job.pipeline.id, "p1");
        assert_eq!(job.duration, 0);
        assert_eq!(job.contexts[0].name, "org-global");
        assert_eq!(job.contexts[0].created_at, None);
        assert!(job.messages.is_empty());
    }

    #[test]
    fn test_metadata_decodes() {
        let list: List<TestMetadata> = serde_json::from_value(json!({
            "items": [{
                "message": null,
                "source": "junit",
                "run_time": 0.25,
                "file": "tests/api.rs",
                "result": "success",
                "name": "creates_user",
                "classname": "api"
            }],
            "next_page_token": null
        }))
        .unwrap();

        assert_eq!(list.items[0].run_time, 0.25);
        assert_eq!(list.items[0].message, "");
        assert!(!list.has_more());
    }
}
