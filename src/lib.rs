//! # circleci-client - a typed client for the CircleCI v2 API
//!
//! Every operation is one HTTP round trip: the path is joined onto the API
//! prefix, the `Circle-Token` header is attached, the body is encoded as
//! JSON, and the response is decoded into a typed value or turned into an
//! [`Error`]. There are no retries, no caching and no automatic pagination.
//!
//! ## Quick Start
//!
//! ```no_run
//! use circleci_client::{project_slug, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), circleci_client::Error> {
//!     let client = Client::new(std::env::var("CIRCLECI_TOKEN").unwrap_or_default())?;
//!     let slug = project_slug("gh", "acme", "widgets");
//!
//!     let project = client.projects().get(&slug).await?;
//!     println!("{} ({})", project.name, project.vcs_info.default_branch);
//!
//!     let pipelines = client.pipelines().list(&slug).await?;
//!     for pipeline in &pipelines.items {
//!         println!("#{} {}", pipeline.number, pipeline.state);
//!     }
//!
//!     let var = client
//!         .contexts()
//!         .upsert_env_var("ctx-id", "DEPLOY_KEY", "s3cr3t")
//!         .await?;
//!     println!("Stored {} in {}", var.variable, var.context_id);
//!     Ok(())
//! }
//! ```
//!
//! ## Resources
//!
//! | Accessor | Endpoints |
//! |---|---|
//! | [`Client::projects`] | `/project/{slug}` |
//! | [`Client::env_vars`] | `/project/{slug}/envvar[/{name}]` |
//! | [`Client::pipelines`] | `/pipeline/{id}`, `/project/{slug}/pipeline` |
//! | [`Client::workflows`] | `/workflow/{id}[/approve/{request}, /cancel, /job, /rerun]` |
//! | [`Client::jobs`] | `/project/{slug}/job/{number}[/cancel, /artifacts, /tests]` |
//! | [`Client::contexts`] | `/context[/{id}][/environment-variable[/{name}]]` |
//!
//! Endpoints without a typed wrapper are reachable through [`Client::call`]
//! and the verb methods ([`Client::get`], [`Client::post`], [`Client::put`],
//! [`Client::delete`]).
//!
//! ## Logging
//!
//! Requests and responses are reported through `tracing`; install any
//! subscriber to see them.

mod client;
pub mod config;
mod context;
mod envvar;
mod error;
mod job;
mod pipeline;
mod project;
mod request;
mod response;
mod transport;
mod types;
mod workflow;

pub use client::{Client, ClientBuilder};
pub use config::ClientConfig;
pub use context::{Context, ContextCreate, ContextEnvVar, Contexts, Owner, DEFAULT_OWNER_TYPE};
pub use envvar::{ProjectEnvVar, ProjectEnvVars};
pub use error::{Error, Result};
pub use job::{
    Artifact, Executor, Job, Jobs, LatestWorkflow, Organization, ParallelRun, PipelineRef,
    TestMetadata,
};
pub use pipeline::{
    Actor, Commit, Pipeline, PipelineError, PipelineListOptions, PipelineVcs, Pipelines, Trigger,
};
pub use project::{Project, Projects, VcsInfo};
pub use request::TOKEN_HEADER;
pub use response::Response;
pub use types::{project_slug, List, ListOptions, Message};
pub use workflow::{RerunWorkflow, Workflow, WorkflowJob, Workflows};
