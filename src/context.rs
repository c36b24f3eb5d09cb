//! Contexts and their environment variables.
//!
//! Context variable values are write-only; reads only return names.

use crate::{
    types::{null_as_default, List, ListOptions},
    Client, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const CONTEXT_BASE_PATH: &str = "/context";

/// Owner type used when creating a context.
pub const DEFAULT_OWNER_TYPE: &str = "organization";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// The owner of a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

/// Body of a context creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextCreate {
    pub name: String,
    pub owner: Owner,
}

/// An environment variable stored in a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextEnvVar {
    #[serde(deserialize_with = "null_as_default")]
    pub variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub context_id: String,
}

#[derive(Serialize)]
struct EnvVarValue<'a> {
    value: &'a str,
}

/// Context operations, obtained from [`Client::contexts`].
#[derive(Clone, Copy)]
pub struct Contexts<'a> {
    client: &'a Client,
}

impl Client {
    /// Context operations.
    pub fn contexts(&self) -> Contexts<'_> {
        Contexts { client: self }
    }
}

impl Contexts<'_> {
    /// Lists the contexts of an owner, identified by its slug (for example
    /// `gh/acme`).
    pub async fn list(&self, owner_slug: &str) -> Result<List<Context>> {
        self.list_with(owner_slug, &ListOptions::default()).await
    }

    /// Lists one page of an owner's contexts.
    pub async fn list_with(&self, owner_slug: &str, options: &ListOptions) -> Result<List<Context>> {
        let owner: String = form_urlencoded::byte_serialize(owner_slug.as_bytes()).collect();
        let path = format!("{}?owner-slug={}", CONTEXT_BASE_PATH, owner);
        self.client.get_with_query(&path, options).await
    }

    /// Creates a context named `name` owned by the organization
    /// `owner_slug`.
    pub async fn create(&self, owner_slug: &str, name: &str) -> Result<Context> {
        let body = ContextCreate {
            name: name.to_string(),
            owner: Owner {
                slug: owner_slug.to_string(),
                kind: DEFAULT_OWNER_TYPE.to_string(),
            },
        };
        self.client.post(CONTEXT_BASE_PATH, &body).await
    }

    /// Deletes a context and all of its variables.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&context_path(id)).await
    }

    /// Fetches a context by id.
    pub async fn get(&self, id: &str) -> Result<Context> {
        self.client.get(&context_path(id)).await
    }

    /// Lists the first page of a context's variables.
    pub async fn list_env_vars(&self, id: &str) -> Result<List<ContextEnvVar>> {
        self.list_env_vars_with(id, &ListOptions::default()).await
    }

    /// Lists one page of a context's variables.
    pub async fn list_env_vars_with(
        &self,
        id: &str,
        options: &ListOptions,
    ) -> Result<List<ContextEnvVar>> {
        self.client
            .get_with_query(&env_vars_path(id), options)
            .await
    }

    /// Sets a variable, creating it if needed.
    pub async fn upsert_env_var(&self, id: &str, name: &str, value: &str) -> Result<ContextEnvVar> {
        let path = format!("{}/{}", env_vars_path(id), name);
        self.client.put(&path, &EnvVarValue { value }).await
    }

    /// Removes a variable from a context.
    pub async fn remove_env_var(&self, id: &str, name: &str) -> Result<()> {
        let path = format!("{}/{}", env_vars_path(id), name);
        self.client.delete(&path).await
    }
}

fn context_path(id: &str) -> String {
    format!("{}/{}", CONTEXT_BASE_PATH, id)
}

fn env_vars_path(id: &str) -> String {
    format!("{}/environment-variable", context_path(id))
}
