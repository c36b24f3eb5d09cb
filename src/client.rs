//! The CircleCI client.
//!
//! [`Client`] owns the configuration and the transport and exposes the verb
//! primitives every resource module is built on. Use [`ClientBuilder`] to
//! configure one.

use crate::{
    config::{self, ClientConfig},
    request,
    response::{self, Response},
    transport::{RawResponse, Transport},
    Error, Result,
};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A client for the CircleCI v2 API.
///
/// Cloning is cheap and clones share the underlying connection pool. Every
/// method performs exactly one HTTP request; nothing is retried or cached.
///
/// # Examples
///
/// ```no_run
/// use circleci_client::{project_slug, Client};
///
/// # async fn example() -> Result<(), circleci_client::Error> {
/// let client = Client::new("my-token")?;
///
/// let slug = project_slug("gh", "acme", "widgets");
/// let project = client.projects().get(&slug).await?;
/// println!("{} lives at {}", project.name, project.vcs_info.vcs_url);
///
/// let var = client.env_vars().create(&slug, "DEPLOY_KEY", "s3cr3t").await?;
/// println!("Created {} (value masked as {})", var.name, var.value);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Transport,
}

impl Client {
    /// Creates a client for `https://circleci.com` with the given API token
    /// and all other settings at their defaults.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::builder().token(token).build()
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The scheme and host requests are sent to.
    pub fn base_url(&self) -> &Url {
        self.inner.config.base_url()
    }

    /// The prefix every resource path is joined onto.
    pub fn path_prefix(&self) -> &str {
        self.inner.config.path_prefix()
    }

    /// Makes a typed request and returns the decoded body with its HTTP
    /// details.
    ///
    /// `path` is relative to the configured path prefix and may carry its own
    /// query string; `query` is merged into it.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use circleci_client::Client;
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), circleci_client::Error> {
    /// let client = Client::new("my-token")?;
    ///
    /// let me = client
    ///     .call::<(), (), serde_json::Value>(Method::GET, "/me", None, None)
    ///     .await?;
    /// println!("{} answered in {:?}", me.status, me.latency);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<B, Q, Res>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<Response<Res>>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let raw = self.send(method, path, body, query).await?;
        response::decode(response::accept(raw)?)
    }

    /// Builds and sends one request, logging failures before handing them
    /// back.
    async fn send<B, Q>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        query: Option<&Q>,
    ) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        let request = request::build(&self.inner.config, method.clone(), path, body, query)?;

        self.inner
            .transport
            .perform(&self.inner.config.base_url, request)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    error = %e,
                    method = %method,
                    path = %path,
                    "Request failed"
                );
            })
    }

    /// GET `path` and decode the body.
    pub async fn get<Res>(&self, path: &str) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), (), Res>(Method::GET, path, None, None)
            .await
            .map(Response::into_data)
    }

    /// GET `path` with query options and decode the body.
    pub async fn get_with_query<Q, Res>(&self, path: &str, query: &Q) -> Result<Res>
    where
        Q: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call::<(), Q, Res>(Method::GET, path, None, Some(query))
            .await
            .map(Response::into_data)
    }

    /// POST a JSON body to `path` and decode the response.
    pub async fn post<B, Res>(&self, path: &str, body: &B) -> Result<Res>
    where
        B: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call::<B, (), Res>(Method::POST, path, Some(body), None)
            .await
            .map(Response::into_data)
    }

    /// POST to `path` without a body and decode the response.
    pub async fn post_empty<Res>(&self, path: &str) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), (), Res>(Method::POST, path, None, None)
            .await
            .map(Response::into_data)
    }

    /// PUT a JSON body to `path` and decode the response.
    pub async fn put<B, Res>(&self, path: &str, body: &B) -> Result<Res>
    where
        B: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        self.call::<B, (), Res>(Method::PUT, path, Some(body), None)
            .await
            .map(Response::into_data)
    }

    /// DELETE `path`. The response body is discarded.
    pub async fn delete(&self, path: &str) -> Result<()> {
        let raw = self.send::<(), ()>(Method::DELETE, path, None, None).await?;
        response::accept(raw).map(|_| ())
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Options only apply while building; the resulting client cannot be
/// reconfigured.
///
/// # Examples
///
/// ```no_run
/// use circleci_client::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), circleci_client::Error> {
/// let client = ClientBuilder::new()
///     .token("my-token")
///     .base_url("http://localhost:8080")?
///     .path_prefix("/mock/v2")
///     .timeout(Duration::from_secs(5))
///     .default_header("X-Request-Source", "nightly-report")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    path_prefix: String,
    token: Option<String>,
    http_client: Option<reqwest::Client>,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            path_prefix: config::DEFAULT_PATH_PREFIX.to_string(),
            token: None,
            http_client: None,
            timeout: Duration::from_secs(config::DEFAULT_TIMEOUT_SECS),
            default_headers: HeaderMap::new(),
        }
    }

    /// Creates a builder seeded from `CIRCLECI_TOKEN` and, when set,
    /// `CIRCLECI_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if `CIRCLECI_BASE_URL` is not a valid URL.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::new();
        if let Ok(token) = std::env::var(config::TOKEN_ENV_VAR) {
            builder = builder.token(token);
        }
        if let Ok(url) = std::env::var(config::BASE_URL_ENV_VAR) {
            builder = builder.base_url(url)?;
        }
        Ok(builder)
    }

    /// Sets the API token sent in the `Circle-Token` header.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the base URL, replacing `https://circleci.com`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the path prefix, replacing `/api/v2/`.
    pub fn path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    /// Uses `client` as the transport instead of building one.
    ///
    /// The builder's [`timeout`](Self::timeout) does not apply to a supplied
    /// client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the timeout of the transport the builder creates.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the configured `Client`.
    ///
    /// A missing token is not an error here; every request made by the
    /// client will fail with [`Error::Configuration`] instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| {
                    Error::Configuration(format!("Failed to build HTTP client: {}", e))
                })?,
        };

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(config::DEFAULT_BASE_URL)?,
        };

        let config = ClientConfig {
            base_url,
            path_prefix: self.path_prefix,
            token: self.token,
            default_headers: self.default_headers,
        };

        if !config.has_token() {
            tracing::warn!("No CircleCI API token configured; requests will be rejected locally");
        }

        Ok(Client {
            inner: Arc::new(ClientInner {
                config,
                transport: Transport::new(http_client),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::new("test_token").unwrap();
        assert_eq!(client.base_url().as_str(), "https://circleci.com/");
        assert_eq!(client.path_prefix(), "/api/v2/");
        assert!(client.config().has_token());
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder()
            .token("t")
            .base_url("http://127.0.0.1:9000")
            .unwrap()
            .path_prefix("/mock")
            .default_header("x-team", "platform")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9000/");
        assert_eq!(client.path_prefix(), "/mock");
        assert_eq!(client.config().default_headers()["x-team"], "platform");
    }

    #[test]
    fn test_builder_rejects_invalid_input() {
        assert!(matches!(
            Client::builder().base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::builder().default_header("bad header", "v"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_build_without_token() {
        let client = Client::builder().build().unwrap();
        assert!(!client.config().has_token());

        let client = Client::new("").unwrap();
        assert!(!client.config().has_token());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var(config::TOKEN_ENV_VAR, "env-token");
        std::env::set_var(config::BASE_URL_ENV_VAR, "http://localhost:4000");
        let client = ClientBuilder::from_env().unwrap().build().unwrap();
        std::env::remove_var(config::TOKEN_ENV_VAR);
        std::env::remove_var(config::BASE_URL_ENV_VAR);

        assert!(client.config().has_token());
        assert_eq!(client.base_url().as_str(), "http://localhost:4000/");
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
