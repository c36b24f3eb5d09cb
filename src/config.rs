//! Client configuration.
//!
//! A [`ClientConfig`] is assembled once by [`ClientBuilder`](crate::ClientBuilder)
//! and is read-only for the lifetime of the client.

use http::HeaderMap;
use std::fmt;
use url::Url;

/// Host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://circleci.com";

/// Path prefix of the v2 API.
pub const DEFAULT_PATH_PREFIX: &str = "/api/v2/";

/// Transport timeout, in seconds, applied to the default HTTP client.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Environment variable read by [`ClientBuilder::from_env`](crate::ClientBuilder::from_env)
/// for the API token.
pub const TOKEN_ENV_VAR: &str = "CIRCLECI_TOKEN";

/// Environment variable read by [`ClientBuilder::from_env`](crate::ClientBuilder::from_env)
/// for an alternate base URL.
pub const BASE_URL_ENV_VAR: &str = "CIRCLECI_BASE_URL";

/// Immutable settings shared by every request a client makes.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) path_prefix: String,
    pub(crate) token: Option<String>,
    pub(crate) default_headers: HeaderMap,
}

impl ClientConfig {
    /// The scheme and host requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The prefix every resource path is joined onto.
    pub fn path_prefix(&self) -> &str {
        &self.path_prefix
    }

    /// Whether a non-empty API token is configured.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Extra headers added to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("path_prefix", &self.path_prefix)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("default_headers", &self.default_headers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            token: Some("super-secret".to_string()),
            default_headers: HeaderMap::new(),
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(config.has_token());
    }

    #[test]
    fn test_user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("circleci-client/"));
    }
}
