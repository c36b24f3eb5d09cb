//! Request construction.
//!
//! Turns a method, a resource path, an optional body and optional query
//! options into a [`RequestDescriptor`] ready for the transport.

use crate::{config::ClientConfig, Error, Result};
use http::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use serde_json::Value;
use url::{form_urlencoded, Url};

/// Header carrying the API token.
pub const TOKEN_HEADER: &str = "circle-token";

/// A fully resolved request, built per call and consumed by the transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,

    /// The absolute request path, prefix included.
    pub path: String,

    /// Query parameters, in the order they are sent.
    pub query_params: Vec<(String, String)>,

    /// Headers for this request.
    pub headers: HeaderMap,

    /// The JSON-encoded body, if any.
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    /// Resolves the descriptor against `base_url`.
    pub fn url(&self, base_url: &Url) -> Url {
        let mut url = base_url.clone();
        url.set_path(&self.path);
        url.set_query(None);
        if !self.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query_params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

/// Builds the descriptor for one call.
///
/// Fails with [`Error::Configuration`] before doing anything else when the
/// client has no token.
pub(crate) fn build<B, Q>(
    config: &ClientConfig,
    method: Method,
    relative_path: &str,
    body: Option<&B>,
    query: Option<&Q>,
) -> Result<RequestDescriptor>
where
    B: Serialize + ?Sized,
    Q: Serialize + ?Sized,
{
    let token = match config.token.as_deref() {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(Error::Configuration(
                "API token must not be blank".to_string(),
            ))
        }
    };

    let (path, embedded_query) = relative_path
        .split_once('?')
        .unwrap_or((relative_path, ""));
    let path = join_path(&config.path_prefix, path);

    let mut query_params = match query {
        Some(options) => query_pairs(options)?,
        None => Vec::new(),
    };
    query_params.extend(form_urlencoded::parse(embedded_query.as_bytes()).into_owned());
    query_params.sort_by(|a, b| a.0.cmp(&b.0));

    let body = body
        .map(|b| serde_json::to_vec(b).map_err(|e| Error::Serialization(e.to_string())))
        .transpose()?;

    Ok(RequestDescriptor {
        method,
        path,
        query_params,
        headers: headers(config, token)?,
        body,
    })
}

fn headers(config: &ClientConfig, token: &str) -> Result<HeaderMap> {
    let mut headers = config.default_headers.clone();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(crate::config::USER_AGENT),
    );

    let mut token = HeaderValue::from_str(token)
        .map_err(|e| Error::Configuration(format!("Invalid API token: {}", e)))?;
    token.set_sensitive(true);
    headers.insert(HeaderName::from_static(TOKEN_HEADER), token);

    Ok(headers)
}

/// Joins `relative` onto `prefix`.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment,
/// so the result is rooted, has no doubled or trailing separator, and a
/// leading `/` on `relative` never escapes the prefix.
pub fn join_path(prefix: &str, relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in prefix.split('/').chain(relative.split('/')) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Flattens query options into key/value pairs.
///
/// `None` fields are skipped and sequences become repeated keys. Nested
/// structures cannot be expressed as a query string and are rejected.
pub(crate) fn query_pairs<Q>(options: &Q) -> Result<Vec<(String, String)>>
where
    Q: Serialize + ?Sized,
{
    let fields = match serde_json::to_value(options) {
        Ok(Value::Object(fields)) => fields,
        Ok(Value::Null) => return Ok(Vec::new()),
        Ok(other) => {
            return Err(Error::Serialization(format!(
                "query options must serialize to a map, got `{}`",
                other
            )))
        }
        Err(e) => return Err(Error::Serialization(e.to_string())),
    };

    let mut pairs = Vec::new();
    for (key, value) in fields {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar(&key, item)? {
                        pairs.push((key.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar(&key, other)? {
                    pairs.push((key, v));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::Serialization(format!(
            "query parameter `{}` must be a scalar or a list of scalars",
            key
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(token: Option<&str>) -> ClientConfig {
        ClientConfig {
            base_url: Url::parse("https://circleci.com").unwrap(),
            path_prefix: "/api/v2/".to_string(),
            token: token.map(str::to_string),
            default_headers: HeaderMap::new(),
        }
    }

    #[derive(Serialize)]
    struct PageQuery {
        #[serde(rename = "page-token", skip_serializing_if = "Option::is_none")]
        page_token: Option<String>,
        branch: Option<String>,
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/api/v2/", "/project/gh/a/b"), "/api/v2/project/gh/a/b");
        assert_eq!(join_path("/api/v2", "project//gh/"), "/api/v2/project/gh");
        assert_eq!(join_path("api/v2/", "./context"), "/api/v2/context");
        assert_eq!(join_path("/api/v2/", "workflow/../context"), "/api/v2/context");
        assert_eq!(join_path("/", "/"), "/");
        assert_eq!(join_path("", "job"), "/job");
    }

    #[test]
    fn test_query_pairs_skips_none_and_repeats_lists() {
        #[derive(Serialize)]
        struct Filter {
            status: Vec<&'static str>,
            limit: u32,
            mine: bool,
            branch: Option<String>,
        }

        let pairs = query_pairs(&Filter {
            status: vec!["success", "failed"],
            limit: 20,
            mine: true,
            branch: None,
        })
        .unwrap();

        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "20".to_string()),
                ("mine".to_string(), "true".to_string()),
                ("status".to_string(), "success".to_string()),
                ("status".to_string(), "failed".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_rejects_nested_and_non_maps() {
        let nested = query_pairs(&json!({"owner": {"slug": "gh/acme"}}));
        assert!(matches!(nested, Err(Error::Serialization(_))));

        let scalar = query_pairs(&"page-token");
        assert!(matches!(scalar, Err(Error::Serialization(_))));

        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_build_requires_token() {
        for token in [None, Some("")] {
            let result = build::<(), ()>(&config(token), Method::GET, "/me", None, None);
            match result {
                Err(Error::Configuration(msg)) => assert!(msg.contains("token")),
                other => panic!("Expected Configuration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_build_sets_required_headers() {
        let request =
            build::<(), ()>(&config(Some("secret")), Method::GET, "project/gh/a/b", None, None)
                .unwrap();

        assert_eq!(request.path, "/api/v2/project/gh/a/b");
        assert_eq!(request.headers[CONTENT_TYPE], "application/json");
        assert_eq!(request.headers[ACCEPT], "application/json");
        assert_eq!(request.headers[USER_AGENT], crate::config::USER_AGENT);
        assert_eq!(request.headers[TOKEN_HEADER], "secret");
        assert!(request.headers[TOKEN_HEADER].is_sensitive());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_build_merges_embedded_query_with_options() {
        let options = PageQuery {
            page_token: Some("next".to_string()),
            branch: None,
        };
        let request = build::<(), _>(
            &config(Some("secret")),
            Method::GET,
            "/context?owner-slug=gh/acme",
            None,
            Some(&options),
        )
        .unwrap();

        assert_eq!(request.path, "/api/v2/context");
        assert_eq!(
            request.query_params,
            vec![
                ("owner-slug".to_string(), "gh/acme".to_string()),
                ("page-token".to_string(), "next".to_string()),
            ]
        );

        let url = request.url(&Url::parse("https://circleci.com").unwrap());
        assert_eq!(
            url.as_str(),
            "https://circleci.com/api/v2/context?owner-slug=gh%2Facme&page-token=next"
        );
    }

    #[test]
    fn test_build_keeps_embedded_query_without_options() {
        let request = build::<(), ()>(
            &config(Some("secret")),
            Method::GET,
            "context?owner-slug=gh/acme",
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            request.query_params,
            vec![("owner-slug".to_string(), "gh/acme".to_string())]
        );
    }

    #[test]
    fn test_build_serializes_body() {
        let request = build::<_, ()>(
            &config(Some("secret")),
            Method::PUT,
            "/context/ctx1/environment-variable/KEY",
            Some(&json!({"value": "val"})),
            None,
        )
        .unwrap();
        assert_eq!(request.body.as_deref(), Some(br#"{"value":"val"}"#.as_slice()));
    }

    #[test]
    fn test_default_headers_do_not_override_token() {
        let mut config = config(Some("secret"));
        config
            .default_headers
            .insert(HeaderName::from_static(TOKEN_HEADER), HeaderValue::from_static("other"));
        config
            .default_headers
            .insert("x-trace", HeaderValue::from_static("abc"));

        let request = build::<(), ()>(&config, Method::DELETE, "/context/1", None, None).unwrap();
        assert_eq!(request.headers[TOKEN_HEADER], "secret");
        assert_eq!(request.headers["x-trace"], "abc");
    }
}
