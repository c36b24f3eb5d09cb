//! Response decoding.
//!
//! Classifies the status of a [`RawResponse`], decodes success bodies into the
//! caller's type and turns failures into [`Error::Api`]. The [`Response`]
//! wrapper keeps the HTTP details next to the decoded value for callers that
//! want them.

use crate::{transport::RawResponse, types::Message, Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// A decoded response together with its HTTP details.
///
/// Returned by [`Client::call`](crate::Client::call). The typed resource
/// methods return the value alone.
///
/// # Examples
///
/// ```no_run
/// use circleci_client::{Client, Project};
/// use http::Method;
///
/// # async fn example() -> Result<(), circleci_client::Error> {
/// let client = Client::new("my-token")?;
///
/// let response = client
///     .call::<(), (), Project>(Method::GET, "/project/gh/acme/widgets", None, None)
///     .await?;
///
/// println!("Project: {}", response.data.name);
/// println!("Request took {:?}", response.latency);
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The deserialized response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Maps the response data to a different type, keeping the metadata.
    ///
    /// # Examples
    ///
    /// ```
    /// # use circleci_client::Response;
    /// # use http::{HeaderMap, StatusCode};
    /// # use std::time::Duration;
    /// let response = Response {
    ///     data: 42,
    ///     raw_body: "42".to_string(),
    ///     status: StatusCode::OK,
    ///     headers: HeaderMap::new(),
    ///     latency: Duration::from_millis(100),
    /// };
    ///
    /// let string_response = response.map(|n| n.to_string());
    /// assert_eq!(string_response.data, "42");
    /// ```
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
        }
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Discards the metadata.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// A response whose status was below 300 and whose body was read.
#[derive(Debug)]
pub(crate) struct Accepted {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    pub latency: Duration,
}

/// Checks the status and body of a raw response.
///
/// A failed body read is reported as [`Error::Api`] with the original status,
/// whatever that status was.
pub(crate) fn accept(raw: RawResponse) -> Result<Accepted> {
    let RawResponse {
        status,
        headers,
        body,
        latency,
    } = raw;

    tracing::info!(
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        "Received HTTP response"
    );

    let body = body.map_err(|e| Error::Api {
        status,
        message: format!("unable to read response body: {}", e),
        raw_response: String::new(),
    })?;

    if status.as_u16() >= 300 {
        let err = api_error(status, body);
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %err, "Server error (5xx)");
        } else {
            tracing::error!(status = status.as_u16(), error = %err, "Request rejected");
        }
        return Err(err);
    }

    Ok(Accepted {
        status,
        headers,
        body,
        latency,
    })
}

/// Builds the uniform error for a status of 300 or above.
pub(crate) fn api_error(status: StatusCode, raw_response: String) -> Error {
    let message = if raw_response.is_empty() {
        String::new()
    } else {
        match serde_json::from_str::<Option<Message>>(&raw_response) {
            Ok(parsed) => parsed.unwrap_or_default().message,
            Err(e) => format!("unable to parse API response: {}", e),
        }
    };

    Error::Api {
        status,
        message,
        raw_response,
    }
}

/// Deserializes an accepted body into `Res`.
pub(crate) fn decode<Res>(accepted: Accepted) -> Result<Response<Res>>
where
    Res: DeserializeOwned,
{
    match serde_json::from_str::<Res>(&accepted.body) {
        Ok(data) => Ok(Response {
            data,
            raw_body: accepted.body,
            status: accepted.status,
            headers: accepted.headers,
            latency: accepted.latency,
        }),
        Err(e) => {
            tracing::error!(
                error = %e,
                raw_response = %accepted.body,
                "Failed to deserialize response"
            );

            Err(Error::Decode {
                raw_response: accepted.body,
                serde_error: e.to_string(),
                status: accepted.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn accepted(status: u16, body: &str) -> Accepted {
        Accepted {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.to_string(),
            latency: Duration::from_millis(5),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_api_error_uses_payload_message() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"message":"Project not found"}"#.to_string(),
        );
        match err {
            Error::Api {
                status,
                message,
                raw_response,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Project not found");
                assert_eq!(raw_response, r#"{"message":"Project not found"}"#);
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_api_error_with_empty_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, String::new());
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.message(), Some(""));
    }

    #[test]
    fn test_api_error_with_unparseable_body() {
        let err = api_error(StatusCode::SERVICE_UNAVAILABLE, "<html>down</html>".to_string());
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(err
            .message()
            .unwrap()
            .starts_with("unable to parse API response:"));
        assert_eq!(err.raw_response(), Some("<html>down</html>"));
    }

    #[test]
    fn test_api_error_with_null_body() {
        let err = api_error(StatusCode::BAD_REQUEST, "null".to_string());
        assert_eq!(err.message(), Some(""));
        assert_eq!(err.raw_response(), Some("null"));
    }

    #[test]
    fn test_accept_reports_unreadable_body() {
        let read_error = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let raw = RawResponse {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Err(read_error),
            latency: Duration::from_millis(5),
        };

        match accept(raw) {
            Err(Error::Api {
                status,
                message,
                raw_response,
            }) => {
                assert_eq!(status, StatusCode::OK);
                assert!(message.starts_with("unable to read response body:"));
                assert!(raw_response.is_empty());
            }
            other => panic!("Expected Api error, got {:?}", other.map(|a| a.status)),
        }
    }

    #[test]
    fn test_api_error_without_message_field() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"type":"invalid","reason":"missing branch"}"#.to_string(),
        );
        assert_eq!(err.message(), Some(""));
    }

    #[test]
    fn test_decode_success() {
        let response = decode::<Named>(accepted(200, r#"{"name":"widgets","extra":1}"#)).unwrap();
        assert_eq!(response.data.name, "widgets");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.raw_body, r#"{"name":"widgets","extra":1}"#);
    }

    #[test]
    fn test_decode_mismatch() {
        match decode::<Named>(accepted(201, r#"{"id":3}"#)) {
            Err(Error::Decode {
                status,
                raw_response,
                serde_error,
            }) => {
                assert_eq!(status, StatusCode::CREATED);
                assert_eq!(raw_response, r#"{"id":3}"#);
                assert!(serde_error.contains("name"));
            }
            other => panic!("Expected Decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_response_deref() {
        let response = decode::<Named>(accepted(200, r#"{"name":"widgets"}"#)).unwrap();
        assert_eq!(response.name, "widgets");
        assert_eq!(response.into_data(), Named { name: "widgets".to_string() });
    }
}
