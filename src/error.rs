//! Error types for CircleCI API calls.
//!
//! Every operation in this crate returns [`Result`]. Failures are values: the
//! client never retries and never panics on a bad response, it hands the
//! caller one of the variants below together with whatever the server sent.

use http::StatusCode;

/// The error type returned by every client operation.
///
/// # Examples
///
/// ```no_run
/// use circleci_client::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("my-token")?;
///
/// match client.projects().get("gh/acme/widgets").await {
///     Ok(project) => println!("Default branch: {}", project.vcs_info.default_branch),
///     Err(Error::Api { status, message, .. }) => {
///         eprintln!("CircleCI refused the call ({}): {}", status, message);
///     }
///     Err(Error::Decode { raw_response, serde_error, .. }) => {
///         eprintln!("Unexpected payload: {}", serde_error);
///         eprintln!("Raw response: {}", raw_response);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The client is not usable as configured.
    ///
    /// Raised before any request is sent, most notably when no API token was
    /// provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request body or query options could not be encoded.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// A network-level failure reported by the transport (connection refused,
    /// DNS failure, timeout, TLS error, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// CircleCI answered with a status of 300 or above, or the response body
    /// could not be read.
    ///
    /// `message` is taken from the `message` field of the error payload when
    /// it parses, and is a diagnostic note otherwise. It is empty when the
    /// server sent no body.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code
        status: StatusCode,
        /// Message extracted from the error payload
        message: String,
        /// The raw response body
        raw_response: String,
    },

    /// The server reported success but the body did not match the expected
    /// shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    Decode {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// An invalid base URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the HTTP status code if the server produced one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Decode { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the message extracted from an API error payload.
    pub fn message(&self) -> Option<&str> {
        match self {
            Error::Api { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api { raw_response, .. } => Some(raw_response),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` when CircleCI answered 404.
    ///
    /// # Examples
    ///
    /// ```
    /// use circleci_client::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::NOT_FOUND,
    ///     message: "Project not found".to_string(),
    ///     raw_response: r#"{"message":"Project not found"}"#.to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// assert_eq!(err.message(), Some("Project not found"));
    /// ```
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns `true` when the transport gave up because of its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Transport(e) if e.is_timeout())
    }
}

/// A specialized `Result` type for CircleCI API calls.
pub type Result<T> = std::result::Result<T, Error>;
