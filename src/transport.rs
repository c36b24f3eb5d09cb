//! The HTTP transport: one request out, raw status and body back.

use crate::{request::RequestDescriptor, Result};
use http::{HeaderMap, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

/// What came back from the wire, before any interpretation.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// The body text, or the error hit while reading it.
    pub body: std::result::Result<String, reqwest::Error>,
    pub latency: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http_client: reqwest::Client,
}

impl Transport {
    pub(crate) fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Sends `request` once. Connection failures surface as
    /// [`Error::Transport`](crate::Error::Transport); reading the body is
    /// left to the decoder.
    pub(crate) async fn perform(
        &self,
        base_url: &Url,
        request: RequestDescriptor,
    ) -> Result<RawResponse> {
        let url = request.url(base_url);

        tracing::debug!(
            method = %request.method,
            url = %url,
            "Executing HTTP request"
        );

        let start_time = Instant::now();
        let mut builder = self
            .http_client
            .request(request.method, url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await;

        Ok(RawResponse {
            status,
            headers,
            body,
            latency: start_time.elapsed(),
        })
    }
}
