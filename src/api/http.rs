//! HTTP utilities for control-plane REST calls

use super::types::Reply;
use crate::warnings::Warnings;
use anyhow::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

/// Header the control plane uses to attach advisory warnings
pub const WARNINGS_HEADER: &str = "X-Cf-Warnings";

/// Header carrying a per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Vcap-Request-Id";

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Decode the comma-separated, URL-encoded warnings header
pub fn parse_warnings(headers: &HeaderMap) -> Warnings {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            urlencoding::decode(&raw.replace('+', " "))
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        })
        .collect()
}

/// Build a user-facing error from a non-2xx response body
///
/// The control plane reports failures as `{"code", "description", "error_code"}`;
/// the description is surfaced as-is.
fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    let description = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("description")
            .and_then(|d| d.as_str())
            .map(|d| d.to_string())
    });

    match description {
        Some(description) if !description.is_empty() => anyhow::anyhow!(description),
        _ => anyhow::anyhow!("API request failed: {}", status),
    }
}

/// HTTP client wrapper for control-plane API calls
#[derive(Clone)]
pub struct ApiHttpClient {
    client: Client,
}

impl ApiHttpClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("platctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    fn request(&self, method: Method, url: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(token)
            .header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string())
    }

    /// Make a GET request and parse the JSON body
    pub async fn get(&self, url: &str, token: &str) -> Reply<Value> {
        tracing::debug!("GET {}", url);
        self.execute(self.request(Method::GET, url, token)).await
    }

    /// Make a DELETE request
    ///
    /// Returns `Value::Null` for an empty body (synchronous deletion).
    pub async fn delete(&self, url: &str, token: &str) -> Reply<Value> {
        tracing::debug!("DELETE {}", url);
        self.execute(self.request(Method::DELETE, url, token)).await
    }

    async fn execute(&self, request: RequestBuilder) -> Reply<Value> {
        let response = match request.send().await.context("Failed to send request") {
            Ok(response) => response,
            Err(e) => return Reply::err(e, Warnings::new()),
        };

        let warnings = parse_warnings(response.headers());
        let result = Self::read_body(response).await;
        Reply { result, warnings }
    }

    async fn read_body(response: Response) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(api_error(status, &body));
        }

        if body.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).context("Failed to parse response JSON")
    }
}
