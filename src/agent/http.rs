//! HTTP capability for tool invocation.
//!
//! The runtime talks to tool endpoints through the [`HttpCapability`] trait
//! so tests can substitute a mock transport. [`ReqwestCapability`] is the
//! production implementation, built on the blocking reqwest client with a
//! per-request timeout taken from the tool descriptor.

use crate::models::HttpMethod;
use crate::ToolErrorKind;
use std::collections::BTreeMap;
use std::time::Duration;

/// A prepared tool request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Endpoint URL.
    pub endpoint: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// JSON body for methods that carry one.
    pub body: Option<serde_json::Value>,
    /// Request timeout.
    pub timeout: Duration,
}

/// A tool response, transport-level success only.
///
/// Non-2xx statuses arrive here as ordinary responses; classifying them is
/// the caller's concern.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// A transport-level failure: the request never produced an HTTP response.
#[derive(Debug, Clone)]
pub struct TransportFailure {
    /// Timeout vs other transport error.
    pub kind: ToolErrorKind,
    /// Human-readable cause.
    pub cause: String,
}

/// Outbound HTTP seam for tool invocation.
pub trait HttpCapability: Send + Sync {
    /// Executes a request, returning the response or a transport failure.
    ///
    /// # Errors
    ///
    /// Returns [`TransportFailure`] on timeout or connection-level failure.
    /// A non-2xx status is *not* a failure at this layer.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure>;
}

/// Production HTTP capability backed by blocking reqwest.
pub struct ReqwestCapability {
    client: reqwest::blocking::Client,
}

impl ReqwestCapability {
    /// Creates the capability with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpCapability for ReqwestCapability {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportFailure> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.endpoint)
            .timeout(request.timeout);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(|e| {
            let kind = if e.is_timeout() {
                ToolErrorKind::Timeout
            } else {
                ToolErrorKind::Transport
            };
            tracing::warn!(
                endpoint = %request.endpoint,
                error = %e,
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                "tool request failed"
            );
            TransportFailure {
                kind,
                cause: e.to_string(),
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportFailure {
            kind: if e.is_timeout() {
                ToolErrorKind::Timeout
            } else {
                ToolErrorKind::Transport
            },
            cause: e.to_string(),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Formats a tool response as labeled chat content.
///
/// 2xx responses become a result block, pretty-printed when the body parses
/// as JSON. Non-2xx responses become an error block carrying the status and
/// raw body; HTTP-level failure is reported in content, not as an exception.
#[must_use]
pub fn format_tool_output(tool_name: &str, response: &HttpResponse) -> String {
    if response.is_success() {
        match serde_json::from_str::<serde_json::Value>(&response.body) {
            Ok(value) => {
                let pretty =
                    serde_json::to_string_pretty(&value).unwrap_or_else(|_| response.body.clone());
                format!("**{tool_name}** result:\n```json\n{pretty}\n```")
            }
            Err(_) => format!("**{tool_name}** result:\n```text\n{}\n```", response.body),
        }
    } else {
        format!(
            "**{tool_name}** error (HTTP {}):\n```\n{}\n```",
            response.status, response.body
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse { status: 200, body: String::new() }.is_success());
        assert!(HttpResponse { status: 204, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 199, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 404, body: String::new() }.is_success());
        assert!(!HttpResponse { status: 500, body: String::new() }.is_success());
    }

    #[test]
    fn test_format_json_body_pretty_printed() {
        let response = HttpResponse {
            status: 200,
            body: r#"{"temp":21}"#.to_string(),
        };
        let out = format_tool_output("weather", &response);
        assert!(out.starts_with("**weather** result:"));
        assert!(out.contains("```json"));
        assert!(out.contains("\"temp\": 21"));
    }

    #[test]
    fn test_format_plain_body_kept_raw() {
        let response = HttpResponse {
            status: 200,
            body: "plain text answer".to_string(),
        };
        let out = format_tool_output("echo", &response);
        assert!(out.contains("```text"));
        assert!(out.contains("plain text answer"));
    }

    #[test]
    fn test_format_non_2xx_is_labeled_error_block() {
        let response = HttpResponse {
            status: 503,
            body: "service unavailable".to_string(),
        };
        let out = format_tool_output("weather", &response);
        assert!(out.contains("error (HTTP 503)"));
        assert!(out.contains("service unavailable"));
    }
}
