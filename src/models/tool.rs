//! Tool descriptors and match results for the agent runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP method for a tool endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET (the default when unspecified).
    #[default]
    Get,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
}

impl HttpMethod {
    /// Parses a method string, defaulting to GET for unknown values.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            _ => Self::Get,
        }
    }

    /// Whether requests with this method carry a JSON body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        !matches!(self, Self::Get | Self::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        write!(f, "{s}")
    }
}

/// Where a tool descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolSource {
    /// Configured manually by the user.
    #[default]
    Manual,
    /// Discovered from an MCP server listing.
    Mcp,
}

/// A registered tool, supplied by the caller per match call.
///
/// The runtime consumes descriptors read-only and never mutates them. The
/// `headers` and `variables` fields hold raw JSON as configured; both are
/// parsed with [`parse_config_json_or_empty`], so malformed JSON degrades to
/// an empty object instead of failing the call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name, used for name-strategy matching.
    pub name: String,
    /// Free-text description, used for keyword-strategy matching.
    #[serde(default)]
    pub description: String,
    /// Endpoint URL.
    pub endpoint: String,
    /// HTTP method, defaults to GET.
    #[serde(default)]
    pub method: HttpMethod,
    /// Raw JSON object of request headers, if configured.
    #[serde(default)]
    pub headers: Option<String>,
    /// Raw JSON object describing the request body variables, if configured.
    #[serde(default)]
    pub variables: Option<String>,
    /// Request timeout in milliseconds; `None` uses the runtime default.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Inactive tools are skipped by every match strategy.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Where the descriptor came from.
    #[serde(default)]
    pub source: ToolSource,
}

const fn default_active() -> bool {
    true
}

/// The strategy that selected a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// The input contained the tool's name (case-insensitive substring).
    Name,
    /// Description keywords overlapped the input above the score threshold.
    Description,
    /// A classified intent mapped onto the tool's name or description.
    Intent,
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Intent => "intent",
        };
        write!(f, "{s}")
    }
}

/// Outcome of a tool match attempt. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// The selected tool.
    pub tool: ToolDescriptor,
    /// Which strategy selected it.
    pub strategy: MatchStrategy,
    /// Keyword match score, only populated for the description strategy.
    pub score: Option<f64>,
}

/// Parses a configured JSON object, falling back to an empty object.
///
/// Tools carry user-entered JSON for headers and body variables. Malformed
/// JSON there is tolerated by policy: the value degrades to `{}` and the
/// invocation proceeds. This leniency applies only to tool configuration
/// fields, not to user input validated elsewhere.
#[must_use]
pub fn parse_config_json_or_empty(raw: Option<&str>) -> serde_json::Map<String, serde_json::Value> {
    let Some(raw) = raw else {
        return serde_json::Map::new();
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            tracing::debug!(raw, "tool config JSON invalid, using empty object");
            serde_json::Map::new()
        }
    }
}
