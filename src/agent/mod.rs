//! Agent runtime: per-message tool routing.
//!
//! For every user message the runtime retrieves context from the memory
//! store, attempts a tool match (name, description, intent — in that order),
//! and either invokes the matched tool over HTTP or hands back the retrieved
//! context for free-text generation. Tool timing and outcomes are reported
//! to the metrics sink whether or not the call succeeds.
//!
//! The runtime is stateless across calls except for a bounded invocation log
//! holding the most recent entries.

pub mod http;
pub mod intent;
pub mod matcher;

pub use http::{
    HttpCapability, HttpRequest, HttpResponse, ReqwestCapability, TransportFailure,
    format_tool_output,
};
pub use matcher::match_tool;

use crate::bench::{self, MetricsSink};
use crate::memory::{DEFAULT_TOP_K, MemoryStore};
use crate::models::{
    MatchResult, MatchStrategy, SearchHit, ToolDescriptor, parse_config_json_or_empty,
};
use crate::{Error, Result, current_timestamp_ms};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Runtime tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    /// Minimum description-match score (exclusive).
    pub description_match_threshold: f64,
    /// Most recent invocations kept in the log.
    pub invocation_log_cap: usize,
    /// Timeout applied when a tool doesn't configure one.
    pub default_timeout_ms: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            description_match_threshold: 0.3,
            invocation_log_cap: 10,
            default_timeout_ms: 10_000,
        }
    }
}

/// Outcome of processing one user message.
#[derive(Debug, Clone)]
pub enum ProcessOutcome {
    /// A tool was matched and invoked; `content` is the formatted response
    /// block (including HTTP-level failures, which are content, not errors).
    ToolResult {
        /// Name of the invoked tool.
        tool: String,
        /// Strategy that selected it.
        strategy: MatchStrategy,
        /// Formatted result or error block.
        content: String,
        /// Invocation wall time in milliseconds.
        elapsed_ms: u64,
        /// Context retrieved before matching.
        context: Vec<SearchHit>,
    },
    /// No tool matched; the caller should generate a free-text response,
    /// optionally augmented with the retrieved context.
    Generate {
        /// Context retrieved from the memory store, possibly empty.
        context: Vec<SearchHit>,
    },
}

impl ProcessOutcome {
    /// Whether a tool produced this outcome.
    #[must_use]
    pub const fn from_tool(&self) -> bool {
        matches!(self, Self::ToolResult { .. })
    }

    /// Whether retrieved context is available to enrich generation.
    #[must_use]
    pub const fn from_rag(&self) -> bool {
        match self {
            Self::ToolResult { context, .. } | Self::Generate { context } => !context.is_empty(),
        }
    }

    /// The retrieved context snippets.
    #[must_use]
    pub fn context(&self) -> &[SearchHit] {
        match self {
            Self::ToolResult { context, .. } | Self::Generate { context } => context,
        }
    }
}

/// One entry of the bounded invocation log.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationRecord {
    /// Invocation timestamp (Unix epoch milliseconds).
    pub timestamp: u64,
    /// Tool name.
    pub tool: String,
    /// Strategy that matched the tool.
    pub strategy: MatchStrategy,
    /// Whether the call reached the endpoint and got a response.
    pub success: bool,
    /// Wall time in milliseconds.
    pub elapsed_ms: u64,
    /// Failure cause, when `success` is false.
    pub error: Option<String>,
}

/// Per-message tool router.
///
/// Holds references to its collaborators rather than owning them: the memory
/// store, metrics sink, and HTTP capability are injected so sessions compose
/// them explicitly and tests can isolate each seam.
pub struct AgentRuntime {
    memory: Arc<MemoryStore>,
    metrics: Arc<dyn MetricsSink>,
    transport: Arc<dyn HttpCapability>,
    settings: AgentSettings,
    log: Mutex<VecDeque<InvocationRecord>>,
}

impl AgentRuntime {
    /// Creates a runtime with default settings.
    #[must_use]
    pub fn new(
        memory: Arc<MemoryStore>,
        metrics: Arc<dyn MetricsSink>,
        transport: Arc<dyn HttpCapability>,
    ) -> Self {
        Self::with_settings(memory, metrics, transport, AgentSettings::default())
    }

    /// Creates a runtime with explicit settings.
    #[must_use]
    pub fn with_settings(
        memory: Arc<MemoryStore>,
        metrics: Arc<dyn MetricsSink>,
        transport: Arc<dyn HttpCapability>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            memory,
            metrics,
            transport,
            settings,
            log: Mutex::new(VecDeque::new()),
        }
    }

    /// Processes one user message against the supplied tool list.
    ///
    /// Context retrieval is always attempted first, regardless of whether a
    /// tool subsequently matches. With zero tools supplied this never
    /// selects a tool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolInvocation`] if a matched tool fails at the
    /// transport level (timeout or connection failure). Non-2xx responses
    /// are returned as content, not errors.
    pub fn process(&self, input: &str, tools: &[ToolDescriptor]) -> Result<ProcessOutcome> {
        let context = self.memory.search_similar(input, DEFAULT_TOP_K)?;

        let Some(matched) = matcher::match_tool(
            input,
            tools,
            self.settings.description_match_threshold,
        ) else {
            tracing::debug!(context_hits = context.len(), "no tool matched, falling through");
            return Ok(ProcessOutcome::Generate { context });
        };

        tracing::debug!(
            tool = %matched.tool.name,
            strategy = %matched.strategy,
            score = ?matched.score,
            "tool matched"
        );

        let (content, elapsed_ms) = self.invoke(&matched)?;
        Ok(ProcessOutcome::ToolResult {
            tool: matched.tool.name,
            strategy: matched.strategy,
            content,
            elapsed_ms,
            context,
        })
    }

    /// Invokes a tool by exact name, bypassing matching.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no active tool has the given name, or
    /// [`Error::ToolInvocation`] on transport failure.
    pub fn invoke_by_name(&self, name: &str, tools: &[ToolDescriptor]) -> Result<String> {
        let tool = tools
            .iter()
            .find(|t| t.active && t.name == name)
            .ok_or_else(|| Error::NotFound {
                kind: "tool",
                id: name.to_string(),
            })?;
        let matched = MatchResult {
            tool: tool.clone(),
            strategy: MatchStrategy::Name,
            score: None,
        };
        self.invoke(&matched).map(|(content, _)| content)
    }

    /// The most recent invocations, oldest first.
    #[must_use]
    pub fn invocation_log(&self) -> Vec<InvocationRecord> {
        self.lock_log().iter().cloned().collect()
    }

    /// Executes a matched tool and formats its response.
    ///
    /// Reports `tool/execution_time_ms` and `tool/success` to the metrics
    /// sink on every path, including failures.
    fn invoke(&self, matched: &MatchResult) -> Result<(String, u64)> {
        let tool = &matched.tool;
        if tool.endpoint.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "tool '{}' has an empty endpoint",
                tool.name
            )));
        }

        let request = build_request(tool, self.settings.default_timeout_ms);
        let started = Instant::now();
        let outcome = self.transport.execute(&request);
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let success = outcome.is_ok();
        #[allow(clippy::cast_precision_loss)]
        {
            self.metrics.record(
                bench::CATEGORY_TOOL,
                bench::TOOL_EXECUTION_TIME_MS,
                elapsed_ms as f64,
                serde_json::json!({ "tool": tool.name, "strategy": matched.strategy.to_string() }),
            );
            self.metrics.record(
                bench::CATEGORY_TOOL,
                bench::TOOL_SUCCESS,
                if success { 1.0 } else { 0.0 },
                serde_json::json!({ "tool": tool.name }),
            );
        }

        self.push_log(InvocationRecord {
            timestamp: current_timestamp_ms(),
            tool: tool.name.clone(),
            strategy: matched.strategy,
            success,
            elapsed_ms,
            error: outcome.as_ref().err().map(|f| f.cause.clone()),
        });

        match outcome {
            Ok(response) => Ok((format_tool_output(&tool.name, &response), elapsed_ms)),
            Err(failure) => Err(Error::ToolInvocation {
                tool: tool.name.clone(),
                elapsed_ms,
                kind: failure.kind,
                cause: failure.cause,
            }),
        }
    }

    fn push_log(&self, record: InvocationRecord) {
        let mut log = self.lock_log();
        log.push_back(record);
        while log.len() > self.settings.invocation_log_cap {
            log.pop_front();
        }
    }

    fn lock_log(&self) -> std::sync::MutexGuard<'_, VecDeque<InvocationRecord>> {
        self.log
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Builds the HTTP request for a tool descriptor.
///
/// Headers and body variables come from the tool's configured JSON, parsed
/// leniently. A variable declared as `{"default": ...}` contributes its
/// default value; anything else is sent as-is. GET and DELETE carry no body.
fn build_request(tool: &ToolDescriptor, default_timeout_ms: u64) -> HttpRequest {
    let headers: BTreeMap<String, String> = parse_config_json_or_empty(tool.headers.as_deref())
        .into_iter()
        .map(|(key, value)| {
            let rendered = value
                .as_str()
                .map_or_else(|| value.to_string(), ToString::to_string);
            (key, rendered)
        })
        .collect();

    let body = if tool.method.has_body() {
        let variables = parse_config_json_or_empty(tool.variables.as_deref());
        let resolved: serde_json::Map<String, serde_json::Value> = variables
            .into_iter()
            .map(|(key, value)| {
                let resolved = value
                    .as_object()
                    .and_then(|obj| obj.get("default").cloned())
                    .unwrap_or(value);
                (key, resolved)
            })
            .collect();
        Some(serde_json::Value::Object(resolved))
    } else {
        None
    };

    HttpRequest {
        endpoint: tool.endpoint.clone(),
        method: tool.method,
        headers,
        body,
        timeout: Duration::from_millis(tool.timeout_ms.unwrap_or(default_timeout_ms)),
    }
}

/// Prepends retrieved context snippets to a generation prompt.
///
/// Each snippet is labeled with its source document name; the user's
/// original query follows unchanged. With no context the query is returned
/// as-is.
#[must_use]
pub fn augment_prompt(query: &str, context: &[SearchHit]) -> String {
    if context.is_empty() {
        return query.to_string();
    }
    let mut prompt = String::from("Use the following context to answer:\n\n");
    for hit in context {
        prompt.push_str(&format!("[{}] {}\n", hit.document_name, hit.text));
    }
    prompt.push('\n');
    prompt.push_str(query);
    prompt
}
