//! # llmbench
//!
//! Core services for a local LLM testing workbench.
//!
//! llmbench provides the in-process building blocks behind a model testing
//! workbench: a chunk-based document memory with similarity retrieval, an
//! intent-and-tool matcher that routes user messages to registered tools or
//! RAG-enriched generation, and a benchmark metrics engine that aggregates
//! timing and outcome observations from both.
//!
//! ## Components
//!
//! - [`MemoryStore`] — document ingestion, overlapping text chunking, and
//!   cosine-similarity retrieval over token-frequency vectors
//! - [`AgentRuntime`] — per-message tool matching (name, description, intent
//!   strategies) and HTTP tool invocation with per-tool timeouts
//! - [`BenchmarkEngine`] — bounded append-only observation log with rolling
//!   statistics, summaries, time series, and JSON/CSV export
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use llmbench::{BenchmarkEngine, MemoryStore};
//!
//! let metrics = Arc::new(BenchmarkEngine::default());
//! let store = MemoryStore::new(metrics);
//! let info = store.add_document("notes", "The quick brown fox jumps over the lazy dog")?;
//! assert_eq!(info.chunk_count, 1);
//!
//! let hits = store.search_similar("quick fox", 3)?;
//! assert_eq!(hits[0].document_name, "notes");
//! # Ok::<(), llmbench::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod agent;
pub mod bench;
pub mod cli;
pub mod config;
pub mod memory;
pub mod models;
pub mod observability;

// Re-exports for convenience
pub use agent::{AgentRuntime, HttpCapability, ProcessOutcome, ReqwestCapability, augment_prompt};
pub use bench::{BenchmarkEngine, MetricsSink, NoopSink};
pub use config::LlmBenchConfig;
pub use memory::MemoryStore;
pub use models::{
    Chunk, Document, DocumentId, DocumentInfo, HttpMethod, MatchResult, MatchStrategy, MemoryStats,
    MetricEntry, MetricStats, SearchHit, ToolDescriptor,
};

/// Error type for llmbench operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Empty required fields (document name/text, tool endpoint) |
/// | `NotFound` | Unknown document id on delete, unknown tool name on direct invoke |
/// | `ToolInvocation` | Transport failure or timeout during an HTTP tool call |
/// | `OperationFailed` | I/O errors, serialization failures, config file problems |
///
/// Note that a non-2xx HTTP status from a matched tool is *not* an error: the
/// matcher formats it as a labeled error block in the result content. Only
/// transport-level failures and timeouts raise `ToolInvocation`.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Document name or text is empty on ingest
    /// - A tool descriptor has an empty endpoint at invocation time
    /// - An ingest request names no document at all
    ///
    /// Metric recording never raises this: the sink accepts any
    /// category/name so instrumentation can't fail a caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced record does not exist.
    ///
    /// Raised when:
    /// - `delete_document` is called with an unknown document id
    /// - A tool is invoked by name but no descriptor with that name was supplied
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up (e.g. "document", "tool").
        kind: &'static str,
        /// The id or name that failed to resolve.
        id: String,
    },

    /// A tool invocation failed at the transport level.
    ///
    /// Carries the tool name and the elapsed time so callers can surface a
    /// useful chat error and still report timing to the metrics engine.
    /// `kind` distinguishes a timeout from other transport failures.
    #[error("tool '{tool}' invocation failed after {elapsed_ms}ms ({kind}): {cause}")]
    ToolInvocation {
        /// Name of the tool that was being invoked.
        tool: String,
        /// Elapsed time before the failure, in milliseconds.
        elapsed_ms: u64,
        /// Whether the failure was a timeout or another transport error.
        kind: ToolErrorKind,
        /// The underlying cause.
        cause: String,
    },

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur (config or tool-file loading)
    /// - JSON/CSV serialization fails during export
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Classification of a tool invocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// The tool did not respond within its configured timeout.
    Timeout,
    /// The request failed below HTTP (connection refused, DNS, TLS, ...).
    Transport,
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
        }
    }
}

/// Result type alias for llmbench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in milliseconds.
///
/// Centralized so every subsystem stamps records the same way. Uses
/// `SystemTime::now()` with fallback to 0 if the system clock is before the
/// Unix epoch.
///
/// # Examples
///
/// ```rust
/// use llmbench::current_timestamp_ms;
///
/// let ts = current_timestamp_ms();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
