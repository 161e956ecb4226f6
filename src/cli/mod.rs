//! CLI command implementations.
//!
//! Each submodule implements one command against a [`Workbench`] session:
//! the explicitly composed trio of memory store, agent runtime, and
//! benchmark engine. Commands return their output as strings; the binary
//! decides how to print them.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ingest` | Add documents from files or inline text |
//! | `search` | Similarity search over ingested documents |
//! | `ask` | Full matcher pipeline: retrieval, tool match, invocation |
//! | `status` | Store statistics and metrics storage info |
//! | `export` | Dump recorded metrics as JSON or CSV |
//! | `clear` | Drop stored documents and/or recorded metrics |

mod ask;
mod clear;
mod export;
mod ingest;
mod search;
mod status;

pub use ask::cmd_ask;
pub use clear::{ClearTarget, cmd_clear};
pub use export::{ExportFormat, cmd_export};
pub use ingest::cmd_ingest;
pub use search::cmd_search;
pub use status::cmd_status;

use crate::agent::{AgentRuntime, ReqwestCapability};
use crate::bench::BenchmarkEngine;
use crate::config::LlmBenchConfig;
use crate::memory::MemoryStore;
use crate::models::{DocumentInfo, ToolDescriptor};
use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// One CLI session: the three core services wired together.
///
/// Construction is the composition root — services are created once and
/// passed by handle, no module-level singletons.
pub struct Workbench {
    /// Document memory.
    pub memory: Arc<MemoryStore>,
    /// Metrics engine, also injected into the other two as their sink.
    pub metrics: Arc<BenchmarkEngine>,
    /// Tool router.
    pub agent: AgentRuntime,
    /// Result count used when a search does not specify one.
    pub default_top_k: usize,
}

impl Workbench {
    /// Builds a session from configuration.
    #[must_use]
    pub fn new(config: &LlmBenchConfig) -> Self {
        let metrics = Arc::new(BenchmarkEngine::with_capacity(config.bench.max_entries));
        let memory = Arc::new(MemoryStore::with_retrieval(
            config.chunk_policy(),
            config.memory.min_similarity,
            metrics.clone(),
        ));
        let agent = AgentRuntime::with_settings(
            memory.clone(),
            metrics.clone(),
            Arc::new(ReqwestCapability::new()),
            config.agent_settings(),
        );
        Self {
            memory,
            metrics,
            agent,
            default_top_k: config.memory.default_top_k,
        }
    }

    /// Ingests documents from files, named after their file stems.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if a file cannot be read, or the
    /// store's validation errors for empty content.
    pub fn ingest_files(&self, paths: &[std::path::PathBuf]) -> Result<Vec<DocumentInfo>> {
        let mut infos = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
                operation: "read_document".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;
            let name = path
                .file_stem()
                .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());
            infos.push(self.memory.add_document(&name, &text)?);
        }
        Ok(infos)
    }
}

/// Loads tool descriptors from a JSON file (an array of descriptors).
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the file cannot be read or parsed.
/// Unlike per-tool header/variable JSON, the tool list itself must be valid.
pub fn load_tools(path: &Path) -> Result<Vec<ToolDescriptor>> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
        operation: "read_tools".to_string(),
        cause: format!("{}: {e}", path.display()),
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::OperationFailed {
        operation: "parse_tools".to_string(),
        cause: e.to_string(),
    })
}
