//! Configuration management.
//!
//! Settings load in three layers: built-in defaults, an optional TOML file,
//! then `LLMBENCH_*` environment overrides. Each subsystem reads its own
//! settings struct; nothing here is global state.

use crate::memory::ChunkPolicy;
use crate::{Error, Result, agent};
use serde::Deserialize;
use std::path::Path;

/// Main configuration for llmbench.
#[derive(Debug, Clone)]
pub struct LlmBenchConfig {
    /// Memory store settings.
    pub memory: MemorySettings,
    /// Agent runtime settings.
    pub agent: AgentSettings,
    /// Benchmark engine settings.
    pub bench: BenchSettings,
}

/// Memory store settings.
#[derive(Debug, Clone, Copy)]
pub struct MemorySettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Approximate inter-chunk overlap in characters.
    pub chunk_overlap: usize,
    /// Similarity floor (exclusive) below which search hits are dropped.
    pub min_similarity: f64,
    /// Result count used when a search does not specify one.
    pub default_top_k: usize,
}

/// Agent runtime settings.
#[derive(Debug, Clone, Copy)]
pub struct AgentSettings {
    /// Minimum description-match score (exclusive).
    pub description_match_threshold: f64,
    /// Most recent invocations kept in the log.
    pub invocation_log_cap: usize,
    /// Timeout for tools that don't configure one, in milliseconds.
    pub default_timeout_ms: u64,
}

/// Benchmark engine settings.
#[derive(Debug, Clone, Copy)]
pub struct BenchSettings {
    /// Entry capacity before oldest-first eviction.
    pub max_entries: usize,
}

impl Default for LlmBenchConfig {
    fn default() -> Self {
        Self {
            memory: MemorySettings {
                chunk_size: 500,
                chunk_overlap: 50,
                min_similarity: crate::memory::DEFAULT_MIN_SIMILARITY,
                default_top_k: crate::memory::DEFAULT_TOP_K,
            },
            agent: AgentSettings {
                description_match_threshold: 0.3,
                invocation_log_cap: 10,
                default_timeout_ms: 10_000,
            },
            bench: BenchSettings {
                max_entries: crate::bench::DEFAULT_MAX_ENTRIES,
            },
        }
    }
}

impl LlmBenchConfig {
    /// Loads configuration: defaults, then the file (if given), then env.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the file cannot be read or
    /// parsed. A missing `path` is not an error; env overrides still apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            let file = ConfigFile::read(path)?;
            config.apply_file(&file);
        }
        config.apply_env_overrides();
        Ok(config)
    }

    /// The chunk policy derived from memory settings.
    #[must_use]
    pub const fn chunk_policy(&self) -> ChunkPolicy {
        ChunkPolicy {
            chunk_size: self.memory.chunk_size,
            chunk_overlap: self.memory.chunk_overlap,
        }
    }

    /// The agent runtime settings in their runtime form.
    #[must_use]
    pub const fn agent_settings(&self) -> agent::AgentSettings {
        agent::AgentSettings {
            description_match_threshold: self.agent.description_match_threshold,
            invocation_log_cap: self.agent.invocation_log_cap,
            default_timeout_ms: self.agent.default_timeout_ms,
        }
    }

    fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(memory) = &file.memory {
            if let Some(v) = memory.chunk_size {
                self.memory.chunk_size = v;
            }
            if let Some(v) = memory.chunk_overlap {
                self.memory.chunk_overlap = v;
            }
            if let Some(v) = memory.min_similarity {
                self.memory.min_similarity = v;
            }
            if let Some(v) = memory.default_top_k {
                self.memory.default_top_k = v;
            }
        }
        if let Some(agent) = &file.agent {
            if let Some(v) = agent.description_match_threshold {
                self.agent.description_match_threshold = v;
            }
            if let Some(v) = agent.invocation_log_cap {
                self.agent.invocation_log_cap = v;
            }
            if let Some(v) = agent.default_timeout_ms {
                self.agent.default_timeout_ms = v;
            }
        }
        if let Some(bench) = &file.bench {
            if let Some(v) = bench.max_entries {
                self.bench.max_entries = v;
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = parse_usize_env("LLMBENCH_CHUNK_SIZE") {
            self.memory.chunk_size = v;
        }
        if let Some(v) = parse_usize_env("LLMBENCH_CHUNK_OVERLAP") {
            self.memory.chunk_overlap = v;
        }
        if let Some(v) = parse_f64_env("LLMBENCH_MIN_SIMILARITY") {
            self.memory.min_similarity = v;
        }
        if let Some(v) = parse_usize_env("LLMBENCH_DEFAULT_TOP_K") {
            self.memory.default_top_k = v;
        }
        if let Some(v) = parse_f64_env("LLMBENCH_MATCH_THRESHOLD") {
            self.agent.description_match_threshold = v;
        }
        if let Some(v) = parse_u64_env("LLMBENCH_TOOL_TIMEOUT_MS") {
            self.agent.default_timeout_ms = v;
        }
        if let Some(v) = parse_usize_env("LLMBENCH_MAX_METRIC_ENTRIES") {
            self.bench.max_entries = v;
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    memory: Option<MemoryFileSection>,
    agent: Option<AgentFileSection>,
    bench: Option<BenchFileSection>,
}

#[derive(Debug, Deserialize)]
struct MemoryFileSection {
    chunk_size: Option<usize>,
    chunk_overlap: Option<usize>,
    min_similarity: Option<f64>,
    default_top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct AgentFileSection {
    description_match_threshold: Option<f64>,
    invocation_log_cap: Option<usize>,
    default_timeout_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct BenchFileSection {
    max_entries: Option<usize>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        toml::from_str(&raw).map_err(|e| Error::OperationFailed {
            operation: "parse_config".to_string(),
            cause: e.to_string(),
        })
    }
}

fn parse_usize_env(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn parse_u64_env(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn parse_f64_env(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
