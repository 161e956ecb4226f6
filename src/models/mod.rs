//! Data models for llmbench.
//!
//! This module contains the core data structures shared across the memory
//! store, the agent runtime, and the benchmark engine.

mod document;
mod metric;
mod tool;

pub use document::{Chunk, Document, DocumentId, DocumentInfo, MemoryStats, SearchHit};
pub use metric::{
    MetricEntry, MetricStats, StorageInfo, SummaryReport, TimePoint, TrendDirection,
};
pub use tool::{HttpMethod, MatchResult, MatchStrategy, ToolDescriptor, ToolSource,
    parse_config_json_or_empty};
