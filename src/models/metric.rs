//! Metric entry and aggregate types for the benchmark engine.

use serde::{Deserialize, Serialize};

/// A single recorded observation.
///
/// Append-only: entries are never mutated after insert, only evicted
/// oldest-first when the engine exceeds its capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
    /// Unique entry id.
    pub id: String,
    /// Record timestamp (Unix epoch milliseconds).
    pub timestamp: u64,
    /// Category, e.g. `"chat"`, `"rag"`, `"tool"`, `"system"`.
    pub category: String,
    /// Metric name within the category, e.g. `"latency_ms"`.
    pub name: String,
    /// The observed value.
    pub value: f64,
    /// Free-form metadata object attached by the caller.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// Direction of a computed trend, derived from its sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Second half of the window averaged higher than the first.
    Up,
    /// Second half averaged lower.
    Down,
    /// Not enough samples, or no change.
    Flat,
}

/// Rolling statistics over a filtered metric series.
///
/// `trend` is the percentage change between the mean of the first half and
/// the mean of the second half of the time-ordered series, and is 0.0 by
/// definition when fewer than 10 samples are present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricStats {
    /// Number of samples in the window.
    pub count: usize,
    /// Arithmetic mean, 0.0 when empty.
    pub average: f64,
    /// Minimum value, 0.0 when empty.
    pub min: f64,
    /// Maximum value, 0.0 when empty.
    pub max: f64,
    /// Most recently recorded value, 0.0 when empty.
    pub latest: f64,
    /// Median value, 0.0 when empty.
    pub median: f64,
    /// First-half vs second-half percentage change; see type docs.
    pub trend: f64,
}

impl MetricStats {
    /// An all-zero statistics record, returned for empty series.
    pub const EMPTY: Self = Self {
        count: 0,
        average: 0.0,
        min: 0.0,
        max: 0.0,
        latest: 0.0,
        median: 0.0,
        trend: 0.0,
    };

    /// Classifies the trend by sign.
    #[must_use]
    pub fn trend_direction(&self) -> TrendDirection {
        if self.trend > 0.0 {
            TrendDirection::Up
        } else if self.trend < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

impl Default for MetricStats {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One point of a charted time series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimePoint {
    /// Timestamp (Unix epoch milliseconds).
    pub time: u64,
    /// Observed value.
    pub value: f64,
}

/// Capacity bookkeeping for the entry log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StorageInfo {
    /// Entries currently held.
    pub entry_count: usize,
    /// Approximate serialized size of the entry log in bytes.
    pub estimated_size_bytes: usize,
    /// Capacity before oldest-first eviction kicks in.
    pub max_entries: usize,
}

/// Per-category statistics for the well-known workbench metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    /// Chat pipeline: `latency_ms`, `tokens_per_second`.
    pub chat: std::collections::BTreeMap<String, MetricStats>,
    /// Retrieval: `retrieval_time_ms`, `chunks_retrieved`.
    pub rag: std::collections::BTreeMap<String, MetricStats>,
    /// Tool invocation: `execution_time_ms`, `success`.
    pub tool: std::collections::BTreeMap<String, MetricStats>,
    /// Host resources: `cpu_usage`, `memory_usage`.
    pub system: std::collections::BTreeMap<String, MetricStats>,
}
