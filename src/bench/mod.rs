//! Benchmark metrics engine.
//!
//! A bounded, append-only observation log with rolling statistics. The
//! engine performs no I/O of its own; it is pure bookkeeping and arithmetic,
//! which is what makes it safe to inject everywhere as the workbench's
//! metrics sink.

pub mod export;

use crate::models::{MetricEntry, MetricStats, StorageInfo, SummaryReport, TimePoint};
use crate::current_timestamp_ms;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Default capacity before oldest-first eviction.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Category for chat pipeline observations.
pub const CATEGORY_CHAT: &str = "chat";
/// Category for retrieval observations.
pub const CATEGORY_RAG: &str = "rag";
/// Category for tool invocation observations.
pub const CATEGORY_TOOL: &str = "tool";
/// Category for host resource observations.
pub const CATEGORY_SYSTEM: &str = "system";

/// Chat end-to-end latency in milliseconds.
pub const CHAT_LATENCY_MS: &str = "latency_ms";
/// Chat generation throughput.
pub const CHAT_TOKENS_PER_SECOND: &str = "tokens_per_second";
/// Similarity search wall time in milliseconds.
pub const RAG_RETRIEVAL_TIME_MS: &str = "retrieval_time_ms";
/// Number of chunks returned by a search.
pub const RAG_CHUNKS_RETRIEVED: &str = "chunks_retrieved";
/// Tool call wall time in milliseconds.
pub const TOOL_EXECUTION_TIME_MS: &str = "execution_time_ms";
/// Tool call outcome (1.0 success, 0.0 failure).
pub const TOOL_SUCCESS: &str = "success";
/// Host CPU utilization percentage.
pub const SYSTEM_CPU_USAGE: &str = "cpu_usage";
/// Host memory utilization percentage.
pub const SYSTEM_MEMORY_USAGE: &str = "memory_usage";

/// Minimum samples before a trend is computed; below this `trend` is 0.0.
const TREND_MIN_SAMPLES: usize = 10;

/// Sink for timing and outcome observations.
///
/// The memory store and agent runtime report through this trait rather than
/// holding the engine directly, so tests can swap in [`NoopSink`] without
/// touching core logic.
pub trait MetricsSink: Send + Sync {
    /// Records one observation.
    fn record(&self, category: &str, name: &str, value: f64, metadata: serde_json::Value);
}

/// A sink that discards every observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _category: &str, _name: &str, _value: f64, _metadata: serde_json::Value) {}
}

/// Bounded in-memory metrics engine.
///
/// Entries are appended in arrival order and evicted oldest-first once the
/// log exceeds `max_entries`; the bound protects memory, not accuracy — old
/// data is silently lost. Interior mutability keeps `record` callable
/// through a shared reference from concurrent callers.
pub struct BenchmarkEngine {
    entries: Mutex<VecDeque<MetricEntry>>,
    max_entries: usize,
}

impl BenchmarkEngine {
    /// Creates an engine with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Creates an engine with an explicit capacity.
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Appends an observation, evicting the oldest entries past capacity.
    pub fn record_entry(
        &self,
        category: &str,
        name: &str,
        value: f64,
        metadata: serde_json::Value,
    ) {
        let entry = MetricEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: current_timestamp_ms(),
            category: category.to_string(),
            name: name.to_string(),
            value,
            metadata,
        };
        let mut entries = self.lock();
        entries.push_back(entry);
        while entries.len() > self.max_entries {
            entries.pop_front();
        }
    }

    /// Returns entries matching the filter, in insertion order.
    ///
    /// Category matching is case-insensitive exact; `name` narrows to one
    /// metric; `since` keeps only the trailing time window.
    #[must_use]
    pub fn query(
        &self,
        category: &str,
        name: Option<&str>,
        since: Option<Duration>,
    ) -> Vec<MetricEntry> {
        let cutoff = since.map(window_cutoff);
        self.lock()
            .iter()
            .filter(|entry| entry.category.eq_ignore_ascii_case(category))
            .filter(|entry| name.is_none_or(|n| entry.name == n))
            .filter(|entry| cutoff.is_none_or(|c| entry.timestamp >= c))
            .cloned()
            .collect()
    }

    /// Computes rolling statistics for one metric.
    ///
    /// A series with zero samples yields [`MetricStats::EMPTY`], never an
    /// error. The trend compares first-half and second-half means of the
    /// time-ordered series as a percentage change, and is only computed once
    /// at least 10 samples are present.
    #[must_use]
    pub fn statistics(&self, category: &str, name: &str, since: Option<Duration>) -> MetricStats {
        let mut entries = self.query(category, Some(name), since);
        if entries.is_empty() {
            return MetricStats::EMPTY;
        }
        entries.sort_by_key(|e| e.timestamp);

        let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
        let count = values.len();
        #[allow(clippy::cast_precision_loss)]
        let average = values.iter().sum::<f64>() / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let latest = values[count - 1];

        MetricStats {
            count,
            average,
            min,
            max,
            latest,
            median: median(&values),
            trend: trend_percent(&values),
        }
    }

    /// Per-category statistics for the well-known workbench metrics.
    #[must_use]
    pub fn summary(&self, window: Duration) -> SummaryReport {
        let pairs: [(&str, &[&str]); 4] = [
            (CATEGORY_CHAT, &[CHAT_LATENCY_MS, CHAT_TOKENS_PER_SECOND]),
            (CATEGORY_RAG, &[RAG_RETRIEVAL_TIME_MS, RAG_CHUNKS_RETRIEVED]),
            (CATEGORY_TOOL, &[TOOL_EXECUTION_TIME_MS, TOOL_SUCCESS]),
            (CATEGORY_SYSTEM, &[SYSTEM_CPU_USAGE, SYSTEM_MEMORY_USAGE]),
        ];

        let mut report = SummaryReport::default();
        for (category, names) in pairs {
            for name in names {
                let stats = self.statistics(category, name, Some(window));
                let slot = match category {
                    CATEGORY_CHAT => &mut report.chat,
                    CATEGORY_RAG => &mut report.rag,
                    CATEGORY_TOOL => &mut report.tool,
                    _ => &mut report.system,
                };
                slot.insert((*name).to_string(), stats);
            }
        }
        report
    }

    /// Time-ordered `(time, value)` points for charting one metric.
    ///
    /// Sorted ascending by timestamp; stable for equal timestamps.
    #[must_use]
    pub fn time_series(&self, category: &str, name: &str, window: Duration) -> Vec<TimePoint> {
        let mut entries = self.query(category, Some(name), Some(window));
        entries.sort_by_key(|e| e.timestamp);
        entries
            .into_iter()
            .map(|e| TimePoint {
                time: e.timestamp,
                value: e.value,
            })
            .collect()
    }

    /// Entries within the window (all entries when `None`), insertion order.
    #[must_use]
    pub fn entries_within(&self, window: Option<Duration>) -> Vec<MetricEntry> {
        let cutoff = window.map(window_cutoff);
        self.lock()
            .iter()
            .filter(|entry| cutoff.is_none_or(|c| entry.timestamp >= c))
            .cloned()
            .collect()
    }

    /// Removes all entries, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let removed = entries.len();
        entries.clear();
        removed
    }

    /// Capacity bookkeeping for the entry log.
    #[must_use]
    pub fn storage_info(&self) -> StorageInfo {
        let entries = self.lock();
        let estimated_size_bytes = entries
            .iter()
            .map(|e| serde_json::to_string(e).map(|s| s.len()).unwrap_or(0))
            .sum();
        StorageInfo {
            entry_count: entries.len(),
            estimated_size_bytes,
            max_entries: self.max_entries,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<MetricEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for BenchmarkEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for BenchmarkEngine {
    fn record(&self, category: &str, name: &str, value: f64, metadata: serde_json::Value) {
        self.record_entry(category, name, value, metadata);
    }
}

fn window_cutoff(window: Duration) -> u64 {
    let window_ms = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
    current_timestamp_ms().saturating_sub(window_ms)
}

/// Median of an unsorted, non-empty slice.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Percentage change between first-half and second-half means.
///
/// Requires at least [`TREND_MIN_SAMPLES`] time-ordered values; fewer yield
/// 0.0 by definition. A zero first-half mean also yields 0.0 to avoid a
/// division blow-up.
fn trend_percent(ordered_values: &[f64]) -> f64 {
    if ordered_values.len() < TREND_MIN_SAMPLES {
        return 0.0;
    }
    let mid = ordered_values.len() / 2;
    let (first, second) = ordered_values.split_at(mid);
    #[allow(clippy::cast_precision_loss)]
    let first_mean = first.iter().sum::<f64>() / first.len() as f64;
    #[allow(clippy::cast_precision_loss)]
    let second_mean = second.iter().sum::<f64>() / second.len() as f64;
    if first_mean == 0.0 {
        return 0.0;
    }
    (second_mean - first_mean) / first_mean * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> BenchmarkEngine {
        BenchmarkEngine::new()
    }

    #[test]
    fn test_record_and_query_by_category() {
        let engine = engine();
        engine.record_entry("chat", "latency_ms", 120.0, serde_json::Value::Null);
        engine.record_entry("rag", "retrieval_time_ms", 8.0, serde_json::Value::Null);

        let chat = engine.query("chat", None, None);
        assert_eq!(chat.len(), 1);
        assert_eq!(chat[0].value, 120.0);

        // Category match is case-insensitive.
        assert_eq!(engine.query("CHAT", None, None).len(), 1);
        assert!(engine.query("tool", None, None).is_empty());
    }

    #[test]
    fn test_record_accepts_any_category_and_name() {
        // Recording is infallible by contract: instrumentation must never
        // fail its caller, so even empty labels are stored as-is.
        let engine = engine();
        engine.record_entry("", "", 1.0, serde_json::Value::Null);
        assert_eq!(engine.query("", None, None).len(), 1);
        assert_eq!(engine.storage_info().entry_count, 1);
    }

    #[test]
    fn test_query_filters_by_name() {
        let engine = engine();
        engine.record_entry("chat", "latency_ms", 100.0, serde_json::Value::Null);
        engine.record_entry("chat", "tokens_per_second", 35.0, serde_json::Value::Null);
        let latency = engine.query("chat", Some("latency_ms"), None);
        assert_eq!(latency.len(), 1);
        assert_eq!(latency[0].name, "latency_ms");
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let engine = BenchmarkEngine::with_capacity(5);
        for i in 0..8 {
            engine.record_entry("chat", "latency_ms", f64::from(i), serde_json::Value::Null);
        }
        let entries = engine.query("chat", None, None);
        assert_eq!(entries.len(), 5);
        // First 3 evicted; survivors start at the 4th inserted value.
        assert_eq!(entries[0].value, 3.0);
        assert_eq!(entries[4].value, 7.0);
    }

    #[test]
    fn test_statistics_empty_series_is_all_zero() {
        let engine = engine();
        let stats = engine.statistics("chat", "latency_ms", None);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.latest, 0.0);
        assert_eq!(stats.trend, 0.0);
    }

    #[test]
    fn test_statistics_basic_aggregates() {
        let engine = engine();
        for v in [10.0, 20.0, 30.0] {
            engine.record_entry("chat", "latency_ms", v, serde_json::Value::Null);
        }
        let stats = engine.statistics("chat", "latency_ms", None);
        assert_eq!(stats.count, 3);
        assert!((stats.average - 20.0).abs() < 1e-9);
        assert_eq!(stats.min, 10.0);
        assert_eq!(stats.max, 30.0);
        assert_eq!(stats.latest, 30.0);
        assert_eq!(stats.median, 20.0);
        // Fewer than 10 samples: trend is 0 by definition.
        assert_eq!(stats.trend, 0.0);
    }

    #[test]
    fn test_statistics_trend_requires_ten_samples() {
        let engine = engine();
        for v in [1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 2.0] {
            engine.record_entry("chat", "latency_ms", v, serde_json::Value::Null);
        }
        assert_eq!(engine.statistics("chat", "latency_ms", None).trend, 0.0);

        engine.record_entry("chat", "latency_ms", 2.0, serde_json::Value::Null);
        let stats = engine.statistics("chat", "latency_ms", None);
        // First half mean 1.0, second half mean 2.0 -> +100%.
        assert!((stats.trend - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_median_even_count() {
        assert!((median(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-9);
        assert_eq!(median(&[5.0]), 5.0);
    }

    #[test]
    fn test_trend_zero_first_half_mean() {
        let values = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        assert_eq!(trend_percent(&values), 0.0);
    }

    #[test]
    fn test_time_series_is_time_ordered() {
        let engine = engine();
        for v in [3.0, 1.0, 2.0] {
            engine.record_entry("system", "cpu_usage", v, serde_json::Value::Null);
        }
        let series = engine.time_series("system", "cpu_usage", Duration::from_secs(3600));
        assert_eq!(series.len(), 3);
        for pair in series.windows(2) {
            assert!(pair[0].time <= pair[1].time);
        }
    }

    #[test]
    fn test_summary_covers_well_known_pairs() {
        let engine = engine();
        engine.record_entry("chat", "latency_ms", 150.0, serde_json::Value::Null);
        engine.record_entry("tool", "success", 1.0, serde_json::Value::Null);
        let report = engine.summary(Duration::from_secs(3600));
        assert_eq!(report.chat.get("latency_ms").map(|s| s.count), Some(1));
        assert_eq!(report.tool.get("success").map(|s| s.count), Some(1));
        // Unrecorded pairs still appear, with zero counts.
        assert_eq!(report.system.get("cpu_usage").map(|s| s.count), Some(0));
        assert_eq!(report.rag.len(), 2);
    }

    #[test]
    fn test_clear_returns_removed_count() {
        let engine = engine();
        engine.record_entry("chat", "latency_ms", 1.0, serde_json::Value::Null);
        engine.record_entry("chat", "latency_ms", 2.0, serde_json::Value::Null);
        assert_eq!(engine.clear(), 2);
        assert_eq!(engine.clear(), 0);
        assert_eq!(engine.storage_info().entry_count, 0);
    }

    #[test]
    fn test_storage_info_reports_capacity() {
        let engine = BenchmarkEngine::with_capacity(100);
        engine.record_entry("chat", "latency_ms", 1.0, serde_json::Value::Null);
        let info = engine.storage_info();
        assert_eq!(info.entry_count, 1);
        assert_eq!(info.max_entries, 100);
        assert!(info.estimated_size_bytes > 0);
    }

    #[test]
    fn test_noop_sink_discards() {
        let sink = NoopSink;
        sink.record("chat", "latency_ms", 1.0, serde_json::Value::Null);
    }
}
