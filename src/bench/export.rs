//! JSON and CSV export for recorded metrics.
//!
//! The only interchange formats the engine speaks. CSV carries the fixed
//! header `timestamp,category,name,value` (emitted even for an empty log);
//! JSON is the full entry set including metadata.

use super::BenchmarkEngine;
use crate::models::MetricEntry;
use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

impl BenchmarkEngine {
    /// Serializes entries within the window (all entries when `None`) as
    /// pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if serialization fails.
    pub fn export_json(&self, window: Option<Duration>) -> Result<String> {
        let entries = self.entries_within(window);
        serde_json::to_string_pretty(&entries).map_err(|e| Error::OperationFailed {
            operation: "export_json".to_string(),
            cause: e.to_string(),
        })
    }

    /// Serializes entries within the window as CSV.
    ///
    /// Columns are `timestamp,category,name,value`; timestamps are RFC 3339
    /// UTC. An empty log still yields the header line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if CSV writing fails.
    pub fn export_csv(&self, window: Option<Duration>) -> Result<String> {
        let entries = self.entries_within(window);
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(["timestamp", "category", "name", "value"])
            .map_err(csv_error)?;
        for entry in &entries {
            writer
                .write_record([
                    rfc3339(entry.timestamp).as_str(),
                    entry.category.as_str(),
                    entry.name.as_str(),
                    entry.value.to_string().as_str(),
                ])
                .map_err(csv_error)?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::OperationFailed {
            operation: "export_csv".to_string(),
            cause: e.to_string(),
        })?;
        String::from_utf8(bytes).map_err(|e| Error::OperationFailed {
            operation: "export_csv".to_string(),
            cause: e.to_string(),
        })
    }
}

fn csv_error(e: csv::Error) -> Error {
    Error::OperationFailed {
        operation: "export_csv".to_string(),
        cause: e.to_string(),
    }
}

/// Formats an epoch-milliseconds timestamp as RFC 3339 UTC.
fn rfc3339(timestamp_ms: u64) -> String {
    let millis = i64::try_from(timestamp_ms).unwrap_or(i64::MAX);
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_else(|| DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses exported JSON back into entries, for callers re-importing a dump.
///
/// # Errors
///
/// Returns [`Error::OperationFailed`] if the payload is not a JSON array of
/// entries.
pub fn parse_json_export(payload: &str) -> Result<Vec<MetricEntry>> {
    serde_json::from_str(payload).map_err(|e| Error::OperationFailed {
        operation: "parse_json_export".to_string(),
        cause: e.to_string(),
    })
}
