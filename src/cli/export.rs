//! `export` command: dump recorded metrics.

use super::Workbench;
use crate::Result;
use std::time::Duration;

/// Export output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON array of entries.
    Json,
    /// `timestamp,category,name,value` rows.
    Csv,
}

/// Serializes recorded metrics, optionally limited to a trailing window.
///
/// # Errors
///
/// Propagates serialization failures from the engine.
pub fn cmd_export(
    session: &Workbench,
    format: ExportFormat,
    window_secs: Option<u64>,
) -> Result<String> {
    let window = window_secs.map(Duration::from_secs);
    match format {
        ExportFormat::Json => session.metrics.export_json(window),
        ExportFormat::Csv => session.metrics.export_csv(window),
    }
}
