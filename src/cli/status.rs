//! `status` command: store statistics and metrics storage info.

use super::Workbench;
use std::fmt::Write as _;
use std::time::Duration;

/// Renders memory and metrics status, plus a summary over the last hour.
#[must_use]
pub fn cmd_status(session: &Workbench) -> String {
    let stats = session.memory.stats();
    let storage = session.metrics.storage_info();
    let summary = session.metrics.summary(Duration::from_secs(3600));

    let mut out = String::new();
    let _ = writeln!(out, "memory:");
    let _ = writeln!(out, "  documents:      {}", stats.document_count);
    let _ = writeln!(out, "  chunks:         {}", stats.chunk_count);
    let _ = writeln!(out, "  total bytes:    {}", stats.total_size_bytes);
    let _ = writeln!(out, "  avg chunk size: {:.1}", stats.average_chunk_size);
    let _ = writeln!(out, "metrics:");
    let _ = writeln!(
        out,
        "  entries: {} / {} (~{} bytes)",
        storage.entry_count, storage.max_entries, storage.estimated_size_bytes
    );
    for (label, section) in [
        ("chat", &summary.chat),
        ("rag", &summary.rag),
        ("tool", &summary.tool),
        ("system", &summary.system),
    ] {
        for (name, stats) in section {
            if stats.count > 0 {
                let _ = writeln!(
                    out,
                    "  {label}/{name}: count={} avg={:.2} min={:.2} max={:.2} trend={:+.1}%",
                    stats.count, stats.average, stats.min, stats.max, stats.trend
                );
            }
        }
    }
    out
}
