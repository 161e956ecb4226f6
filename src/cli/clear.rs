//! `clear` command: drop stored documents and/or recorded metrics.

use super::Workbench;
use std::fmt::Write as _;

/// What to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ClearTarget {
    /// Documents and their chunks.
    Docs,
    /// Recorded metric entries.
    Metrics,
    /// Both.
    All,
}

/// Clears the selected stores, reporting what was removed.
#[must_use]
pub fn cmd_clear(session: &Workbench, target: ClearTarget) -> String {
    let mut out = String::new();
    if matches!(target, ClearTarget::Docs | ClearTarget::All) {
        let docs = session.memory.stats().document_count;
        session.memory.clear();
        let _ = writeln!(out, "cleared {docs} document(s)");
    }
    if matches!(target, ClearTarget::Metrics | ClearTarget::All) {
        let removed = session.metrics.clear();
        let _ = writeln!(out, "cleared {removed} metric entries");
    }
    out.trim_end().to_string()
}
