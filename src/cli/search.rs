//! `search` command: similarity search over ingested documents.

use super::Workbench;
use crate::Result;
use std::fmt::Write as _;

/// Runs a similarity search and renders the hits.
///
/// # Errors
///
/// Propagates memory store errors.
pub fn cmd_search(bench: &Workbench, query: &str, top_k: usize) -> Result<String> {
    let hits = bench.memory.search_similar(query, top_k)?;
    if hits.is_empty() {
        return Ok("no matching chunks".to_string());
    }

    let mut out = String::new();
    for (rank, hit) in hits.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{}] (similarity {:.3})\n   {}",
            rank + 1,
            hit.document_name,
            hit.similarity,
            hit.text
        );
    }
    Ok(out)
}
