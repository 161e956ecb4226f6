//! `ingest` command: add documents to the memory store.

use super::Workbench;
use crate::{Error, Result};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Ingests files (named after their stems) and optional inline text,
/// reporting per-document chunk counts.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when nothing was given to ingest or a
/// document is empty, and [`Error::OperationFailed`] when a file cannot be
/// read.
pub fn cmd_ingest(
    session: &Workbench,
    files: &[PathBuf],
    inline: Option<&str>,
    inline_name: &str,
) -> Result<String> {
    if files.is_empty() && inline.is_none() {
        return Err(Error::InvalidInput(
            "nothing to ingest: give files or --text".to_string(),
        ));
    }

    let mut infos = session.ingest_files(files)?;
    if let Some(text) = inline {
        infos.push(session.memory.add_document(inline_name, text)?);
    }

    let mut out = String::new();
    let mut chunks = 0;
    for info in &infos {
        chunks += info.chunk_count;
        let _ = writeln!(
            out,
            "{}: {} chunk(s), {} bytes",
            info.name, info.chunk_count, info.size_bytes
        );
    }
    let _ = write!(out, "ingested {} document(s), {chunks} chunk(s)", infos.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmBenchConfig;

    #[test]
    fn test_cmd_ingest_rejects_empty_request() {
        let session = Workbench::new(&LlmBenchConfig::default());
        assert!(matches!(
            cmd_ingest(&session, &[], None, "inline"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_cmd_ingest_inline_text() {
        let session = Workbench::new(&LlmBenchConfig::default());
        let out = cmd_ingest(&session, &[], Some("the quick brown fox"), "scratch").unwrap();
        assert!(out.contains("scratch: 1 chunk(s)"));
        assert!(out.contains("ingested 1 document(s)"));
        assert_eq!(session.memory.stats().document_count, 1);
    }

    #[test]
    fn test_cmd_ingest_files_and_inline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha beta gamma").unwrap();
        let session = Workbench::new(&LlmBenchConfig::default());
        let out = cmd_ingest(&session, &[path], Some("delta epsilon"), "inline").unwrap();
        assert!(out.contains("notes: 1 chunk(s)"));
        assert!(out.contains("ingested 2 document(s)"));
    }
}
