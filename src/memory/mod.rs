//! Document memory with similarity retrieval.
//!
//! The memory store holds ingested documents, splits them into overlapping
//! chunks, and answers top-K similarity queries over token-frequency vectors.
//! It owns its documents and chunks exclusively; search results copy the
//! fields callers need rather than handing out references.
//!
//! Retrieval timings are reported to the injected [`MetricsSink`], so the
//! workbench dashboard sees every ingest and search without the store
//! knowing anything about the metrics engine's internals.

pub mod chunker;
pub mod text;

pub use chunker::ChunkPolicy;

use crate::bench::{self, MetricsSink};
use crate::models::{Chunk, Document, DocumentId, DocumentInfo, MemoryStats, SearchHit};
use crate::{Error, Result, current_timestamp_ms};
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Results scoring at or below this similarity are dropped by default.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.1;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Default)]
struct StoreInner {
    documents: Vec<Document>,
    chunks: Vec<Chunk>,
}

/// In-memory document store with cosine-similarity retrieval.
///
/// Safe to share behind an `Arc` and call from concurrent logical callers;
/// all state lives behind a single `RwLock`, so an ingest during an in-flight
/// search serializes rather than corrupting the chunk list.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    policy: ChunkPolicy,
    min_similarity: f64,
    metrics: Arc<dyn MetricsSink>,
}

impl MemoryStore {
    /// Creates a store with the default chunk policy.
    #[must_use]
    pub fn new(metrics: Arc<dyn MetricsSink>) -> Self {
        Self::with_policy(ChunkPolicy::default(), metrics)
    }

    /// Creates a store with an explicit chunk policy.
    #[must_use]
    pub fn with_policy(policy: ChunkPolicy, metrics: Arc<dyn MetricsSink>) -> Self {
        Self::with_retrieval(policy, DEFAULT_MIN_SIMILARITY, metrics)
    }

    /// Creates a store with an explicit chunk policy and similarity floor.
    #[must_use]
    pub fn with_retrieval(
        policy: ChunkPolicy,
        min_similarity: f64,
        metrics: Arc<dyn MetricsSink>,
    ) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            policy,
            min_similarity,
            metrics,
        }
    }

    /// Ingests a document: chunks, tokenizes, and indexes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `name` or `text` is empty.
    pub fn add_document(&self, name: &str, text: &str) -> Result<DocumentInfo> {
        if name.trim().is_empty() {
            return Err(Error::InvalidInput("document name is empty".to_string()));
        }
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("document text is empty".to_string()));
        }

        let started = Instant::now();
        let doc = Document {
            id: DocumentId::generate(),
            name: name.to_string(),
            raw_text: text.to_string(),
            size_bytes: text.len(),
            created_at: current_timestamp_ms(),
        };

        let chunks = build_chunks(&doc, &self.policy);
        let chunk_count = chunks.len();

        let info = DocumentInfo {
            id: doc.id.clone(),
            name: doc.name.clone(),
            size_bytes: doc.size_bytes,
            chunk_count,
            processing_ms: elapsed_ms(started),
            created_at: doc.created_at,
        };

        {
            let mut inner = self.write_lock();
            inner.documents.push(doc);
            inner.chunks.extend(chunks);
        }

        tracing::debug!(
            document = %info.name,
            chunks = chunk_count,
            bytes = info.size_bytes,
            elapsed_ms = info.processing_ms,
            "document ingested"
        );
        Ok(info)
    }

    /// Returns the top-K chunks most similar to `query`.
    ///
    /// Scores every chunk with cosine similarity over token frequencies,
    /// sorts descending (stable, so insertion order breaks ties), takes the
    /// first `top_k`, and drops anything scoring at or below the configured
    /// similarity floor (0.1 by default). An empty store yields an empty
    /// result, never an error.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` return keeps the signature stable
    /// for callers that treat retrieval as a fallible dependency.
    pub fn search_similar(&self, query: &str, top_k: usize) -> Result<Vec<SearchHit>> {
        let started = Instant::now();
        let query_freq = text::frequency_map(&text::tokenize(query));

        let hits = {
            let inner = self.read_lock();
            if inner.chunks.is_empty() {
                Vec::new()
            } else {
                let mut scored: Vec<SearchHit> = inner
                    .chunks
                    .iter()
                    .map(|chunk| SearchHit {
                        chunk_id: chunk.id.clone(),
                        doc_id: chunk.doc_id.clone(),
                        document_name: chunk.doc_name.clone(),
                        text: chunk.text.clone(),
                        similarity: text::cosine_similarity(&query_freq, &chunk.token_frequency),
                    })
                    .collect();
                scored.sort_by(|a, b| {
                    b.similarity
                        .partial_cmp(&a.similarity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                scored.truncate(top_k);
                scored.retain(|hit| hit.similarity > self.min_similarity);
                scored
            }
        };

        let elapsed = elapsed_ms(started);
        #[allow(clippy::cast_precision_loss)]
        {
            self.metrics.record(
                bench::CATEGORY_RAG,
                bench::RAG_RETRIEVAL_TIME_MS,
                elapsed as f64,
                serde_json::json!({ "query_tokens": query_freq.len() }),
            );
            self.metrics.record(
                bench::CATEGORY_RAG,
                bench::RAG_CHUNKS_RETRIEVED,
                hits.len() as f64,
                serde_json::Value::Null,
            );
        }

        tracing::debug!(hits = hits.len(), elapsed_ms = elapsed, "similarity search");
        Ok(hits)
    }

    /// Deletes a document and all of its chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document has the given id.
    pub fn delete_document(&self, id: &DocumentId) -> Result<()> {
        let mut inner = self.write_lock();
        let before = inner.documents.len();
        inner.documents.retain(|doc| &doc.id != id);
        if inner.documents.len() == before {
            return Err(Error::NotFound {
                kind: "document",
                id: id.to_string(),
            });
        }
        inner.chunks.retain(|chunk| &chunk.doc_id != id);
        tracing::debug!(document_id = %id, "document deleted");
        Ok(())
    }

    /// Drops all documents and chunks.
    pub fn clear(&self) {
        let mut inner = self.write_lock();
        inner.documents.clear();
        inner.chunks.clear();
    }

    /// Recomputes tokenization and frequency maps for every chunk in place.
    ///
    /// Idempotent; useful after a tokenization rule change. Chunk boundaries
    /// are untouched.
    pub fn reembed_all(&self) {
        let mut inner = self.write_lock();
        for chunk in &mut inner.chunks {
            chunk.tokens = text::tokenize(&chunk.text);
            chunk.token_frequency = text::frequency_map(&chunk.tokens);
        }
        tracing::debug!(chunks = inner.chunks.len(), "re-embedded all chunks");
    }

    /// Aggregate statistics over the store.
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        let inner = self.read_lock();
        let chunk_count = inner.chunks.len();
        let total_chunk_chars: usize = inner.chunks.iter().map(|c| c.text.len()).sum();
        #[allow(clippy::cast_precision_loss)]
        let average_chunk_size = if chunk_count == 0 {
            0.0
        } else {
            total_chunk_chars as f64 / chunk_count as f64
        };
        MemoryStats {
            document_count: inner.documents.len(),
            chunk_count,
            total_size_bytes: inner.documents.iter().map(|d| d.size_bytes).sum(),
            average_chunk_size,
        }
    }

    /// Lists the documents currently held (metadata clones).
    #[must_use]
    pub fn documents(&self) -> Vec<Document> {
        self.read_lock().documents.clone()
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        // Lock poisoning only occurs if a writer panicked; the data itself
        // is still consistent, so recover the guard.
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Splits a document into indexed chunks under the given policy.
fn build_chunks(doc: &Document, policy: &ChunkPolicy) -> Vec<Chunk> {
    chunker::split_into_chunks(&doc.raw_text, policy)
        .into_iter()
        .enumerate()
        .map(|(ordinal, chunk_text)| {
            let tokens = text::tokenize(&chunk_text);
            let token_frequency = text::frequency_map(&tokens);
            Chunk {
                id: format!("{}#{ordinal}", doc.id),
                doc_id: doc.id.clone(),
                doc_name: doc.name.clone(),
                text: chunk_text,
                tokens,
                token_frequency,
                ordinal,
            }
        })
        .collect()
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::NoopSink;

    fn store() -> MemoryStore {
        MemoryStore::new(Arc::new(NoopSink))
    }

    #[test]
    fn test_add_document_rejects_empty_fields() {
        let store = store();
        assert!(matches!(
            store.add_document("", "some text"),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            store.add_document("notes", "   "),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_add_document_returns_info() {
        let store = store();
        let info = store
            .add_document("notes", "The quick brown fox jumps over the lazy dog")
            .unwrap();
        assert_eq!(info.name, "notes");
        assert_eq!(info.chunk_count, 1);
        assert_eq!(info.size_bytes, 44);
    }

    #[test]
    fn test_search_empty_store_returns_empty() {
        let store = store();
        let hits = store.search_similar("anything at all", 3).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_verbatim_text_ranks_near_one() {
        let store = store();
        let content = "The quick brown fox jumps over the lazy dog";
        store.add_document("notes", content).unwrap();
        let hits = store.search_similar(content, 3).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_name, "notes");
        assert!(hits[0].similarity > 0.99);
    }

    #[test]
    fn test_search_partial_query_exceeds_threshold() {
        let store = store();
        store
            .add_document("Notes", "The quick brown fox jumps over the lazy dog")
            .unwrap();
        let hits = store.search_similar("quick fox", 3).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].document_name, "Notes");
        assert!(hits[0].similarity > DEFAULT_MIN_SIMILARITY);
    }

    #[test]
    fn test_custom_similarity_floor_filters_results() {
        let store = MemoryStore::with_retrieval(
            ChunkPolicy::default(),
            0.9,
            Arc::new(NoopSink),
        );
        store
            .add_document("notes", "The quick brown fox jumps over the lazy dog")
            .unwrap();
        // Passes the default 0.1 floor but not a 0.9 one.
        let hits = store.search_similar("quick fox", 3).unwrap();
        assert!(hits.is_empty());
        let verbatim = store
            .search_similar("The quick brown fox jumps over the lazy dog", 3)
            .unwrap();
        assert_eq!(verbatim.len(), 1);
    }

    #[test]
    fn test_search_drops_low_similarity_results() {
        let store = store();
        store.add_document("notes", "completely unrelated content here").unwrap();
        let hits = store.search_similar("quantum entanglement paradox", 3).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_search_respects_top_k() {
        let store = store();
        store.add_document("a", "rust memory safety ownership").unwrap();
        store.add_document("b", "rust borrow checker lifetimes").unwrap();
        store.add_document("c", "rust async await futures").unwrap();
        let hits = store.search_similar("rust", 2).unwrap();
        assert!(hits.len() <= 2);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let store = store();
        store.add_document("close", "quick brown fox").unwrap();
        store.add_document("far", "quick grey wolf howls at the moon tonight").unwrap();
        let hits = store.search_similar("quick brown fox", 3).unwrap();
        assert!(hits.len() >= 2);
        assert_eq!(hits[0].document_name, "close");
        assert!(hits[0].similarity >= hits[1].similarity);
    }

    #[test]
    fn test_delete_document_restores_counts() {
        let store = store();
        store.add_document("keep", "rust ownership model explained").unwrap();
        let before = store.stats();
        let info = store.add_document("drop", "temporary document body").unwrap();
        store.delete_document(&info.id).unwrap();
        let after = store.stats();
        assert_eq!(after.document_count, before.document_count);
        assert_eq!(after.chunk_count, before.chunk_count);
    }

    #[test]
    fn test_delete_unknown_document_is_not_found() {
        let store = store();
        let err = store.delete_document(&DocumentId::new("missing"));
        assert!(matches!(err, Err(Error::NotFound { kind: "document", .. })));
    }

    #[test]
    fn test_clear_empties_store() {
        let store = store();
        store.add_document("notes", "some text to index").unwrap();
        store.clear();
        let stats = store.stats();
        assert_eq!(stats.document_count, 0);
        assert_eq!(stats.chunk_count, 0);
        assert_eq!(stats.average_chunk_size, 0.0);
    }

    #[test]
    fn test_reembed_all_is_idempotent_for_search() {
        let store = store();
        store
            .add_document("notes", "The quick brown fox jumps over the lazy dog")
            .unwrap();
        let before = store.search_similar("quick fox", 3).unwrap();
        store.reembed_all();
        let after = store.search_similar("quick fox", 3).unwrap();
        assert_eq!(before.len(), after.len());
        assert!((before[0].similarity - after[0].similarity).abs() < 1e-12);
    }

    #[test]
    fn test_stats_track_sizes() {
        let store = store();
        store.add_document("a", "alpha beta gamma").unwrap();
        store.add_document("b", "delta epsilon").unwrap();
        let stats = store.stats();
        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.chunk_count, 2);
        assert_eq!(stats.total_size_bytes, "alpha beta gamma".len() + "delta epsilon".len());
        assert!(stats.average_chunk_size > 0.0);
    }
}
