//! Document and chunk types for the memory store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new document ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random document ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An ingested document.
///
/// Created on ingest, never mutated afterwards. Deleting a document removes
/// all of its chunks with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique identifier.
    pub id: DocumentId,
    /// Display name (file name or user-chosen label).
    pub name: String,
    /// The raw ingested text.
    pub raw_text: String,
    /// Size of the raw text in bytes.
    pub size_bytes: usize,
    /// Creation timestamp (Unix epoch milliseconds).
    pub created_at: u64,
}

/// A bounded-size slice of a document used as the unit of retrieval.
///
/// Chunks for a document always cover its full token sequence in order, each
/// at most the configured chunk size, with a bounded word overlap carried
/// from the end of the previous chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Composite identifier: `"{doc_id}#{ordinal}"`.
    pub id: String,
    /// Owning document id.
    pub doc_id: DocumentId,
    /// Owning document name, copied for display in search results.
    pub doc_name: String,
    /// The chunk text.
    pub text: String,
    /// Tokens extracted from the text, in order.
    pub tokens: Vec<String>,
    /// Token frequency map (word -> count).
    pub token_frequency: HashMap<String, u32>,
    /// Position of this chunk within its document, starting at 0.
    pub ordinal: usize,
}

impl Chunk {
    /// Total number of tokens in this chunk.
    #[must_use]
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Metadata returned after a successful document ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Identifier of the new document.
    pub id: DocumentId,
    /// Document name.
    pub name: String,
    /// Size of the ingested text in bytes.
    pub size_bytes: usize,
    /// Number of chunks produced.
    pub chunk_count: usize,
    /// Ingest processing time in milliseconds.
    pub processing_ms: u64,
    /// Creation timestamp (Unix epoch milliseconds).
    pub created_at: u64,
}

/// A single similarity search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identifier of the matched chunk.
    pub chunk_id: String,
    /// Identifier of the chunk's document.
    pub doc_id: DocumentId,
    /// Name of the chunk's document.
    pub document_name: String,
    /// The chunk text.
    pub text: String,
    /// Cosine similarity against the query, in `[0.0, 1.0]`.
    pub similarity: f64,
}

/// Aggregate statistics over the memory store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Number of documents held.
    pub document_count: usize,
    /// Number of chunks held.
    pub chunk_count: usize,
    /// Sum of all document sizes in bytes.
    pub total_size_bytes: usize,
    /// Mean chunk length in characters, 0.0 when empty.
    pub average_chunk_size: f64,
}
