//! Property-based tests for chunking, similarity, and eviction invariants.
#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use llmbench::bench::BenchmarkEngine;
use llmbench::memory::chunker::{ChunkPolicy, split_into_chunks};
use llmbench::memory::text::{cosine_similarity, frequency_map, tokenize};
use proptest::prelude::*;

/// Words of 1-12 lowercase letters, 0-80 of them.
fn words_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,12}", 0..80)
}

proptest! {
    /// With no overlap the chunks partition the input exactly: flattening
    /// them reconstructs the original word sequence.
    #[test]
    fn chunking_without_overlap_is_exact_partition(words in words_strategy()) {
        let text = words.join(" ");
        let policy = ChunkPolicy { chunk_size: 60, chunk_overlap: 0 };
        let chunks = split_into_chunks(&text, &policy);

        let rebuilt: Vec<String> = chunks
            .iter()
            .flat_map(|chunk| chunk.split_whitespace().map(String::from))
            .collect();
        prop_assert_eq!(rebuilt, words);
    }

    /// Total chunk text covers at least the normalized original.
    #[test]
    fn chunk_lengths_cover_original(words in words_strategy()) {
        let text = words.join(" ");
        let policy = ChunkPolicy::default();
        let chunks = split_into_chunks(&text, &policy);
        let total: usize = chunks.iter().map(String::len).sum();
        prop_assert!(total >= text.len() || chunks.is_empty());
        prop_assert_eq!(chunks.is_empty(), words.is_empty());
    }

    /// Under any policy, no chunk exceeds the size bound (the one exception
    /// is a single word longer than the bound), and the chunk count never
    /// exceeds the word count, so output stays linear in the input.
    #[test]
    fn chunks_respect_size_bound_any_policy(
        words in prop::collection::vec("[a-z]{1,12}", 1..60),
        chunk_size in 5usize..100,
        chunk_overlap in 0usize..120,
    ) {
        let policy = ChunkPolicy { chunk_size, chunk_overlap };
        let chunks = split_into_chunks(&words.join(" "), &policy);
        let longest = words.iter().map(String::len).max().unwrap_or(0);
        prop_assert!(chunks.len() <= words.len());
        for chunk in &chunks {
            prop_assert!(
                chunk.len() <= policy.chunk_size.max(longest),
                "oversized: {}",
                chunk
            );
        }
    }

    /// Cosine similarity stays in [0, 1] and is exactly 1 against itself.
    #[test]
    fn cosine_similarity_bounds(a in "[a-z ]{0,200}", b in "[a-z ]{0,200}") {
        let fa = frequency_map(&tokenize(&a));
        let fb = frequency_map(&tokenize(&b));
        let sim = cosine_similarity(&fa, &fb);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&sim));
        if !fa.is_empty() {
            prop_assert!((cosine_similarity(&fa, &fa) - 1.0).abs() < 1e-9);
        }
    }

    /// The entry log never exceeds its capacity and keeps the newest.
    #[test]
    fn eviction_never_exceeds_capacity(cap in 1usize..64, inserts in 0usize..200) {
        let engine = BenchmarkEngine::with_capacity(cap);
        for i in 0..inserts {
            engine.record_entry("chat", "latency_ms", i as f64, serde_json::Value::Null);
        }
        let entries = engine.query("chat", None, None);
        prop_assert!(entries.len() <= cap);
        prop_assert_eq!(entries.len(), inserts.min(cap));
        if let Some(last) = entries.last() {
            prop_assert_eq!(last.value, (inserts - 1) as f64);
        }
    }
}
