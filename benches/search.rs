//! Benchmarks for memory store retrieval.
//!
//! Benchmark targets:
//! - 100 chunks: <1ms
//! - 1,000 chunks: <10ms
//!
//! These benchmarks test the full retrieval pipeline: query tokenization,
//! per-chunk cosine scoring, ranking, and threshold filtering.

// Criterion macros generate items without docs - this is expected for benchmarks
// Benchmarks use expect/unwrap for simplicity - panics are acceptable in benchmarks
#![allow(missing_docs)]
#![allow(clippy::expect_used, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use llmbench::bench::NoopSink;
use llmbench::memory::MemoryStore;
use std::sync::Arc;

/// Builds a store holding roughly `doc_count` multi-chunk documents.
fn populate(doc_count: usize) -> MemoryStore {
    let store = MemoryStore::new(Arc::new(NoopSink));
    let themes = [
        "rust ownership borrowing lifetimes memory safety",
        "async executors futures polling wakers runtime",
        "http request response headers status timeout",
        "vector similarity cosine retrieval ranking chunks",
    ];
    for i in 0..doc_count {
        let theme = themes[i % themes.len()];
        let body = format!("{theme} ").repeat(40);
        store
            .add_document(&format!("doc-{i}"), &body)
            .expect("ingest failed");
    }
    store
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_similar");
    for doc_count in [10, 100, 500] {
        let store = populate(doc_count);
        group.bench_with_input(
            BenchmarkId::from_parameter(doc_count),
            &doc_count,
            |b, _| {
                b.iter(|| {
                    store
                        .search_similar("cosine similarity ranking for retrieval", 3)
                        .unwrap()
                });
            },
        );
    }
    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let body = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(50);
    c.bench_function("add_document_2500_words", |b| {
        b.iter(|| {
            let store = MemoryStore::new(Arc::new(NoopSink));
            store.add_document("bench", &body).unwrap()
        });
    });
}

criterion_group!(benches, bench_search, bench_ingest);
criterion_main!(benches);
