//! Tokenization and similarity primitives.
//!
//! All retrieval in the memory store runs over token-frequency vectors:
//! lowercase, strip non-word characters, drop tokens of two characters or
//! fewer, count the rest. Cosine similarity over those sparse vectors is the
//! ranking function.

#![allow(clippy::cast_precision_loss)]

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Matches runs of non-word characters, replaced by a single space before
/// splitting.
static NON_WORD: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\W+").unwrap()
});

/// Minimum token length; shorter tokens carry no retrieval signal.
const MIN_TOKEN_LEN: usize = 3;

/// Tokenizes text for indexing and querying.
///
/// Lowercases, replaces non-word characters with spaces, splits on
/// whitespace, and discards tokens shorter than three characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(ToString::to_string)
        .collect()
}

/// Builds a token frequency map from a token list.
#[must_use]
pub fn frequency_map(tokens: &[String]) -> HashMap<String, u32> {
    let mut freq = HashMap::with_capacity(tokens.len());
    for token in tokens {
        *freq.entry(token.clone()).or_insert(0) += 1;
    }
    freq
}

/// Cosine similarity between two token-frequency vectors.
///
/// Dot product over the shared vocabulary, normalized by the product of the
/// vector magnitudes. Returns 0.0 when either vector is empty. For
/// non-negative frequencies the result lies in `[0.0, 1.0]`.
#[must_use]
pub fn cosine_similarity(a: &HashMap<String, u32>, b: &HashMap<String, u32>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Iterate the smaller map; only shared terms contribute to the dot product.
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(token, &count)| {
            large
                .get(token)
                .map(|&other| f64::from(count) * f64::from(other))
        })
        .sum();

    if dot == 0.0 {
        return 0.0;
    }

    let magnitude = |m: &HashMap<String, u32>| -> f64 {
        m.values()
            .map(|&c| f64::from(c) * f64::from(c))
            .sum::<f64>()
            .sqrt()
    };

    dot / (magnitude(a) * magnitude(b))
}
