//! Greedy whitespace chunking with word overlap.
//!
//! Documents are split into chunks of at most `chunk_size` characters by
//! packing whitespace-separated words. When a chunk closes, the last
//! `chunk_overlap / 5` words are carried into the next chunk as a seed, so
//! adjacent chunks share roughly `chunk_overlap` characters of context and a
//! query landing on a chunk boundary still finds its terms.

/// Chunking parameters.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPolicy {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Approximate overlap between adjacent chunks, in characters. The
    /// carry-over is `chunk_overlap / 5` whole words, a word-count proxy for
    /// the character target.
    pub chunk_overlap: usize,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl ChunkPolicy {
    /// Number of words carried from the end of one chunk into the next.
    #[must_use]
    pub const fn overlap_words(&self) -> usize {
        self.chunk_overlap / 5
    }
}

/// Splits text into chunk strings under the given policy.
///
/// Words are packed greedily: a chunk closes when appending the next word
/// (plus a separator) would exceed `chunk_size`. Every input word appears in
/// at least one chunk, in order, so coverage is lossless modulo the
/// duplicated overlap words. A single word longer than `chunk_size` becomes
/// its own oversized chunk rather than being split; every other chunk stays
/// within `chunk_size`.
#[must_use]
pub fn split_into_chunks(text: &str, policy: &ChunkPolicy) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    let overlap_words = policy.overlap_words();
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for word in words {
        let added = if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if !current.is_empty() && current_len + added > policy.chunk_size {
            chunks.push(current.join(" "));
            // Seed the next chunk with the tail of the one just closed. The
            // seed must leave room for the incoming word, or the new chunk
            // would already be oversized when it closes.
            let budget = policy
                .chunk_overlap
                .min(policy.chunk_size.saturating_sub(word.len() + 1));
            current = carry_tail(&current, overlap_words, budget);
            current_len = joined_len(&current);
        }
        current_len += if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        current.push(word);
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// The trailing words of `closed` carried into the next chunk: at most
/// `overlap_words` of them, strictly fewer than `closed` holds, and no more
/// than `budget` characters once joined.
fn carry_tail<'a>(closed: &[&'a str], overlap_words: usize, budget: usize) -> Vec<&'a str> {
    let max_words = overlap_words.min(closed.len().saturating_sub(1));
    let mut seed: Vec<&'a str> = Vec::new();
    let mut seed_len = 0usize;
    for &word in closed.iter().rev().take(max_words) {
        let added = if seed.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if seed_len + added > budget {
            break;
        }
        seed.push(word);
        seed_len += added;
    }
    seed.reverse();
    seed
}

fn joined_len(words: &[&str]) -> usize {
    words.iter().map(|w| w.len()).sum::<usize>() + words.len().saturating_sub(1)
}
