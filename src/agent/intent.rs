//! Coarse intent classification.
//!
//! A fixed keyword table maps free-text input onto eight workbench intents.
//! The table is immutable and declaration order is the tie-break: when two
//! intents score the same number of keyword hits, the earlier row wins.

/// One row of the intent table.
#[derive(Debug)]
pub struct Intent {
    /// Intent name, e.g. `"weather"`.
    pub name: &'static str,
    /// Keywords whose presence in the input counts as a hit.
    pub keywords: &'static [&'static str],
}

/// The intent table, in tie-break order.
pub const INTENTS: &[Intent] = &[
    Intent {
        name: "weather",
        keywords: &["weather", "temperature", "forecast", "rain", "sunny", "climate"],
    },
    Intent {
        name: "search",
        keywords: &["search", "find", "look up", "lookup", "query"],
    },
    Intent {
        name: "translate",
        keywords: &["translate", "translation", "language", "spanish", "french", "german"],
    },
    Intent {
        name: "summarize",
        keywords: &["summarize", "summary", "tldr", "shorten", "condense"],
    },
    Intent {
        name: "api",
        keywords: &["api", "endpoint", "request", "http", "fetch"],
    },
    Intent {
        name: "news",
        keywords: &["news", "headline", "headlines", "article", "breaking"],
    },
    Intent {
        name: "time",
        keywords: &["time", "date", "clock", "today", "timezone", "schedule"],
    },
    Intent {
        name: "calc",
        keywords: &["calculate", "calc", "math", "compute", "plus", "minus"],
    },
];

/// Classifies input against the intent table.
///
/// The intent with the most keyword hits wins; zero hits means no intent.
/// Strict `>` comparison while scanning in table order implements the
/// declared tie-break.
#[must_use]
pub fn classify(input: &str) -> Option<&'static Intent> {
    let lowered = input.to_lowercase();
    let mut best: Option<(&'static Intent, usize)> = None;

    for intent in INTENTS {
        let hits = intent
            .keywords
            .iter()
            .filter(|kw| lowered.contains(*kw))
            .count();
        if hits > 0 && best.is_none_or(|(_, best_hits)| hits > best_hits) {
            best = Some((intent, hits));
        }
    }

    best.map(|(intent, _)| intent)
}
