//! Tool matching strategies.
//!
//! Three strategies run in strict priority order, short-circuiting on the
//! first success:
//!
//! 1. **Name** — the lowercased input contains the tool's lowercased name;
//!    first matching active tool in supplied order wins.
//! 2. **Description** — keyword overlap between the tool description and the
//!    input, scored as `hits / keyword_count`; the strictly highest score
//!    above the threshold wins, ties keep the first found.
//! 3. **Intent** — the input is classified against the intent table and the
//!    first active tool whose name or description mentions any of that
//!    intent's keywords is selected.
//!
//! Inactive tools are invisible to all three strategies.

use super::intent;
use crate::models::{MatchResult, MatchStrategy, ToolDescriptor};

/// Common words excluded from description keyword matching.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Minimum keyword length for description matching.
const MIN_KEYWORD_LEN: usize = 3;

/// Attempts to match a tool for the given input.
///
/// `threshold` is the minimum description-match score (exclusive).
#[must_use]
pub fn match_tool(
    input: &str,
    tools: &[ToolDescriptor],
    threshold: f64,
) -> Option<MatchResult> {
    match_by_name(input, tools)
        .or_else(|| match_by_description(input, tools, threshold))
        .or_else(|| match_by_intent(input, tools))
}

/// Case-insensitive substring match on the tool name.
fn match_by_name(input: &str, tools: &[ToolDescriptor]) -> Option<MatchResult> {
    let lowered = input.to_lowercase();
    tools
        .iter()
        .filter(|tool| tool.active && !tool.name.is_empty())
        .find(|tool| lowered.contains(&tool.name.to_lowercase()))
        .map(|tool| MatchResult {
            tool: tool.clone(),
            strategy: MatchStrategy::Name,
            score: None,
        })
}

/// Keyword-overlap match on the tool description.
fn match_by_description(
    input: &str,
    tools: &[ToolDescriptor],
    threshold: f64,
) -> Option<MatchResult> {
    let lowered = input.to_lowercase();
    let mut best: Option<(&ToolDescriptor, f64)> = None;

    for tool in tools.iter().filter(|t| t.active) {
        let keywords = description_keywords(&tool.description);
        if keywords.is_empty() {
            continue;
        }
        let hits = keywords.iter().filter(|kw| lowered.contains(*kw)).count();
        #[allow(clippy::cast_precision_loss)]
        let score = hits as f64 / keywords.len() as f64;
        // Strictly-greater keeps the first tool on ties.
        if score > threshold && best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((tool, score));
        }
    }

    best.map(|(tool, score)| MatchResult {
        tool: tool.clone(),
        strategy: MatchStrategy::Description,
        score: Some(score),
    })
}

/// Intent-table fallback match.
fn match_by_intent(input: &str, tools: &[ToolDescriptor]) -> Option<MatchResult> {
    let intent = intent::classify(input)?;
    tools
        .iter()
        .filter(|tool| tool.active)
        .find(|tool| {
            let haystack = format!("{} {}", tool.name, tool.description).to_lowercase();
            intent.keywords.iter().any(|kw| haystack.contains(kw))
        })
        .map(|tool| MatchResult {
            tool: tool.clone(),
            strategy: MatchStrategy::Intent,
            score: None,
        })
}

/// Extracts matchable keywords from a tool description.
///
/// Lowercase, whitespace-split, stop words and tokens shorter than three
/// characters dropped.
fn description_keywords(description: &str) -> Vec<String> {
    description
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use test_case::test_case;

    fn tool(name: &str, description: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            endpoint: format!("http://localhost:9000/{name}"),
            method: HttpMethod::Get,
            headers: None,
            variables: None,
            timeout_ms: None,
            active: true,
            source: crate::models::ToolSource::Manual,
        }
    }

    #[test]
    fn test_name_match_beats_description() {
        let tools = vec![
            tool("summarizer", "condense long passages into short summaries"),
            tool("weather", "current weather conditions and forecast"),
        ];
        // Mentions "weather" by name even though the summarizer description
        // also overlaps the input.
        let result = match_tool("use weather to condense this", &tools, 0.3).unwrap();
        assert_eq!(result.tool.name, "weather");
        assert_eq!(result.strategy, MatchStrategy::Name);
        assert!(result.score.is_none());
    }

    #[test_case("WEATHER in London" ; "uppercase")]
    #[test_case("what's the weather like" ; "lowercase")]
    fn test_name_match_is_case_insensitive(input: &str) {
        let tools = vec![tool("weather", "")];
        let result = match_tool(input, &tools, 0.3).unwrap();
        assert_eq!(result.strategy, MatchStrategy::Name);
    }

    #[test]
    fn test_name_match_first_supplied_wins() {
        let tools = vec![tool("echo", ""), tool("echo2", "")];
        let result = match_tool("please echo this", &tools, 0.3).unwrap();
        assert_eq!(result.tool.name, "echo");
    }

    #[test]
    fn test_inactive_tools_are_skipped() {
        let mut inactive = tool("weather", "current weather conditions");
        inactive.active = false;
        let result = match_tool("weather forecast please", &[inactive], 0.3);
        assert!(result.is_none());
    }

    #[test]
    fn test_description_match_scores_keyword_overlap() {
        let tools = vec![tool(
            "cityinfo",
            "lookup population statistics for major cities",
        )];
        let result = match_tool(
            "show me population statistics for cities",
            &tools,
            0.3,
        )
        .unwrap();
        assert_eq!(result.strategy, MatchStrategy::Description);
        let score = result.score.unwrap();
        assert!(score > 0.3 && score <= 1.0);
    }

    #[test]
    fn test_description_below_threshold_no_match() {
        let tools = vec![tool(
            "cityinfo",
            "lookup population statistics for major cities worldwide today",
        )];
        assert!(match_tool("hello there friend", &tools, 0.3).is_none());
    }

    #[test]
    fn test_description_strictly_highest_wins() {
        let tools = vec![
            tool("partial", "translate latin text"),
            tool("full", "translate latin text fast"),
        ];
        // "translate latin text fast" scores 4/4 on the second tool, 3/3 on
        // the first; equal scores keep the first found.
        let result = match_tool("translate latin text fast", &tools, 0.3).unwrap();
        assert_eq!(result.tool.name, "partial");
    }

    #[test]
    fn test_intent_fallback_selects_matching_tool() {
        let tools = vec![
            tool("gateway", "generic request proxy"),
            tool("meteo", "hourly forecast service"),
        ];
        // No name match, descriptions don't clear the threshold, but the
        // weather intent maps onto "forecast" in the meteo description.
        let result = match_tool("is it going to rain tomorrow", &tools, 0.9).unwrap();
        assert_eq!(result.tool.name, "meteo");
        assert_eq!(result.strategy, MatchStrategy::Intent);
    }

    #[test]
    fn test_no_tools_never_matches() {
        assert!(match_tool("weather forecast", &[], 0.3).is_none());
    }

    #[test]
    fn test_description_keywords_drop_stop_words() {
        let keywords = description_keywords("The quick lookup of data for an API");
        assert!(keywords.contains(&"quick".to_string()));
        assert!(keywords.contains(&"lookup".to_string()));
        assert!(keywords.contains(&"api".to_string()));
        assert!(!keywords.contains(&"the".to_string()));
        assert!(!keywords.contains(&"for".to_string()));
        assert!(!keywords.contains(&"of".to_string()));
    }
}
