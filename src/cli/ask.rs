//! `ask` command: the full matcher pipeline for one message.

use super::Workbench;
use crate::agent::{ProcessOutcome, augment_prompt};
use crate::bench::{self, MetricsSink};
use crate::models::ToolDescriptor;
use crate::Result;
use std::time::Instant;

/// Processes one message: retrieval, tool matching, invocation or
/// prompt-augmented fallthrough.
///
/// When no tool matches, the output is the augmented generation prompt — the
/// workbench has no LLM wired in, so showing the prompt that *would* be sent
/// is the useful behavior. End-to-end latency is recorded under
/// `chat/latency_ms`.
///
/// # Errors
///
/// Propagates matcher and invocation errors; transport-level tool failures
/// surface as [`crate::Error::ToolInvocation`].
pub fn cmd_ask(session: &Workbench, message: &str, tools: &[ToolDescriptor]) -> Result<String> {
    let started = Instant::now();
    let outcome = session.agent.process(message, tools)?;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    #[allow(clippy::cast_precision_loss)]
    session.metrics.record(
        bench::CATEGORY_CHAT,
        bench::CHAT_LATENCY_MS,
        elapsed_ms as f64,
        serde_json::json!({ "from_tool": outcome.from_tool() }),
    );

    Ok(match outcome {
        ProcessOutcome::ToolResult {
            tool,
            strategy,
            content,
            elapsed_ms,
            ..
        } => {
            format!("[tool: {tool}, strategy: {strategy}, {elapsed_ms}ms]\n{content}")
        }
        ProcessOutcome::Generate { context } => {
            if context.is_empty() {
                format!("[no tool matched, no context]\n{message}")
            } else {
                format!(
                    "[no tool matched, {} context snippet(s)]\n{}",
                    context.len(),
                    augment_prompt(message, &context)
                )
            }
        }
    })
}
