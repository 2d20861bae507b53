//! Prompt templates for the fine-tuned model
//!
//! The model was tuned on `<|user|>{prompt}<|assistant|>` pairs where the
//! context sits inside the user turn, ahead of the question. The wording
//! below is the one it was tuned on.

use crate::config::SubjectConfig;

/// Fixed tokens for the wrapper text
pub const BASE_PROMPT_TOKENS: usize = 50;

/// Allowance for a typical query
pub const QUERY_TOKENS: usize = 20;

/// Build the prompt sent to the model.
///
/// With non-empty context (after trimming) the context comes first and the
/// user's question last; otherwise a direct question about the subject.
pub fn build_full_prompt(subject: &SubjectConfig, query: &str, context: &str) -> String {
    let context = context.trim();
    if context.is_empty() {
        return build_fallback_prompt(&subject.name, query);
    }

    let SubjectConfig { name, pronoun, .. } = subject;
    format!(
        "I'm looking for information about {name}. Here's what I know about {pronoun}:

{context}

Based on this information: {query}"
    )
}

/// Prompt used when retrieval produced nothing
pub fn build_fallback_prompt(subject: &str, query: &str) -> String {
    format!("Tell me about {subject}: {query}")
}

/// Advisory token estimate for a prompt carrying `context`.
///
/// Reported on health and info endpoints only; never used to reject a
/// request. The remote endpoint enforces its own limits.
pub fn estimate_token_count(context: &str) -> usize {
    BASE_PROMPT_TOKENS + context.len().div_ceil(4) + QUERY_TOKENS
}
