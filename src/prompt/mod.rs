//! Prompt construction for layout generation.
//!
//! The block grammar section is rendered from [`BLOCK_SPECS`], the same table
//! the validator checks against, so the prompt and the validator cannot drift.

pub mod examples;
pub mod hints;

pub use examples::{worked_examples, EXAMPLE_QUERY};
pub use hints::{select_hint, FixedHint, HintSelector, RandomHints, CREATIVE_HINTS};

use crate::config::LayoutPolicy;
use crate::layout::{BlockSpec, BLOCK_SPECS, DEFAULT_ACCENT_COLOR, MOODS, THEMES};
use crate::validation::ValidationResult;
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

/// Previous output longer than this is cut before being echoed back.
pub const MAX_ECHOED_RESPONSE_CHARS: usize = 2000;

/// The two messages sent per model call.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

#[derive(Clone)]
pub struct PromptBuilder {
    policy: LayoutPolicy,
    system_prompt: String,
    hints: Arc<dyn HintSelector>,
}

impl std::fmt::Debug for PromptBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptBuilder")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PromptBuilder {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self::with_hints(policy, Arc::new(RandomHints))
    }

    pub fn with_hints(policy: LayoutPolicy, hints: Arc<dyn HintSelector>) -> Self {
        Self {
            policy,
            system_prompt: render_system_prompt(&policy),
            hints,
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self, query: &str) -> String {
        let hint = select_hint(self.hints.as_ref());
        format!(
            "Design a page for this search query: \"{}\"\n\nCreative direction: {}\n\nRespond with the JSON layout only.",
            query.trim(),
            hint
        )
    }

    /// Builds a correction request naming every error from the last attempt.
    pub fn retry_prompt(
        &self,
        query: &str,
        previous_output: Option<&str>,
        result: &ValidationResult,
    ) -> String {
        let previous = match previous_output {
            Some(raw) if !raw.trim().is_empty() => truncate_chars(raw.trim(), MAX_ECHOED_RESPONSE_CHARS),
            _ => "(no usable response was received)".to_string(),
        };
        let errors = if result.errors.is_empty() {
            "- [output] the previous attempt produced no layout".to_string()
        } else {
            result.error_summary()
        };

        format!(
            "Your previous layout for the query \"{query}\" was rejected.\n\n\
             PREVIOUS RESPONSE:\n{previous}\n\n\
             ERRORS TO FIX:\n{errors}\n\n\
             Return a corrected layout that fixes every error above. Hard constraints:\n\
             {constraints}\n\
             Respond with the JSON layout only.",
            query = query.trim(),
            previous = previous,
            errors = errors,
            constraints = hard_constraints(&self.policy),
        )
    }

    pub fn initial(&self, query: &str) -> PromptPair {
        PromptPair {
            system: self.system_prompt.clone(),
            user: self.user_prompt(query),
        }
    }

    pub fn retry(
        &self,
        query: &str,
        previous_output: Option<&str>,
        result: &ValidationResult,
    ) -> PromptPair {
        PromptPair {
            system: self.system_prompt.clone(),
            user: self.retry_prompt(query, previous_output, result),
        }
    }
}

fn hard_constraints(policy: &LayoutPolicy) -> String {
    let types: Vec<&str> = BLOCK_SPECS.iter().map(|s| s.kind.as_str()).collect();
    format!(
        "- Output exactly one JSON object, no prose and no code fences\n\
         - \"understanding\" must have non-empty \"intent\" and \"approach\" strings\n\
         - \"blocks\" must contain between {} and {} blocks\n\
         - every block \"type\" must be one of: {}\n\
         - every required field must be present and non-empty",
        policy.min_blocks,
        policy.max_blocks,
        types.join(", ")
    )
}

fn describe_block(spec: &BlockSpec) -> String {
    let fields: Vec<String> = spec
        .fields
        .iter()
        .map(|field| {
            let mut line = format!("{}: {}", field.name, field.kind.describe());
            if field.required {
                line.push_str(" (required)");
            } else if let Some(default) = field.default {
                let _ = write!(line, " (default {})", default);
            }
            line
        })
        .collect();
    format!("- {}: {}\n    {}", spec.kind, spec.summary, fields.join("; "))
}

fn render_system_prompt(policy: &LayoutPolicy) -> String {
    let blocks: Vec<String> = BLOCK_SPECS.iter().map(describe_block).collect();
    let examples: Vec<String> = worked_examples()
        .iter()
        .enumerate()
        .map(|(i, layout)| {
            let body = serde_json::to_string_pretty(layout).unwrap_or_default();
            format!("Example {}:\n{}", i + 1, body)
        })
        .collect();

    format!(
        "You design single-page layouts that answer a search query. You do not write HTML; \
         you pick and fill blocks from a fixed catalogue and return them as JSON.\n\n\
         OUTPUT FORMAT:\n\
         {{\"understanding\": {{\"intent\": string, \"approach\": string}}, \
         \"design\": {{\"theme\": string, \"accentColor\": string, \"mood\": string}}, \
         \"blocks\": [ ... ]}}\n\n\
         AVAILABLE BLOCKS:\n{blocks}\n\n\
         DESIGN:\n\
         - theme: {themes}\n\
         - mood: {moods}\n\
         - accentColor: a hex color such as {accent}\n\n\
         RULES:\n{rules}\n\
         - Open with a hero block and avoid placing two blocks of the same type next to each other\n\
         - Vary the blocks you choose; there is no single correct layout\n\n\
         The following examples all answer the query \"{example_query}\" in different ways.\n\n\
         {examples}",
        blocks = blocks.join("\n"),
        themes = THEMES.join("|"),
        moods = MOODS.join("|"),
        accent = DEFAULT_ACCENT_COLOR,
        rules = hard_constraints(policy),
        example_query = EXAMPLE_QUERY,
        examples = examples.join("\n\n"),
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... [truncated]", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests;
