use super::*;
use crate::layout::BlockKind;
use crate::validation::{RuleId, Validator, Violation};
use pretty_assertions::assert_eq;

fn builder(hint: usize) -> PromptBuilder {
    PromptBuilder::with_hints(LayoutPolicy::default(), Arc::new(FixedHint(hint)))
}

#[test]
fn system_prompt_lists_every_block_type() {
    let prompt = builder(0);
    let system = prompt.system_prompt();
    for kind in BlockKind::ALL {
        assert!(
            system.contains(&format!("- {}: ", kind)),
            "{} missing from AVAILABLE BLOCKS",
            kind
        );
    }
    assert!(system.contains("columns: one of 2|3|4 (default 3)"));
    assert!(system.contains("title: string (required)"));
    assert!(system.contains("between 1 and 8 blocks"));
}

#[test]
fn worked_examples_are_valid_layouts() {
    let validator = Validator::new(LayoutPolicy::default());
    let examples = worked_examples();
    assert_eq!(examples.len(), 3);
    for layout in &examples {
        let result = validator.validate(&layout.to_value());
        assert!(result.is_valid(), "{}", result.error_summary());
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }
    // Same query, different block combinations.
    assert_ne!(examples[0].block_kinds(), examples[1].block_kinds());
    assert_ne!(examples[1].block_kinds(), examples[2].block_kinds());
}

#[test]
fn user_prompt_uses_the_pinned_hint() {
    let prompt = builder(2).user_prompt("  whale species ");
    assert!(prompt.contains("\"whale species\""));
    assert!(prompt.contains(CREATIVE_HINTS[2]));

    let wrapped = builder(CREATIVE_HINTS.len() + 1).user_prompt("whales");
    assert!(wrapped.contains(CREATIVE_HINTS[1]));
}

#[test]
fn random_hints_stay_in_range() {
    for _ in 0..64 {
        assert!(RandomHints.pick(CREATIVE_HINTS.len()) < CREATIVE_HINTS.len());
    }
    assert_eq!(RandomHints.pick(1), 0);
}

#[test]
fn retry_prompt_embeds_errors_and_constraints() {
    let result = Validator::new(LayoutPolicy::default()).validate(&serde_json::json!({ "blocks": [] }));
    let prompt = builder(0).retry_prompt("whale species", Some("{\"blocks\":[]}"), &result);

    assert!(prompt.contains("blocks.count"));
    assert!(prompt.contains("envelope.understanding"));
    assert!(prompt.contains("{\"blocks\":[]}"));
    assert!(prompt.contains("between 1 and 8 blocks"));
    assert!(prompt.contains("interactive-list"));
}

#[test]
fn retry_prompt_without_previous_output() {
    let result = ValidationResult::single_error(RuleId::Transport, "request timed out");
    let prompt = builder(0).retry_prompt("whales", None, &result);
    assert!(prompt.contains("(no usable response was received)"));
    assert!(prompt.contains("[output.transport] $: request timed out"));
}

#[test]
fn long_previous_output_is_truncated_on_char_boundary() {
    let raw = "é".repeat(MAX_ECHOED_RESPONSE_CHARS + 50);
    let result = ValidationResult::from_violations(
        vec![Violation::new(RuleId::MalformedJson, "$", "no JSON object found")],
        Vec::new(),
    );
    let prompt = builder(0).retry_prompt("whales", Some(&raw), &result);
    assert!(prompt.contains("[truncated]"));
    assert!(!prompt.contains(&raw));
}

#[test]
fn initial_and_retry_share_the_system_prompt() {
    let prompt = builder(0);
    let result = ValidationResult::single_error(RuleId::MalformedJson, "no JSON object found");
    let first = prompt.initial("whales");
    let retry = prompt.retry("whales", Some("sorry"), &result);
    assert_eq!(first.system, retry.system);
    assert_ne!(first.user, retry.user);
}
