//! Creative nudges appended to the user prompt so repeated queries vary.

use rand_core::{OsRng, RngCore};

pub const CREATIVE_HINTS: &[&str] = &[
    "Focus on the visual story: let images carry most of the page.",
    "Keep it clean and informative, like a well-edited reference card.",
    "Treat the page like a magazine feature with a strong opening.",
    "Lead with the most surprising fact you know about the topic.",
    "Organise the page around how someone would explore this in person.",
    "Favour comparison and contrast over long explanations.",
    "Make it feel like a guided tour, one step at a time.",
    "Use as few blocks as possible while still being useful.",
];

/// Chooses which hint a prompt gets. Injected so tests can pin the choice.
pub trait HintSelector: Send + Sync {
    /// Returns an index below `count`. `count` is never zero.
    fn pick(&self, count: usize) -> usize;
}

/// Operating-system randomness; identical queries may get different hints.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomHints;

impl HintSelector for RandomHints {
    fn pick(&self, count: usize) -> usize {
        OsRng.next_u32() as usize % count.max(1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedHint(pub usize);

impl HintSelector for FixedHint {
    fn pick(&self, count: usize) -> usize {
        self.0 % count.max(1)
    }
}

pub fn select_hint(selector: &dyn HintSelector) -> &'static str {
    CREATIVE_HINTS[selector.pick(CREATIVE_HINTS.len()) % CREATIVE_HINTS.len()]
}
