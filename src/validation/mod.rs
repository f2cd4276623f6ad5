//! Structural validation and style linting of candidate layouts.
//!
//! Validation runs on the raw JSON value a model produced, before it is
//! turned into a typed [`LayoutDescription`](crate::layout::LayoutDescription),
//! so that every problem can be reported at once instead of stopping at the
//! first field serde trips over.

pub mod style;
pub mod validator;

pub use validator::Validator;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifiers for every rule the validator and style linter apply.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    #[serde(rename = "envelope.shape")]
    EnvelopeShape,
    #[serde(rename = "envelope.understanding")]
    EnvelopeUnderstanding,
    #[serde(rename = "envelope.blocks")]
    EnvelopeBlocks,
    #[serde(rename = "blocks.count")]
    BlocksCount,
    #[serde(rename = "block.shape")]
    BlockShape,
    #[serde(rename = "block.type")]
    BlockType,
    #[serde(rename = "block.required")]
    BlockRequired,
    #[serde(rename = "block.kind")]
    BlockKind,
    #[serde(rename = "block.enum")]
    BlockEnum,
    #[serde(rename = "block.range")]
    BlockRange,
    #[serde(rename = "block.items")]
    BlockItems,
    #[serde(rename = "block.item-kind")]
    BlockItemKind,
    #[serde(rename = "block.unknown-field")]
    BlockUnknownField,
    #[serde(rename = "design.shape")]
    DesignShape,
    #[serde(rename = "design.theme")]
    DesignTheme,
    #[serde(rename = "design.mood")]
    DesignMood,
    #[serde(rename = "design.accent-kind")]
    DesignAccentKind,
    #[serde(rename = "style.accent-color")]
    StyleAccentColor,
    #[serde(rename = "style.minimal-density")]
    StyleMinimalDensity,
    #[serde(rename = "style.multiple-heroes")]
    StyleMultipleHeroes,
    #[serde(rename = "style.repeated-block")]
    StyleRepeatedBlock,
    #[serde(rename = "output.malformed-json")]
    MalformedJson,
    #[serde(rename = "output.transport")]
    Transport,
    #[serde(rename = "output.deserialize")]
    Deserialize,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::EnvelopeShape => "envelope.shape",
            RuleId::EnvelopeUnderstanding => "envelope.understanding",
            RuleId::EnvelopeBlocks => "envelope.blocks",
            RuleId::BlocksCount => "blocks.count",
            RuleId::BlockShape => "block.shape",
            RuleId::BlockType => "block.type",
            RuleId::BlockRequired => "block.required",
            RuleId::BlockKind => "block.kind",
            RuleId::BlockEnum => "block.enum",
            RuleId::BlockRange => "block.range",
            RuleId::BlockItems => "block.items",
            RuleId::BlockItemKind => "block.item-kind",
            RuleId::BlockUnknownField => "block.unknown-field",
            RuleId::DesignShape => "design.shape",
            RuleId::DesignTheme => "design.theme",
            RuleId::DesignMood => "design.mood",
            RuleId::DesignAccentKind => "design.accent-kind",
            RuleId::StyleAccentColor => "style.accent-color",
            RuleId::StyleMinimalDensity => "style.minimal-density",
            RuleId::StyleMultipleHeroes => "style.multiple-heroes",
            RuleId::StyleRepeatedBlock => "style.repeated-block",
            RuleId::MalformedJson => "output.malformed-json",
            RuleId::Transport => "output.transport",
            RuleId::Deserialize => "output.deserialize",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub path: String,
    pub message: String,
    pub rule_id: RuleId,
}

impl Violation {
    pub fn new(rule_id: RuleId, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            rule_id,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.rule_id, self.path, self.message)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl ValidationResult {
    pub fn from_violations(errors: Vec<Violation>, warnings: Vec<Violation>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Synthetic failure for output that never reached the validator.
    pub fn single_error(rule_id: RuleId, message: impl Into<String>) -> Self {
        Self::from_violations(vec![Violation::new(rule_id, "$", message)], Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn has_rule(&self, rule_id: RuleId) -> bool {
        self.errors.iter().any(|v| v.rule_id == rule_id)
    }

    /// One line per error, in the order they were found.
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|v| format!("- {}", v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
