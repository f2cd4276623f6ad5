//! Layout descriptions: the envelope a model must produce and the block grammar.
//!
//! ```text
//! { "understanding": {...}, "design": {...}, "blocks": [ {"type": "hero", ...}, ... ] }
//! ```

pub mod blocks;
pub mod fallback;
pub mod catalog;

pub use blocks::*;
pub use fallback::fallback_layout;
pub use catalog::{
    is_valid_block_type, spec_for, BlockKind, BlockSpec, DefaultValue, FieldKind, FieldSpec,
    ItemField, ItemFieldKind, BLOCK_SPECS,
};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const THEMES: &[&str] = &["light", "dark", "warm", "cool"];
pub const MOODS: &[&str] = &["elegant", "playful", "dramatic", "minimal", "cozy"];
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_MOOD: &str = "minimal";
pub const DEFAULT_ACCENT_COLOR: &str = "#3b82f6";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LayoutDescription {
    pub understanding: Understanding,
    #[serde(default)]
    pub design: Design,
    pub blocks: Vec<Block>,
}

/// The model's free-text rationale for the layout it chose.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Understanding {
    pub intent: String,
    pub approach: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Design {
    pub theme: Theme,
    pub accent_color: String,
    pub mood: Mood,
}

impl Default for Design {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            mood: Mood::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Warm,
    Cool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Elegant,
    Playful,
    Dramatic,
    #[default]
    Minimal,
    Cozy,
}

impl LayoutDescription {
    /// Converts an already validated JSON value into the typed form.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_value(&self) -> Value {
        // Plain structs and enums only; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn block_kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }
}
