//! # Blockweaver
//!
//! Turns a search query into a page layout authored by a language model,
//! and makes sure what comes back is something a renderer can trust.
//!
//! ```text
//! query → prompt → ModelClient → extract JSON → Validator ─┬→ Generation
//!                     ↑                         AutoFixer ─┤
//!                     └──── retry prompt with errors ──────┤
//!                                                fallback ─┘
//! ```
//!
//! - `layout`: block grammar, typed layout and the fallback layout
//! - `validation`: error collection and the style linter
//! - `repair`: deterministic fixes for recoverable errors
//! - `prompt`: system, user and retry prompts
//! - `llm`: model transport and JSON extraction
//! - `generation`: the retry loop and last-query-wins sessions
//! - `images`: image slots and the payload handed to a renderer
//!
//! The crate logs through `tracing` and never installs a subscriber.

pub mod config;
pub mod generation;
pub mod images;
pub mod layout;
pub mod llm;
pub mod prompt;
pub mod repair;
pub mod validation;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, GeneratorConfig, LayoutPolicy};
pub use generation::{Generation, GenerationError, LayoutGenerator, LayoutSource, QuerySession};
pub use images::{ImageSource, RenderPayload};
pub use layout::{Block, BlockKind, LayoutDescription};
pub use llm::{HttpModelClient, ModelClient, ModelError};
pub use validation::{ValidationResult, Validator, Violation};
