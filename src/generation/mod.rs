//! # Layout generation
//!
//! One query runs through a bounded, strictly sequential loop:
//!
//! ```text
//! Idle → Prompting → AwaitingModel → Parsing → Validating ─┬→ Accepted
//!                        ↑                                 ├→ Repairing → Accepted
//!                        └──────── Retrying ←──────────────┤
//!                                                          └→ Fallback
//! ```
//!
//! The caller always gets a layout back. When every attempt fails the
//! canned fallback is returned and the [`Generation`] is marked degraded.

pub mod orchestrator;
pub mod session;

pub use orchestrator::LayoutGenerator;
pub use session::QuerySession;

use crate::config::ConfigError;
use crate::layout::LayoutDescription;
use crate::repair::AppliedFix;
use crate::validation::{ValidationResult, Violation};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generator configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationState {
    Idle,
    Prompting,
    AwaitingModel,
    Parsing,
    Validating,
    Repairing,
    Retrying,
    Accepted,
    Fallback,
}

impl GenerationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationState::Idle => "idle",
            GenerationState::Prompting => "prompting",
            GenerationState::AwaitingModel => "awaiting-model",
            GenerationState::Parsing => "parsing",
            GenerationState::Validating => "validating",
            GenerationState::Repairing => "repairing",
            GenerationState::Retrying => "retrying",
            GenerationState::Accepted => "accepted",
            GenerationState::Fallback => "fallback",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Accepted | GenerationState::Fallback)
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the returned layout came from.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutSource {
    Generated,
    Repaired,
    Fallback { reason: String },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum AttemptOutcome {
    Accepted,
    Repaired { fixes: Vec<AppliedFix> },
    TransportFailed { error: String },
    Unparseable { error: String },
    Rejected { repair_declined: Option<String> },
}

/// One model call and what became of its output.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationAttempt {
    pub attempt_number: u32,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub is_retry: bool,
    pub raw_response: Option<String>,
    pub validation: Option<ValidationResult>,
    pub outcome: AttemptOutcome,
}

impl GenerationAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(
            self.outcome,
            AttemptOutcome::Accepted | AttemptOutcome::Repaired { .. }
        )
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Generation {
    pub id: Uuid,
    pub query: String,
    pub layout: LayoutDescription,
    pub source: LayoutSource,
    pub attempts: Vec<GenerationAttempt>,
    pub warnings: Vec<Violation>,
}

impl Generation {
    pub fn is_degraded(&self) -> bool {
        matches!(self.source, LayoutSource::Fallback { .. })
    }

    /// Model calls beyond the first.
    pub fn retries(&self) -> usize {
        self.attempts.len().saturating_sub(1)
    }
}
