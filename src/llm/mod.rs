//! # Model transport
//!
//! Everything between a [`PromptPair`] and the raw text a model sends back:
//! - `client`: OpenAI-compatible chat completions over HTTP
//! - `extract`: pulls the layout JSON object out of free text
//!
//! ```text
//! PromptPair → ModelClient::complete → raw text → extract_json_object → serde_json::Value
//! ```
//!
//! The orchestrator only sees the [`ModelClient`] trait, so tests swap in
//! scripted clients without touching the network.

pub mod client;
pub mod extract;

pub use client::{ChatMessage, ChatRequest, ChatResponse, HttpModelClient};
pub use extract::{extract_json_object, ExtractionError};

use crate::prompt::PromptPair;
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Connection error: {reason}")]
    Connection { reason: String },

    #[error("Authentication failed ({status}): check the API key")]
    Unauthorized { status: u16 },

    #[error("Rate limit exceeded: {body}")]
    RateLimited { body: String },

    #[error("HTTP error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode API response: {reason}")]
    Decode { reason: String },

    #[error("API returned empty content")]
    EmptyResponse,
}

impl ModelError {
    /// Server-side and throttling failures; a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Timeout { .. }
            | ModelError::Connection { .. }
            | ModelError::RateLimited { .. }
            | ModelError::EmptyResponse => true,
            ModelError::Status { status, .. } => *status >= 500,
            ModelError::Unauthorized { .. } | ModelError::Decode { .. } => false,
        }
    }
}

/// A text-completion backend.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ModelError>;

    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests;
