use super::{ModelClient, ModelError};
use crate::config::{ConfigError, GeneratorConfig};
use crate::prompt::PromptPair;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Chat-completions client for any OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    client: Client,
    config: GeneratorConfig,
}

impl HttpModelClient {
    pub fn new(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "api_url".to_string(),
                reason: format!("Failed to create HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn build_request(&self, prompt: &PromptPair) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user.clone(),
                },
            ],
            max_tokens: Some(self.config.generation.max_tokens),
            temperature: Some(self.config.generation.temperature),
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ModelError> {
        let request_body = self.build_request(prompt);

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout {
                        seconds: self.config.generation.request_timeout_seconds,
                    }
                } else if e.is_connect() {
                    ModelError::Connection {
                        reason: "unable to reach the API".to_string(),
                    }
                } else {
                    ModelError::Connection {
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                code @ (401 | 403) => ModelError::Unauthorized { status: code },
                429 => ModelError::RateLimited { body },
                code => ModelError::Status { status: code, body },
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| ModelError::Decode {
            reason: e.to_string(),
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ModelError::EmptyResponse)?;
        if content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        debug!(chars = content.len(), "Model response received");
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
