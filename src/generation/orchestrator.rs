use super::{
    AttemptOutcome, Generation, GenerationAttempt, GenerationError, GenerationState, LayoutSource,
};
use crate::config::{ConfigError, GeneratorConfig};
use crate::layout::{fallback_layout, LayoutDescription};
use crate::llm::{extract_json_object, HttpModelClient, ModelClient, ModelError};
use crate::prompt::{HintSelector, PromptBuilder, PromptPair};
use crate::repair::{AppliedFix, AutoFixer, RepairOutcome};
use crate::validation::{RuleId, ValidationResult, Validator};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn transition(state: GenerationState) {
    debug!(state = %state, "Generation state");
}

/// Result of checking one raw model response.
enum Evaluation {
    Accepted {
        layout: LayoutDescription,
        validation: ValidationResult,
        fixes: Vec<AppliedFix>,
    },
    Rejected {
        validation: ValidationResult,
        outcome: AttemptOutcome,
    },
}

pub struct LayoutGenerator {
    config: GeneratorConfig,
    client: Arc<dyn ModelClient>,
    prompts: PromptBuilder,
    validator: Validator,
    fixer: AutoFixer,
}

impl LayoutGenerator {
    pub fn new(config: GeneratorConfig, client: Arc<dyn ModelClient>) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = config.policy;
        Ok(Self {
            config,
            client,
            prompts: PromptBuilder::new(policy),
            validator: Validator::new(policy),
            fixer: AutoFixer::new(policy),
        })
    }

    /// Generator backed by the HTTP chat-completions client.
    pub fn from_config(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let client = HttpModelClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client))?)
    }

    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_config(GeneratorConfig::from_env()?)
    }

    /// Replaces the creative hint source, mainly so tests can pin it.
    pub fn with_hint_selector(mut self, hints: Arc<dyn HintSelector>) -> Self {
        self.prompts = PromptBuilder::with_hints(self.config.policy, hints);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    pub async fn generate(&self, query: &str) -> Generation {
        self.run(Uuid::new_v4(), query).await
    }

    #[instrument(skip(self, query), fields(model = self.client.model_name()))]
    async fn run(&self, generation_id: Uuid, query: &str) -> Generation {
        transition(GenerationState::Idle);
        let query = query.trim();
        if query.is_empty() {
            return self.fall_back(generation_id, query, Vec::new(), "query is blank".to_string());
        }

        let total_attempts = self.config.generation.max_retries.saturating_add(1);
        let mut attempts: Vec<GenerationAttempt> = Vec::new();
        transition(GenerationState::Prompting);
        let mut prompt = self.prompts.initial(query);
        let mut last_failure = String::from("no attempt was made");

        for attempt_number in 1..=total_attempts {
            let started_at = Utc::now();
            let clock = Instant::now();
            let is_retry = attempt_number > 1;

            transition(GenerationState::AwaitingModel);
            let raw = match self.call_model(&prompt).await {
                Ok(raw) => raw,
                Err(error) => {
                    warn!(attempt = attempt_number, error = %error, "Model call failed");
                    last_failure = error.to_string();
                    attempts.push(GenerationAttempt {
                        attempt_number,
                        started_at,
                        elapsed_ms: clock.elapsed().as_millis() as u64,
                        is_retry,
                        raw_response: None,
                        validation: None,
                        outcome: AttemptOutcome::TransportFailed {
                            error: error.to_string(),
                        },
                    });
                    if !error.is_transient() {
                        warn!(error = %error, "Model error is not retryable");
                        break;
                    }
                    // Nothing came back to correct, so the same prompt goes out again.
                    if attempt_number < total_attempts {
                        transition(GenerationState::Retrying);
                    }
                    continue;
                }
            };

            match self.evaluate(&raw) {
                Evaluation::Accepted {
                    layout,
                    validation,
                    fixes,
                } => {
                    transition(GenerationState::Accepted);
                    let (source, outcome) = if fixes.is_empty() {
                        (LayoutSource::Generated, AttemptOutcome::Accepted)
                    } else {
                        (LayoutSource::Repaired, AttemptOutcome::Repaired { fixes })
                    };
                    for warning in &validation.warnings {
                        warn!(rule = %warning.rule_id, path = %warning.path, "{}", warning.message);
                    }
                    let warnings = validation.warnings.clone();
                    attempts.push(GenerationAttempt {
                        attempt_number,
                        started_at,
                        elapsed_ms: clock.elapsed().as_millis() as u64,
                        is_retry,
                        raw_response: Some(raw),
                        validation: Some(validation),
                        outcome,
                    });
                    info!(
                        attempts = attempts.len(),
                        source = ?source,
                        blocks = layout.blocks.len(),
                        "Layout accepted"
                    );
                    return Generation {
                        id: generation_id,
                        query: query.to_string(),
                        layout,
                        source,
                        attempts,
                        warnings,
                    };
                }
                Evaluation::Rejected {
                    validation,
                    outcome,
                } => {
                    warn!(
                        attempt = attempt_number,
                        errors = validation.errors.len(),
                        "Model output rejected"
                    );
                    last_failure = validation
                        .errors
                        .first()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "output rejected".to_string());
                    if attempt_number < total_attempts {
                        transition(GenerationState::Retrying);
                        prompt = self.prompts.retry(query, Some(&raw), &validation);
                    }
                    attempts.push(GenerationAttempt {
                        attempt_number,
                        started_at,
                        elapsed_ms: clock.elapsed().as_millis() as u64,
                        is_retry,
                        raw_response: Some(raw),
                        validation: Some(validation),
                        outcome,
                    });
                }
            }
        }

        let reason = format!(
            "{} attempts failed; last error: {}",
            attempts.len(),
            last_failure
        );
        self.fall_back(generation_id, query, attempts, reason)
    }

    async fn call_model(&self, prompt: &PromptPair) -> Result<String, ModelError> {
        let limit = self.config.request_timeout();
        match tokio::time::timeout(limit, self.client.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Timeout {
                seconds: limit.as_secs(),
            }),
        }
    }

    fn evaluate(&self, raw: &str) -> Evaluation {
        transition(GenerationState::Parsing);
        let candidate = match extract_json_object(raw) {
            Ok(candidate) => candidate,
            Err(e) => {
                return Evaluation::Rejected {
                    validation: ValidationResult::single_error(RuleId::MalformedJson, e.to_string()),
                    outcome: AttemptOutcome::Unparseable {
                        error: e.to_string(),
                    },
                }
            }
        };

        transition(GenerationState::Validating);
        let validation = self.validator.validate(&candidate);
        if validation.is_valid() {
            return accept(candidate, validation, Vec::new());
        }

        transition(GenerationState::Repairing);
        let declined = match self.fixer.repair(&candidate, &validation) {
            RepairOutcome::Repaired { value, fixes } => {
                let revalidated = self.validator.validate(&value);
                if revalidated.is_valid() {
                    return accept(value, revalidated, fixes);
                }
                "repaired layout is still invalid".to_string()
            }
            RepairOutcome::Declined { reason } => reason,
        };
        debug!(reason = %declined, "Repair not applied");

        Evaluation::Rejected {
            validation,
            outcome: AttemptOutcome::Rejected {
                repair_declined: Some(declined),
            },
        }
    }

    fn fall_back(
        &self,
        generation_id: Uuid,
        query: &str,
        attempts: Vec<GenerationAttempt>,
        reason: String,
    ) -> Generation {
        transition(GenerationState::Fallback);
        warn!(
            degraded = true,
            attempts = attempts.len(),
            reason = %reason,
            "Serving fallback layout"
        );
        Generation {
            id: generation_id,
            query: query.to_string(),
            layout: fallback_layout(query, &self.config.policy),
            source: LayoutSource::Fallback { reason },
            attempts,
            warnings: Vec::new(),
        }
    }
}

/// Final gate: the typed form must deserialize from the validated value.
fn accept(value: serde_json::Value, validation: ValidationResult, fixes: Vec<AppliedFix>) -> Evaluation {
    match LayoutDescription::from_value(value) {
        Ok(layout) => Evaluation::Accepted {
            layout,
            validation,
            fixes,
        },
        Err(e) => Evaluation::Rejected {
            validation: ValidationResult::single_error(RuleId::Deserialize, e.to_string()),
            outcome: AttemptOutcome::Rejected {
                repair_declined: None,
            },
        },
    }
}
