//! Fixtures shared by the unit tests.

use crate::config::GeneratorConfig;
use crate::generation::LayoutGenerator;
use crate::layout::{BlockKind, FieldKind, ItemFieldKind};
use crate::llm::{ModelClient, ModelError};
use crate::prompt::{FixedHint, PromptPair};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Smallest JSON block of `kind` carrying only its required fields.
pub fn minimal_block(kind: BlockKind) -> Value {
    let mut block = Map::new();
    block.insert("type".into(), Value::from(kind.as_str()));
    for field in kind.spec().required_fields() {
        let value = match field.kind {
            FieldKind::Text => Value::from(format!("{} {}", kind, field.name)),
            FieldKind::Items { fields, min_items, .. } => {
                let items: Vec<Value> = (0..min_items)
                    .map(|i| {
                        let mut item = Map::new();
                        for f in fields.iter().filter(|f| f.required) {
                            let v = match f.kind {
                                ItemFieldKind::Text => Value::from(format!("{} {}", f.name, i)),
                                ItemFieldKind::TextList => json!([]),
                            };
                            item.insert(f.name.into(), v);
                        }
                        Value::Object(item)
                    })
                    .collect();
                Value::Array(items)
            }
            FieldKind::Integer { min, .. } => Value::from(min),
            FieldKind::Choice(values) => Value::from(values[0]),
            FieldKind::TextList { .. } => json!([]),
        };
        block.insert(field.name.into(), value);
    }
    Value::Object(block)
}

pub fn hero(title: &str) -> Value {
    json!({ "type": "hero", "title": title, "subtitle": "Ocean giants", "style": "split" })
}

pub fn layout_with(blocks: Vec<Value>) -> Value {
    json!({
        "understanding": {
            "intent": "Explore whale species",
            "approach": "Lead with imagery, then compare species"
        },
        "design": { "theme": "cool", "accentColor": "#0ea5e9", "mood": "elegant" },
        "blocks": blocks
    })
}

pub fn whale_layout() -> Value {
    layout_with(vec![
        hero("Whale species"),
        json!({
            "type": "gallery",
            "title": "Species at a glance",
            "style": "masonry",
            "columns": 3,
            "imageCount": 9,
            "labels": ["Blue whale", "Humpback", "Orca"]
        }),
        json!({
            "type": "stats",
            "items": [
                { "label": "Largest", "value": "Blue whale, 30 m" },
                { "label": "Species", "value": "About 90" }
            ]
        }),
    ])
}

/// Canned behaviour for one model call.
#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Fail(u16),
    /// Sleeps before replying; longer than the request timeout means a hang.
    Delayed(Duration, String),
}

/// Model stub that replays a script and records every prompt it was sent.
/// Once the script runs out it keeps returning the last entry.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    prompts: Mutex<Vec<PromptPair>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(script: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(None),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Self::new(vec![Scripted::Reply(reply.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<PromptPair> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn complete(&self, prompt: &PromptPair) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());

        let step = {
            let next = self.script.lock().unwrap().pop_front();
            let mut last = self.last.lock().unwrap();
            if let Some(step) = next {
                *last = Some(step);
            }
            last.clone()
        };

        match step {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(status)) => Err(ModelError::Status {
                status,
                body: "scripted failure".into(),
            }),
            Some(Scripted::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(ModelError::EmptyResponse),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn test_config() -> GeneratorConfig {
    GeneratorConfig::new(
        "https://api.example.com/v1/chat/completions",
        "test-key",
        "scripted",
    )
}

/// Generator over `client` with the creative hint pinned to the first entry.
pub fn generator(client: Arc<ScriptedClient>) -> LayoutGenerator {
    LayoutGenerator::new(test_config(), client)
        .unwrap()
        .with_hint_selector(Arc::new(FixedHint(0)))
}
