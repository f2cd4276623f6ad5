//! Deterministic, model-free repair of layouts that failed validation.
//!
//! The fixer only coerces what has a documented safe value: defaults for
//! optional fields, clamped numbers, truncated lists, dropped blocks of unknown
//! type. Anything that would need invented content (a missing title, an empty
//! understanding) is declined and goes back to the model.

use crate::config::LayoutPolicy;
use crate::layout::{
    BlockKind, FieldKind, FieldSpec, ItemField, DEFAULT_ACCENT_COLOR, DEFAULT_MOOD,
    DEFAULT_THEME, MOODS, THEMES,
};
use crate::validation::{RuleId, ValidationResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AppliedFix {
    pub path: String,
    pub description: String,
}

impl AppliedFix {
    fn new(path: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RepairOutcome {
    Repaired { value: Value, fixes: Vec<AppliedFix> },
    Declined { reason: String },
}

impl RepairOutcome {
    fn declined(reason: impl Into<String>) -> Self {
        RepairOutcome::Declined {
            reason: reason.into(),
        }
    }

    pub fn is_repaired(&self) -> bool {
        matches!(self, RepairOutcome::Repaired { .. })
    }
}

/// Rules whose violations need content only the model can supply.
fn is_unrepairable(rule_id: RuleId) -> bool {
    matches!(
        rule_id,
        RuleId::EnvelopeShape
            | RuleId::EnvelopeUnderstanding
            | RuleId::EnvelopeBlocks
            | RuleId::BlockRequired
            | RuleId::BlockItems
            | RuleId::MalformedJson
            | RuleId::Transport
            | RuleId::Deserialize
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoFixer {
    policy: LayoutPolicy,
}

impl AutoFixer {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self { policy }
    }

    #[instrument(skip_all, fields(errors = result.errors.len()))]
    pub fn repair(&self, candidate: &Value, result: &ValidationResult) -> RepairOutcome {
        if result.errors.is_empty() {
            return RepairOutcome::declined("layout has no errors to repair");
        }
        if let Some(blocking) = result.errors.iter().find(|v| is_unrepairable(v.rule_id)) {
            return RepairOutcome::declined(format!("{} cannot be repaired: {}", blocking.path, blocking.message));
        }

        let mut value = candidate.clone();
        let Some(root) = value.as_object_mut() else {
            return RepairOutcome::declined("layout is not an object");
        };

        let mut fixes = Vec::new();
        repair_design(root, &mut fixes);

        let Some(Value::Array(blocks)) = root.get_mut("blocks") else {
            return RepairOutcome::declined("blocks is not an array");
        };

        let original = std::mem::take(blocks);
        for (index, block) in original.into_iter().enumerate() {
            let path = format!("blocks[{}]", index);
            match known_kind(&block) {
                Some(kind) => {
                    let mut block = block;
                    if let Some(fields) = block.as_object_mut() {
                        repair_block(&path, kind, fields, &mut fixes);
                    }
                    blocks.push(block);
                }
                None => fixes.push(AppliedFix::new(path, "removed block with unknown type")),
            }
        }

        let LayoutPolicy { min_blocks, max_blocks } = self.policy;
        if blocks.len() > max_blocks {
            fixes.push(AppliedFix::new(
                "blocks",
                format!("truncated {} blocks to {}", blocks.len(), max_blocks),
            ));
            blocks.truncate(max_blocks);
        }
        if blocks.len() < min_blocks {
            return RepairOutcome::declined(format!(
                "{} usable blocks left; at least {} required",
                blocks.len(),
                min_blocks
            ));
        }

        debug!(fixes = fixes.len(), "Layout repaired");
        RepairOutcome::Repaired { value, fixes }
    }
}

fn known_kind(block: &Value) -> Option<BlockKind> {
    block
        .as_object()?
        .get("type")?
        .as_str()
        .and_then(BlockKind::from_wire)
}

fn repair_design(root: &mut Map<String, Value>, fixes: &mut Vec<AppliedFix>) {
    if !matches!(root.get("design"), Some(Value::Object(_))) {
        let replaced = root.contains_key("design");
        root.insert("design".into(), Value::Object(Map::new()));
        if replaced {
            fixes.push(AppliedFix::new("design", "replaced malformed design object"));
        }
    }
    let Some(Value::Object(design)) = root.get_mut("design") else {
        return;
    };

    let choices = [("theme", THEMES, DEFAULT_THEME), ("mood", MOODS, DEFAULT_MOOD)];
    for (key, allowed, default) in choices {
        let valid = design
            .get(key)
            .and_then(Value::as_str)
            .map_or(false, |v| allowed.contains(&v));
        if !valid {
            if design.contains_key(key) {
                fixes.push(AppliedFix::new(
                    format!("design.{}", key),
                    format!("replaced invalid {} with '{}'", key, default),
                ));
            }
            design.insert(key.into(), Value::from(default));
        }
    }

    if !matches!(design.get("accentColor"), Some(Value::String(_))) {
        if design.contains_key("accentColor") {
            fixes.push(AppliedFix::new(
                "design.accentColor",
                format!("replaced non-string accent color with '{}'", DEFAULT_ACCENT_COLOR),
            ));
        }
        design.insert("accentColor".into(), Value::from(DEFAULT_ACCENT_COLOR));
    }
}

fn repair_block(
    path: &str,
    kind: BlockKind,
    fields: &mut Map<String, Value>,
    fixes: &mut Vec<AppliedFix>,
) {
    for field in kind.spec().fields {
        let field_path = format!("{}.{}", path, field.name);
        match fields.get(field.name).cloned() {
            None => {
                if let Some(default) = field.default {
                    fields.insert(field.name.into(), default.to_json());
                }
            }
            Some(current) => match repair_value(field, &current) {
                Fix::Keep => {}
                Fix::Replace(value, description) => {
                    fixes.push(AppliedFix::new(field_path, description));
                    fields.insert(field.name.into(), value);
                }
                Fix::Remove(description) => {
                    fixes.push(AppliedFix::new(field_path, description));
                    fields.remove(field.name);
                }
            },
        }
    }
}

enum Fix {
    Keep,
    Replace(Value, String),
    Remove(String),
}

/// Replacement used when an optional field holds garbage.
fn reset(field: &FieldSpec, what: &str) -> Fix {
    match field.default {
        Some(default) => Fix::Replace(
            default.to_json(),
            format!("replaced {} with default {}", what, default),
        ),
        None => Fix::Remove(format!("removed {}", what)),
    }
}

fn repair_value(field: &FieldSpec, current: &Value) -> Fix {
    match field.kind {
        FieldKind::Text => {
            if current.is_string() {
                Fix::Keep
            } else {
                reset(field, "non-string value")
            }
        }
        FieldKind::Integer { min, max, allowed } => {
            let Some(number) = coerce_integer(current) else {
                return reset(field, "non-numeric value");
            };
            let fixed = clamp_integer(number, min, max, allowed);
            if current.as_i64() == Some(fixed) {
                Fix::Keep
            } else {
                Fix::Replace(
                    Value::from(fixed),
                    format!("clamped {} to {}", current, fixed),
                )
            }
        }
        FieldKind::Choice(values) => match current.as_str() {
            Some(choice) if values.contains(&choice) => Fix::Keep,
            _ => reset(field, &format!("invalid choice {}", current)),
        },
        FieldKind::TextList { max_items } => match current.as_array() {
            Some(items) if items.iter().all(Value::is_string) => {
                truncate_list(items, max_items)
            }
            _ => reset(field, "malformed list"),
        },
        FieldKind::Items {
            fields, max_items, ..
        } => match current.as_array() {
            Some(items) => repair_items(fields, items, max_items),
            None => Fix::Keep,
        },
    }
}

/// Drops optional item fields of the wrong shape, then truncates.
fn repair_items(fields: &[ItemField], items: &[Value], max_items: usize) -> Fix {
    let mut repaired = items.to_vec();
    let mut notes = Vec::new();
    for (index, item) in repaired.iter_mut().enumerate() {
        let Some(object) = item.as_object_mut() else {
            continue;
        };
        for field in fields.iter().filter(|f| !f.required) {
            if object.get(field.name).map_or(false, |v| !field.kind.accepts(v)) {
                object.remove(field.name);
                notes.push(format!("removed malformed [{}].{}", index, field.name));
            }
        }
    }
    if repaired.len() > max_items {
        notes.push(format!("truncated {} entries to {}", repaired.len(), max_items));
        repaired.truncate(max_items);
    }
    if notes.is_empty() {
        Fix::Keep
    } else {
        Fix::Replace(Value::Array(repaired), notes.join("; "))
    }
}

fn truncate_list(items: &[Value], max_items: usize) -> Fix {
    if items.len() <= max_items {
        return Fix::Keep;
    }
    Fix::Replace(
        Value::Array(items[..max_items].to_vec()),
        format!("truncated {} entries to {}", items.len(), max_items),
    )
}

/// Accepts integers, floats and numeric strings; models emit all three.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}

fn clamp_integer(n: i64, min: i64, max: i64, allowed: Option<&'static [i64]>) -> i64 {
    let n = n.clamp(min, max);
    match allowed {
        // Nearest permitted value; ties go to the smaller one.
        Some(values) => values
            .iter()
            .copied()
            .min_by_key(|v| (v.abs_diff(n), *v))
            .unwrap_or(n),
        None => n,
    }
}
