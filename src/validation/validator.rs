use super::{style, RuleId, ValidationResult, Violation};
use crate::config::LayoutPolicy;
use crate::layout::{BlockKind, BlockSpec, FieldKind, FieldSpec, ItemField, ItemFieldKind, MOODS, THEMES};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// Pure checker for candidate layouts. Holds nothing but the block policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    policy: LayoutPolicy,
}

/// Errors and warnings collected while walking one candidate.
#[derive(Default)]
pub(crate) struct Findings {
    pub errors: Vec<Violation>,
    pub warnings: Vec<Violation>,
}

impl Findings {
    fn error(&mut self, rule_id: RuleId, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(Violation::new(rule_id, path, message));
    }

    pub(crate) fn warn(&mut self, rule_id: RuleId, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(Violation::new(rule_id, path, message));
    }
}

impl Validator {
    pub fn new(policy: LayoutPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LayoutPolicy {
        &self.policy
    }

    #[instrument(skip_all)]
    pub fn validate(&self, candidate: &Value) -> ValidationResult {
        let mut findings = Findings::default();

        let Some(root) = candidate.as_object() else {
            findings.error(RuleId::EnvelopeShape, "$", "layout must be a JSON object");
            return ValidationResult::from_violations(findings.errors, findings.warnings);
        };

        check_understanding(root, &mut findings);
        check_design(root, &mut findings);

        let mut kinds = Vec::new();
        match root.get("blocks") {
            None | Some(Value::Null) => {
                findings.error(RuleId::EnvelopeBlocks, "blocks", "blocks is missing");
            }
            Some(Value::Array(blocks)) => {
                self.check_block_count(blocks.len(), &mut findings);
                for (index, block) in blocks.iter().enumerate() {
                    if let Some(kind) = check_block(index, block, &mut findings) {
                        kinds.push((index, kind));
                    }
                }
            }
            Some(other) => {
                findings.error(
                    RuleId::EnvelopeBlocks,
                    "blocks",
                    format!("blocks must be an array, got {}", json_kind(other)),
                );
            }
        }

        style::lint(root, &kinds, &mut findings);

        debug!(
            errors = findings.errors.len(),
            warnings = findings.warnings.len(),
            "Layout validated"
        );
        ValidationResult::from_violations(findings.errors, findings.warnings)
    }

    fn check_block_count(&self, count: usize, findings: &mut Findings) {
        let LayoutPolicy { min_blocks, max_blocks } = self.policy;
        if count < min_blocks {
            findings.error(
                RuleId::BlocksCount,
                "blocks",
                format!(
                    "layout has {} blocks but needs at least {} (allowed range {}-{})",
                    count, min_blocks, min_blocks, max_blocks
                ),
            );
        } else if count > max_blocks {
            findings.error(
                RuleId::BlocksCount,
                "blocks",
                format!(
                    "layout has {} blocks but allows at most {} (allowed range {}-{})",
                    count, max_blocks, min_blocks, max_blocks
                ),
            );
        }
    }
}

fn check_understanding(root: &Map<String, Value>, findings: &mut Findings) {
    let Some(understanding) = root.get("understanding").and_then(Value::as_object) else {
        findings.error(
            RuleId::EnvelopeUnderstanding,
            "understanding",
            "understanding must be an object with intent and approach",
        );
        return;
    };

    for key in ["intent", "approach"] {
        let present = understanding
            .get(key)
            .and_then(Value::as_str)
            .map_or(false, |text| !text.trim().is_empty());
        if !present {
            findings.error(
                RuleId::EnvelopeUnderstanding,
                format!("understanding.{}", key),
                format!("understanding.{} must be a non-empty string", key),
            );
        }
    }
}

fn check_design(root: &Map<String, Value>, findings: &mut Findings) {
    let design = match root.get("design") {
        None => return,
        Some(Value::Object(design)) => design,
        Some(other) => {
            findings.error(
                RuleId::DesignShape,
                "design",
                format!("design must be an object, got {}", json_kind(other)),
            );
            return;
        }
    };

    let choices = [("theme", THEMES, RuleId::DesignTheme), ("mood", MOODS, RuleId::DesignMood)];
    for (key, allowed, rule_id) in choices {
        match design.get(key) {
            None => {}
            Some(Value::String(value)) if allowed.contains(&value.as_str()) => {}
            Some(other) => findings.error(
                rule_id,
                format!("design.{}", key),
                format!("{} is not one of {}", render(other), allowed.join("|")),
            ),
        }
    }

    match design.get("accentColor") {
        None | Some(Value::String(_)) => {}
        Some(other) => findings.error(
            RuleId::DesignAccentKind,
            "design.accentColor",
            format!("accentColor must be a hex color string, got {}", json_kind(other)),
        ),
    }
}

/// Checks one block and returns its kind when the type is recognised.
fn check_block(index: usize, block: &Value, findings: &mut Findings) -> Option<BlockKind> {
    let path = format!("blocks[{}]", index);

    let Some(fields) = block.as_object() else {
        findings.error(
            RuleId::BlockShape,
            &path,
            format!("block must be an object, got {}", json_kind(block)),
        );
        return None;
    };

    let kind = match fields.get("type") {
        Some(Value::String(name)) => match BlockKind::from_wire(name) {
            Some(kind) => kind,
            None => {
                findings.error(
                    RuleId::BlockType,
                    format!("{}.type", path),
                    format!("unknown block type '{}'; expected one of {}", name, known_types()),
                );
                return None;
            }
        },
        _ => {
            findings.error(
                RuleId::BlockType,
                format!("{}.type", path),
                format!("block type is missing; expected one of {}", known_types()),
            );
            return None;
        }
    };

    let spec = kind.spec();
    for field in spec.fields {
        check_field(&path, spec, field, fields.get(field.name), findings);
    }

    for name in fields.keys() {
        if name != "type" && spec.field(name).is_none() {
            findings.warn(
                RuleId::BlockUnknownField,
                format!("{}.{}", path, name),
                format!("{} blocks have no field '{}'; it will be ignored", kind, name),
            );
        }
    }

    Some(kind)
}

fn check_field(
    block_path: &str,
    spec: &BlockSpec,
    field: &FieldSpec,
    value: Option<&Value>,
    findings: &mut Findings,
) {
    let path = format!("{}.{}", block_path, field.name);

    let value = match value {
        Some(value) => value,
        None if field.required => {
            findings.error(
                RuleId::BlockRequired,
                path,
                format!("{} blocks require '{}' ({})", spec.kind, field.name, field.kind.describe()),
            );
            return;
        }
        None => return,
    };

    // A required field of the wrong shape is as good as missing.
    let mismatch_rule = if field.required {
        RuleId::BlockRequired
    } else {
        RuleId::BlockKind
    };

    match field.kind {
        FieldKind::Text => match value.as_str() {
            Some(text) if field.required && text.trim().is_empty() => {
                findings.error(RuleId::BlockRequired, path, "must not be empty");
            }
            Some(_) => {}
            None => findings.error(
                mismatch_rule,
                path,
                format!("must be a string, got {}", json_kind(value)),
            ),
        },
        FieldKind::Integer { min, max, allowed } => match value.as_i64() {
            Some(n) => {
                let permitted = match allowed {
                    Some(values) => values.contains(&n),
                    None => n >= min && n <= max,
                };
                if !permitted {
                    findings.error(
                        RuleId::BlockRange,
                        path,
                        format!("{} is out of range; expected {}", n, field.kind.describe()),
                    );
                }
            }
            None => findings.error(
                mismatch_rule,
                path,
                format!("must be an integer, got {}", render(value)),
            ),
        },
        FieldKind::Choice(values) => match value.as_str() {
            Some(choice) if values.contains(&choice) => {}
            Some(choice) => findings.error(
                RuleId::BlockEnum,
                path,
                format!("'{}' is not one of {}", choice, values.join("|")),
            ),
            None => findings.error(
                mismatch_rule,
                path,
                format!("must be one of {}, got {}", values.join("|"), json_kind(value)),
            ),
        },
        FieldKind::TextList { max_items } => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => {
                if items.len() > max_items {
                    findings.error(
                        RuleId::BlockRange,
                        path,
                        format!("has {} entries; at most {} allowed", items.len(), max_items),
                    );
                }
            }
            _ => findings.error(mismatch_rule, path, "must be an array of strings"),
        },
        FieldKind::Items {
            fields,
            min_items,
            max_items,
        } => match value.as_array() {
            Some(items) => {
                if items.len() < min_items {
                    findings.error(
                        RuleId::BlockItems,
                        &path,
                        format!("has {} items; at least {} required", items.len(), min_items),
                    );
                } else if items.len() > max_items {
                    findings.error(
                        RuleId::BlockRange,
                        &path,
                        format!("has {} items; at most {} allowed", items.len(), max_items),
                    );
                }
                for (i, item) in items.iter().enumerate() {
                    check_item(&format!("{}[{}]", path, i), fields, item, findings);
                }
            }
            None => findings.error(
                mismatch_rule,
                path,
                format!("must be an array, got {}", json_kind(value)),
            ),
        },
    }
}

fn check_item(path: &str, fields: &[ItemField], item: &Value, findings: &mut Findings) {
    let Some(object) = item.as_object() else {
        findings.error(
            RuleId::BlockItems,
            path,
            format!("item must be an object, got {}", json_kind(item)),
        );
        return;
    };

    for field in fields {
        let field_path = format!("{}.{}", path, field.name);
        let (rule_id, ok) = match object.get(field.name) {
            None => (RuleId::BlockItems, !field.required),
            Some(value) if field.required => (
                RuleId::BlockItems,
                field.kind.accepts(value) && value.as_str().map_or(true, |text| !text.trim().is_empty()),
            ),
            Some(value) => (RuleId::BlockItemKind, field.kind.accepts(value)),
        };
        if !ok {
            let expected = match field.kind {
                ItemFieldKind::Text if field.required => "a non-empty string",
                ItemFieldKind::Text => "a string",
                ItemFieldKind::TextList => "an array of strings",
            };
            findings.error(rule_id, field_path, format!("must be {}", expected));
        }
    }
}

fn known_types() -> String {
    BlockKind::ALL
        .iter()
        .map(BlockKind::as_str)
        .collect::<Vec<_>>()
        .join("|")
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => format!("'{}'", text),
        other => other.to_string(),
    }
}
