//! Style linter: aesthetic heuristics reported as warnings only.

use super::validator::Findings;
use super::RuleId;
use crate::layout::{BlockKind, DEFAULT_MOOD};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// More blocks than this reads as busy under a minimal mood.
pub const MINIMAL_MAX_BLOCKS: usize = 5;
pub const MINIMAL_MAX_STATS: usize = 1;

fn hex_color() -> Option<&'static Regex> {
    static HEX: OnceLock<Option<Regex>> = OnceLock::new();
    HEX.get_or_init(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").ok())
        .as_ref()
}

pub fn is_hex_color(value: &str) -> bool {
    hex_color().map_or(false, |re| re.is_match(value))
}

pub(crate) fn lint(root: &Map<String, Value>, kinds: &[(usize, BlockKind)], findings: &mut Findings) {
    let design = root.get("design").and_then(Value::as_object);

    if let Some(Value::String(color)) = design.and_then(|d| d.get("accentColor")) {
        if !is_hex_color(color) {
            findings.warn(
                RuleId::StyleAccentColor,
                "design.accentColor",
                format!("'{}' is not a hex color like #3b82f6", color),
            );
        }
    }

    // An absent mood renders as the default one.
    let mood = match design.and_then(|d| d.get("mood")) {
        None => Some(DEFAULT_MOOD),
        Some(value) => value.as_str(),
    };
    if mood == Some("minimal") {
        let stats = kinds.iter().filter(|(_, k)| *k == BlockKind::Stats).count();
        if stats > MINIMAL_MAX_STATS {
            findings.warn(
                RuleId::StyleMinimalDensity,
                "blocks",
                format!("minimal mood with {} stats blocks feels crowded", stats),
            );
        }
        if kinds.len() > MINIMAL_MAX_BLOCKS {
            findings.warn(
                RuleId::StyleMinimalDensity,
                "blocks",
                format!(
                    "minimal mood with {} blocks; consider {} or fewer",
                    kinds.len(),
                    MINIMAL_MAX_BLOCKS
                ),
            );
        }
    }

    let heroes: Vec<usize> = kinds
        .iter()
        .filter(|(_, k)| *k == BlockKind::Hero)
        .map(|(i, _)| *i)
        .collect();
    if heroes.len() > 1 {
        findings.warn(
            RuleId::StyleMultipleHeroes,
            format!("blocks[{}]", heroes[1]),
            format!("{} hero blocks; only the first reads as an opener", heroes.len()),
        );
    }

    for pair in kinds.windows(2) {
        let ((_, previous), (index, current)) = (pair[0], pair[1]);
        if previous == current && current != BlockKind::Hero {
            findings.warn(
                RuleId::StyleRepeatedBlock,
                format!("blocks[{}]", index),
                format!("two {} blocks in a row", current),
            );
        }
    }
}
