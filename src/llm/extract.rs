//! Locating the JSON object inside a model's free-text reply.
//!
//! Models wrap output in prose or markdown fences. The scan below pairs each
//! `{` with its matching `}`, tracking string literals so braces inside
//! strings do not count.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractionError {
    #[error("response contained no JSON object")]
    NoObject,

    #[error("JSON object starting at byte {start} is never closed")]
    Unbalanced { start: usize },

    #[error("invalid JSON: {reason}")]
    Invalid { reason: String },
}

/// Returns the byte range of the outermost balanced object starting at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Picks the layout out of a reply that may hold several JSON fragments.
///
/// The first object carrying a `blocks` key wins. Failing that, the largest
/// object that parses is returned.
pub fn extract_json_object(text: &str) -> Result<Value, ExtractionError> {
    let mut search_from = 0;
    let mut first_error = None;
    let mut largest: Option<(usize, Value)> = None;

    // Stray prose braces must not hide the real object after them.
    while let Some(relative) = text[search_from..].find('{') {
        let start = search_from + relative;
        let Some(end) = balanced_end(text, start) else {
            first_error.get_or_insert(ExtractionError::Unbalanced { start });
            search_from = start + 1;
            continue;
        };
        match serde_json::from_str::<Value>(&text[start..=end]) {
            Ok(value) => {
                if value.get("blocks").is_some() {
                    return Ok(value);
                }
                let len = end + 1 - start;
                if largest.as_ref().map_or(true, |(best, _)| len > *best) {
                    largest = Some((len, value));
                }
                search_from = end + 1;
            }
            Err(e) => {
                first_error.get_or_insert(ExtractionError::Invalid {
                    reason: e.to_string(),
                });
                search_from = start + 1;
            }
        }
    }

    match (largest, first_error) {
        (Some((_, value)), _) => Ok(value),
        (None, Some(error)) => Err(error),
        (None, None) => Err(ExtractionError::NoObject),
    }
}
