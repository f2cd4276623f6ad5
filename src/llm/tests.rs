use super::*;
use crate::config::GeneratorConfig;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn extracts_bare_object() {
    let value = extract_json_object(r#"{"blocks": []}"#).unwrap();
    assert_eq!(value, json!({ "blocks": [] }));
}

#[test]
fn extracts_from_fenced_prose() {
    let reply = "Sure! Here is the layout:\n```json\n{\"understanding\": {\"intent\": \"a\", \"approach\": \"b\"}, \"blocks\": [{\"type\": \"hero\", \"title\": \"Whales\"}]}\n```\nLet me know if you want changes.";
    let value = extract_json_object(reply).unwrap();
    assert_eq!(value["blocks"][0]["title"], "Whales");
}

#[test]
fn braces_inside_strings_are_ignored() {
    let reply = r#"{"understanding": {"intent": "show } and { chars", "approach": "say \"{\""}, "blocks": []} trailing }"#;
    let value = extract_json_object(reply).unwrap();
    assert_eq!(value["understanding"]["intent"], "show } and { chars");
    assert_eq!(value["understanding"]["approach"], "say \"{\"");
}

#[test]
fn skips_prose_braces_before_the_object() {
    let value = extract_json_object(r#"Use {curly} braces: {"blocks": [1]}"#).unwrap();
    assert_eq!(value, json!({ "blocks": [1] }));

    let value = extract_json_object(r#"an open { brace, then {"blocks": []}"#).unwrap();
    assert_eq!(value, json!({ "blocks": [] }));
}

#[test]
fn layout_wins_over_earlier_json_fragments() {
    let reply = r#"Empty {} is invalid, and {"note": 1} is metadata. Layout: {"blocks": [{"type": "hero"}]}"#;
    let value = extract_json_object(reply).unwrap();
    assert_eq!(value, json!({ "blocks": [{ "type": "hero" }] }));

    // Without a layout, the largest object is returned.
    let value = extract_json_object(r#"{} then {"understanding": {"intent": "x"}}"#).unwrap();
    assert_eq!(value, json!({ "understanding": { "intent": "x" } }));
}

#[test]
fn reports_missing_or_broken_objects() {
    assert_eq!(
        extract_json_object("I cannot help with that."),
        Err(ExtractionError::NoObject)
    );
    assert_eq!(
        extract_json_object(r#"{"blocks": ["#),
        Err(ExtractionError::Unbalanced { start: 0 })
    );
    assert!(matches!(
        extract_json_object("{blocks: []}"),
        Err(ExtractionError::Invalid { .. })
    ));
}

#[test]
fn transient_errors() {
    assert!(ModelError::Timeout { seconds: 15 }.is_transient());
    assert!(ModelError::Status { status: 503, body: String::new() }.is_transient());
    assert!(!ModelError::Status { status: 400, body: String::new() }.is_transient());
    assert!(!ModelError::Unauthorized { status: 401 }.is_transient());
}

#[test]
fn http_client_requires_valid_config() {
    let missing_key = GeneratorConfig::new("https://api.example.com/v1/chat/completions", "", "gpt-4o-mini");
    assert!(HttpModelClient::new(&missing_key).is_err());

    let ok = GeneratorConfig::new("https://api.example.com/v1/chat/completions", "sk-test", "gpt-4o-mini");
    let client = HttpModelClient::new(&ok).unwrap();
    assert_eq!(client.model_name(), "gpt-4o-mini");
}

#[test]
fn chat_request_omits_unset_options() {
    let request = ChatRequest {
        model: "m".into(),
        messages: vec![ChatMessage {
            role: "user".into(),
            content: "hi".into(),
        }],
        max_tokens: None,
        temperature: Some(0.5),
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({ "model": "m", "messages": [{ "role": "user", "content": "hi" }], "temperature": 0.5 })
    );
}
