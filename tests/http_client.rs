use blockweaver::images::{ImageOrigin, ImageSource, SerperImageSearch};
use blockweaver::prompt::{FixedHint, PromptPair};
use blockweaver::{
    GeneratorConfig, HttpModelClient, LayoutGenerator, LayoutSource, ModelClient, ModelError,
    RenderPayload,
};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS: &str = "/v1/chat/completions";

fn config_for(server: &MockServer) -> GeneratorConfig {
    GeneratorConfig::new(
        format!("{}{}", server.uri(), COMPLETIONS),
        "sk-test",
        "layout-model",
    )
}

fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn prompt() -> PromptPair {
    PromptPair {
        system: "You design layouts.".into(),
        user: "whale species".into(),
    }
}

fn hero_layout() -> String {
    json!({
        "understanding": { "intent": "Explore whales", "approach": "One strong image" },
        "design": { "theme": "cool", "accentColor": "#0ea5e9", "mood": "dramatic" },
        "blocks": [{ "type": "hero", "title": "Whale species" }]
    })
    .to_string()
}

#[tokio::test]
async fn sends_bearer_token_and_chat_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "layout-model",
            "messages": [
                { "role": "system", "content": "You design layouts." },
                { "role": "user", "content": "whale species" }
            ],
            "max_tokens": 2048
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("{\"ok\": true}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpModelClient::new(&config_for(&server)).unwrap();
    let text = client.complete(&prompt()).await.unwrap();
    assert_eq!(text, "{\"ok\": true}");
}

#[tokio::test]
async fn maps_error_statuses() {
    let cases: [(u16, &str); 3] = [
        (401, "unauthorized"),
        (429, "rate-limited"),
        (503, "status"),
    ];
    for (status, expected) in cases {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .mount(&server)
            .await;

        let client = HttpModelClient::new(&config_for(&server)).unwrap();
        let error = client.complete(&prompt()).await.unwrap_err();
        let matched = match (&error, expected) {
            (ModelError::Unauthorized { status: 401 }, "unauthorized") => true,
            (ModelError::RateLimited { body }, "rate-limited") => body == "upstream says no",
            (ModelError::Status { status: 503, .. }, "status") => true,
            _ => false,
        };
        assert!(matched, "{} mapped to {:?}", status, error);
    }
}

#[tokio::test]
async fn empty_choices_and_bad_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = HttpModelClient::new(&config_for(&server)).unwrap();
    assert!(matches!(
        client.complete(&prompt()).await,
        Err(ModelError::EmptyResponse)
    ));
    assert!(matches!(
        client.complete(&prompt()).await,
        Err(ModelError::Decode { .. })
    ));
}

#[tokio::test]
async fn end_to_end_retry_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(r#"{"blocks":[]}"#)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_reply(&format!("```json\n{}\n```", hero_layout()))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let generator = LayoutGenerator::from_config(config_for(&server))
        .unwrap()
        .with_hint_selector(Arc::new(FixedHint(0)));
    let generation = generator.generate("whale species").await;

    assert_eq!(generation.source, LayoutSource::Generated);
    assert_eq!(generation.attempts.len(), 2);
    assert_eq!(generation.layout.blocks.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let retry: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let retry_prompt = retry["messages"][1]["content"].as_str().unwrap();
    assert!(retry_prompt.contains("blocks.count"));
}

#[tokio::test]
async fn server_errors_end_in_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let generation = LayoutGenerator::from_config(config_for(&server))
        .unwrap()
        .generate("whale species")
        .await;
    assert!(generation.is_degraded());
    assert!(matches!(generation.source, LayoutSource::Fallback { .. }));
}

#[tokio::test]
async fn image_search_fills_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .and(header("X-API-KEY", "serper-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [
                { "title": "Blue whale", "imageUrl": "https://img.example.com/blue.jpg", "thumbnailUrl": "https://img.example.com/blue_t.jpg" },
                { "title": "broken", "imageUrl": "data:image/png;base64,AAAA" }
            ]
        })))
        .mount(&server)
        .await;
    let search = SerperImageSearch::with_endpoint(format!("{}/images", server.uri()), "serper-key").unwrap();

    let images = search.fetch("whales", 5).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].origin, ImageOrigin::Search);

    let model = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(&hero_layout())))
        .mount(&model)
        .await;
    let generation = LayoutGenerator::from_config(config_for(&model))
        .unwrap()
        .generate("whales")
        .await;
    let payload = RenderPayload::assemble(&generation, &search).await;
    assert_eq!(payload.blocks[0].images.len(), 1);
    assert_eq!(payload.blocks[0].images[0].url, "https://img.example.com/blue.jpg");
}

#[tokio::test]
async fn image_search_errors_surface_as_anyhow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let search = SerperImageSearch::with_endpoint(server.uri(), "bad-key").unwrap();
    let error = search.fetch("whales", 3).await.unwrap_err();
    assert!(error.to_string().contains("Invalid image search API key"));
}
