use super::*;
use std::collections::HashMap;
use std::io::Write;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn base_vars() -> HashMap<String, String> {
    vars(&[
        (ENV_API_URL, "https://api.example.com/v1/chat/completions"),
        (ENV_API_KEY, "sk-test"),
        (ENV_MODEL, "layout-model"),
    ])
}

#[test]
fn loads_required_variables_with_defaults() {
    let env = base_vars();
    let config = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

    assert_eq!(config.model, "layout-model");
    assert_eq!(config.generation.max_retries, 2);
    assert_eq!(config.request_timeout(), Duration::from_secs(15));
    assert_eq!(config.policy, LayoutPolicy { min_blocks: 1, max_blocks: 8 });
}

#[test]
fn reports_every_missing_variable() {
    let env = vars(&[(ENV_MODEL, "m")]);
    let err = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();

    match err {
        ConfigError::MissingVariables(missing) => {
            assert_eq!(missing, vec![ENV_API_URL.to_string(), ENV_API_KEY.to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blank_key_counts_as_missing() {
    let mut env = base_vars();
    env.insert(ENV_API_KEY.to_string(), "   ".to_string());
    let err = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVariables(ref m) if m == &vec![ENV_API_KEY.to_string()]));
}

#[test]
fn optional_overrides_are_parsed() {
    let mut env = base_vars();
    env.insert(ENV_MAX_RETRIES.to_string(), "4".to_string());
    env.insert(ENV_TIMEOUT_SECS.to_string(), "9".to_string());
    env.insert(ENV_MAX_BLOCKS.to_string(), "5".to_string());
    let config = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap();

    assert_eq!(config.generation.max_retries, 4);
    assert_eq!(config.request_timeout(), Duration::from_secs(9));
    assert_eq!(config.policy.max_blocks, 5);
}

#[test]
fn non_numeric_override_is_rejected() {
    let mut env = base_vars();
    env.insert(ENV_MAX_RETRIES.to_string(), "many".to_string());
    let err = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == ENV_MAX_RETRIES));
}

#[test]
fn retry_budget_is_capped() {
    let mut env = base_vars();
    env.insert(ENV_MAX_RETRIES.to_string(), "4294967295".to_string());
    let err = GeneratorConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "max_retries"));

    let config = GeneratorConfig::new("https://api.example.com", "k", "m");
    assert!(config.clone().with_max_retries(MAX_RETRY_LIMIT).validate().is_ok());
    assert!(config.with_max_retries(MAX_RETRY_LIMIT + 1).validate().is_err());
}

#[test]
fn inverted_block_bounds_are_rejected() {
    let config = GeneratorConfig::new("https://api.example.com", "k", "m")
        .with_policy(LayoutPolicy { min_blocks: 4, max_blocks: 2 });
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_blocks"
    ));
}

#[test]
fn non_http_url_is_rejected() {
    let config = GeneratorConfig::new("ftp://api.example.com", "k", "m");
    assert!(config.validate().is_err());

    let config = GeneratorConfig::new("not a url", "k", "m");
    assert!(config.validate().is_err());
}

#[test]
fn debug_output_redacts_the_key() {
    let config = GeneratorConfig::new("https://api.example.com", "sk-secret", "m");
    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn toml_file_takes_key_from_lookup() {
    let content = r#"
api_url = "https://api.example.com/v1/chat/completions"
model = "layout-model"

[generation]
max_retries = 1
request_timeout_seconds = 10
temperature = 0.5
max_tokens = 1024

[policy]
min_blocks = 2
max_blocks = 6
"#;
    let config =
        GeneratorConfig::from_toml_with_lookup(content, |_| Some("sk-from-env".to_string()))
            .unwrap();

    assert_eq!(config.api_key, "sk-from-env");
    assert_eq!(config.generation.max_retries, 1);
    assert_eq!(config.policy, LayoutPolicy { min_blocks: 2, max_blocks: 6 });
}

#[test]
fn toml_without_any_key_fails() {
    let content = r#"
api_url = "https://api.example.com"
model = "m"
"#;
    let err = GeneratorConfig::from_toml_with_lookup(content, |_| None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingVariables(_)));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "api_url = \"http://localhost:8080/v1/chat/completions\"\napi_key = \"k\"\nmodel = \"m\""
    )
    .unwrap();

    let config = GeneratorConfig::from_file(file.path()).unwrap();
    assert_eq!(config.api_url, "http://localhost:8080/v1/chat/completions");
    assert_eq!(config.generation, GenerationSettings::default());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = GeneratorConfig::from_file("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
