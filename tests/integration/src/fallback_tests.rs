//! Fallback integration tests
//!
//! Tests for the manager's ordered fallback using real adapters against
//! mock vendors.

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_providers::*;
use gateway_config::{GatewayConfig, ProviderConfig};
use gateway_core::{CallOptions, GatewayError, ProviderKind};
use gateway_routing::GatewayManager;
use gateway_telemetry::{GatewayMetrics, Operation, Outcome};
use pretty_assertions::assert_eq;
use serde_json::Value;

/// Test that a working preferred vendor is the only one contacted
#[tokio::test]
async fn test_preferred_vendor_serves_call() {
    init_tracing();
    let cerebras = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    let gemini = MockGemini::new().await;
    cerebras.mock_chat_completion("llama-3.3-70b", "from cerebras").await;
    gemini.mock_generate_content("from gemini").await;

    let adapters = vec![
        shared(cerebras.provider().unwrap()),
        shared(gemini.provider().unwrap()),
    ];
    let manager = GatewayManager::new(adapters, Some(ProviderKind::Gemini)).unwrap();

    let response = manager.chat(&simple_conversation()).await.unwrap();
    assert_eq!(response.provider, "Gemini");
    assert_eq!(response.content, "from gemini");
    assert_eq!(gemini.calls().await, 1);
    assert_eq!(cerebras.calls().await, 0);
}

/// Test fallback from a failing vendor to the next in registration order
#[tokio::test]
async fn test_chat_falls_back_in_order() {
    let cerebras = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    let gemini = MockGemini::new().await;
    let openai = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    cerebras.mock_error(429, rate_limit_error_response()).await;
    gemini.mock_generate_content("from gemini").await;
    openai.mock_chat_completion("gpt-4o-mini", "from openai").await;

    let metrics = GatewayMetrics::new().unwrap();
    let manager = manager_with(vec![
        shared(cerebras.provider().unwrap()),
        shared(gemini.provider().unwrap()),
        shared(openai.provider().unwrap()),
    ])
    .with_metrics(metrics.clone());

    let response = manager.chat(&simple_conversation()).await.unwrap();

    assert_eq!(response.provider, "Gemini");
    assert_eq!(cerebras.calls().await, 1);
    assert_eq!(gemini.calls().await, 1);
    assert_eq!(openai.calls().await, 0);
    assert_eq!(metrics.attempts("Cerebras", Operation::Chat, Outcome::Failure), 1);
    assert_eq!(metrics.attempts("Gemini", Operation::Chat, Outcome::Success), 1);
    assert_eq!(metrics.fallbacks(Operation::Chat), 1);
}

/// Test that the last vendor serves the call when the first two fail
#[tokio::test]
async fn test_chat_skips_two_failing_vendors() {
    let cerebras = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    let gemini = MockGemini::new().await;
    let openai = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    cerebras.mock_server_error().await;
    gemini.mock_error(429, rate_limit_error_response()).await;
    openai.mock_chat_completion("gpt-4o-mini", "from openai").await;

    let metrics = GatewayMetrics::new().unwrap();
    let manager = GatewayManager::new(
        vec![
            shared(cerebras.provider().unwrap()),
            shared(gemini.provider().unwrap()),
            shared(openai.provider().unwrap()),
        ],
        Some(ProviderKind::Cerebras),
    )
    .unwrap()
    .with_metrics(metrics.clone());

    let response = manager.chat(&simple_conversation()).await.unwrap();

    assert_eq!(response.provider, "OpenAI");
    assert_eq!(response.content, "from openai");
    assert_eq!(cerebras.calls().await, 1);
    assert_eq!(gemini.calls().await, 1);
    assert_eq!(openai.calls().await, 1);
    assert_eq!(metrics.attempts("Cerebras", Operation::Chat, Outcome::Failure), 1);
    assert_eq!(metrics.attempts("Gemini", Operation::Chat, Outcome::Failure), 1);
    assert_eq!(metrics.attempts("OpenAI", Operation::Chat, Outcome::Success), 1);
    assert_eq!(metrics.fallbacks(Operation::Chat), 2);
    assert_eq!(metrics.total_failures(Operation::Chat), 0);
}

/// Test the aggregate error when every vendor fails
#[tokio::test]
async fn test_total_failure_names_every_vendor() {
    let cerebras = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    let gemini = MockGemini::new().await;
    cerebras.mock_server_error().await;
    gemini.mock_error(503, error_response("unavailable", "The model is overloaded.", "503")).await;

    let manager = manager_with(vec![
        shared(cerebras.provider().unwrap()),
        shared(gemini.provider().unwrap()),
    ]);

    let err = manager.chat(&simple_conversation()).await.unwrap_err();

    assert!(err.is_aggregate());
    assert!(err.message.contains("Cerebras"));
    assert!(err.message.contains("Internal server error"));
    assert!(err.message.contains("Gemini"));
    assert!(err.message.contains("The model is overloaded."));
    assert_eq!(err.causes.len(), 2);
    assert_eq!(err.causes[0].status, Some(500));
    assert_eq!(err.causes[1].status, Some(503));
}

/// Test that the model override only reaches the first vendor tried
#[tokio::test]
async fn test_model_override_not_sent_to_fallback() {
    let cerebras = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    let openai = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    cerebras.mock_server_error().await;
    openai.mock_chat_completion("gpt-4o-mini", "ok").await;

    let manager = manager_with(vec![
        shared(cerebras.provider().unwrap()),
        shared(openai.provider().unwrap()),
    ]);

    let options = CallOptions::new().with_model("llama-3.1-8b");
    manager.chat_with(&simple_conversation(), &options).await.unwrap();

    let first: Value = cerebras.requests().await[0].body_json().unwrap();
    let second: Value = openai.requests().await[0].body_json().unwrap();
    assert_eq!(first["model"], "llama-3.1-8b");
    assert_eq!(second["model"], "gpt-4o-mini");
}

/// Test building the manager from configuration
#[tokio::test]
async fn test_manager_from_config() {
    let gemini = MockGemini::new().await;
    let openai = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    gemini.mock_generate_content("from gemini").await;
    openai.mock_chat_completion("gpt-4o-mini", "from openai").await;

    let mut config = GatewayConfig::default();
    config.preferred_provider = Some(ProviderKind::OpenAI);
    config.gemini = ProviderConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_base_url(gemini.url());
    config.openai = ProviderConfig::default()
        .with_api_key(TEST_API_KEY)
        .with_base_url(openai.url());

    let manager = GatewayManager::from_config(&config).unwrap();
    assert_eq!(manager.provider_names(), vec!["Gemini", "OpenAI"]);
    assert_eq!(manager.preferred_provider(), ProviderKind::OpenAI);

    let response = manager.chat(&simple_conversation()).await.unwrap();
    assert_eq!(response.provider, "OpenAI");
    assert_eq!(gemini.calls().await, 0);
}

/// Test that a gateway with no vendors fails before any network call
#[test]
fn test_no_vendors_is_a_configuration_error() {
    let result = GatewayManager::from_config(&GatewayConfig::default());
    assert!(matches!(result, Err(GatewayError::Configuration { .. })));
}
