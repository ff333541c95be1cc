//! Provider integration tests
//!
//! Tests for each adapter against a mock vendor: request translation,
//! response parsing and error handling.

use crate::fixtures::*;
use crate::helpers::*;
use crate::mock_providers::*;
use gateway_core::{ChatAdapter, ProviderKind, Usage};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

/// Test Cerebras chat against the chat-completions API
#[tokio::test]
async fn test_cerebras_chat() {
    init_tracing();
    let mock = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    mock.mock_chat_completion("llama-3.3-70b", "Hello from Cerebras").await;

    let provider = mock.provider().unwrap();
    let response = provider.chat(&simple_conversation(), None).await.unwrap();

    assert_eq!(response.content, "Hello from Cerebras");
    assert_eq!(response.provider, "Cerebras");
    assert_eq!(response.model, "llama-3.3-70b");
    assert_eq!(response.usage, Some(Usage::new(15, 12, Some(27))));
}

/// Test the chat-completions request body and authentication
#[tokio::test]
async fn test_openai_request_translation() {
    let mock = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    mock.mock_chat_completion("gpt-4o-mini", "ok").await;

    let provider = mock.provider().unwrap();
    provider.chat(&multi_turn_conversation(), None).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 1);
    let request = &requests[0];

    let auth = request.headers.get("authorization").unwrap().to_str().unwrap();
    assert_eq!(auth, format!("Bearer {TEST_API_KEY}"));

    let body: Value = request.body_json().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["stream"], false);
    assert_eq!(body["max_tokens"], 2048);
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "You are a networking tutor."},
            {"role": "user", "content": "What is 2 + 2?"},
            {"role": "assistant", "content": "2 + 2 equals 4."},
            {"role": "user", "content": "And what is that multiplied by 3?"}
        ])
    );
}

/// Test that identical conversations produce identical request bodies
#[tokio::test]
async fn test_request_translation_is_deterministic() {
    let mock = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    mock.mock_chat_completion("llama-3.3-70b", "ok").await;

    let provider = mock.provider().unwrap();
    let conversation = multi_turn_conversation();
    provider.chat(&conversation, None).await.unwrap();
    provider.chat(&conversation, None).await.unwrap();

    let requests = mock.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

/// Test the per-call model override
#[tokio::test]
async fn test_model_override_sent_to_vendor() {
    let mock = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    mock.mock_chat_completion("gpt-4o", "ok").await;

    let provider = mock.provider().unwrap();
    let response = provider.chat(&simple_conversation(), Some("gpt-4o")).await.unwrap();

    let body: Value = mock.requests().await[0].body_json().unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(response.model, "gpt-4o");
}

/// Test that absent usage is not fabricated
#[tokio::test]
async fn test_absent_usage_stays_absent() {
    let mock = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    mock.mock_chat_body(openai_json_response_without_usage("gpt-4o-mini", "no counts"))
        .await;

    let response = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap();
    assert_eq!(response.content, "no counts");
    assert_eq!(response.usage, None);
}

/// Test a 200 response without completion content
#[tokio::test]
async fn test_missing_completion_is_an_error() {
    let mock = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    mock.mock_chat_body(json!({"id": "x", "choices": []})).await;

    let err = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap_err();
    assert_eq!(err.provider, "OpenAI");
    assert_eq!(err.status, Some(200));
    assert!(err.payload.unwrap().contains("\"choices\""));
}

/// Test that vendor error bodies are unpacked and kept
#[tokio::test]
async fn test_auth_error_keeps_status_and_body() {
    let mock = MockOpenAICompat::new(ProviderKind::OpenAI).await;
    mock.mock_error(401, auth_error_response()).await;

    let err = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap_err();
    assert_eq!(err.provider, "OpenAI");
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "HTTP 401: Invalid API key provided.");
    assert!(err.payload.unwrap().contains("invalid_api_key"));
}

/// Test that one failed HTTP call is one failed operation
#[tokio::test]
async fn test_no_retry_on_server_error() {
    let mock = MockOpenAICompat::new(ProviderKind::Cerebras).await;
    mock.mock_server_error().await;

    let err = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap_err();
    assert_eq!(err.status, Some(500));
    assert_eq!(mock.calls().await, 1);
}

/// Test a connection failure
#[tokio::test]
async fn test_unreachable_vendor() {
    let config = gateway_providers::OpenAICompatConfig::cerebras(TEST_API_KEY)
        .with_base_url("http://127.0.0.1:1/v1");
    let provider = gateway_providers::OpenAICompatProvider::new(config).unwrap();

    let err = provider.chat(&simple_conversation(), None).await.unwrap_err();
    assert_eq!(err.provider, "Cerebras");
    assert_eq!(err.status, None);
    assert!(err.message.starts_with("Request failed"));
}

/// Test Gemini chat against the generateContent API
#[tokio::test]
async fn test_gemini_chat() {
    let mock = MockGemini::new().await;
    mock.mock_generate_content("Hello from Gemini").await;

    let response = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap();

    assert_eq!(response.content, "Hello from Gemini");
    assert_eq!(response.provider, "Gemini");
    assert_eq!(response.model, "gemini-1.5-flash-002");
    assert_eq!(response.usage, Some(Usage::new(9, 6, Some(15))));
}

/// Test that system messages go to systemInstruction and never into contents
#[tokio::test]
async fn test_gemini_system_message_extraction() {
    let mock = MockGemini::new().await;
    mock.mock_generate_content("ok").await;

    let conversation = conversation_with_system("You are a tutor.", "Explain TCP.");
    mock.provider().unwrap().chat(&conversation, None).await.unwrap();

    let body: Value = mock.requests().await[0].body_json().unwrap();
    assert_eq!(
        body["systemInstruction"]["parts"],
        json!([
            {"text": "You are a tutor."},
            {"text": "Context: TCP is connection-oriented."}
        ])
    );
    assert_eq!(
        body["contents"],
        json!([{"role": "user", "parts": [{"text": "Explain TCP."}]}])
    );
    assert!(body.get("stream").is_none());
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
}

/// Test that assistant turns are sent with the model role
#[tokio::test]
async fn test_gemini_assistant_role_mapping() {
    let mock = MockGemini::new().await;
    mock.mock_generate_content("12").await;

    mock.provider().unwrap().chat(&multi_turn_conversation(), None).await.unwrap();

    let body: Value = mock.requests().await[0].body_json().unwrap();
    let roles: Vec<&str> = body["contents"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["role"].as_str().unwrap())
        .collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
}

/// Test a Gemini error response
#[tokio::test]
async fn test_gemini_error() {
    let mock = MockGemini::new().await;
    mock.mock_error(
        400,
        json!({"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}),
    )
    .await;

    let err = mock.provider().unwrap().chat(&simple_conversation(), None).await.unwrap_err();
    assert_eq!(err.provider, "Gemini");
    assert_eq!(err.status, Some(400));
    assert_eq!(err.message, "HTTP 400: API key not valid.");
}
