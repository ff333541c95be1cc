//! Test fixtures and sample data for integration tests

use gateway_core::ChatMessage;
use serde_json::{json, Value};

/// A single user turn
pub fn simple_conversation() -> Vec<ChatMessage> {
    vec![ChatMessage::user("Hello, how are you?")]
}

/// A conversation with a leading system prompt and retrieved context
pub fn conversation_with_system(system: &str, user: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(system),
        ChatMessage::system("Context: TCP is connection-oriented."),
        ChatMessage::user(user),
    ]
}

/// A multi-turn conversation
pub fn multi_turn_conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::system("You are a networking tutor."),
        ChatMessage::user("What is 2 + 2?"),
        ChatMessage::assistant("2 + 2 equals 4."),
        ChatMessage::user("And what is that multiplied by 3?"),
    ]
}

/// Chat-completions response body
pub fn openai_json_response(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-test123",
        "object": "chat.completion",
        "created": 1698959748,
        "model": model,
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 15,
            "completion_tokens": 12,
            "total_tokens": 27
        }
    })
}

/// Chat-completions response body without a usage block
pub fn openai_json_response_without_usage(model: &str, content: &str) -> Value {
    json!({
        "id": "chatcmpl-test456",
        "object": "chat.completion",
        "model": model,
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

/// Chat-completions streaming chunk
pub fn openai_streaming_chunk(model: &str, content: &str, is_done: bool) -> Value {
    if is_done {
        json!({
            "id": "chatcmpl-test123",
            "object": "chat.completion.chunk",
            "created": 1698959748,
            "model": model,
            "choices": [
                {
                    "index": 0,
                    "delta": {},
                    "finish_reason": "stop"
                }
            ]
        })
    } else {
        json!({
            "id": "chatcmpl-test123",
            "object": "chat.completion.chunk",
            "created": 1698959748,
            "model": model,
            "choices": [
                {
                    "index": 0,
                    "delta": {
                        "content": content
                    },
                    "finish_reason": null
                }
            ]
        })
    }
}

/// generateContent response body
pub fn gemini_json_response(content: &str) -> Value {
    json!({
        "candidates": [
            {
                "content": {
                    "role": "model",
                    "parts": [{ "text": content }]
                },
                "finishReason": "STOP",
                "index": 0
            }
        ],
        "usageMetadata": {
            "promptTokenCount": 9,
            "candidatesTokenCount": 6,
            "totalTokenCount": 15
        },
        "modelVersion": "gemini-1.5-flash-002"
    })
}

/// streamGenerateContent record
pub fn gemini_streaming_chunk(content: &str, is_done: bool) -> Value {
    let mut candidate = json!({
        "content": {
            "role": "model",
            "parts": [{ "text": content }]
        },
        "index": 0
    });
    if is_done {
        candidate["finishReason"] = json!("STOP");
    }
    json!({ "candidates": [candidate] })
}

/// Vendor error body shared by all three vendors
pub fn error_response(error_type: &str, message: &str, code: &str) -> Value {
    json!({
        "error": {
            "type": error_type,
            "message": message,
            "code": code
        }
    })
}

/// Rate limit error body
pub fn rate_limit_error_response() -> Value {
    error_response(
        "rate_limit_error",
        "Rate limit exceeded. Please retry after 60 seconds.",
        "rate_limit_exceeded",
    )
}

/// Authentication error body
pub fn auth_error_response() -> Value {
    error_response(
        "authentication_error",
        "Invalid API key provided.",
        "invalid_api_key",
    )
}

/// Server error body
pub fn server_error_response() -> Value {
    error_response("server_error", "Internal server error", "internal_error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateway_core::MessageRole;

    #[test]
    fn test_conversation_with_system() {
        let messages = conversation_with_system("Be brief.", "Hi");
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[2].role, MessageRole::User);
    }

    #[test]
    fn test_gemini_streaming_chunk() {
        assert!(gemini_streaming_chunk("a", false)["candidates"][0].get("finishReason").is_none());
        assert_eq!(gemini_streaming_chunk("b", true)["candidates"][0]["finishReason"], "STOP");
    }
}
