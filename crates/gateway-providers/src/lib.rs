//! # Gateway Providers
//!
//! Vendor adapters for the inference gateway.
//!
//! Each adapter translates the canonical conversation into one vendor's wire
//! format and decodes the vendor's JSON or event-stream response:
//! - Cerebras and OpenAI share the chat-completions format (`openai` module)
//! - Google Gemini uses the generateContent format (`google` module)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod http;
pub mod sse;

pub mod google;
pub mod openai;

// Re-export main types
pub use google::{GeminiConfig, GeminiProvider, GEMINI_BASE_URL};
pub use openai::{OpenAICompatConfig, OpenAICompatProvider, CEREBRAS_BASE_URL, OPENAI_BASE_URL};
