//! LLM Client Layer - one-shot text completion
//!
//! - LlmClient trait for API abstraction
//! - GeminiClient over the Gemini REST API
//! - MockLlmClient with scripted replies

pub mod client;
pub mod gemini;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{CompletionRequest, CompletionResponse, Usage};
