//! Chat completion client for Banter
//!
//! This crate talks to any OpenAI-compatible `/chat/completions` endpoint.
//! The conversation layer depends only on the [`CompletionService`] trait,
//! so the HTTP client can be swapped for a scripted one in tests.

mod client;
pub mod http_client;
mod models;

pub use client::OpenAiClient;
pub use models::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ResponseMessage, Role, Usage,
};

use async_trait::async_trait;

/// Default API base address.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Error types for chat completion calls
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// A remote model that turns a message list into one generated reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Run one completion and return the generated message text.
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}
