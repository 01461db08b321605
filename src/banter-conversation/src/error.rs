//! Error types for banter-conversation.

use thiserror::Error;

/// History store errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// IO error while reading or writing the store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// History could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Conversation manager errors.
#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("Unknown persona: {name}. Available personas are: {}", available.join(", "))]
    UnknownPersona { name: String, available: Vec<String> },

    #[error("Custom message cannot be empty")]
    EmptyCustomMessage,

    #[error("History store error: {0}")]
    History(#[from] HistoryError),

    #[error("Tokenizer unavailable: {0}")]
    Tokenizer(String),

    #[error("Completion client error: {0}")]
    Client(#[from] banter_client::ClientError),
}

/// Result type for conversation operations.
pub type Result<T> = std::result::Result<T, ConversationError>;
