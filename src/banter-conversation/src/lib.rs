//! Conversation state for Banter.
//!
//! Keeps an ordered message log for one chat session, prunes it to a token
//! budget before every completion call, and persists it to a JSON file so a
//! later process can pick the conversation back up.
//!
//! # Features
//!
//! - **Personas**: named system prompts, switchable at runtime
//! - **Token budget**: oldest non-system turns are dropped first
//! - **Persistence**: the whole history is rewritten after each exchange
//!
//! # Example
//!
//! ```rust,no_run
//! use banter_conversation::{CompletionOverrides, ConversationManager, ConversationOptions};
//!
//! # async fn run() -> banter_conversation::Result<()> {
//! let config = ConversationOptions::default().resolve();
//! let mut manager = ConversationManager::from_config(config)?;
//! manager.set_persona("thoughtful_assistant")?;
//!
//! match manager
//!     .chat_completion("What is the best hostess gift?", CompletionOverrides::default())
//!     .await
//! {
//!     Ok(reply) => println!("{reply}"),
//!     Err(e) => eprintln!("no reply: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod manager;
pub mod persona;
pub mod tokenizer;

pub use banter_client::{ChatMessage as Message, Role};
pub use config::{
    ConversationConfig, ConversationOptions, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_SYSTEM_MESSAGE, DEFAULT_TEMPERATURE, DEFAULT_TOKEN_BUDGET,
};
pub use error::{ConversationError, HistoryError, Result};
pub use history::{HistoryStore, StoreLoad};
pub use manager::{CompletionOverrides, ConversationManager};
pub use persona::{CUSTOM_PERSONA, DEFAULT_PERSONA, PersonaTable};
pub use tokenizer::{FALLBACK_ENCODING, TiktokenCounter, Tokenizer};
