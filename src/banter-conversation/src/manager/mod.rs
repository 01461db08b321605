//! Conversation manager: owns the message log for one chat session.

use std::path::Path;
use std::sync::Arc;

use banter_client::{ChatRequest, ClientError, CompletionService, OpenAiClient};
use tracing::{debug, error, info, warn};

use crate::config::ConversationConfig;
use crate::error::{ConversationError, Result};
use crate::history::{HistoryStore, StoreLoad};
use crate::persona::{CUSTOM_PERSONA, DEFAULT_PERSONA, PersonaTable};
use crate::tokenizer::{TiktokenCounter, Tokenizer};
use crate::Message;


/// Per-call overrides for a completion. Unset fields use the configured values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOverrides {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Maintains the ordered message log, persona and token budget for a
/// single conversation, and persists the log after every exchange.
///
/// History invariant: at most one system message, and only at index 0.
pub struct ConversationManager {
    config: ConversationConfig,
    personas: PersonaTable,
    system_message: String,
    history: Vec<Message>,
    store: HistoryStore,
    tokenizer: Box<dyn Tokenizer>,
    service: Arc<dyn CompletionService>,
}

impl ConversationManager {
    /// Build a manager with the default HTTP client for `config`.
    pub fn from_config(config: ConversationConfig) -> Result<Self> {
        let client = OpenAiClient::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.request_timeout,
        )?;
        if !client.has_api_key() {
            warn!("No API key configured; requests will be sent without credentials");
        }
        Self::new(config, Arc::new(client))
    }

    /// Build a manager using `service` for completions and the tiktoken
    /// encoding of the configured model for counting.
    pub fn new(config: ConversationConfig, service: Arc<dyn CompletionService>) -> Result<Self> {
        let tokenizer = TiktokenCounter::for_model(&config.model)?;
        Self::with_tokenizer(config, service, Box::new(tokenizer))
    }

    /// Build a manager with explicit collaborators.
    ///
    /// Fails only when the history store exists but cannot be read.
    pub fn with_tokenizer(
        config: ConversationConfig,
        service: Arc<dyn CompletionService>,
        tokenizer: Box<dyn Tokenizer>,
    ) -> Result<Self> {
        let personas = PersonaTable::builtin();
        // The default persona always wins over an explicit initial message.
        if let Some(explicit) = &config.system_message {
            warn!(
                system_message = %explicit,
                persona = DEFAULT_PERSONA,
                "Initial system message is ignored; the default persona is selected at startup"
            );
        }
        let system_message = personas
            .get(DEFAULT_PERSONA)
            .map(str::to_string)
            .unwrap_or_default();
        let store = HistoryStore::new(config.history_path.clone());

        let mut manager = Self {
            config,
            personas,
            system_message,
            history: Vec::new(),
            store,
            tokenizer,
            service,
        };
        manager.history = manager.load_history()?;
        Ok(manager)
    }

    fn fresh_history(&self) -> Vec<Message> {
        vec![Message::system(self.system_message.clone())]
    }

    fn load_history(&self) -> Result<Vec<Message>> {
        match self.store.load()? {
            StoreLoad::Loaded(messages) => {
                info!(
                    path = %self.store.path().display(),
                    messages = messages.len(),
                    "Resumed conversation history"
                );
                Ok(messages)
            }
            StoreLoad::Missing => {
                debug!(path = %self.store.path().display(), "No history store, starting fresh");
                Ok(self.fresh_history())
            }
            StoreLoad::Malformed(e) => {
                warn!(
                    path = %self.store.path().display(),
                    error = %e,
                    "Error reading the conversation history file. Starting with an empty history."
                );
                Ok(self.fresh_history())
            }
        }
    }

    /// Persist the full history. Failures are logged and otherwise ignored.
    fn save_history(&self) {
        if let Err(e) = self.store.save(&self.history) {
            error!(
                path = %self.store.path().display(),
                error = %e,
                "An I/O error occurred while saving the conversation history"
            );
        }
    }

    // ========================================================================
    // Personas
    // ========================================================================

    /// Make `name` the active persona and sync it into the history.
    pub fn set_persona(&mut self, name: &str) -> Result<()> {
        let Some(text) = self.personas.get(name) else {
            return Err(ConversationError::UnknownPersona {
                name: name.to_string(),
                available: self.personas.names(),
            });
        };
        self.system_message = text.to_string();
        self.sync_system_message();
        debug!(persona = name, "Persona changed");
        Ok(())
    }

    /// Register `text` as the custom persona and activate it.
    pub fn set_custom_system_message(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Err(ConversationError::EmptyCustomMessage);
        }
        self.personas.set_custom(text);
        self.set_persona(CUSTOM_PERSONA)
    }

    /// Overwrite the leading system entry, or insert one at index 0.
    fn sync_system_message(&mut self) {
        if self.history.first().is_some_and(Message::is_system) {
            self.history[0].content.clone_from(&self.system_message);
        } else {
            self.history
                .insert(0, Message::system(self.system_message.clone()));
        }
    }

    // ========================================================================
    // Token accounting
    // ========================================================================

    pub fn count_tokens(&self, text: &str) -> usize {
        self.tokenizer.count(text)
    }

    /// Sum of token counts over every message in the history.
    pub fn total_tokens_used(&self) -> usize {
        self.history
            .iter()
            .map(|m| self.count_tokens(&m.content))
            .sum()
    }

    /// Drop the oldest non-system entries until the history fits the budget.
    ///
    /// Stops once a single entry is left, even if it alone exceeds the
    /// budget. Returns the number of entries removed.
    pub fn enforce_token_budget(&mut self) -> usize {
        let mut removed = 0;
        let mut total = self.total_tokens_used();
        while total > self.config.token_budget && self.history.len() > 1 {
            let dropped = self.history.remove(1);
            total -= self.count_tokens(&dropped.content);
            removed += 1;
        }
        if removed > 0 {
            debug!(
                removed,
                total_tokens = total,
                budget = self.config.token_budget,
                "Pruned history to token budget"
            );
        }
        removed
    }

    // ========================================================================
    // Completion cycle
    // ========================================================================

    /// Send `prompt` with the conversation so far and record the reply.
    ///
    /// On failure the prompt stays in the history unanswered and the store
    /// is left untouched.
    pub async fn chat_completion(
        &mut self,
        prompt: &str,
        overrides: CompletionOverrides,
    ) -> std::result::Result<String, ClientError> {
        let temperature = overrides.temperature.unwrap_or(self.config.temperature);
        let max_tokens = overrides.max_tokens.unwrap_or(self.config.max_tokens);

        self.history.push(Message::user(prompt));
        self.enforce_token_budget();

        let request = ChatRequest::new(
            self.config.model.clone(),
            self.history.clone(),
            temperature,
            max_tokens,
        );

        let reply = match self.service.complete(&request).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "An error occurred while generating a response");
                return Err(e);
            }
        };

        self.history.push(Message::assistant(reply.clone()));
        self.save_history();
        Ok(reply)
    }

    /// Replace the history with the current system message alone.
    pub fn reset(&mut self) {
        self.history = self.fresh_history();
        self.save_history();
        info!(path = %self.store.path().display(), "Conversation history reset");
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Text of the active persona.
    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    pub fn personas(&self) -> &PersonaTable {
        &self.personas
    }

    pub fn config(&self) -> &ConversationConfig {
        &self.config
    }

    pub fn history_path(&self) -> &Path {
        self.store.path()
    }
}

impl std::fmt::Debug for ConversationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationManager")
            .field("model", &self.config.model)
            .field("history_path", &self.store.path())
            .field("messages", &self.history.len())
            .finish_non_exhaustive()
    }
}
