//! Token counting.
//!
//! Counts use the tiktoken encoding registered for the configured model.
//! Model ids tiktoken does not know fall back to `cl100k_base`.

use tiktoken_rs::{CoreBPE, cl100k_base, get_bpe_from_model};
use tracing::debug;

use crate::error::{ConversationError, Result};

/// Encoding used when the model id is not recognized.
pub const FALLBACK_ENCODING: &str = "cl100k_base";

/// Maps text to a token count.
pub trait Tokenizer: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Tokenizer backed by a tiktoken BPE.
pub struct TiktokenCounter {
    bpe: CoreBPE,
    fallback: bool,
}

impl TiktokenCounter {
    /// Load the encoding for `model`, or the fallback encoding.
    pub fn for_model(model: &str) -> Result<Self> {
        match get_bpe_from_model(model) {
            Ok(bpe) => Ok(Self {
                bpe,
                fallback: false,
            }),
            Err(e) => {
                debug!(model, error = %e, "No tokenizer for model, using {FALLBACK_ENCODING}");
                let bpe = cl100k_base().map_err(|e| ConversationError::Tokenizer(e.to_string()))?;
                Ok(Self {
                    bpe,
                    fallback: true,
                })
            }
        }
    }

    /// Whether the fallback encoding is in use.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl Tokenizer for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl std::fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenCounter")
            .field("fallback", &self.fallback)
            .finish_non_exhaustive()
    }
}
