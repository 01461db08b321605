//! Conversation configuration.

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = banter_client::DEFAULT_BASE_URL;
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 512;
pub const DEFAULT_TOKEN_BUDGET: usize = 4096;
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are a sassy assistant who is fed up with answering questions.";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = banter_client::http_client::COMPLETION_TIMEOUT.as_secs();

/// Environment variables consulted for the credential, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["OPENAI_API_KEY", "OPEN_API_KEY"];

/// Construction options. Every field is optional and defaults on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationOptions {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub history_file: Option<PathBuf>,
    #[serde(deserialize_with = "deserialize_temperature")]
    pub temperature: Option<f32>,
    /// Zero counts as unset.
    pub max_tokens: Option<u32>,
    /// Zero counts as unset.
    pub token_budget: Option<usize>,
    pub system_message: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Deserialize temperature with validation (must be 0.0-2.0).
fn deserialize_temperature<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f32>::deserialize(deserializer)?;
    if let Some(t) = value
        && !(0.0..=2.0).contains(&t)
    {
        return Err(serde::de::Error::custom(
            "temperature must be between 0.0 and 2.0",
        ));
    }
    Ok(value)
}

impl ConversationOptions {
    /// Fill in defaults, reading the credential from the process environment.
    pub fn resolve(self) -> ConversationConfig {
        self.resolve_with_env(|name| std::env::var(name).ok())
    }

    /// Fill in defaults using `env` to look up environment variables.
    pub fn resolve_with_env(self, env: impl Fn(&str) -> Option<String>) -> ConversationConfig {
        let api_key = non_empty(self.api_key).or_else(|| {
            API_KEY_ENV_VARS
                .iter()
                .find_map(|name| non_empty(env(name)))
        });
        ConversationConfig {
            api_key,
            base_url: non_empty(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: non_empty(self.model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            history_path: self
                .history_file
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| default_history_path(Local::now())),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: self
                .max_tokens
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            token_budget: self
                .token_budget
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_TOKEN_BUDGET),
            system_message: non_empty(self.system_message),
            request_timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: ConversationOptions) -> ConversationOptions {
        ConversationOptions {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            model: other.model.or(self.model),
            history_file: other.history_file.or(self.history_file),
            temperature: other.temperature.or(self.temperature),
            max_tokens: other.max_tokens.or(self.max_tokens),
            token_budget: other.token_budget.or(self.token_budget),
            system_message: other.system_message.or(self.system_message),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `conversation_history_<YYYYmmdd_HHMMSS>.json` in the working directory.
///
/// Resolution is one second: two managers created in the same second
/// without an explicit path share a file.
pub fn default_history_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "conversation_history_{}.json",
        now.format("%Y%m%d_%H%M%S")
    ))
}

/// Resolved configuration, fixed for the lifetime of a manager.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub history_path: PathBuf,
    pub temperature: f32,
    pub max_tokens: u32,
    pub token_budget: usize,
    /// Explicit initial system message, if one was supplied.
    pub system_message: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        ConversationOptions::default().resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = ConversationOptions::default().resolve_with_env(no_env);
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.token_budget, 4096);
        assert_eq!(config.system_message, None);
        assert_eq!(config.request_timeout, Duration::from_secs(300));
        let name = config.history_path.to_string_lossy().to_string();
        assert!(name.starts_with("conversation_history_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_empty_strings_fall_back() {
        let options = ConversationOptions {
            api_key: Some(String::new()),
            base_url: Some(String::new()),
            model: Some(String::new()),
            history_file: Some(PathBuf::new()),
            system_message: Some(String::new()),
            ..Default::default()
        };
        let config = options.resolve_with_env(no_env);
        assert_eq!(config.api_key, None);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.system_message, None);
        assert!(config.history_path.to_string_lossy().starts_with("conversation_history_"));
    }

    #[test]
    fn test_zero_limits_fall_back() {
        let options = ConversationOptions {
            temperature: Some(0.0),
            max_tokens: Some(0),
            token_budget: Some(0),
            ..Default::default()
        };
        let config = options.resolve_with_env(no_env);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(config.token_budget, DEFAULT_TOKEN_BUDGET);
    }

    #[test]
    fn test_api_key_env_order() {
        let env = |name: &str| match name {
            "OPEN_API_KEY" => Some("legacy".to_string()),
            _ => None,
        };
        let config = ConversationOptions::default().resolve_with_env(env);
        assert_eq!(config.api_key.as_deref(), Some("legacy"));

        let env = |name: &str| Some(format!("{name}-value"));
        let config = ConversationOptions::default().resolve_with_env(env);
        assert_eq!(config.api_key.as_deref(), Some("OPENAI_API_KEY-value"));

        let explicit = ConversationOptions {
            api_key: Some("explicit".into()),
            ..Default::default()
        };
        assert_eq!(
            explicit.resolve_with_env(env).api_key.as_deref(),
            Some("explicit")
        );
    }

    #[test]
    fn test_default_history_path_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            default_history_path(now),
            PathBuf::from("conversation_history_20240309_070501.json")
        );
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = ConversationOptions {
            model: Some("gpt-4".into()),
            token_budget: Some(100),
            ..Default::default()
        };
        let overlay = ConversationOptions {
            model: Some("gpt-4o".into()),
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.model.as_deref(), Some("gpt-4o"));
        assert_eq!(merged.token_budget, Some(100));
    }

    #[test]
    fn test_temperature_validation() {
        let ok: ConversationOptions = serde_json::from_str(r#"{"temperature": 1.5}"#).unwrap();
        assert_eq!(ok.temperature, Some(1.5));

        let err = serde_json::from_str::<ConversationOptions>(r#"{"temperature": 3.0}"#);
        assert!(err.is_err());
    }
}
