//! Settings file loading.
//!
//! The settings file is TOML whose keys mirror the command-line options:
//!
//! ```toml
//! model = "gpt-4o-mini"
//! history_file = "/home/me/.local/share/banter/chat.json"
//! temperature = 0.4
//! token_budget = 8000
//! persona = "thoughtful_assistant"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use banter_conversation::ConversationOptions;
use serde::Deserialize;
use tracing::debug;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV_VAR: &str = "BANTER_CONFIG";

/// Settings file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub conversation: ConversationOptions,
    /// Persona to activate after loading history.
    pub persona: Option<String>,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid settings file")
    }
}

/// `<config dir>/banter/config.toml`, if a config directory exists.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("banter").join(CONFIG_FILE))
}

/// Load settings.
///
/// An explicit path (flag or [`CONFIG_ENV_VAR`]) must exist; the default
/// path is optional.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let from_env = std::env::var_os(CONFIG_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    match explicit.map(Path::to_path_buf).or(from_env) {
        Some(path) => read_settings(&path),
        None => match default_settings_path() {
            Some(path) if path.exists() => read_settings(&path),
            _ => Ok(Settings::default()),
        },
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = Settings::from_toml(&content)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
    debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}
