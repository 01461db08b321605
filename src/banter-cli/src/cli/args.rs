//! Command-line argument definitions.

use std::path::PathBuf;

use banter_conversation::ConversationOptions;
use clap::{Args, Parser, Subcommand};

use super::styles::{AFTER_HELP, get_styles};

/// Log level for tracing output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Only show errors
    Error,
    /// Show warnings and errors (default)
    #[default]
    Warn,
    /// Show informational messages, warnings, and errors
    Info,
    /// Show debug messages and above
    Debug,
    /// Show all messages including trace-level details
    Trace,
}

impl LogLevel {
    /// Convert to tracing filter string.
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<LogLevel> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Banter - chat with a persona that remembers the conversation
#[derive(Debug, Parser)]
#[command(name = "banter")]
#[command(author, version)]
#[command(about = "Banter - persona chat over any OpenAI-compatible API", long_about = None)]
#[command(styles = get_styles(), after_help = AFTER_HELP)]
pub struct Cli {
    #[command(flatten)]
    pub conversation: ConversationArgs,

    /// Settings file (default: $BANTER_CONFIG or <config dir>/banter/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (same as --log-level debug)
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    /// Log verbosity
    #[arg(long = "log-level", value_enum, global = true, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shaping the conversation. Unset options fall back to the
/// settings file, then to built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub struct ConversationArgs {
    /// API key sent as a bearer credential
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, env = "OPENAI_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Model identifier
    #[arg(long, short = 'm', env = "BANTER_MODEL", global = true)]
    pub model: Option<String>,

    /// History store file (default: conversation_history_<timestamp>.json)
    #[arg(long, short = 'f', value_name = "PATH", global = true)]
    pub history_file: Option<PathBuf>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long, short = 't', global = true, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Maximum tokens per reply
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Maximum tokens the history may occupy
    #[arg(long, global = true)]
    pub token_budget: Option<usize>,

    /// Initial system message (the default persona still applies at startup)
    #[arg(long, global = true)]
    pub system_message: Option<String>,

    /// Persona to activate after loading history
    #[arg(long, short = 'p', global = true, conflicts_with = "custom_persona")]
    pub persona: Option<String>,

    /// Custom persona text to activate after loading history
    #[arg(long, global = true)]
    pub custom_persona: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,
}

fn parse_temperature(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if (0.0..=2.0).contains(&value) {
        Ok(value)
    } else {
        Err("temperature must be between 0.0 and 2.0".to_string())
    }
}

impl ConversationArgs {
    /// Options set on the command line.
    pub fn to_options(&self) -> ConversationOptions {
        ConversationOptions {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            history_file: self.history_file.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            token_budget: self.token_budget,
            system_message: self.system_message.clone(),
            request_timeout_secs: self.timeout_secs,
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send one prompt and print the reply
    Ask(AskArgs),

    /// Start an interactive chat session
    Chat,

    /// List the available personas
    Personas,

    /// Print the stored conversation history
    History,

    /// Count tokens of TEXT, or of the stored history when TEXT is omitted
    Tokens(TokensArgs),

    /// Reset the stored history to the system message
    Reset,
}

/// Arguments for the ask command.
#[derive(Debug, Args)]
pub struct AskArgs {
    /// Prompt text
    #[arg(required = true, trailing_var_arg = true)]
    pub prompt: Vec<String>,
}

impl AskArgs {
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ")
    }
}

/// Arguments for the tokens command.
#[derive(Debug, Args)]
pub struct TokensArgs {
    /// Text to count
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,
}
