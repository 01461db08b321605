//! CLI styling for help output.

use clap::builder::styling::{AnsiColor, Effects, Styles};

/// Banter help theme.
pub fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Cyan.on_default())
        .invalid(AnsiColor::Yellow.on_default())
}

/// After-help section with environment variables documentation.
pub const AFTER_HELP: &str = r#"QUICK START
    banter ask "Tell me a joke."              One prompt, one reply
    banter -f chat.json chat                  Interactive chat, resumable from chat.json
    banter -f chat.json -p angry_assistant chat

ENVIRONMENT VARIABLES
    OPENAI_API_KEY       API key (legacy name OPEN_API_KEY is also read)
    OPENAI_BASE_URL      API base URL
    BANTER_MODEL         Default model
    BANTER_CONFIG        Settings file path
    BANTER_LOG_LEVEL     Log verbosity (error, warn, info, debug, trace)
    NO_COLOR             Disable colored output

A .env file in the working directory is loaded before anything else."#;
