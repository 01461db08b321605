//! Banter CLI library.
//!
//! - `cli/` - Command-line argument parsing and dispatch
//! - `chat_cmd` - Interactive chat loop
//! - `settings` - Settings file loading
//! - `styled_output` - Status lines on stderr

pub mod chat_cmd;
pub mod cli;
pub mod settings;
pub mod styled_output;

use cli::LogLevel;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LogLevel) {
    let lvl = level.as_filter_str();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,banter_cli={lvl},banter_conversation={lvl},banter_client={lvl}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
