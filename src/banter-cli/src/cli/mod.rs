//! CLI argument parsing and command dispatch.
//!
//! - `args` - Command-line argument structures
//! - `styles` - ANSI styling for help output
//! - `handlers` - Command execution handlers

pub mod args;
pub mod handlers;
pub mod styles;

pub use args::{AskArgs, Cli, Commands, ConversationArgs, LogLevel, TokensArgs};
pub use handlers::dispatch_command;

#[cfg(test)]
mod tests;
