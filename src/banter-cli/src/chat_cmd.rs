//! Interactive chat loop.
//!
//! Every non-command line is sent as a prompt. Lines starting with `/` are
//! session commands; see [`HELP`].

use std::io::Write;

use anyhow::Result;
use banter_conversation::{CompletionOverrides, ConversationManager};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::styled_output::{print_dim, print_error, print_success};

pub const HELP: &str = "\
Commands:
  /persona <name>   switch to a named persona
  /custom <text>    use <text> as the persona
  /personas         list personas
  /reset            clear the history (keeps the persona)
  /tokens           show tokens used by the history
  /history          print the history
  /help             show this help
  /quit, /exit      leave the chat";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Prompt(String),
    Persona(String),
    Custom(String),
    Personas,
    Reset,
    Tokens,
    History,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Prompt(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "persona" => ReplCommand::Persona(arg.to_string()),
            "custom" => ReplCommand::Custom(arg.to_string()),
            "personas" => ReplCommand::Personas,
            "reset" => ReplCommand::Reset,
            "tokens" => ReplCommand::Tokens,
            "history" => ReplCommand::History,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" => ReplCommand::Quit,
            other => ReplCommand::Unknown(other.to_string()),
        }
    }
}

/// Write the personas as `name: text` lines, marking the active one.
pub fn write_personas(manager: &ConversationManager, out: &mut impl Write) -> Result<()> {
    for (name, text) in manager.personas().iter() {
        let marker = if text == manager.system_message() { "*" } else { " " };
        writeln!(out, "{marker} {name}: {text}")?;
    }
    Ok(())
}

/// Write the history as `Role: content` lines.
pub fn write_history(manager: &ConversationManager, out: &mut impl Write) -> Result<()> {
    for message in manager.history() {
        writeln!(out, "{}: {}", message.role.title(), message.content)?;
    }
    Ok(())
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run_repl<R, W>(
    manager: &mut ConversationManager,
    input: R,
    out: &mut W,
    show_prompt: bool,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    loop {
        if show_prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Prompt(prompt) => {
                match manager
                    .chat_completion(&prompt, CompletionOverrides::default())
                    .await
                {
                    Ok(reply) => writeln!(out, "{reply}")?,
                    Err(e) => print_error(&format!("No response: {e}")),
                }
            }
            ReplCommand::Persona(name) => match manager.set_persona(&name) {
                Ok(()) => print_success(&format!("Persona set to {name}")),
                Err(e) => print_error(&e.to_string()),
            },
            ReplCommand::Custom(text) => match manager.set_custom_system_message(&text) {
                Ok(()) => print_success("Custom persona set"),
                Err(e) => print_error(&e.to_string()),
            },
            ReplCommand::Personas => write_personas(manager, out)?,
            ReplCommand::Reset => {
                manager.reset();
                print_success("History reset");
            }
            ReplCommand::Tokens => writeln!(
                out,
                "{} / {} tokens",
                manager.total_tokens_used(),
                manager.config().token_budget
            )?,
            ReplCommand::History => write_history(manager, out)?,
            ReplCommand::Unknown(name) => {
                print_error(&format!("Unknown command /{name}. Type /help for commands."))
            }
        }
    }
    debug!(messages = manager.history().len(), "Chat session ended");
    print_dim(&format!("History saved in {}", manager.history_path().display()));
    Ok(())
}
