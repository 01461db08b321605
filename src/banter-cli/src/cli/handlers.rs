//! Command dispatch and execution handlers.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use banter_conversation::{
    CompletionOverrides, ConversationConfig, ConversationManager, TiktokenCounter, Tokenizer,
};
use tokio::io::BufReader;
use tracing::debug;

use super::args::*;
use crate::chat_cmd::{run_repl, write_history, write_personas};
use crate::settings::{Settings, load_settings};
use crate::styled_output::{print_dim, print_info, print_success};

/// Persona to activate once the history is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonaChoice {
    Named(String),
    Custom(String),
}

/// Layer the command line over the settings file and resolve the result.
///
/// Command-line values win; a persona given on the command line replaces
/// the one from the settings file.
pub fn resolve_session(
    settings: Settings,
    args: &ConversationArgs,
) -> (ConversationConfig, Option<PersonaChoice>) {
    let config = settings.conversation.merge(args.to_options()).resolve();
    let persona = match (&args.custom_persona, &args.persona) {
        (Some(text), _) => Some(PersonaChoice::Custom(text.clone())),
        (None, Some(name)) => Some(PersonaChoice::Named(name.clone())),
        (None, None) => settings.persona.map(PersonaChoice::Named),
    };
    (config, persona)
}

fn open_manager(cli: &Cli) -> Result<ConversationManager> {
    let settings = load_settings(cli.config.as_deref())?;
    let named_history = settings.conversation.history_file.is_some()
        || cli.conversation.history_file.is_some();
    let (config, persona) = resolve_session(settings, &cli.conversation);
    if !named_history {
        print_info(&format!(
            "No history file configured; this session uses {}",
            config.history_path.display()
        ));
    }
    debug!(model = %config.model, history = %config.history_path.display(), "Opening conversation");

    let mut manager = ConversationManager::from_config(config)
        .context("Failed to open the conversation")?;
    match persona {
        Some(PersonaChoice::Named(name)) => manager.set_persona(&name)?,
        Some(PersonaChoice::Custom(text)) => manager.set_custom_system_message(&text)?,
        None => {}
    }
    Ok(manager)
}

/// Dispatch a CLI command to its handler.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Ask(args) => run_ask(&cli, args).await,
        Commands::Chat => run_chat(&cli).await,
        Commands::Personas => {
            let manager = open_manager(&cli)?;
            write_personas(&manager, &mut io::stdout().lock())
        }
        Commands::History => {
            let manager = open_manager(&cli)?;
            write_history(&manager, &mut io::stdout().lock())
        }
        Commands::Tokens(args) => run_tokens(&cli, args),
        Commands::Reset => {
            let mut manager = open_manager(&cli)?;
            manager.reset();
            print_success(&format!(
                "History reset in {}",
                manager.history_path().display()
            ));
            Ok(())
        }
    }
}

async fn run_ask(cli: &Cli, args: &AskArgs) -> Result<()> {
    let prompt = args.prompt_text();
    if prompt.trim().is_empty() {
        bail!("Prompt is empty");
    }
    let mut manager = open_manager(cli)?;
    let reply = manager
        .chat_completion(&prompt, CompletionOverrides::default())
        .await
        .context("No response from the model")?;
    writeln!(io::stdout().lock(), "{reply}")?;
    Ok(())
}

async fn run_chat(cli: &Cli) -> Result<()> {
    let mut manager = open_manager(cli)?;
    let interactive = io::stdin().is_terminal();
    if interactive {
        print_dim(&format!(
            "Chatting with {} as {}. Type /help for commands.",
            manager.config().model,
            active_persona_name(&manager)
        ));
    }
    let input = BufReader::new(tokio::io::stdin());
    run_repl(&mut manager, input, &mut io::stdout(), interactive).await
}

fn run_tokens(cli: &Cli, args: &TokensArgs) -> Result<()> {
    if args.text.is_empty() {
        let manager = open_manager(cli)?;
        writeln!(
            io::stdout().lock(),
            "{} / {}",
            manager.total_tokens_used(),
            manager.config().token_budget
        )?;
        return Ok(());
    }
    let settings = load_settings(cli.config.as_deref())?;
    let (config, _) = resolve_session(settings, &cli.conversation);
    let counter = TiktokenCounter::for_model(&config.model)?;
    writeln!(io::stdout().lock(), "{}", counter.count(&args.text.join(" ")))?;
    Ok(())
}

fn active_persona_name(manager: &ConversationManager) -> &str {
    manager
        .personas()
        .iter()
        .find(|(_, text)| *text == manager.system_message())
        .map(|(name, _)| name)
        .unwrap_or("an unnamed persona")
}
