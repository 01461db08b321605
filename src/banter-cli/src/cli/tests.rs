use std::path::PathBuf;

use clap::Parser;
use pretty_assertions::assert_eq;

use super::handlers::{PersonaChoice, resolve_session};
use super::*;
use crate::settings::Settings;
use banter_conversation::ConversationOptions;

#[test]
fn test_ask_joins_trailing_words() {
    let cli = Cli::try_parse_from(["banter", "ask", "Tell", "me", "a", "joke."]).unwrap();
    match cli.command {
        Commands::Ask(args) => assert_eq!(args.prompt_text(), "Tell me a joke."),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_ask_requires_prompt() {
    assert!(Cli::try_parse_from(["banter", "ask"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "banter",
        "chat",
        "-f",
        "chat.json",
        "-m",
        "gpt-4o-mini",
        "--token-budget",
        "100",
        "--timeout",
        "5",
        "-p",
        "angry_assistant",
    ])
    .unwrap();

    assert!(matches!(cli.command, Commands::Chat));
    let args = &cli.conversation;
    assert_eq!(args.history_file, Some(PathBuf::from("chat.json")));
    assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
    assert_eq!(args.token_budget, Some(100));
    assert_eq!(args.timeout_secs, Some(5));
    assert_eq!(args.persona.as_deref(), Some("angry_assistant"));
}

#[test]
fn test_persona_conflicts_with_custom() {
    let result = Cli::try_parse_from([
        "banter",
        "-p",
        "angry_assistant",
        "--custom-persona",
        "A pirate.",
        "chat",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_temperature_bounds() {
    let cli = Cli::try_parse_from(["banter", "-t", "0", "personas"]).unwrap();
    assert_eq!(cli.conversation.temperature, Some(0.0));

    assert!(Cli::try_parse_from(["banter", "-t", "2.5", "personas"]).is_err());
    assert!(Cli::try_parse_from(["banter", "-t", "warm", "personas"]).is_err());
}

#[test]
fn test_tokens_text_is_optional() {
    let cli = Cli::try_parse_from(["banter", "tokens"]).unwrap();
    match cli.command {
        Commands::Tokens(args) => assert!(args.text.is_empty()),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_log_level_parsing() {
    let cli = Cli::try_parse_from(["banter", "--log-level", "debug", "history"]).unwrap();
    assert_eq!(cli.log_level, LogLevel::Debug);
    assert_eq!(LogLevel::from_str_loose("WARNING"), Some(LogLevel::Warn));
    assert_eq!(LogLevel::from_str_loose("loud"), None);
    assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
}

#[test]
fn test_to_options_maps_every_flag() {
    let args = ConversationArgs {
        api_key: Some("sk-cli".into()),
        base_url: Some("http://localhost:1234/v1".into()),
        model: Some("local".into()),
        history_file: Some(PathBuf::from("h.json")),
        temperature: Some(1.5),
        max_tokens: Some(64),
        token_budget: Some(1000),
        system_message: Some("hello".into()),
        persona: None,
        custom_persona: None,
        timeout_secs: Some(9),
    };
    assert_eq!(
        args.to_options(),
        ConversationOptions {
            api_key: Some("sk-cli".into()),
            base_url: Some("http://localhost:1234/v1".into()),
            model: Some("local".into()),
            history_file: Some(PathBuf::from("h.json")),
            temperature: Some(1.5),
            max_tokens: Some(64),
            token_budget: Some(1000),
            system_message: Some("hello".into()),
            request_timeout_secs: Some(9),
        }
    );
}

#[test]
fn test_command_line_wins_over_settings() {
    let settings = Settings {
        conversation: ConversationOptions {
            model: Some("from-file".into()),
            token_budget: Some(2000),
            history_file: Some(PathBuf::from("file.json")),
            ..Default::default()
        },
        persona: Some("expert_assistant".into()),
    };
    let args = ConversationArgs {
        model: Some("from-cli".into()),
        persona: Some("angry_assistant".into()),
        ..Default::default()
    };

    let (config, persona) = resolve_session(settings, &args);
    assert_eq!(config.model, "from-cli");
    assert_eq!(config.token_budget, 2000);
    assert_eq!(config.history_path, PathBuf::from("file.json"));
    assert_eq!(persona, Some(PersonaChoice::Named("angry_assistant".into())));
}

#[test]
fn test_settings_persona_used_when_cli_silent() {
    let settings = Settings {
        persona: Some("expert_assistant".into()),
        ..Default::default()
    };
    let (_, persona) = resolve_session(settings, &ConversationArgs::default());
    assert_eq!(persona, Some(PersonaChoice::Named("expert_assistant".into())));

    let args = ConversationArgs {
        custom_persona: Some("A pirate.".into()),
        ..Default::default()
    };
    let (_, persona) = resolve_session(Settings::default(), &args);
    assert_eq!(persona, Some(PersonaChoice::Custom("A pirate.".into())));
}
