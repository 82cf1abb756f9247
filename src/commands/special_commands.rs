//! Special commands parser for interactive chat mode
//!
//! This module parses the special commands that can be entered during an
//! interactive chat session. Special commands allow users to:
//! - Switch to another profile (which clears the conversation)
//! - List the available profiles
//! - Show the conversation transcript or the session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive. Profile names
//! keep the case they were typed with; the catalog lookup ignores case.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
///
/// These commands change the session or print information, rather than
/// being sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch to the named profile
    SelectProfile(String),

    /// List the configured profiles
    ListProfiles,

    /// Print the transcript of the current conversation
    ShowHistory,

    /// Display the active profile and turn state
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the backend as a query.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not a
/// valid command, and `CommandError::MissingArgument` for `/profile` without
/// a name.
///
/// # Examples
///
/// ```
/// use chatline::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/profile Arabic").unwrap();
/// assert_eq!(cmd, SpecialCommand::SelectProfile("Arabic".to_string()));
///
/// let cmd = parse_special_command("where is the pharmacy?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let head = parts.next().unwrap_or_default().to_lowercase();
    let rest = parts.next().map(str::trim).unwrap_or_default();

    match head.as_str() {
        "/profile" | "/p" => {
            if rest.is_empty() {
                Err(CommandError::MissingArgument {
                    command: "/profile".to_string(),
                    usage: "/profile <name>".to_string(),
                })
            } else {
                Ok(SpecialCommand::SelectProfile(rest.to_string()))
            }
        }
        "/profiles" => Ok(SpecialCommand::ListProfiles),
        "/history" => Ok(SpecialCommand::ShowHistory),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        // Exit commands
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        cmd => Err(CommandError::UnknownCommand(cmd.to_string())),
    }
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

PROFILES:
  /profile <name> - Switch profile (clears the conversation)
  /p <name>       - Shorthand for /profile
  /profiles       - List available profiles

SESSION:
  /history        - Show the conversation so far
  /status         - Show the active profile and turn state

OTHER:
  /help           - Show this help message
  exit, quit      - Exit interactive mode

Anything else is sent as a question. Press Ctrl-C while a reply is
streaming to abandon it.
"#
    );
}
