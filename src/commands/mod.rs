/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`     — Interactive chat session
- `ask`      — Send a single question and stream the reply
- `profiles` — List the configured profiles

These handlers are small: they build a [`ChatController`] from the
configuration and connect it to the terminal.
*/

use std::sync::Arc;

use colored::Colorize;

use crate::backend::{ChatBackend, HttpBackend};
use crate::config::Config;
use crate::controller::ChatController;
use crate::error::Result;
use crate::observer::SessionObserver;
use crate::render::render_message;
use crate::session::Role;

// Special commands parser for interactive mode
pub mod special_commands;

/// Build a controller for `config` on the HTTP backend
///
/// The session starts on `chat.default_profile` when set, otherwise on the
/// first configured profile.
///
/// # Errors
///
/// Returns error if the endpoint or any profile is invalid.
pub fn build_controller(
    config: &Config,
    observer: Box<dyn SessionObserver>,
) -> Result<ChatController> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::from_config(&config.endpoint)?);
    build_controller_with_backend(config, backend, observer)
}

/// Build a controller for `config` on an arbitrary backend
pub fn build_controller_with_backend(
    config: &Config,
    backend: Arc<dyn ChatBackend>,
    observer: Box<dyn SessionObserver>,
) -> Result<ChatController> {
    let catalog = config.catalog()?;
    tracing::debug!(backend = %backend.describe(), profiles = catalog.len(), "Building controller");

    let mut controller = match &config.chat.default_profile {
        Some(name) => ChatController::with_profile(backend, catalog, name)?,
        None => ChatController::new(backend, catalog),
    };
    controller.set_observer(observer);
    Ok(controller)
}

/// Transcript of the current conversation, rendered for display
pub fn format_history(controller: &ChatController, width: usize) -> String {
    let direction = controller.active_profile().text_direction();
    let messages = controller.messages();
    if messages.is_empty() {
        return "No messages yet.".to_string();
    }

    let mut out = Vec::with_capacity(messages.len() * 2);
    for message in messages {
        let header = match message.role {
            Role::User => "user".bold().cyan().to_string(),
            Role::Assistant => "assistant".bold().green().to_string(),
        };
        out.push(header);
        out.push(render_message(message, direction, width).text());
    }
    out.join("\n")
}

/// Session status lines shown by `/status`
pub fn format_status(controller: &ChatController) -> String {
    let profile = controller.active_profile();
    let session = controller.session();
    let pending = if session.awaiting_reply() {
        "yes (resubmit to retry)"
    } else {
        "no"
    };
    [
        format!(
            "Profile:           {} ({})",
            profile.colored_tag(),
            profile.text_direction()
        ),
        format!("Backend:           {}", controller.backend().describe()),
        format!("Messages:          {}", session.messages().len()),
        format!("Completed Turns:   {}", session.completed_turns()),
        format!("Last Turn:         {:?}", controller.phase()),
        format!("Awaiting Reply:    {}", pending),
    ]
    .join("\n")
}

/// Width for static output such as `/history`
fn display_width(config: &Config) -> usize {
    config.chat.render_width.unwrap_or_else(|| {
        crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(80)
            .saturating_sub(1)
    })
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Builds a controller with a terminal presenter and runs a
    //! readline-based loop. Lines starting with `/` are special commands;
    //! anything else is submitted as a query and its reply streams to the
    //! terminal. Ctrl-C during a reply abandons that turn only.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use crate::error::ChatlineError;
    use crate::presenter::TerminalPresenter;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// What the loop does after handling a line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LoopAction {
        Continue,
        Exit,
    }

    /// Start interactive chat mode
    ///
    /// # Errors
    ///
    /// Returns error if the controller or the line editor cannot be created.
    /// Failed turns are reported in the session and do not end the loop.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let presenter = TerminalPresenter::stdout(config.chat.render_width);
        let mut controller = build_controller(&config, Box::new(presenter))?;
        let width = display_width(&config);

        let mut rl = DefaultEditor::new().map_err(|e| ChatlineError::Readline(e.to_string()))?;

        print_welcome_banner(&controller);

        loop {
            let prompt = format!("{} >> ", controller.active_profile().colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(trimmed) {
                        tracing::debug!("Failed to add history entry: {}", e);
                    }

                    if handle_line(&mut controller, trimmed, width).await == LoopAction::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Special commands act on the session directly; anything else runs a
    /// turn. A turn can be abandoned with Ctrl-C while it streams.
    pub async fn handle_line(
        controller: &mut ChatController,
        line: &str,
        width: usize,
    ) -> LoopAction {
        match parse_special_command(line) {
            Ok(SpecialCommand::SelectProfile(name)) => {
                match controller.select_profile(&name) {
                    Ok(true) => {}
                    Ok(false) => println!(
                        "Already using {}\n",
                        controller.active_profile().colored_tag()
                    ),
                    Err(e) => eprintln!("{}\n", e.to_string().red()),
                }
                LoopAction::Continue
            }
            Ok(SpecialCommand::ListProfiles) => {
                print_profile_list(controller);
                LoopAction::Continue
            }
            Ok(SpecialCommand::ShowHistory) => {
                println!("\n{}\n", format_history(controller, width));
                LoopAction::Continue
            }
            Ok(SpecialCommand::ShowStatus) => {
                println!("\n{}\n", format_status(controller));
                LoopAction::Continue
            }
            Ok(SpecialCommand::Help) => {
                print_help();
                LoopAction::Continue
            }
            Ok(SpecialCommand::Exit) => LoopAction::Exit,
            Ok(SpecialCommand::None) => {
                run_turn(controller, line).await;
                LoopAction::Continue
            }
            Err(e) => {
                eprintln!("{}\n", e.to_string().yellow());
                LoopAction::Continue
            }
        }
    }

    async fn run_turn(controller: &mut ChatController, query: &str) {
        tokio::select! {
            result = controller.submit(query) => {
                if let Err(e) = result {
                    let turn_scoped = e
                        .downcast_ref::<ChatlineError>()
                        .map(ChatlineError::is_turn_scoped)
                        .unwrap_or(false);
                    if turn_scoped {
                        // Already reported through the session
                        tracing::debug!("Turn ended with error: {}", e);
                    } else {
                        eprintln!("Error: {}", e);
                    }
                }
                println!();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Turn abandoned by user");
                println!("\n{}\n", "Reply abandoned.".yellow());
            }
        }
    }

    fn print_profile_list(controller: &ChatController) {
        let active = controller.active_profile().display_name();
        println!();
        for profile in controller.catalog().iter() {
            let marker = if profile.display_name() == active {
                "*"
            } else {
                " "
            };
            println!(
                "{} {} ({})",
                marker,
                profile.colored_tag(),
                profile.text_direction()
            );
        }
        println!();
    }

    /// Display welcome banner at the start of interactive chat mode
    fn print_welcome_banner(controller: &ChatController) {
        let profile = controller.active_profile();

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║            chatline Interactive Chat - Welcome!              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "Profile: {} ({})",
            profile.colored_tag(),
            profile.text_direction()
        );
        println!("{}\n", profile.placeholder().dimmed());
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

}

// Single question handler
pub mod ask {
    //! One-shot question mode.
    //!
    //! Sends one query on the starting profile and streams the reply to
    //! stdout, then exits.

    use super::*;
    use crate::presenter::TerminalPresenter;

    /// Send `prompt` and stream the reply
    ///
    /// # Errors
    ///
    /// Returns error if the controller cannot be built or the turn fails.
    pub async fn run_ask(config: Config, prompt: &str) -> Result<()> {
        let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::from_config(&config.endpoint)?);
        ask_with_backend(&config, backend, prompt).await.map(|_| ())
    }

    /// Send `prompt` through `backend` and return the reply
    pub async fn ask_with_backend(
        config: &Config,
        backend: Arc<dyn ChatBackend>,
        prompt: &str,
    ) -> Result<String> {
        // The starting profile decides how the echoed question is laid out
        let direction = {
            let catalog = config.catalog()?;
            match &config.chat.default_profile {
                Some(name) => catalog.require(name)?.text_direction(),
                None => catalog.default_profile().text_direction(),
            }
        };
        let presenter = TerminalPresenter::stdout(config.chat.render_width)
            .with_echo_user(true)
            .with_direction(direction);

        let mut controller = build_controller_with_backend(config, backend, Box::new(presenter))?;
        let reply = controller.submit(prompt).await?;
        tracing::debug!(reply_len = reply.len(), "Single question answered");
        Ok(reply)
    }

}

// Profile listing
pub mod profiles {
    //! Lists configured profiles as a table.
    //!
    //! Works on an incomplete configuration so unresolved backend ids can
    //! be spotted before starting a session.

    use super::*;
    use prettytable::{cell, row, Table};

    /// Print the configured profiles
    pub fn list_profiles(config: &Config) -> Result<()> {
        let table = profiles_table(config);
        println!("\nConfigured profiles:\n");
        table.printstd();
        println!();
        Ok(())
    }

    /// Build the profile table
    pub fn profiles_table(config: &Config) -> Table {
        let default_name = config
            .chat
            .default_profile
            .as_deref()
            .map(str::to_lowercase)
            .or_else(|| config.profiles.first().map(|p| p.name.to_lowercase()));

        let mut table = Table::new();
        table.add_row(row!["Name", "Direction", "Backend ID", "Default"]);

        for profile in &config.profiles {
            let backend_id = match profile.backend_id.as_deref().map(str::trim) {
                Some(id) if !id.is_empty() => mask_id(id),
                _ => match &profile.backend_id_env {
                    Some(var) => format!("<unset: {}>", var),
                    None => "<unset>".to_string(),
                },
            };
            let is_default = default_name.as_deref() == Some(profile.name.to_lowercase().as_str());

            table.add_row(row![
                profile.name,
                profile.direction.to_string(),
                backend_id,
                if is_default { "Yes" } else { "" }
            ]);
        }

        table
    }

    /// Show only the start of an identifier
    pub fn mask_id(id: &str) -> String {
        let visible: String = id.chars().take(4).collect();
        if id.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("{}****", visible)
        }
    }

}
