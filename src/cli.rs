//! Command-line interface definition for chatline
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, one-shot questions, and
//! listing the configured profiles.

use clap::{Parser, Subcommand};

/// chatline - streaming chat client for profile-scoped assistants
///
/// Each profile (hospital, language) maps to a backend identifier and a
/// text direction. Replies stream in as they are generated.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Profile to start with (display name, case-insensitive)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for chatline
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat,

    /// Ask a single question and stream the reply
    Ask {
        /// The question to send
        #[arg(short = 'q', long)]
        prompt: String,
    },

    /// List the configured profiles
    Profiles,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            endpoint: None,
            profile: None,
            command: Commands::Chat,
        }
    }
}
