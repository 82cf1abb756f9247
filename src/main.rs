//! chatline - streaming chat client
//!
#![doc = "chatline - streaming chat client"]
#![doc = "Main entry point for the chatline application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatline::cli::{Cli, Commands};
use chatline::commands;
use chatline::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Values from a local .env file behave like exported variables
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Execute command
    match cli.command {
        Commands::Profiles => {
            // Listing works on an incomplete setup so missing ids can be seen
            commands::profiles::list_profiles(&config)?;
            Ok(())
        }
        Commands::Chat => {
            config.validate()?;
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { prompt } => {
            config.validate()?;
            tracing::info!("Sending single question");
            tracing::debug!("Using prompt: {}", prompt);
            commands::ask::run_ask(config, &prompt).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so they never interleave with a streamed reply.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "chatline=debug"
    } else {
        "chatline=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
