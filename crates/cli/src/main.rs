//! CampusBot CLI: the main entry point.
//!
//! Commands:
//! - `chat`     Interactive chat or single-message mode
//! - `map`      List campus locations
//! - `events`   List upcoming events
//! - `prompts`  List quick prompts
//! - `onboard`  Write a default config file
//! - `doctor`   Diagnose configuration and connectivity

use campusbot_core::campus::{EventKind, LocationKind};
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "campusbot",
    about = "CampusBot: the SIT campus assistant in your terminal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the campus assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show campus locations
    Map {
        /// Only show one kind (academic, facility, food)
        #[arg(short, long)]
        kind: Option<LocationKind>,
    },

    /// Show upcoming campus events
    Events {
        /// Only show one kind (academic, social, sports, career)
        #[arg(short, long)]
        kind: Option<EventKind>,
    },

    /// List the quick prompts available in chat
    Prompts,

    /// Initialize configuration
    Onboard,

    /// Diagnose configuration and connectivity
    Doctor {
        /// Also check that the model service is reachable
        #[arg(long)]
        online: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so streamed replies on stdout stay clean
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Map { kind } => commands::campus::map(kind),
        Commands::Events { kind } => commands::campus::events(kind),
        Commands::Prompts => commands::campus::prompts(),
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor { online } => commands::doctor::run(online).await?,
    }

    Ok(())
}
