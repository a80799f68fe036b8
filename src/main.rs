mod auth;
mod commands;
mod config;
mod error;
mod event;
mod google;
mod oauth;
mod session;
mod store;
#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mkmeet")]
#[command(about = "Create Google Calendar events with Meet links from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authorize with Google and store the token for later runs
    Auth,
    /// Create a calendar event (prompts for anything not given as a flag)
    New {
        /// Event summary (title)
        #[arg(short, long)]
        summary: Option<String>,

        /// Start time, `YYYY-MM-DD HH:MM:SS` (UTC)
        #[arg(long)]
        start: Option<String>,

        /// End time, `YYYY-MM-DD HH:MM:SS` (UTC)
        #[arg(long)]
        end: Option<String>,

        /// Comma-separated attendee emails
        #[arg(long)]
        attendees: Option<String>,

        /// Skip the Google Meet link
        #[arg(long)]
        no_meet: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::New {
            summary,
            start,
            end,
            attendees,
            no_meet,
        } => commands::new::run(summary, start, end, attendees, no_meet).await,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
