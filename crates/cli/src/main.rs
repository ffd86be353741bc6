//! Outly CLI: the main entry point.
//!
//! Commands:
//! - `serve`      Start the HTTP gateway
//! - `chat`       Interactive or single-message chat with the advisor
//! - `activities` Suggest activities for a weather reading
//! - `onboard`    Write the default config
//! - `doctor`     Check config and credentials

use clap::{Parser, Subcommand};
use outly_core::Language;

mod commands;

#[derive(Parser)]
#[command(
    name = "outly",
    about = "Outly: weather-grounded outdoor activity advisor",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the advisor
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Place to ground the conversation in (e.g. "Kyoto")
        #[arg(short, long)]
        location: Option<String>,

        /// Response language: en or ja
        #[arg(long, default_value = "en")]
        lang: Language,
    },

    /// Suggest activities for a weather reading
    Activities {
        /// Condition text, e.g. "light rain"
        condition: String,

        /// Temperature in °C
        #[arg(allow_hyphen_values = true)]
        temp: f64,

        /// Wind speed in m/s
        #[arg(long, default_value_t = 0.0)]
        wind: f64,

        #[arg(long, default_value = "en")]
        lang: Language,

        /// Ask the advisor how to prepare for suggestion N (1-5)
        #[arg(long, value_name = "N")]
        ask: Option<usize>,
    },

    /// Initialize configuration
    Onboard,

    /// Diagnose config and credentials
    Doctor,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Chat {
            message,
            location,
            lang,
        } => commands::chat::run(message, location, lang).await?,
        Commands::Activities {
            condition,
            temp,
            wind,
            lang,
            ask,
        } => commands::activities::run(&condition, temp, wind, lang, ask).await?,
        Commands::Onboard => commands::onboard::run().await?,
        Commands::Doctor => commands::doctor::run().await?,
    }

    Ok(())
}
