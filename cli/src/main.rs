//! formdesk CLI
//!
//! Command-line admin for a formdesk collection.
//!
//! # Usage
//!
//! ```bash
//! formdesk schema
//! formdesk list --format json
//! formdesk search maria
//! formdesk create --set user=Maria --set title="Ski week" \
//!     --set startDate:endDate=2024-01-01,2024-01-05
//! formdesk edit 3 --set description="moved to March"
//! formdesk delete 3
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "formdesk")]
#[command(version = "0.1.0")]
#[command(about = "Schema-driven admin for a records collection", long_about = None)]
struct Cli {
    /// API endpoint URL
    #[arg(long, env = "FORMDESK_API_URL")]
    api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<output::OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Records(RecordCommands),
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// Show the form schema and an empty form
    Schema,
    /// List records, newest first
    List {
        /// Page to show, 1-based
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Search records by user, title and description
    Search {
        term: String,
        /// Page to show, 1-based
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Create a record
    Create {
        /// Field value as key=value; date ranges as start:end=FROM,TO
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
    },
    /// Edit a record
    Edit {
        id: String,
        /// Field value as key=value; date ranges as start:end=FROM,TO
        #[arg(long = "set", value_name = "KEY=VALUE")]
        values: Vec<String>,
    },
    /// Delete a record
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref()),
        Commands::Records(action) => match config::Config::load(cli.profile.as_deref()) {
            Ok(config) => {
                let settings = config.resolve(cli.api_url, cli.format);
                commands::records::handle(action, &settings).await
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
