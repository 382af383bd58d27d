//! Main entry point for the Darija translator CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod core;
mod datasets;
mod server;

use cli::commands::Commands;

/// Darija Translator - English ↔ Moroccan Darija translation tool
#[derive(Parser, Debug)]
#[command(name = "darija-translator", version, about, long_about = None)]
struct Args {
    /// API token for the inference endpoint (optional, defaults to HF_API_TOKEN env var)
    #[arg(long)]
    api_token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let log_level = if std::env::var("RUST_LOG").is_ok() {
        std::env::var("RUST_LOG").unwrap()
    } else {
        "info".to_string()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("{}={}", env!("CARGO_PKG_NAME").replace('-', "_"), log_level).into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Override config with CLI args if provided
    if let Some(api_token) = args.api_token {
        std::env::set_var("HF_API_TOKEN", api_token);
    }

    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    // Execute command
    match args.command {
        Some(Commands::Translate {
            text,
            source_lang,
            target_lang,
            provider,
        }) => {
            cli::commands::handle_translate(text, source_lang, target_lang, provider).await?;
        }
        Some(Commands::Repl {
            provider,
            source_lang,
            target_lang,
        }) => {
            cli::commands::handle_repl(provider, source_lang, target_lang).await?;
        }
        Some(Commands::Dataset {
            name,
            cache_dir,
            no_clean,
        }) => {
            cli::commands::handle_dataset(name, cache_dir, no_clean).await?;
        }
        Some(Commands::Providers) => {
            cli::commands::handle_providers().await?;
        }
        Some(Commands::Serve { host, port }) => {
            cli::commands::handle_serve(host, port).await?;
        }
        Some(Commands::Doctor) => {
            cli::commands::handle_doctor().await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
