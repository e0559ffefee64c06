use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use herald::Config;
use herald_common::Message;
use herald_delivery::{Admission, DeliveryEngine, DeliveryOutcome};
use herald_store::MemoryStatusStore;
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "herald", about = "A resilient message delivery service", version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Deliver one message through the configured providers
    Send {
        /// Recipient address
        #[arg(long)]
        to: String,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        body: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    herald_common::logging::init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    herald_common::internal!(
        level = DEBUG,
        "configured with {} provider(s)",
        config.providers.len()
    );

    match cli.command {
        Command::Send { to, subject, body } => {
            let limiter = config.rate_limiter();
            if limiter.check(&to) == Admission::Limited {
                error!("rate limit exceeded for {to}");
                return ExitCode::FAILURE;
            }

            let store = Arc::new(MemoryStatusStore::new());
            let engine = DeliveryEngine::new(config.providers(), store, config.retry.clone());

            match engine.deliver(Message::new(to, subject, body)).await {
                Ok(outcome) => {
                    println!("{outcome}");
                    if outcome == DeliveryOutcome::AllFailed {
                        ExitCode::FAILURE
                    } else {
                        ExitCode::SUCCESS
                    }
                }
                Err(e) => {
                    error!("delivery aborted: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
