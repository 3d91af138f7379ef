//! Math quiz relay server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──HTTP──▶ http (axum handlers)
//!                        │
//!                        ├──▶ orchestrator ──▶ ledger (sign, gateway calls)
//!                        │         │
//!                        │         └──▶ codec (operations, answers, markers)
//!                        │
//!                        └──▶ query (contract-query tool subprocess)
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

use clap::Parser;
use std::path::PathBuf;

use math_quiz_relay::config::loader::load_or_default;
use math_quiz_relay::lifecycle;
use math_quiz_relay::observability::logging;

#[derive(Parser)]
#[command(name = "math-quiz-relay")]
#[command(about = "HTTP relay for the math quiz smart contract", long_about = None)]
struct Args {
    /// Path to a TOML configuration file; defaults are used without one
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "math-quiz-relay starting");

    lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
