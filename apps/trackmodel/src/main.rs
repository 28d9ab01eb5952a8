//! # trackmodel
//!
//! Inspect, check and convert rail network layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │          apps/trackmodel (THE BINARY)         │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │───────▶│  file loading  │   │
//! │   │   (clap)    │        │ (json/snapshot)│   │
//! │   └─────────────┘        └───────┬────────┘   │
//! │                                  ▼            │
//! │                       ┌─────────────────┐     │
//! │                       │ trackmodel-core │     │
//! │                       │   (THE MODEL)   │     │
//! │                       └─────────────────┘     │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! trackmodel print layout.json
//! trackmodel check layout.json --json-mode
//! trackmodel convert layout.json layout.trkm --to snapshot
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trackmodel::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() -> ExitCode {
    // TRACKMODEL_LOG_FORMAT=json enables machine-parseable logs.
    let log_format = std::env::var("TRACKMODEL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let cli = cli::Cli::parse();

    let default_filter = if cli.verbose {
        "trackmodel=debug,trackmodel_core=debug"
    } else {
        "trackmodel=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // Logs go to stderr so command output on stdout stays parseable.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    match cli::execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
