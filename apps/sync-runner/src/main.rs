//! # Sync Runner
//!
//! Runs one property sync and prints the run report as JSON.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sync-runner [config.toml]                                              │
//! │       │                                                                 │
//! │       ├── SyncConfig::load     file → env overrides → validate          │
//! │       ├── Database::new        pool + embedded migrations               │
//! │       ├── HttpPropertySource   reqwest client with request timeout      │
//! │       └── SyncEngine::run                                               │
//! │              ├── Ok(report)         → stdout, exit 0                    │
//! │              └── Err(SyncFailure)   → partial report on stdout, exit 1  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`). Logs go to stderr so
//! stdout carries only the report.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use valuations_db::{Database, DbConfig};
use valuations_sync::{HttpPropertySource, SyncConfig, SyncEngine};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = SyncConfig::load(config_path)?;
    info!(
        url = %config.source.properties_url,
        db = %config.database.path.display(),
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(config.database.path.clone()).max_connections(config.database.max_connections),
    )
    .await?;
    info!("Database ready");

    let source = HttpPropertySource::from_config(&config)?;
    let engine = SyncEngine::new(&config, source, db.clone());

    let outcome = engine.run().await;
    db.close().await;

    match outcome {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            error!(error = %failure.error, "Sync run failed");
            println!("{}", serde_json::to_string_pretty(&failure.report)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
