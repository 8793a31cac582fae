//! Taskdeck server — REST backend over an ordered, durable task store.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:5000 with data/tasks.json
//! cargo run --bin taskdeck-server
//!
//! # Run on custom address with a custom data file
//! cargo run --bin taskdeck-server -- --bind 127.0.0.1:8080 --data /tmp/tasks.json
//!
//! # Or via environment variables
//! TASKDECK_ADDR=127.0.0.1:8080 TASKDECK_DATA=/tmp/tasks.json cargo run --bin taskdeck-server
//! ```

use std::sync::Arc;

use clap::Parser;
use taskdeck_server::config::{ServerCliArgs, ServerConfig};
use taskdeck_server::http::{self, AppState};
use taskdeck_server::storage::JsonStorage;
use taskdeck_server::store::TaskStore;

#[tokio::main]
async fn main() {
    let cli = ServerCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match ServerConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        addr = %config.bind_addr,
        data = %config.data_path.display(),
        "starting taskdeck server"
    );

    let store = match TaskStore::open(JsonStorage::new(&config.data_path)) {
        Ok(s) => {
            tracing::info!(count = s.len(), "task collection loaded");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load task collection");
            std::process::exit(1);
        }
    };
    let state = Arc::new(AppState::new(store));

    match http::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "server listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "server task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start server");
            std::process::exit(1);
        }
    }
}
