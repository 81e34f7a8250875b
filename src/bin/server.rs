//! Tally API Server
//!
//! Run with: cargo run --bin tally-server
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (see `tally config init`),
//! then applies environment overrides:
//! - `TALLY_HOST`, `TALLY_PORT`: bind address (default: 0.0.0.0:8090)
//! - `TALLY_RELAY_URL`: contact relay endpoint
//! - `TALLY_RELAY_TO`: default report recipient
//! - `TALLY_LOG_LEVEL`, `TALLY_LOG_FORMAT`: logging
//! - `RUST_LOG`: full filter override

use std::sync::Arc;
use tally::api::{serve, AppState};
use tally::config::Config;
use tally::relay::ContactRelay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load_default();
    tally::logging::init(&loaded.config.logging);
    loaded.log_outcome();
    let config = loaded.config;

    tracing::info!("Starting Tally API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Relay endpoint: {}", config.relay.url);

    let relay = ContactRelay::new(config.relay.clone())?;
    let state =
        AppState::new(Arc::new(relay), config.api.clone()).with_recipient(config.relay.recipient.clone());

    serve(state, &config.api).await?;

    tracing::info!("Tally API server stopped");
    Ok(())
}
