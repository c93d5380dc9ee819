//! Order Book Capture agent
//!
//! Connects to an exchange depth stream, levels each update into a
//! fixed-depth view, and appends rows to a date-stamped CSV dataset.
//! Designed to run unattended until terminated by signal.

use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use orderbook_capture::config::Config;
use orderbook_capture::session::Session;
use orderbook_capture::shutdown::ShutdownCoordinator;
use orderbook_capture::websocket::ConnectionManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Starting order book capture agent");

    // Load configuration
    let config = Arc::new(Config::load()?);
    info!(
        symbol = %config.symbol,
        levels = config.price_levels,
        endpoint = %config.ws_endpoint,
        "Configuration loaded"
    );

    // Process-wide session state, shared with the shutdown path
    let session = Session::shared();
    ShutdownCoordinator::install(session.clone());

    // Run the capture loop until externally terminated
    let mut manager = ConnectionManager::new(config, session);
    manager.run().await?;

    Ok(())
}
