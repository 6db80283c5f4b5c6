//! WebSocket server that deals classic Catan boards on request.

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod layout;
mod protocol;
mod server;
mod session;

use config::ServerConfig;
use server::ServerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    catan_board::verify_constants()?;

    info!(
        "Starting board server (seed: {:?}, tile spacing: {})",
        config.seed, config.tile_spacing
    );

    let state = Arc::new(ServerState::new(config));

    server::run_server(state).await
}
