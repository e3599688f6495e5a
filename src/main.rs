//! Coinboard API Server
//!
//! Run with: cargo run --bin coinboard [-- --config path/to/config.toml]
//!
//! # Configuration
//!
//! Read from `--config`, `~/.config/coinboard/config.toml` or
//! `./config.toml`, then overridden by environment variables:
//! - `COINBOARD_HOST`: Host to bind to (default: 127.0.0.1)
//! - `COINBOARD_PORT`: Port to listen on (default: 5000)
//! - `COINBOARD_DB_PATH`: Watchlist database (default: db/app.db)
//! - `COINBOARD_STATIC_DIR`: Static assets (default: static)
//! - `RUST_LOG`: Log filter (default: coinboard=info,tower_http=debug)

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use coinboard::api::{serve, ApiConfig, AppState};
use coinboard::config::Config;
use coinboard::logging;
use coinboard::market::UpstreamMarket;
use coinboard::store::WatchlistStore;

#[derive(Parser)]
#[command(name = "coinboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Coinboard API server")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config_path = Config::locate(args.config.as_deref());
    let config = Config::resolve(args.config.as_deref()).context("Failed to load configuration")?;

    logging::init(&config.logging, "coinboard=info,tower_http=debug");

    match &config_path {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }

    tracing::info!("Starting Coinboard API server v{}", env!("CARGO_PKG_VERSION"));

    let market = Arc::new(
        UpstreamMarket::new(&config.market).context("Failed to build upstream HTTP clients")?,
    );

    tracing::info!("Watchlist database: {}", config.store.db_path);
    let store = Arc::new(
        WatchlistStore::open(&config.store.db_path)
            .with_context(|| format!("Failed to open {}", config.store.db_path))?,
    );

    let api_config = ApiConfig::from_config(&config);
    let state = AppState::new(market, store, api_config.clone());

    serve(state, &api_config).await?;

    tracing::info!("Coinboard API server stopped");
    Ok(())
}
