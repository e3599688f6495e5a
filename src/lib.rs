//! # Coinboard
//!
//! Cryptocurrency price dashboard: live quotes with 24h change, 7-day
//! history charts, and a persisted watchlist.
//!
//! ## Modules
//!
//! - [`dashboard`]: Client components (price cards, chart, watchlist) with
//!   injected render targets
//! - [`api`]: REST API server with Axum
//! - [`market`]: Upstream quote, history and FX sources
//! - [`store`]: SQLite watchlist persistence
//! - [`config`], [`logging`]: Configuration and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinboard::dashboard::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DashboardClient::new("http://127.0.0.1:5000")?;
//!     let notifier = Arc::new(TerminalNotifier::new(std::io::stderr(), true));
//!
//!     let mut cards = PriceCards::new(
//!         client.clone(),
//!         TerminalCards::new(std::io::stdout(), true),
//!         notifier.clone(),
//!     );
//!     cards.refresh("bitcoin,ethereum", "usd").await;
//!
//!     let mut chart = ChartRenderer::new(
//!         client,
//!         TerminalChartSurface::new(std::io::stdout(), true),
//!         notifier,
//!     );
//!     chart.render("bitcoin", "usd").await;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod market;
pub mod store;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};

pub use dashboard::{
    ChartRenderer, ChartSurface, DashboardClient, DashboardError, Notifier, PriceCards,
    WatchlistController,
};

pub use market::{MarketData, MarketError, UpstreamMarket};

pub use store::{NewWatchlistEntry, StoreError, WatchlistEntry, WatchlistStore};
