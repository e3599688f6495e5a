//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::api::error::{ApiError, ApiResult};
use crate::config::Config;
use crate::market::MarketData;
use crate::store::{StoreResult, WatchlistStore};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Upstream quotes, history and FX rates
    pub market: Arc<dyn MarketData>,
    /// Watchlist persistence
    pub store: Arc<WatchlistStore>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketData>, store: Arc<WatchlistStore>, config: ApiConfig) -> Self {
        Self {
            market,
            store,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run a store operation on the blocking pool
    pub async fn with_store<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&WatchlistStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| ApiError::Internal(format!("Store task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Static asset directory served as fallback
    pub static_dir: String,
    /// Reference currency when a request omits `vs`
    pub default_vs: String,
    /// Coins quoted when a request omits `ids`
    pub default_coins: Vec<String>,
    /// Target fiat when a conversion omits `to`
    pub base_fiat: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ApiConfig {
    /// Pull the server-facing settings out of the full config
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            static_dir: config.server.static_dir.clone(),
            default_vs: config.market.default_vs.to_lowercase(),
            default_coins: config.market.default_coins.clone(),
            base_fiat: config.market.base_fiat.to_uppercase(),
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
