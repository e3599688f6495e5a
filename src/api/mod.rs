//! Coinboard REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Crypto
//! - `GET /api/crypto/price` - Live quotes with 24h change
//! - `GET /api/crypto/history` - Hourly price history
//!
//! ## FX
//! - `GET /api/fx/convert` - Convert an amount between fiat currencies
//!
//! ## Watchlist
//! - `GET /api/watchlist` - List entries
//! - `POST /api/watchlist` - Add an entry
//! - `DELETE /api/watchlist/:coin_id` - Remove an entry
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status with uptime
//!
//! Anything else falls through to the static asset directory when it exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinboard::api::{serve, ApiConfig, AppState};
//! use coinboard::market::UpstreamMarket;
//! use coinboard::store::WatchlistStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = coinboard::config::Config::default();
//!     let market = Arc::new(UpstreamMarket::new(&config.market)?);
//!     let store = Arc::new(WatchlistStore::open(&config.store.db_path)?);
//!     let api_config = ApiConfig::from_config(&config);
//!
//!     let state = AppState::new(market, store, api_config.clone());
//!     serve(state, &api_config).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{delete, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Crypto routes
        .route("/crypto/price", get(routes::crypto::prices))
        .route("/crypto/history", get(routes::crypto::history))
        // FX routes
        .route("/fx/convert", get(routes::fx::convert))
        // Watchlist routes
        .route(
            "/watchlist",
            get(routes::watchlist::list_entries).post(routes::watchlist::add_entry),
        )
        .route("/watchlist/:coin_id", delete(routes::watchlist::delete_entry));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::health));

    let static_dir = state.config.static_dir.clone();
    let shared_state = Arc::new(state);

    let mut router = Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes);

    if Path::new(&static_dir).is_dir() {
        router = router.fallback_service(ServeDir::new(&static_dir));
    } else {
        tracing::debug!(static_dir = %static_dir, "Static directory missing, not serving assets");
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Coinboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Coinboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{
        FxRate, HistoryPoint, MarketData, MarketError, MarketResult, PriceQuoteSet, QuoteRecord,
    };
    use crate::store::WatchlistStore;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    /// Fixed quotes; history fails with a 451 when the coin is "blocked"
    struct FixedMarket;

    #[async_trait]
    impl MarketData for FixedMarket {
        async fn simple_prices(&self, ids: &[String], vs: &[String]) -> MarketResult<PriceQuoteSet> {
            let mut quotes = PriceQuoteSet::default();
            for id in ids {
                let mut record = QuoteRecord::default();
                for v in vs {
                    record = record
                        .with(v.clone(), 65000.0)
                        .with(format!("{}_24h_change", v), -1.2);
                }
                quotes.insert(id.clone(), record);
            }
            Ok(quotes)
        }

        async fn hourly_history_usd(&self, coin_id: &str, hours: i64) -> MarketResult<Vec<HistoryPoint>> {
            if coin_id == "blocked" {
                return Err(MarketError::Status {
                    upstream: "binance",
                    status: 451,
                    body: "x".repeat(400),
                });
            }
            Ok((0..hours.min(3))
                .map(|i| HistoryPoint::new(i * 3_600_000, 100.0 + i as f64))
                .collect())
        }

        async fn fx_rate(&self, from: &str, to: &str) -> MarketResult<FxRate> {
            if to == "XXX" {
                return Err(MarketError::UnsupportedPair {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
            Ok(FxRate {
                rate: 0.5,
                date: Some("2024-05-01".to_string()),
                base: Some(from.to_string()),
            })
        }
    }

    fn create_test_app() -> Router {
        let store = Arc::new(WatchlistStore::in_memory().unwrap());
        let config = ApiConfig {
            static_dir: "does-not-exist".to_string(),
            ..ApiConfig::default()
        };
        build_router(AppState::new(Arc::new(FixedMarket), store, config))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let app = create_test_app();
        let response = send(&app, "GET", "/health/live", "").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let app = create_test_app();
        let response = send(&app, "GET", "/health", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert!(body["ts"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_prices_uses_defaults() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/crypto/price", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["bitcoin"]["gbp"], 65000.0);
        assert_eq!(body["data"]["solana"]["gbp_24h_change"], -1.2);
    }

    #[tokio::test]
    async fn test_prices_lowercases_vs() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/crypto/price?ids=bitcoin&vs=USD,eur", "").await;

        let body = json_body(response).await;
        assert_eq!(body["data"]["bitcoin"]["usd"], 65000.0);
        assert_eq!(body["data"]["bitcoin"]["eur"], 65000.0);
        assert!(body["data"].get("ethereum").is_none());
    }

    #[tokio::test]
    async fn test_history_converts_to_vs() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/crypto/history?coin_id=bitcoin&vs=gbp&days=1", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let prices = body["data"]["prices"].as_array().unwrap();
        assert_eq!(prices.len(), 3);
        assert_eq!(prices[0][1], 50.0);
    }

    #[tokio::test]
    async fn test_history_rejects_bad_days() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/crypto/history?days=week", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_history_source_failure() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/crypto/history?coin_id=blocked&vs=usd", "").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = json_body(response).await;
        assert_eq!(body["error"], "HTTP 451 from history source");
        assert_eq!(body["body"].as_str().unwrap().len(), 300);
    }

    #[tokio::test]
    async fn test_convert() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/fx/convert?amount=10&from=usd", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["data"]["query"]["to"], "GBP");
        assert_eq!(body["data"]["result"], 5.0);
    }

    #[tokio::test]
    async fn test_convert_unsupported_pair() {
        let app = create_test_app();
        let response = send(&app, "GET", "/api/fx/convert?to=xxx", "").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_watchlist_lifecycle() {
        let app = create_test_app();

        let response = send(
            &app,
            "POST",
            "/api/watchlist",
            r#"{"coin_id": "bitcoin", "symbol": "btc", "name": "Bitcoin", "target_price": "70000", "alert_enabled": true}"#,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(send(&app, "GET", "/api/watchlist", "").await).await;
        let entries = body["data"].as_array().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["coin_id"], "bitcoin");
        assert_eq!(entries[0]["target_price"], 70000.0);
        assert_eq!(entries[0]["alert_enabled"], true);

        let response = send(&app, "DELETE", "/api/watchlist/bitcoin", "").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(send(&app, "GET", "/api/watchlist", "").await).await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_watchlist_duplicate() {
        let app = create_test_app();
        let payload = r#"{"coin_id": "bitcoin", "symbol": "btc", "name": "Bitcoin"}"#;

        send(&app, "POST", "/api/watchlist", payload).await;
        let response = send(&app, "POST", "/api/watchlist", payload).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = json_body(response).await;
        assert_eq!(body["error"], "coin already in watchlist");
    }

    #[tokio::test]
    async fn test_watchlist_missing_fields() {
        let app = create_test_app();
        let response = send(&app, "POST", "/api/watchlist", "not json").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"], "coin_id, symbol, name required");
    }

    #[tokio::test]
    async fn test_delete_unknown_is_ok() {
        let app = create_test_app();
        let response = send(&app, "DELETE", "/api/watchlist/nothing", "").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
