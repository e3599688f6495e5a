//! Shared fixtures for the end-to-end dashboard tests.
//!
//! `spawn_backend()` serves the real router on an ephemeral port, backed by
//! canned market data and a watchlist database in a temp directory.

use async_trait::async_trait;
use std::sync::Arc;

use coinboard::api::{build_router, ApiConfig, AppState};
use coinboard::market::{FxRate, HistoryPoint, MarketData, MarketError, MarketResult, PriceQuoteSet, QuoteRecord};
use coinboard::store::WatchlistStore;

/// Canned quotes: bitcoin and ethereum only, in any currency
pub struct CannedMarket;

#[async_trait]
impl MarketData for CannedMarket {
    async fn simple_prices(&self, ids: &[String], vs: &[String]) -> MarketResult<PriceQuoteSet> {
        let mut quotes = PriceQuoteSet::default();
        for id in ids {
            let (price, change) = match id.as_str() {
                "bitcoin" => (65000.0, -1.2),
                "ethereum" => (3200.0, 0.0),
                _ => continue,
            };
            let mut record = QuoteRecord::default();
            for v in vs {
                record = record
                    .with(v.clone(), price)
                    .with(format!("{}_24h_change", v), change);
            }
            quotes.insert(id.clone(), record);
        }
        Ok(quotes)
    }

    async fn hourly_history_usd(&self, coin_id: &str, hours: i64) -> MarketResult<Vec<HistoryPoint>> {
        if coin_id != "bitcoin" {
            return Err(MarketError::Status {
                upstream: "Binance",
                status: 400,
                body: r#"{"code":-1121,"msg":"Invalid symbol."}"#.to_string(),
            });
        }
        Ok((0..hours)
            .map(|i| HistoryPoint::new(1_700_000_000_000 + i * 3_600_000, 60_000.0 + (i % 24) as f64 * 50.0))
            .collect())
    }

    async fn fx_rate(&self, from: &str, _to: &str) -> MarketResult<FxRate> {
        Ok(FxRate {
            rate: 0.8,
            date: Some("2024-05-01".to_string()),
            base: Some(from.to_string()),
        })
    }
}

/// Start a backend; returns its base URL and the temp dir holding the database
pub async fn spawn_backend() -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(WatchlistStore::open(dir.path().join("app.db")).unwrap());
    let config = ApiConfig {
        static_dir: dir.path().join("static").to_string_lossy().into_owned(),
        ..ApiConfig::default()
    };

    let router = build_router(AppState::new(Arc::new(CannedMarket), store, config));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{}", addr), dir)
}
