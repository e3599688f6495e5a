//! Market Data
//!
//! Upstream sources behind the price and history endpoints:
//!
//! - **CoinGecko**: live quotes with 24h change
//! - **Binance**: hourly klines (USDT, treated as USD) for history
//! - **Frankfurter**: FX rates to convert history out of USD
//!
//! Handlers depend on the [`MarketData`] trait so tests can swap in fixed
//! data.

mod binance;
mod coingecko;
mod error;
mod frankfurter;
mod types;

pub use binance::{parse_klines, to_binance_symbol, BinanceClient, MAX_KLINES};
pub use coingecko::CoinGeckoClient;
pub use error::{MarketError, MarketResult};
pub use frankfurter::FrankfurterClient;
pub use types::{FxRate, HistoryPoint, PriceHistory, PriceQuoteSet, QuoteRecord};

use async_trait::async_trait;
use std::time::Duration;

use crate::config::MarketConfig;

/// Source of quotes, history and FX rates
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current quotes for `ids` in every currency of `vs`
    async fn simple_prices(&self, ids: &[String], vs: &[String]) -> MarketResult<PriceQuoteSet>;

    /// Hourly USD prices for the last `hours` hours, oldest first
    async fn hourly_history_usd(&self, coin_id: &str, hours: i64) -> MarketResult<Vec<HistoryPoint>>;

    /// Rate converting one unit of `from` into `to`
    async fn fx_rate(&self, from: &str, to: &str) -> MarketResult<FxRate>;

    /// Hourly prices for the last `days` days, quoted in `vs`
    async fn history(&self, coin_id: &str, vs: &str, days: i64) -> MarketResult<PriceHistory> {
        let vs = vs.to_lowercase();
        let series = self.hourly_history_usd(coin_id, days.saturating_mul(24)).await?;

        let rate = if vs == "usd" {
            1.0
        } else {
            self.fx_rate("USD", &vs.to_uppercase()).await?.rate
        };

        Ok(PriceHistory {
            prices: series
                .into_iter()
                .map(|p| HistoryPoint::new(p.timestamp_ms, p.price * rate))
                .collect(),
        })
    }
}

/// Live upstream APIs
pub struct UpstreamMarket {
    coingecko: CoinGeckoClient,
    binance: BinanceClient,
    frankfurter: FrankfurterClient,
}

impl UpstreamMarket {
    pub fn new(config: &MarketConfig) -> MarketResult<Self> {
        let price_timeout = Duration::from_secs(config.price_timeout_secs);
        let history_timeout = Duration::from_secs(config.history_timeout_secs);

        Ok(Self {
            coingecko: CoinGeckoClient::new(&config.coingecko_url, price_timeout)?,
            binance: BinanceClient::new(&config.binance_url, history_timeout)?,
            frankfurter: FrankfurterClient::new(&config.frankfurter_url, price_timeout)?,
        })
    }
}

#[async_trait]
impl MarketData for UpstreamMarket {
    async fn simple_prices(&self, ids: &[String], vs: &[String]) -> MarketResult<PriceQuoteSet> {
        self.coingecko.simple_prices(ids, vs).await
    }

    async fn hourly_history_usd(&self, coin_id: &str, hours: i64) -> MarketResult<Vec<HistoryPoint>> {
        self.binance.hourly_closes(coin_id, hours).await
    }

    async fn fx_rate(&self, from: &str, to: &str) -> MarketResult<FxRate> {
        self.frankfurter.latest_rate(from, to).await
    }
}
