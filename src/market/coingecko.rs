//! CoinGecko client
//!
//! Live quotes from `/simple/price`, with 24h change and last-updated time.

use reqwest::Client;
use std::time::Duration;

use super::error::{ensure_success, MarketResult};
use super::types::PriceQuoteSet;

/// CoinGecko REST client (no API key)
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> MarketResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Quote `ids` against every currency in `vs`
    pub async fn simple_prices(&self, ids: &[String], vs: &[String]) -> MarketResult<PriceQuoteSet> {
        let url = format!("{}/simple/price", self.base_url);

        tracing::debug!(ids = %ids.join(","), vs = %vs.join(","), "Fetching simple prices");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ids", ids.join(",")),
                ("vs_currencies", vs.join(",")),
                ("include_24hr_change", "true".to_string()),
                ("include_last_updated_at", "true".to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(response, "CoinGecko").await?;
        Ok(response.json().await?)
    }
}
