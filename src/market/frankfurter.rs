//! Frankfurter FX client
//!
//! Reference rates from `/latest?base=FROM&symbols=TO`.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::error::{ensure_success, MarketError, MarketResult};
use super::types::FxRate;

/// Frankfurter REST client (no API key)
pub struct FrankfurterClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl FrankfurterClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> MarketResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Latest rate converting one unit of `from` into `to`
    pub async fn latest_rate(&self, from: &str, to: &str) -> MarketResult<FxRate> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();
        let url = format!("{}/latest", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("base", from.as_str()), ("symbols", to.as_str())])
            .send()
            .await?;

        let response = ensure_success(response, "Frankfurter").await?;
        let latest: LatestResponse = response.json().await?;

        let rate = latest
            .rates
            .get(&to)
            .copied()
            .ok_or_else(|| MarketError::UnsupportedPair { from, to })?;

        Ok(FxRate {
            rate,
            date: latest.date,
            base: latest.base,
        })
    }
}
