//! Dashboard API Client
//!
//! HTTP client for the Coinboard backend. Every endpoint answers with an
//! [`Envelope`]; `ok: false` becomes [`DashboardError::Backend`] carrying the
//! backend's message.
//!
//! No retries and no timeouts: a request that never resolves never renders.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use urlencoding::encode;

use super::error::{DashboardError, DashboardResult};
use crate::api::dto::{Envelope, HealthResponse};
use crate::market::{PriceHistory, PriceQuoteSet};
use crate::store::{NewWatchlistEntry, WatchlistEntry};

/// Backend API client
#[derive(Debug, Clone)]
pub struct DashboardClient {
    client: Client,
    base_url: String,
}

impl DashboardClient {
    /// Create a client for the backend at `base_url` (e.g. "http://127.0.0.1:5000")
    pub fn new(base_url: impl Into<String>) -> DashboardResult<Self> {
        let client = Client::builder().build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Current quotes for a comma-separated list of coins
    pub async fn prices(&self, ids_csv: &str, vs: &str) -> DashboardResult<PriceQuoteSet> {
        let url = format!(
            "{}/api/crypto/price?ids={}&vs={}",
            self.base_url,
            encode(ids_csv),
            encode(vs)
        );

        let response = self.client.get(&url).send().await?;
        read_data(response).await
    }

    /// Hourly history for the last `days` days
    pub async fn history(&self, coin_id: &str, vs: &str, days: u32) -> DashboardResult<PriceHistory> {
        let url = format!(
            "{}/api/crypto/history?coin_id={}&vs={}&days={}",
            self.base_url,
            encode(coin_id),
            encode(vs),
            days
        );

        let response = self.client.get(&url).send().await?;
        read_data(response).await
    }

    /// All watchlist entries
    pub async fn list_watchlist(&self) -> DashboardResult<Vec<WatchlistEntry>> {
        let url = format!("{}/api/watchlist", self.base_url);

        let response = self.client.get(&url).send().await?;
        read_data(response).await
    }

    /// Add a watchlist entry
    pub async fn add_watchlist(&self, entry: &NewWatchlistEntry) -> DashboardResult<()> {
        let url = format!("{}/api/watchlist", self.base_url);

        let response = self.client.post(&url).json(entry).send().await?;
        read_ack(response).await
    }

    /// Remove a watchlist entry
    pub async fn delete_watchlist(&self, coin_id: &str) -> DashboardResult<()> {
        let url = format!("{}/api/watchlist/{}", self.base_url, encode(coin_id));

        let response = self.client.delete(&url).send().await?;
        read_ack(response).await
    }

    /// Backend health
    pub async fn health(&self) -> DashboardResult<HealthResponse> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|e| {
            if status.is_success() {
                DashboardError::Decode(e.to_string())
            } else {
                DashboardError::Backend(format!("HTTP {}", status.as_u16()))
            }
        })
    }
}

/// Unwrap an envelope, failing on `ok: false` or non-JSON bodies
async fn read_envelope<T: DeserializeOwned>(response: Response) -> DashboardResult<Envelope<T>> {
    let status = response.status();
    let bytes = response.bytes().await?;

    let envelope: Envelope<T> = match serde_json::from_slice(&bytes) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(DashboardError::Backend(format!("HTTP {}", status.as_u16())))
        }
        Err(e) => return Err(DashboardError::Decode(e.to_string())),
    };

    if !envelope.ok {
        let message = envelope
            .error
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        tracing::debug!(status = status.as_u16(), error = %message, "Backend rejected request");
        return Err(DashboardError::Backend(message));
    }

    Ok(envelope)
}

async fn read_data<T: DeserializeOwned>(response: Response) -> DashboardResult<T> {
    read_envelope::<T>(response)
        .await?
        .data
        .ok_or_else(|| DashboardError::Decode("response has no data".to_string()))
}

async fn read_ack(response: Response) -> DashboardResult<()> {
    read_envelope::<Value>(response).await.map(|_| ())
}
