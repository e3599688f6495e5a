//! Crypto Routes
//!
//! - GET /api/crypto/price?ids=<csv>&vs=<csv> - Live quotes with 24h change
//! - GET /api/crypto/history?coin_id=<id>&vs=<code>&days=<n> - Hourly history

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{Envelope, HistoryParams, PriceParams};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::config::split_csv;
use crate::market::{PriceHistory, PriceQuoteSet};

const DEFAULT_HISTORY_COIN: &str = "bitcoin";
const DEFAULT_HISTORY_DAYS: i64 = 7;

/// GET /api/crypto/price
pub async fn prices(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PriceParams>,
) -> ApiResult<Json<Envelope<PriceQuoteSet>>> {
    let ids = match params.ids.as_deref() {
        Some(ids) => split_csv(ids),
        None => state.config.default_coins.clone(),
    };

    let vs: Vec<String> = split_csv(params.vs.as_deref().unwrap_or(&state.config.default_vs))
        .into_iter()
        .map(|v| v.to_lowercase())
        .collect();

    let quotes = state.market.simple_prices(&ids, &vs).await?;

    tracing::debug!(coins = quotes.len(), "Served price quotes");
    Ok(Json(Envelope::data(quotes)))
}

/// GET /api/crypto/history
pub async fn history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<Envelope<PriceHistory>>> {
    let coin_id = params.coin_id.as_deref().unwrap_or(DEFAULT_HISTORY_COIN);
    let vs = params.vs.as_deref().unwrap_or(&state.config.default_vs);
    let days = parse_days(params.days.as_deref())?;

    let history = state
        .market
        .history(coin_id, vs, days)
        .await
        .map_err(ApiError::from_history)?;

    tracing::debug!(coin_id, vs, days, points = history.prices.len(), "Served price history");
    Ok(Json(Envelope::data(history)))
}

fn parse_days(days: Option<&str>) -> ApiResult<i64> {
    match days {
        None => Ok(DEFAULT_HISTORY_DAYS),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation(format!("days must be an integer, got '{}'", s))),
    }
}
