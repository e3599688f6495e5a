//! FX Routes
//!
//! - GET /api/fx/convert?amount=<n>&from=<code>&to=<code> - Convert an amount

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ConversionInfo, ConversionQuery, ConversionResponse, ConvertParams, Envelope};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// GET /api/fx/convert
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ConvertParams>,
) -> ApiResult<Json<Envelope<ConversionResponse>>> {
    let amount = match params.amount.as_deref() {
        None => 1.0,
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ApiError::Validation(format!("amount must be a number, got '{}'", s)))?,
    };

    let from = params.from.as_deref().unwrap_or("USD").to_uppercase();
    let to = params
        .to
        .as_deref()
        .unwrap_or(&state.config.base_fiat)
        .to_uppercase();

    let info = state.market.fx_rate(&from, &to).await?;

    Ok(Json(Envelope::data(ConversionResponse {
        success: true,
        query: ConversionQuery { from, to, amount },
        result: amount * info.rate,
        info: ConversionInfo {
            rate: info.rate,
            date: info.date,
            base: info.base,
        },
    })))
}
