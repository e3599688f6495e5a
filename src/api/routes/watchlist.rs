//! Watchlist Routes
//!
//! - GET /api/watchlist - All entries, ordered by name
//! - POST /api/watchlist - Add an entry
//! - DELETE /api/watchlist/:coin_id - Remove an entry (idempotent)

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{parse_watchlist_submission, Envelope};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::store::WatchlistEntry;

/// GET /api/watchlist
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Envelope<Vec<WatchlistEntry>>>> {
    let entries = state.with_store(|store| store.list()).await?;
    Ok(Json(Envelope::data(entries)))
}

/// POST /api/watchlist
///
/// The body is read raw so malformed JSON reports missing fields, the same
/// as an empty object.
pub async fn add_entry(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Envelope<()>>> {
    let entry = parse_watchlist_submission(&body)?;
    state.with_store(move |store| store.insert(&entry)).await?;
    Ok(Json(Envelope::ok()))
}

/// DELETE /api/watchlist/:coin_id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Path(coin_id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.with_store(move |store| store.delete(&coin_id)).await?;
    Ok(Json(Envelope::ok()))
}
