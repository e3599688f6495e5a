//! Watchlist Controller
//!
//! Add, list and delete of watchlist entries. Every mutation is followed by
//! a fresh fetch; the table only ever shows what the backend returned.

use std::sync::Arc;

use super::client::DashboardClient;
use super::error::{DashboardError, DashboardResult};
use super::notify::{Notice, Notifier};
use crate::store::{NewWatchlistEntry, WatchlistEntry};

/// Shown when the watchlist has no entries
pub const EMPTY_PLACEHOLDER: &str = "No items yet.";

/// Raw add-form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchlistForm {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    /// Free text; blank means no target
    pub target_price: String,
    pub alert_enabled: bool,
}

impl WatchlistForm {
    /// Payload for the backend; a blank target is left out
    pub fn to_payload(&self) -> DashboardResult<NewWatchlistEntry> {
        let target = self.target_price.trim();
        let target_price = if target.is_empty() {
            None
        } else {
            let price = target
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| {
                    DashboardError::InvalidInput(format!("Target price must be a number, got '{}'", target))
                })?;
            Some(price)
        };

        Ok(NewWatchlistEntry {
            coin_id: self.coin_id.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            target_price,
            alert_enabled: self.alert_enabled,
        })
    }

    /// Clear every field
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistRow {
    /// Key of the row's delete action
    pub coin_id: String,
    pub name: String,
    /// Uppercased
    pub symbol: String,
    /// Target price, or `-`
    pub target: String,
    /// `On` or `Off`
    pub alert: &'static str,
}

impl From<&WatchlistEntry> for WatchlistRow {
    fn from(entry: &WatchlistEntry) -> Self {
        Self {
            coin_id: entry.coin_id.clone(),
            name: entry.name.clone(),
            symbol: entry.symbol.to_uppercase(),
            target: entry
                .target_price
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string()),
            alert: if entry.alert_enabled { "On" } else { "Off" },
        }
    }
}

/// What the watchlist table shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistView {
    /// Placeholder [`EMPTY_PLACEHOLDER`]
    Empty,
    Rows(Vec<WatchlistRow>),
}

impl WatchlistView {
    pub fn from_entries(entries: &[WatchlistEntry]) -> Self {
        if entries.is_empty() {
            WatchlistView::Empty
        } else {
            WatchlistView::Rows(entries.iter().map(WatchlistRow::from).collect())
        }
    }

    pub fn rows(&self) -> &[WatchlistRow] {
        match self {
            WatchlistView::Empty => &[],
            WatchlistView::Rows(rows) => rows,
        }
    }
}

/// Where the watchlist table is drawn
pub trait WatchlistTarget {
    fn render(&mut self, view: &WatchlistView);
}

/// Watchlist controller
pub struct WatchlistController<T: WatchlistTarget> {
    client: DashboardClient,
    target: T,
    notifier: Arc<dyn Notifier>,
}

impl<T: WatchlistTarget> WatchlistController<T> {
    pub fn new(client: DashboardClient, target: T, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            target,
            notifier,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_target(self) -> T {
        self.target
    }

    /// Submit the form, reset it, and redraw the table.
    ///
    /// Rejected input and backend errors are reported and leave the form as
    /// it was.
    pub async fn add(&mut self, form: &mut WatchlistForm) -> bool {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(e) => return self.report(e),
        };

        if let Err(e) = self.client.add_watchlist(&payload).await {
            return self.report(e);
        }

        tracing::info!(coin_id = %payload.coin_id, "Added watchlist entry");
        self.notifier
            .notify(Notice::info(format!("Added {} to watchlist", payload.coin_id)));
        form.reset();
        self.refresh().await
    }

    /// Fetch all entries and redraw the table
    pub async fn refresh(&mut self) -> bool {
        match self.client.list_watchlist().await {
            Ok(entries) => {
                self.target.render(&WatchlistView::from_entries(&entries));
                true
            }
            Err(e) => self.report(e),
        }
    }

    /// Delete by coin id, then redraw the table
    pub async fn delete(&mut self, coin_id: &str) -> bool {
        if let Err(e) = self.client.delete_watchlist(coin_id).await {
            return self.report(e);
        }

        tracing::info!(coin_id, "Removed watchlist entry");
        self.notifier
            .notify(Notice::info(format!("Removed {} from watchlist", coin_id)));
        self.refresh().await
    }

    fn report(&self, err: DashboardError) -> bool {
        tracing::warn!(error = %err, "Watchlist operation failed");
        self.notifier.notify(Notice::from(&err));
        false
    }
}
