//! Price Cards
//!
//! Turns a price query into one summary card per returned coin.

use std::sync::Arc;

use super::client::DashboardClient;
use super::format::{format_change, format_price, Tone};
use super::notify::{Notice, Notifier};
use crate::config::split_csv;
use crate::market::PriceQuoteSet;

/// The "show 7d" action carried by a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub coin_id: String,
    pub vs: String,
}

/// One rendered price card
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCard {
    pub coin_id: String,
    /// e.g. `$65,000`
    pub price: String,
    /// e.g. `-1.20% / 24h`
    pub change: String,
    pub tone: Tone,
    pub action: ChartRequest,
}

/// Where cards are drawn
pub trait CardTarget {
    /// Remove every card
    fn clear(&mut self);

    /// Append a card
    fn push(&mut self, card: PriceCard);
}

/// Build cards for a quote set.
///
/// Coins follow the requested order; anything else the backend returned is
/// appended after.
pub fn build_cards(quotes: &PriceQuoteSet, requested: &[String], vs: &str) -> Vec<PriceCard> {
    let vs = vs.to_lowercase();

    let ordered = requested
        .iter()
        .filter(|id| quotes.get(id).is_some())
        .chain(quotes.iter().map(|(id, _)| id).filter(|id| !requested.contains(id)));

    let mut seen = Vec::new();
    let mut cards = Vec::with_capacity(quotes.len());
    for coin_id in ordered {
        if seen.contains(&coin_id) {
            continue;
        }
        seen.push(coin_id);

        let Some(quote) = quotes.get(coin_id) else {
            continue;
        };
        let change = quote.change_24h(&vs);

        cards.push(PriceCard {
            coin_id: coin_id.clone(),
            price: format_price(quote.price(&vs), &vs),
            change: format_change(change),
            tone: Tone::of(change),
            action: ChartRequest {
                coin_id: coin_id.clone(),
                vs: vs.clone(),
            },
        });
    }

    cards
}

/// Price card renderer
pub struct PriceCards<T: CardTarget> {
    client: DashboardClient,
    target: T,
    notifier: Arc<dyn Notifier>,
}

impl<T: CardTarget> PriceCards<T> {
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

    /// Fetch prices and redraw the cards.
    ///
    /// On failure the notifier gets the message and the existing cards stay.
    pub async fn refresh(&mut self, coins_csv: &str, vs: &str) -> bool {
        let coins = split_csv(coins_csv);
        let vs = vs.trim();

        match self.client.prices(&coins.join(","), vs).await {
            Ok(quotes) => {
                self.target.clear();
                for card in build_cards(&quotes, &coins, vs) {
                    self.target.push(card);
                }
                tracing::debug!(cards = quotes.len(), vs, "Rendered price cards");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Price refresh failed");
                self.notifier.notify(Notice::from(&e));
                false
            }
        }
    }
}
