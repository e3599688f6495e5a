//! Watchlist types

use serde::{Deserialize, Deserializer, Serialize};

/// A saved coin with optional price-target alerting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub target_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub alert_enabled: bool,
}

/// Payload for adding a watchlist entry.
///
/// An absent target price is left out of the JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWatchlistEntry {
    pub coin_id: String,
    pub name: String,
    pub symbol: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_price"
    )]
    pub target_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub alert_enabled: bool,
}

impl NewWatchlistEntry {
    pub fn new(
        coin_id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            coin_id: coin_id.into(),
            name: name.into(),
            symbol: symbol.into(),
            target_price: None,
            alert_enabled: false,
        }
    }

    pub fn target_price(mut self, price: f64) -> Self {
        self.target_price = Some(price);
        self
    }

    pub fn alert_enabled(mut self, enabled: bool) -> Self {
        self.alert_enabled = enabled;
        self
    }
}

/// Entries inserted by `seed`
pub fn seed_entries() -> Vec<NewWatchlistEntry> {
    vec![
        NewWatchlistEntry::new("bitcoin", "Bitcoin", "btc"),
        NewWatchlistEntry::new("ethereum", "Ethereum", "eth"),
        NewWatchlistEntry::new("solana", "Solana", "sol"),
    ]
}

/// Accepts `true`/`false` as well as the `0`/`1` integers SQLite-backed
/// servers tend to emit.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}

/// Accepts a number, a numeric string, an empty string or `null`
fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
        Null(()),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(Some(n)),
        Price::Text(s) if s.trim().is_empty() => Ok(None),
        Price::Text(s) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid target price: {}", s))),
        Price::Null(()) => Ok(None),
    }
}
