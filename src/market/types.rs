//! Market data types
//!
//! Shapes shared by the upstream clients, the HTTP API and the dashboard
//! client. They serialize to the same JSON the backend serves.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Quote fields for one coin, keyed by field name.
///
/// For reference currency `vs` the price lives under `vs` and the 24-hour
/// percent change under `{vs}_24h_change`. Upstream may send `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteRecord(pub BTreeMap<String, Option<f64>>);

impl QuoteRecord {
    /// Price quoted in `vs`
    pub fn price(&self, vs: &str) -> Option<f64> {
        self.0.get(vs).copied().flatten()
    }

    /// 24-hour percent change quoted in `vs`
    pub fn change_24h(&self, vs: &str) -> Option<f64> {
        self.0.get(&format!("{}_24h_change", vs)).copied().flatten()
    }

    /// Builder used by fixtures and tests
    pub fn with(mut self, field: impl Into<String>, value: f64) -> Self {
        self.0.insert(field.into(), Some(value));
        self
    }
}

/// Current quotes keyed by coin identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceQuoteSet(pub BTreeMap<String, QuoteRecord>);

impl PriceQuoteSet {
    pub fn get(&self, coin_id: &str) -> Option<&QuoteRecord> {
        self.0.get(coin_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QuoteRecord)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, coin_id: impl Into<String>, quote: QuoteRecord) {
        self.0.insert(coin_id.into(), quote);
    }
}

/// One `(timestamp, price)` sample; serialized as `[timestamp_ms, price]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct HistoryPoint {
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: i64,
    pub price: f64,
}

impl HistoryPoint {
    pub fn new(timestamp_ms: i64, price: f64) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }
}

impl From<(i64, f64)> for HistoryPoint {
    fn from((timestamp_ms, price): (i64, f64)) -> Self {
        Self::new(timestamp_ms, price)
    }
}

impl From<HistoryPoint> for (i64, f64) {
    fn from(point: HistoryPoint) -> Self {
        (point.timestamp_ms, point.price)
    }
}

/// Price history ordered by time ascending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub prices: Vec<HistoryPoint>,
}

/// FX rate between two fiat currencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    pub rate: f64,
    pub date: Option<String>,
    pub base: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_fields_by_currency() {
        let quotes: PriceQuoteSet = serde_json::from_value(json!({
            "bitcoin": {"usd": 65000.0, "usd_24h_change": -1.2, "last_updated_at": 1700000000},
            "ethereum": {"usd": 3200, "usd_24h_change": null}
        }))
        .unwrap();

        let btc = quotes.get("bitcoin").unwrap();
        assert_eq!(btc.price("usd"), Some(65000.0));
        assert_eq!(btc.change_24h("usd"), Some(-1.2));
        assert_eq!(btc.price("gbp"), None);

        let eth = quotes.get("ethereum").unwrap();
        assert_eq!(eth.price("usd"), Some(3200.0));
        assert_eq!(eth.change_24h("usd"), None);
    }

    #[test]
    fn test_history_point_wire_format() {
        let history = PriceHistory {
            prices: vec![HistoryPoint::new(1_700_000_000_000, 65000.5)],
        };
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value, json!({"prices": [[1_700_000_000_000i64, 65000.5]]}));

        let parsed: PriceHistory = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, history);
    }
}
