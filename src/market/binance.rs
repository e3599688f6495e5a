//! Binance kline client
//!
//! Hourly klines quoted in USDT, which stands in for USD. The close price
//! of each kline becomes one history point.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::error::{ensure_success, MarketError, MarketResult};
use super::types::HistoryPoint;

/// Binance caps a single klines call at this many rows
pub const MAX_KLINES: i64 = 1000;

/// Coin identifiers whose Binance symbol is not derivable from the id
const KNOWN_SYMBOLS: [(&str, &str); 3] = [
    ("bitcoin", "BTCUSDT"),
    ("ethereum", "ETHUSDT"),
    ("solana", "SOLUSDT"),
];

/// Map a coin identifier to its USDT trading pair.
///
/// Unknown ids keep their alphanumeric characters, uppercased, e.g.
/// `cardano` becomes `CARDANOUSDT`.
pub fn to_binance_symbol(coin_id: &str) -> String {
    if let Some((_, symbol)) = KNOWN_SYMBOLS.iter().find(|(id, _)| *id == coin_id) {
        return symbol.to_string();
    }

    let base: String = coin_id
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_uppercase();

    format!("{}USDT", base)
}

/// Binance public REST client
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> MarketResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Hourly close prices in USDT for the last `hours` hours
    pub async fn hourly_closes(&self, coin_id: &str, hours: i64) -> MarketResult<Vec<HistoryPoint>> {
        let symbol = to_binance_symbol(coin_id);
        let limit = hours.clamp(1, MAX_KLINES);
        let url = format!("{}/api/v3/klines", self.base_url);

        tracing::debug!(%symbol, limit, "Fetching klines");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.clone()),
                ("interval", "1h".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let response = ensure_success(response, "Binance").await?;
        let body: Value = response.json().await?;

        parse_klines(&symbol, &body)
    }
}

/// Extract `(open_time, close)` from a klines payload.
///
/// Rows look like `[openTime, open, high, low, close, volume, ...]` with
/// prices as strings. Rows that do not parse are skipped.
pub fn parse_klines(symbol: &str, body: &Value) -> MarketResult<Vec<HistoryPoint>> {
    let rows = match body.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => return Err(MarketError::NoKlines(symbol.to_string())),
    };

    let series: Vec<HistoryPoint> = rows.iter().filter_map(parse_kline_row).collect();

    if series.is_empty() {
        return Err(MarketError::NoUsableKlines(symbol.to_string()));
    }

    Ok(series)
}

fn parse_kline_row(row: &Value) -> Option<HistoryPoint> {
    let open_time = row.get(0).and_then(as_number)? as i64;
    let close = row.get(4).and_then(as_number)?;
    Some(HistoryPoint::new(open_time, close))
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(to_binance_symbol("bitcoin"), "BTCUSDT");
        assert_eq!(to_binance_symbol("solana"), "SOLUSDT");
        assert_eq!(to_binance_symbol("cardano"), "CARDANOUSDT");
        assert_eq!(to_binance_symbol("shiba-inu"), "SHIBAINUUSDT");
    }

    #[test]
    fn test_parse_klines_skips_bad_rows() {
        let body = json!([
            [1_700_000_000_000i64, "1.0", "2.0", "0.5", "65000.5", "10"],
            ["bad", "1.0", "2.0", "0.5", "65000.5", "10"],
            [1_700_003_600_000i64, "1.0", "2.0", "0.5", "not a price", "10"],
            [1_700_007_200_000i64, "1.0", "2.0", "0.5", 65100.25, "10"]
        ]);

        let series = parse_klines("BTCUSDT", &body).unwrap();
        assert_eq!(
            series,
            vec![
                HistoryPoint::new(1_700_000_000_000, 65000.5),
                HistoryPoint::new(1_700_007_200_000, 65100.25),
            ]
        );
    }

    #[test]
    fn test_parse_klines_empty() {
        let err = parse_klines("FOOUSDT", &json!([])).unwrap_err();
        assert_eq!(err.to_string(), "No klines for FOOUSDT");

        let err = parse_klines("FOOUSDT", &json!({"code": -1121})).unwrap_err();
        assert!(matches!(err, MarketError::NoKlines(_)));

        let err = parse_klines("FOOUSDT", &json!([["x"]])).unwrap_err();
        assert_eq!(err.to_string(), "No usable klines for FOOUSDT");
    }

    #[tokio::test]
    async fn test_hourly_closes_clamps_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v3/klines")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("symbol".into(), "ETHUSDT".into()),
                Matcher::UrlEncoded("interval".into(), "1h".into()),
                Matcher::UrlEncoded("limit".into(), "1000".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(r#"[[1700000000000,"1","1","1","3200.5","1"]]"#)
            .create_async()
            .await;

        let client = BinanceClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let series = client.hourly_closes("ethereum", 90 * 24).await.unwrap();

        mock.assert_async().await;
        assert_eq!(series, vec![HistoryPoint::new(1_700_000_000_000, 3200.5)]);
    }

    #[tokio::test]
    async fn test_hourly_closes_status_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v3/klines")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body(r#"{"code":-1121,"msg":"Invalid symbol."}"#)
            .create_async()
            .await;

        let client = BinanceClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let err = client.hourly_closes("nosuchcoin", 168).await.unwrap_err();

        assert!(matches!(err, MarketError::Status { status: 400, .. }));
        assert!(err.body_snippet(300).unwrap().contains("Invalid symbol"));
    }
}
