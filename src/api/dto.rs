//! Data Transfer Objects
//!
//! Request and response types for the API endpoints. Every response body is
//! an [`Envelope`]; the dashboard client deserializes the same type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};
use crate::store::NewWatchlistEntry;

// ============================================
// ENVELOPE
// ============================================

/// `{ok, data?, error?}` wrapper around every response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Upstream response snippet, set on history source failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful response carrying `data`
    pub fn data(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
            body: None,
        }
    }

    /// Successful response with no payload
    pub fn ok() -> Self {
        Self {
            ok: true,
            data: None,
            error: None,
            body: None,
        }
    }

    /// Failed response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
            body: None,
        }
    }
}

// ============================================
// CRYPTO DTOs
// ============================================

/// Query of `GET /api/crypto/price`
#[derive(Debug, Default, Deserialize)]
pub struct PriceParams {
    /// Comma-separated coin identifiers
    pub ids: Option<String>,
    /// Comma-separated reference currencies
    pub vs: Option<String>,
}

/// Query of `GET /api/crypto/history`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub coin_id: Option<String>,
    pub vs: Option<String>,
    /// Lookback in days, parsed by the handler
    pub days: Option<String>,
}

// ============================================
// FX DTOs
// ============================================

/// Query of `GET /api/fx/convert`
#[derive(Debug, Default, Deserialize)]
pub struct ConvertParams {
    pub amount: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Result of an FX conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub success: bool,
    pub query: ConversionQuery,
    pub info: ConversionInfo,
    pub result: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionInfo {
    pub rate: f64,
    pub date: Option<String>,
    pub base: Option<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Unix seconds
    pub ts: i64,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================
// WATCHLIST DTOs
// ============================================

/// Parse a `POST /api/watchlist` body.
///
/// Bodies that are not a JSON object count as empty, so they fail the
/// required-field check rather than the JSON parser.
pub fn parse_watchlist_submission(body: &[u8]) -> ApiResult<NewWatchlistEntry> {
    let fields = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };

    let coin_id = required_text(&fields, "coin_id");
    let symbol = required_text(&fields, "symbol");
    let name = required_text(&fields, "name");

    let (coin_id, symbol, name) = match (coin_id, symbol, name) {
        (Some(c), Some(s), Some(n)) => (c, s, n),
        _ => {
            return Err(ApiError::Validation(
                "coin_id, symbol, name required".to_string(),
            ))
        }
    };

    let target_price = match fields.get("target_price") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().parse::<f64>().map_err(|_| {
            ApiError::Validation("target_price must be a number".to_string())
        })?),
        Some(_) => {
            return Err(ApiError::Validation(
                "target_price must be a number".to_string(),
            ))
        }
    };

    let alert_enabled = fields.get("alert_enabled").map(is_truthy).unwrap_or(false);

    Ok(NewWatchlistEntry {
        coin_id: coin_id.trim().to_string(),
        name: name.trim().to_string(),
        symbol: symbol.trim().to_string(),
        target_price,
        alert_enabled,
    })
}

fn required_text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_serialization() {
        let ok = serde_json::to_value(Envelope::data(vec![1, 2])).unwrap();
        assert_eq!(ok, json!({"ok": true, "data": [1, 2]}));

        let err = serde_json::to_value(Envelope::<()>::error("boom")).unwrap();
        assert_eq!(err, json!({"ok": false, "error": "boom"}));

        let bare = serde_json::to_value(Envelope::<()>::ok()).unwrap();
        assert_eq!(bare, json!({"ok": true}));
    }

    #[test]
    fn test_envelope_decodes_without_default_payload() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Quote {
            usd: f64,
        }

        let full: Envelope<Quote> = serde_json::from_str(r#"{"ok":true,"data":{"usd":1.5}}"#).unwrap();
        assert_eq!(full.data, Some(Quote { usd: 1.5 }));

        let bare: Envelope<Quote> = serde_json::from_str(r#"{"ok":false,"error":"boom"}"#).unwrap();
        assert_eq!(bare.data, None);
        assert_eq!(bare.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_submission_full() {
        let entry = parse_watchlist_submission(
            br#"{"coin_id":" bitcoin ","name":"Bitcoin","symbol":"btc","target_price":"70000","alert_enabled":"on"}"#,
        )
        .unwrap();

        assert_eq!(entry.coin_id, "bitcoin");
        assert_eq!(entry.target_price, Some(70000.0));
        assert!(entry.alert_enabled);
    }

    #[test]
    fn test_submission_missing_fields() {
        let bodies: [&[u8]; 4] = [
            b"not json",
            br#"{"coin_id":"bitcoin","name":"Bitcoin"}"#,
            br#"{"coin_id":"bitcoin","name":"Bitcoin","symbol":"  "}"#,
            br#"[1,2,3]"#,
        ];

        for body in bodies {
            let err = parse_watchlist_submission(body).unwrap_err();
            assert_eq!(err.to_string(), "coin_id, symbol, name required");
        }
    }

    #[test]
    fn test_submission_target_price() {
        let entry = parse_watchlist_submission(
            br#"{"coin_id":"bitcoin","name":"Bitcoin","symbol":"btc","target_price":""}"#,
        )
        .unwrap();
        assert_eq!(entry.target_price, None);
        assert!(!entry.alert_enabled);

        let err = parse_watchlist_submission(
            br#"{"coin_id":"bitcoin","name":"Bitcoin","symbol":"btc","target_price":"lots"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "target_price must be a number");
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("on")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }
}
