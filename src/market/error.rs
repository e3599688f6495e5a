//! Market data error types

use thiserror::Error;

/// Errors that can occur when talking to upstream market data APIs
#[derive(Error, Debug)]
pub enum MarketError {
    /// Upstream answered with a non-success status
    #[error("HTTP {status} from {upstream}")]
    Status {
        upstream: &'static str,
        status: u16,
        body: String,
    },

    /// Transport failure or undecodable body
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// FX source has no rate for the pair
    #[error("Unsupported pair {from}->{to}")]
    UnsupportedPair { from: String, to: String },

    /// Kline source returned nothing for the symbol
    #[error("No klines for {0}")]
    NoKlines(String),

    /// Kline source returned rows, none of them usable
    #[error("No usable klines for {0}")]
    NoUsableKlines(String),
}

impl MarketError {
    /// Body snippet of a status failure, truncated to `limit` characters
    pub fn body_snippet(&self, limit: usize) -> Option<String> {
        match self {
            MarketError::Status { body, .. } => Some(body.chars().take(limit).collect()),
            _ => None,
        }
    }
}

/// Result type alias for market operations
pub type MarketResult<T> = Result<T, MarketError>;

/// Turn a non-success response into [`MarketError::Status`]
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    upstream: &'static str,
) -> MarketResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(upstream, status = status.as_u16(), "Upstream request failed");

    Err(MarketError::Status {
        upstream,
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::Status {
            upstream: "Binance",
            status: 400,
            body: "{\"code\":-1121}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400 from Binance");

        let err = MarketError::UnsupportedPair {
            from: "USD".to_string(),
            to: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported pair USD->XYZ");
    }

    #[test]
    fn test_body_snippet() {
        let err = MarketError::Status {
            upstream: "Binance",
            status: 500,
            body: "x".repeat(500),
        };
        assert_eq!(err.body_snippet(300).unwrap().len(), 300);
        assert!(MarketError::NoKlines("BTCUSDT".into()).body_snippet(300).is_none());
    }
}
