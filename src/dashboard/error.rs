//! Dashboard error types

use thiserror::Error;

/// Errors surfaced by dashboard components
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The backend could not be reached
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered `ok: false`
    #[error("{0}")]
    Backend(String),

    /// The response body was not the expected envelope
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Form input rejected before any request
    #[error("{0}")]
    InvalidInput(String),

    /// The chart surface failed to draw
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
