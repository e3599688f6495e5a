//! Dashboard
//!
//! Client-side components of the price dashboard. Each component talks to
//! the backend through a [`DashboardClient`] and draws into a target handed
//! to its constructor:
//!
//! - [`PriceCards`] draws into a [`CardTarget`]
//! - [`ChartRenderer`] owns at most one chart on a [`ChartSurface`]
//! - [`WatchlistController`] draws into a [`WatchlistTarget`]
//!
//! Failures of every kind go to the shared [`Notifier`].

pub mod cards;
pub mod chart;
pub mod client;
mod error;
pub mod format;
pub mod notify;
pub mod svg;
pub mod terminal;
pub mod watchlist;

pub use cards::{build_cards, CardTarget, ChartRequest, PriceCard, PriceCards};
pub use chart::{chart_title, ChartRenderer, ChartSpec, ChartSurface, CHART_DAYS};
pub use client::DashboardClient;
pub use error::{DashboardError, DashboardResult};
pub use format::Tone;
pub use notify::{MemoryNotifier, Notice, NoticeLevel, Notifier};
pub use svg::{SvgChart, SvgChartSurface};
pub use terminal::{TerminalCards, TerminalChartSurface, TerminalNotifier, TerminalWatchlist};
pub use watchlist::{
    WatchlistController, WatchlistForm, WatchlistRow, WatchlistTarget, WatchlistView,
    EMPTY_PLACEHOLDER,
};
