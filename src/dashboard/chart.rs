//! Chart Renderer
//!
//! Owns the single live chart. Each render fetches a fixed 7-day window,
//! destroys the previous chart, and draws a new one.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use super::client::DashboardClient;
use super::error::{DashboardError, DashboardResult};
use super::notify::{Notice, Notifier};
use crate::market::PriceHistory;

/// Lookback window of every chart, in days
pub const CHART_DAYS: u32 = 7;

/// What a surface needs to draw one line chart.
///
/// The x axis is time labelled per day; the y axis spans the data and is not
/// forced through zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub coin_id: String,
    pub vs: String,
    /// Dataset label, `"{coin} ({vs})"`
    pub label: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ChartSpec {
    pub fn from_history(coin_id: &str, vs: &str, history: &PriceHistory) -> Self {
        let points = history
            .prices
            .iter()
            .filter_map(|p| {
                Utc.timestamp_millis_opt(p.timestamp_ms)
                    .single()
                    .map(|ts| (ts, p.price))
            })
            .collect();

        Self {
            coin_id: coin_id.to_string(),
            vs: vs.to_string(),
            label: format!("{} ({})", coin_id, vs),
            points,
        }
    }

    /// Smallest and largest price, if any
    pub fn price_range(&self) -> Option<(f64, f64)> {
        self.points.iter().map(|(_, p)| *p).fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
    }
}

/// Heading shown above the chart
pub fn chart_title(coin_id: &str, vs: &str) -> String {
    format!("{} — last {}d ({})", coin_id, CHART_DAYS, vs.to_uppercase())
}

/// A drawing target for line charts
pub trait ChartSurface {
    /// Handle to a drawn chart
    type Chart;

    /// Update the heading label
    fn set_title(&mut self, title: &str);

    /// Construct a new chart
    fn draw(&mut self, spec: &ChartSpec) -> DashboardResult<Self::Chart>;

    /// Release a chart built by `draw`
    fn destroy(&mut self, chart: Self::Chart);
}

/// Time-series chart renderer
pub struct ChartRenderer<S: ChartSurface> {
    client: DashboardClient,
    surface: S,
    notifier: Arc<dyn Notifier>,
    current: Option<S::Chart>,
}

impl<S: ChartSurface> ChartRenderer<S> {
    pub fn new(client: DashboardClient, surface: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            surface,
            notifier,
            current: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The live chart, if one has been drawn
    pub fn current(&self) -> Option<&S::Chart> {
        self.current.as_ref()
    }

    /// Fetch the last 7 days for `(coin_id, vs)` and redraw.
    ///
    /// On fetch failure the existing chart stays.
    pub async fn render(&mut self, coin_id: &str, vs: &str) -> bool {
        let coin_id = coin_id.trim();
        let vs = vs.trim().to_lowercase();

        match self.client.history(coin_id, &vs, CHART_DAYS).await {
            Ok(history) => self.render_series(coin_id, &vs, &history),
            Err(e) => {
                tracing::warn!(coin_id, error = %e, "History fetch failed");
                self.notifier.notify(Notice::from(&e));
                false
            }
        }
    }

    /// Replace the live chart with one drawn from `history`.
    ///
    /// A history with no usable points leaves the existing chart in place.
    pub fn render_series(&mut self, coin_id: &str, vs: &str, history: &PriceHistory) -> bool {
        let spec = ChartSpec::from_history(coin_id, vs, history);
        if spec.points.is_empty() {
            let e = DashboardError::Render(format!("no price history for {}", coin_id));
            tracing::warn!(coin_id, error = %e, "Chart not redrawn");
            self.notifier.notify(Notice::from(&e));
            return false;
        }

        if let Some(old) = self.current.take() {
            self.surface.destroy(old);
        }

        self.surface.set_title(&chart_title(coin_id, vs));

        match self.surface.draw(&spec) {
            Ok(chart) => {
                self.current = Some(chart);
                true
            }
            Err(e) => {
                tracing::warn!(coin_id, error = %e, "Chart draw failed");
                self.notifier.notify(Notice::from(&e));
                false
            }
        }
    }

    /// Destroy the live chart, if any
    pub fn clear(&mut self) {
        if let Some(old) = self.current.take() {
            self.surface.destroy(old);
        }
    }
}
