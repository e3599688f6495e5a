//! Terminal Targets
//!
//! Render targets that write plain text to any [`Write`]. Colors are ANSI
//! escapes and can be switched off for pipes and tests.

use std::io::Write;
use std::sync::Mutex;

use super::cards::{CardTarget, ChartRequest, PriceCard};
use super::chart::{ChartSpec, ChartSurface};
use super::error::{DashboardError, DashboardResult};
use super::format::{format_number, Tone};
use super::notify::{Notice, NoticeLevel, Notifier};
use super::watchlist::{WatchlistTarget, WatchlistView, EMPTY_PLACEHOLDER};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const SPARK_BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const SPARK_WIDTH: usize = 56;

fn paint(text: &str, color: &str, enabled: bool) -> String {
    if enabled {
        format!("{}{}{}", color, text, RESET)
    } else {
        text.to_string()
    }
}

fn log_write_error(target: &str, result: std::io::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(target_name = target, error = %e, "Terminal write failed");
    }
}

// ============================================
// CARDS
// ============================================

/// Prints one line per card and remembers each card's chart action
pub struct TerminalCards<W: Write> {
    out: W,
    color: bool,
    actions: Vec<ChartRequest>,
}

impl<W: Write> TerminalCards<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            actions: Vec::new(),
        }
    }

    /// Chart actions of the cards on screen, numbered from 1 in display
    pub fn actions(&self) -> &[ChartRequest] {
        &self.actions
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> CardTarget for TerminalCards<W> {
    fn clear(&mut self) {
        self.actions.clear();
        log_write_error("cards", writeln!(self.out));
    }

    fn push(&mut self, card: PriceCard) {
        let change = match card.tone {
            Tone::Positive => paint(&card.change, GREEN, self.color),
            Tone::Negative => paint(&card.change, RED, self.color),
            Tone::Neutral => card.change.clone(),
        };

        self.actions.push(card.action);
        let line = writeln!(
            self.out,
            "[{}] {:<14} {:>18}  {}",
            self.actions.len(),
            card.coin_id,
            card.price,
            change
        );
        log_write_error("cards", line);
    }
}

// ============================================
// WATCHLIST
// ============================================

/// Prints the watchlist as an aligned table
pub struct TerminalWatchlist<W: Write> {
    out: W,
}

impl<W: Write> TerminalWatchlist<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_view(&mut self, view: &WatchlistView) -> std::io::Result<()> {
        let rows = match view {
            WatchlistView::Empty => return writeln!(self.out, "{}", EMPTY_PLACEHOLDER),
            WatchlistView::Rows(rows) => rows,
        };

        let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(4);
        let id_width = rows.iter().map(|r| r.coin_id.chars().count()).max().unwrap_or(0).max(7);

        writeln!(
            self.out,
            "{:<name_width$}  {:<8}  {:>14}  {:<5}  {:<id_width$}",
            "Name", "Symbol", "Target", "Alert", "Coin ID",
        )?;
        for row in rows {
            writeln!(
                self.out,
                "{:<name_width$}  {:<8}  {:>14}  {:<5}  {:<id_width$}",
                row.name, row.symbol, row.target, row.alert, row.coin_id,
            )?;
        }
        Ok(())
    }
}

impl<W: Write> WatchlistTarget for TerminalWatchlist<W> {
    fn render(&mut self, view: &WatchlistView) {
        let result = self.write_view(view);
        log_write_error("watchlist", result);
    }
}

// ============================================
// NOTIFIER
// ============================================

/// Prints notices, errors in red
pub struct TerminalNotifier<W: Write + Send> {
    out: Mutex<W>,
    color: bool,
}

impl<W: Write + Send> TerminalNotifier<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }
}

impl<W: Write + Send> Notifier for TerminalNotifier<W> {
    fn notify(&self, notice: Notice) {
        let line = match notice.level {
            NoticeLevel::Error => paint(&format!("error: {}", notice.message), RED, self.color),
            NoticeLevel::Info => notice.message,
        };

        let result = match self.out.lock() {
            Ok(mut out) => writeln!(out, "{}", line),
            Err(poisoned) => writeln!(poisoned.into_inner(), "{}", line),
        };
        log_write_error("notifier", result);
    }
}

// ============================================
// CHART
// ============================================

/// A chart printed as a sparkline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChart {
    pub id: u64,
    pub sparkline: String,
}

/// Draws charts as a titled sparkline with the price range and time span
pub struct TerminalChartSurface<W: Write> {
    out: W,
    color: bool,
    title: String,
    drawn: u64,
}

impl<W: Write> TerminalChartSurface<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color,
            title: String::new(),
            drawn: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartSurface for TerminalChartSurface<W> {
    type Chart = TextChart;

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn draw(&mut self, spec: &ChartSpec) -> DashboardResult<TextChart> {
        let prices: Vec<f64> = spec.points.iter().map(|(_, p)| *p).collect();
        let line = sparkline(&prices, SPARK_WIDTH);

        writeln!(self.out, "{}", paint(&self.title, BOLD, self.color))
            .and_then(|_| writeln!(self.out, "{}  {}", spec.label, line))
            .and_then(|_| match (spec.points.first(), spec.points.last(), spec.price_range()) {
                (Some((start, _)), Some((end, _)), Some((lo, hi))) => writeln!(
                    self.out,
                    "{} .. {}  low {}  high {}",
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d"),
                    format_number(Some(lo)),
                    format_number(Some(hi)),
                ),
                _ => writeln!(self.out, "no data points"),
            })
            .map_err(|e| DashboardError::Render(e.to_string()))?;

        self.drawn += 1;
        Ok(TextChart {
            id: self.drawn,
            sparkline: line,
        })
    }

    fn destroy(&mut self, chart: TextChart) {
        tracing::trace!(chart_id = chart.id, "Released text chart");
    }
}

/// Downsample `values` into at most `width` block characters
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }

    let buckets = values.len().min(width);
    let averaged: Vec<f64> = (0..buckets)
        .map(|b| {
            let start = b * values.len() / buckets;
            let end = ((b + 1) * values.len() / buckets).max(start + 1);
            let slice = &values[start..end];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect();

    let lo = averaged.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = averaged.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    averaged
        .iter()
        .map(|v| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_BLOCKS[SPARK_BLOCKS.len() / 2]
            } else {
                let idx = ((v - lo) / span * (SPARK_BLOCKS.len() - 1) as f64).round() as usize;
                SPARK_BLOCKS[idx.min(SPARK_BLOCKS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::watchlist::WatchlistRow;
    use crate::market::{HistoryPoint, PriceHistory};

    fn card(coin: &str, tone: Tone) -> PriceCard {
        PriceCard {
            coin_id: coin.to_string(),
            price: "$65,000".to_string(),
            change: "-1.20% / 24h".to_string(),
            tone,
            action: ChartRequest {
                coin_id: coin.to_string(),
                vs: "usd".to_string(),
            },
        }
    }

    #[test]
    fn test_cards_numbered_and_colored() {
        let mut cards = TerminalCards::new(Vec::new(), true);
        cards.clear();
        cards.push(card("bitcoin", Tone::Negative));
        cards.push(card("ethereum", Tone::Neutral));

        assert_eq!(cards.actions().len(), 2);
        assert_eq!(cards.actions()[1].coin_id, "ethereum");

        let out = String::from_utf8(cards.into_inner()).unwrap();
        assert!(out.contains("[1] bitcoin"));
        assert!(out.contains("\x1b[31m-1.20% / 24h\x1b[0m"));
        assert!(out.contains("[2] ethereum"));
    }

    #[test]
    fn test_watchlist_table() {
        let mut table = TerminalWatchlist::new(Vec::new());
        table.render(&WatchlistView::Empty);
        table.render(&WatchlistView::Rows(vec![WatchlistRow {
            coin_id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            target: "-".to_string(),
            alert: "Off",
        }]));

        let out = String::from_utf8(table.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "No items yet.");
        assert!(lines[1].starts_with("Name"));
        assert!(lines[2].starts_with("Bitcoin"));
        assert!(lines[2].contains("BTC"));
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[], 10), "");
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▅▅");
        assert_eq!(sparkline(&(0..100).map(f64::from).collect::<Vec<_>>(), 10).chars().count(), 10);
    }

    #[test]
    fn test_chart_surface_output() {
        let history = PriceHistory {
            prices: vec![
                HistoryPoint::new(1_700_000_000_000, 100.0),
                HistoryPoint::new(1_700_086_400_000, 120.5),
            ],
        };
        let spec = ChartSpec::from_history("bitcoin", "usd", &history);

        let mut surface = TerminalChartSurface::new(Vec::new(), false);
        surface.set_title("bitcoin — last 7d (USD)");
        let chart = surface.draw(&spec).unwrap();
        surface.destroy(chart);

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert!(out.starts_with("bitcoin — last 7d (USD)\n"));
        assert!(out.contains("bitcoin (usd)  ▁█"));
        assert!(out.contains("low 100  high 120.5"));
    }
}
