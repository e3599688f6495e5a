//! SVG Chart Surface
//!
//! Draws the 7-day line chart into `<dir>/<coin>-<vs>-7d.svg` with
//! `plotters`. Destroying a chart deletes its file.

use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use super::chart::{ChartSpec, ChartSurface, CHART_DAYS};
use super::error::{DashboardError, DashboardResult};
use super::format::format_number;

const DEFAULT_WIDTH: u32 = 960;
const DEFAULT_HEIGHT: u32 = 480;

/// A chart file on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgChart {
    pub path: PathBuf,
}

/// Writes one SVG file per drawn chart
pub struct SvgChartSurface {
    dir: PathBuf,
    width: u32,
    height: u32,
    title: String,
}

impl SvgChartSurface {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: String::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// File the chart for `spec` is written to
    pub fn chart_path(&self, spec: &ChartSpec) -> PathBuf {
        self.dir.join(format!(
            "{}-{}-{}d.svg",
            file_safe(&spec.coin_id),
            file_safe(&spec.vs),
            CHART_DAYS
        ))
    }

    fn plot(&self, path: &Path, spec: &ChartSpec) -> DashboardResult<()> {
        let (first, last) = match (spec.points.first(), spec.points.last()) {
            (Some(first), Some(last)) => (first.0, last.0),
            _ => return Err(DashboardError::Render("no data points to draw".to_string())),
        };
        let (x_min, x_max) = time_range(first, last);
        let (y_min, y_max) = spec
            .price_range()
            .map(|(lo, hi)| price_range(lo, hi))
            .unwrap_or((0.0, 1.0));

        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24.0).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_labels(CHART_DAYS as usize + 1)
            .x_label_formatter(&|ts: &DateTime<Utc>| ts.format("%b %d").to_string())
            .y_label_formatter(&|price: &f64| format_number(Some(*price)))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(LineSeries::new(spec.points.iter().copied(), &BLUE))
            .map_err(render_error)?
            .label(spec.label.as_str())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

impl ChartSurface for SvgChartSurface {
    type Chart = SvgChart;

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn draw(&mut self, spec: &ChartSpec) -> DashboardResult<SvgChart> {
        fs::create_dir_all(&self.dir).map_err(render_error)?;

        let path = self.chart_path(spec);
        self.plot(&path, spec)?;

        tracing::debug!(path = %path.display(), points = spec.points.len(), "Wrote chart");
        Ok(SvgChart { path })
    }

    fn destroy(&mut self, chart: SvgChart) {
        if let Err(e) = fs::remove_file(&chart.path) {
            tracing::warn!(path = %chart.path.display(), error = %e, "Failed to remove chart file");
        }
    }
}

fn render_error(err: impl std::fmt::Display) -> DashboardError {
    DashboardError::Render(err.to_string())
}

fn file_safe(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Widen a single-instant range so the axis has extent
fn time_range(first: DateTime<Utc>, last: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    if last > first {
        (first, last)
    } else {
        (first - Duration::hours(12), first + Duration::hours(12))
    }
}

/// Pad the price range by 5%; the axis is not anchored at zero
fn price_range(lo: f64, hi: f64) -> (f64, f64) {
    let span = hi - lo;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        (lo.abs() * 0.01).max(1e-6)
    };
    (lo - pad, hi + pad)
}
