//! Temperature chart rendering
//!
//! Draws the forecast series as a line chart with circular markers into a PNG.
//! The canvas widens with the number of points, and roughly ten x-axis labels are
//! drawn regardless of series length, each split over two lines (date, then time).

pub mod font;

use crate::WeatherPlotError;
use crate::config::ChartConfig;
use crate::models::{ChartArtifact, Coordinate, ForecastSeries};
use chrono::Local;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Pixels per width unit; the canvas is `max(15, 0.6 * points)` units wide
const DPI: f64 = 100.0;
const MIN_WIDTH_UNITS: f64 = 15.0;
const WIDTH_UNITS_PER_POINT: f64 = 0.6;
const HEIGHT: u32 = 600;

const TITLE_HEIGHT: i32 = 96;
const X_LABEL_AREA: i32 = 56;
const Y_LABEL_AREA: i32 = 64;
const TARGET_TICKS: usize = 10;
const MARKER_SIZE: i32 = 4;

const CORNFLOWER_BLUE: RGBColor = RGBColor(100, 149, 237);
const GRID: RGBColor = RGBColor(220, 220, 220);

/// Prefix of synthesised output file names
pub const FILE_PREFIX: &str = "forecast_plot_";

/// Renders a [`ForecastSeries`] to an image file
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    output_dir: PathBuf,
    font_path: Option<PathBuf>,
}

impl ChartRenderer {
    #[must_use]
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            font_path: config.font_path.clone(),
        }
    }

    /// The explicit path, or `forecast_plot_<YYYYMMDD_HHMMSS>.png` in the output directory
    #[must_use]
    pub fn resolve_output(&self, output: Option<&Path>) -> PathBuf {
        match output {
            Some(path) => path.to_path_buf(),
            None => self.output_dir.join(default_file_name()),
        }
    }

    /// Render the chart, creating the parent directory when needed and overwriting any
    /// existing file.
    #[tracing::instrument(name = "render_chart", skip_all, fields(points = series.len()))]
    pub fn render(
        &self,
        series: &ForecastSeries,
        coordinate: &Coordinate,
        output: Option<&Path>,
    ) -> crate::Result<ChartArtifact> {
        if series.is_empty() {
            return Err(WeatherPlotError::validation(
                "forecast series is empty, nothing to plot",
            ));
        }

        let path = self.resolve_output(output);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| WeatherPlotError::io(parent, e))?;
        }
        info!("Plotting forecast data to {}", path.display());

        let labelled = font::ensure_font(self.font_path.as_deref()).is_some();
        if !labelled {
            warn!("No usable font found, the chart will be drawn without text");
        }

        let (width, height) = canvas_size(series.len());
        draw(&path, (width, height), series, coordinate, labelled).map_err(|e| {
            WeatherPlotError::io(&path, std::io::Error::other(e.to_string()))
        })?;

        debug!("Wrote {}x{} chart", width, height);
        Ok(ChartArtifact {
            path,
            width,
            height,
            points: series.len(),
        })
    }
}

/// `forecast_plot_<YYYYMMDD_HHMMSS>.png` for the current local time
#[must_use]
pub fn default_file_name() -> String {
    format!("{FILE_PREFIX}{}.png", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Canvas size in pixels for a series of `points` values
#[must_use]
pub fn canvas_size(points: usize) -> (u32, u32) {
    let units = MIN_WIDTH_UNITS.max(points as f64 * WIDTH_UNITS_PER_POINT);
    let width = (units * DPI).round() as u32;
    (width, HEIGHT)
}

/// Indices that get an x-axis label: every `max(1, points / 10)`-th point
#[must_use]
pub fn tick_indices(points: usize) -> Vec<usize> {
    let stride = (points / TARGET_TICKS).max(1);
    (0..points).step_by(stride).collect()
}

/// Label lines for a timestamp: each space becomes a line break
#[must_use]
pub fn tick_label(time: &str) -> Vec<&str> {
    time.split(' ').collect()
}

/// Y-axis bounds with some headroom; a flat series still gets a visible range
fn y_bounds(series: &ForecastSeries) -> (f64, f64) {
    let (min, max) = series.temperature_range().unwrap_or((0, 0));
    let (min, max) = (min as f64, max as f64);
    let pad = ((max - min) * 0.1).max(1.0);
    (min - pad, max + pad)
}

fn font(size: f64, style: FontStyle) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size, style)
}

fn draw(
    path: &Path,
    size: (u32, u32),
    series: &ForecastSeries,
    coordinate: &Coordinate,
    labelled: bool,
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let (title_area, plot_area) = root.split_vertically(TITLE_HEIGHT);
    let center = (size.0 / 2) as i32;
    let top = Pos::new(HPos::Center, VPos::Top);

    if labelled {
        title_area.draw(&Text::new(
            "Seven-Day Temperature Forecast",
            (center, 8),
            font(22.0, FontStyle::Normal).color(&BLACK).pos(top),
        ))?;
        title_area.draw(&Text::new(
            coordinate.to_string(),
            (center, 36),
            font(22.0, FontStyle::Normal).color(&BLACK).pos(top),
        ))?;
        title_area.draw(&Text::new(
            format!(
                "Forecast starting at {}",
                series.first_time().unwrap_or_default()
            ),
            (center, 68),
            font(14.0, FontStyle::Italic).color(&BLACK).pos(top),
        ))?;
    }

    let points: Vec<(f64, f64)> = series
        .temperatures()
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, *t as f64))
        .collect();
    let x_range = -0.5..(series.len() as f64 - 0.5);
    let (y_min, y_max) = y_bounds(series);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(20)
        .x_label_area_size(if labelled { X_LABEL_AREA } else { 0 })
        .y_label_area_size(if labelled { Y_LABEL_AREA } else { 0 })
        .build_cartesian_2d(x_range, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_labels(0)
        .bold_line_style(GRID.stroke_width(1))
        .light_line_style(WHITE.stroke_width(0));
    if labelled {
        let unit = series.unit().map_or_else(String::new, |u| format!(" (°{u})"));
        mesh.y_labels(8)
            .y_desc(format!("Temperature{unit}"))
            .label_style(font(14.0, FontStyle::Normal).color(&BLACK))
            .axis_desc_style(font(14.0, FontStyle::Normal).color(&BLACK));
    } else {
        mesh.y_labels(0);
    }
    mesh.draw()?;

    let ticks = tick_indices(series.len());

    // Vertical grid lines only where a label is drawn
    chart.draw_series(ticks.iter().map(|&i| {
        PathElement::new(vec![(i as f64, y_min), (i as f64, y_max)], GRID.stroke_width(1))
    }))?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        CORNFLOWER_BLUE.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, MARKER_SIZE, CORNFLOWER_BLUE.filled())),
    )?;

    if labelled {
        let times = series.times();
        for &i in &ticks {
            let (x, y) = chart.backend_coord(&(i as f64, y_min));
            // Upright and stacked; plotters only rotates text by quarter turns
            for (line_no, line) in tick_label(&times[i]).into_iter().enumerate() {
                let offset = 8 + 16 * line_no as i32;
                root.draw(&Text::new(
                    line.to_string(),
                    (x, y + offset),
                    font(12.0, FontStyle::Normal).color(&BLACK).pos(top),
                ))?;
            }
        }
    }

    root.present()?;
    Ok(())
}
