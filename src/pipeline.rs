//! Forecast pipeline
//!
//! Runs the five stages in order: load inputs, resolve the station, fetch the
//! forecast, parse it, render the chart. Each stage hands its value to the next;
//! the first failure ends the run.

use crate::api::{RetryPolicy, WeatherApiClient};
use crate::chart::ChartRenderer;
use crate::config::WeatherPlotConfig;
use crate::inputs::{Inputs, load_inputs};
use crate::models::{ChartArtifact, ForecastSeries};
use crate::weather::{ForecastFetcher, StationResolver, parse_forecast};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info};

/// Locations a single run reads from and writes to
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub latlon_file: PathBuf,
    pub email_file: PathBuf,
    /// Explicit chart path; synthesised when `None`
    pub output: Option<PathBuf>,
}

impl PipelineRequest {
    #[must_use]
    pub fn from_config(config: &WeatherPlotConfig) -> Self {
        Self {
            latlon_file: config.inputs.latlon_file.clone(),
            email_file: config.inputs.email_file.clone(),
            output: config.chart.output.clone(),
        }
    }
}

/// Everything a successful run produced
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub inputs: Inputs,
    pub series: ForecastSeries,
    pub chart: ChartArtifact,
}

/// The configured pipeline
pub struct Pipeline {
    client: WeatherApiClient,
    station_retry: RetryPolicy,
    renderer: ChartRenderer,
}

impl Pipeline {
    pub fn new(config: &WeatherPlotConfig) -> crate::Result<Self> {
        Ok(Self {
            client: WeatherApiClient::new(&config.api)?,
            station_retry: RetryPolicy::from_config(&config.retry),
            renderer: ChartRenderer::new(&config.chart),
        })
    }

    /// Run all stages once
    #[tracing::instrument(name = "pipeline", skip_all)]
    pub fn run(&self, request: &PipelineRequest) -> crate::Result<PipelineOutcome> {
        let start = Instant::now();
        let result = self.run_stages(request);

        match &result {
            Ok(outcome) => info!(
                "Pipeline finished in {:.3}s: {} points plotted to {}",
                start.elapsed().as_secs_f64(),
                outcome.series.len(),
                outcome.chart.path.display()
            ),
            Err(e) => error!(kind = e.kind(), "Pipeline failed: {e}"),
        }

        result
    }

    fn run_stages(&self, request: &PipelineRequest) -> crate::Result<PipelineOutcome> {
        let inputs = load_inputs(&request.latlon_file, &request.email_file)?;

        let metadata =
            StationResolver::new(&self.client, self.station_retry.clone()).resolve(&inputs)?;
        let payload = ForecastFetcher::new(&self.client).fetch(&metadata)?;
        let series = parse_forecast(&payload)?;

        let chart = self
            .renderer
            .render(&series, &inputs.coordinate, request.output.as_deref())?;

        Ok(PipelineOutcome {
            inputs,
            series,
            chart,
        })
    }
}
