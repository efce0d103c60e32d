use anyhow::{Context, Result};
use argh::FromArgs;
use std::path::PathBuf;
use std::process::ExitCode;
use weatherplot::{Pipeline, PipelineRequest, WeatherPlotConfig, WeatherPlotError, logging};

#[derive(FromArgs)]
/// Plot the seven-day temperature forecast for a coordinate
struct Args {
    /// path to the configuration file (optional, uses ./weatherplot.toml or the user config dir)
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// file holding `lat: <float>, lon: <float>`
    #[argh(option)]
    latlon_file: Option<PathBuf>,

    /// file holding the contact email sent to the weather service
    #[argh(option)]
    email_file: Option<PathBuf>,

    /// where to write the chart (default: forecast_plot_<timestamp>.png)
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// log at debug level
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl Args {
    /// Command line values win over the configuration file and environment
    fn apply(self, config: &mut WeatherPlotConfig) {
        if let Some(path) = self.latlon_file {
            config.inputs.latlon_file = path;
        }
        if let Some(path) = self.email_file {
            config.inputs.email_file = path;
        }
        if let Some(path) = self.output {
            config.chart.output = Some(path);
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<WeatherPlotError>() {
                Some(err) => eprintln!("Error: {}", err.user_message()),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = WeatherPlotConfig::load_from_path(args.config.as_deref())?;
    args.apply(&mut config);

    let subscriber = logging::subscriber(&config.logging);
    tracing::subscriber::with_default(subscriber, || {
        let request = PipelineRequest::from_config(&config);
        let pipeline = Pipeline::new(&config)?;
        let outcome = pipeline.run(&request)?;

        println!(
            "Saved {} forecast points to {}",
            outcome.chart.points,
            outcome.chart.path.display()
        );
        Ok::<_, WeatherPlotError>(())
    })
    .context("forecast pipeline failed")
}
