use forecast_wallpaper::{ForecastError, ForecastWallpaper};
use log::{error, info};
use std::error::Error;
use std::process::ExitCode;

const FORECAST_URL: &str = "https://www.bbc.co.uk/weather/2643743";

fn main() -> ExitCode {
    let env = env_logger::Env::default().default_filter_or("info");
    env_logger::init_from_env(env);

    let output_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            error!("Cannot determine the current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = ForecastWallpaper::builder().url(FORECAST_URL).build();

    match client.run(&output_dir) {
        Ok(summary) => {
            info!(
                "Charted {} forecast slots to {}",
                summary.observations,
                summary.chart_path.display()
            );
            println!("{}", summary.resolution);
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e);
            ExitCode::FAILURE
        }
    }
}

fn report(e: &ForecastError) {
    let kind = match e {
        ForecastError::Retrieval(_) => "retrieval",
        ForecastError::Extraction(_) => "extraction",
        ForecastError::Render(_) => "render",
        ForecastError::Desktop(_) => "desktop",
    };
    error!("Forecast run failed ({} error): {}", kind, e);

    let mut source = e.source();
    while let Some(cause) = source {
        error!("  caused by: {}", cause);
        source = cause.source();
    }
}
