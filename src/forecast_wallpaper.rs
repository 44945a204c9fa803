//! This module provides the main entry point: a client that fetches the
//! forecast page, extracts it, charts it and talks to the desktop.

use crate::chart::renderer::ChartRenderer;
use crate::desktop::screen::{ScreenQuery, ScreenResolution, Xrandr};
use crate::desktop::wallpaper::{Gsettings, WallpaperManager};
use crate::error::ForecastError;
use crate::types::observation::ForecastCollection;
use crate::weather_page::extractor::extract;
use crate::weather_page::fetcher::{HttpPageFetcher, PageFetcher};
use bon::bon;
use chrono::{DateTime, Local};
use log::{debug, error, info, log_enabled, warn, Level};
use std::path::{Path, PathBuf};

/// Stem of the chart file name when none is configured.
pub const DEFAULT_LOCATION_LABEL: &str = "london_weather";
/// Caption under the chart's x-axis when none is configured.
pub const DEFAULT_LOCATION_CAPTION: &str = "London, UK";

/// Outcome of one [`ForecastWallpaper::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub chart_path: PathBuf,
    pub observations: usize,
    pub resolution: ScreenResolution,
}

/// The client tying the forecast page to a chart on disk and the desktop.
///
/// Every external collaborator (page fetcher, screen query, wallpaper tool)
/// sits behind a trait object so it can be swapped out; the defaults use
/// HTTP, `xrandr` and `gsettings`.
///
/// # Examples
///
/// ```no_run
/// # use forecast_wallpaper::{ForecastError, ForecastWallpaper};
/// # fn run() -> Result<(), ForecastError> {
/// let client = ForecastWallpaper::builder()
///     .url("https://www.bbc.co.uk/weather/2643743")
///     .build();
/// let summary = client.run(std::path::Path::new("."))?;
/// println!("{}", summary.chart_path.display());
/// # Ok(())
/// # }
/// ```
pub struct ForecastWallpaper {
    url: String,
    renderer: ChartRenderer,
    fetcher: Box<dyn PageFetcher>,
    screen: Box<dyn ScreenQuery>,
    wallpaper: Box<dyn WallpaperManager>,
}

#[bon]
impl ForecastWallpaper {
    /// Creates a client for the forecast page at `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Address of the hourly forecast page.
    /// * `location_label` - Chart file name stem. Defaults to [`DEFAULT_LOCATION_LABEL`].
    /// * `location_caption` - x-axis caption. Defaults to [`DEFAULT_LOCATION_CAPTION`].
    /// * `fetcher`, `screen`, `wallpaper` - Collaborator overrides.
    #[builder]
    pub fn new(
        #[builder(into)] url: String,
        #[builder(into, default = DEFAULT_LOCATION_LABEL.to_string())] location_label: String,
        #[builder(into, default = DEFAULT_LOCATION_CAPTION.to_string())] location_caption: String,
        fetcher: Option<Box<dyn PageFetcher>>,
        screen: Option<Box<dyn ScreenQuery>>,
        wallpaper: Option<Box<dyn WallpaperManager>>,
    ) -> Self {
        Self {
            url,
            renderer: ChartRenderer::new(location_label, location_caption),
            fetcher: fetcher.unwrap_or_else(|| Box::new(HttpPageFetcher::new())),
            screen: screen.unwrap_or_else(|| Box::new(Xrandr)),
            wallpaper: wallpaper.unwrap_or_else(|| Box::new(Gsettings)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Downloads the forecast page and extracts it, anchoring slot times to
    /// `now`'s date and stamping the collection with `now`.
    ///
    /// # Errors
    ///
    /// [`ForecastError::Retrieval`] if the page could not be downloaded,
    /// [`ForecastError::Extraction`] if it does not hold readable time slots.
    pub fn fetch_forecast(&self, now: DateTime<Local>) -> Result<ForecastCollection, ForecastError> {
        let markup = self.fetcher.fetch(&self.url).inspect_err(|e| {
            error!("Couldn't connect to {}: {}", self.url, e);
        })?;

        let collection = extract(&markup, now.date_naive(), now.timestamp())?;

        if log_enabled!(Level::Debug) {
            match serde_json::to_string(&collection) {
                Ok(json) => debug!("Collected forecast: {}", json),
                Err(e) => debug!("Could not serialize collected forecast: {}", e),
            }
        }
        Ok(collection)
    }

    /// Charts `collection` into `output_dir`; see [`ChartRenderer::render`].
    pub fn render_chart(
        &self,
        collection: &ForecastCollection,
        output_dir: &Path,
    ) -> Result<PathBuf, ForecastError> {
        Ok(self.renderer.render(collection, output_dir)?)
    }

    pub fn screen_resolution(&self) -> Result<ScreenResolution, ForecastError> {
        Ok(self.screen.resolution()?)
    }

    pub fn current_wallpaper(&self) -> Result<PathBuf, ForecastError> {
        Ok(self.wallpaper.current()?)
    }

    /// Sets `path` as the wallpaper. Failures are logged and otherwise ignored.
    pub fn apply_wallpaper(&self, path: &Path) {
        match self.wallpaper.set(path) {
            Ok(()) => info!("Wallpaper set to {}", path.display()),
            Err(e) => warn!("Could not set wallpaper to {}: {}", path.display(), e),
        }
    }

    /// Fetches and extracts the forecast, charts it into `output_dir` and
    /// queries the screen resolution. The wallpaper is left untouched.
    pub fn run(&self, output_dir: &Path) -> Result<RunSummary, ForecastError> {
        let collection = self.fetch_forecast(Local::now())?;
        let chart_path = self.render_chart(&collection, output_dir)?;
        let resolution = self.screen_resolution()?;
        info!("Screen resolution is {}", resolution);

        Ok(RunSummary {
            chart_path,
            observations: collection.len(),
            resolution,
        })
    }
}
