//! Fetches an hourly forecast page, extracts its time slots, charts them to a
//! transparent PNG and optionally hands that PNG to the desktop as wallpaper.

mod chart;
mod desktop;
mod error;
mod forecast_wallpaper;
mod types;
mod weather_page;

pub use error::ForecastError;
pub use forecast_wallpaper::*;

pub use types::observation::{ForecastCollection, Observation};

pub use weather_page::error::{ExtractionError, RetrievalError, SlotField};
pub use weather_page::extractor::{extract, ForecastExtractor};
pub use weather_page::fetcher::{HttpPageFetcher, PageFetcher};

pub use chart::error::RenderError;
pub use chart::renderer::{output_file_name, ChartRenderer, CHART_DPI, FIGURE_INCHES};
pub use chart::series::{pressure_label, temperature_label, ChartSeries};

pub use desktop::error::DesktopError;
pub use desktop::screen::{parse_resolution, ScreenQuery, ScreenResolution, Xrandr};
pub use desktop::wallpaper::{parse_picture_uri, picture_uri_value, Gsettings, WallpaperManager};
