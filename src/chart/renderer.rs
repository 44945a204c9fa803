//! Draws a [`ForecastCollection`] as a multi-series PNG chart.
//!
//! The chart is drawn into an RGB buffer with `plotters` on a white key
//! colour. When the buffer is written out, every key-coloured pixel becomes
//! fully transparent, giving a PNG that sits cleanly on top of a wallpaper.

use crate::chart::error::RenderError;
use crate::chart::series::{pressure_label, temperature_label, ChartSeries};
use crate::types::observation::ForecastCollection;
use chrono::NaiveDate;
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Output resolution in dots per inch.
pub const CHART_DPI: u32 = 150;
/// Figure size in inches (width, height).
pub const FIGURE_INCHES: (u32, u32) = (16, 4);

const BACKGROUND_KEY: RGBColor = WHITE;
const GRID_COLOR: RGBColor = RGBColor(128, 128, 128);

const TEMPERATURE_COLOR: RGBColor = RGBColor(0, 128, 0);
const PRECIPITATION_COLOR: RGBColor = RGBColor(31, 119, 180);
const HUMIDITY_COLOR: RGBColor = RGBColor(255, 127, 14);
const PRESSURE_COLOR: RGBColor = RGBColor(44, 160, 44);

const FONT: &str = "sans-serif";
const AXIS_FONT_PX: u32 = 22;
const VALUE_FONT_PX: u32 = 19;
const LINE_WIDTH: u32 = 3;
const MARKER_SIZE: u32 = 4;

/// Renders forecast charts for one location.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    location_label: String,
    location_caption: String,
}

impl ChartRenderer {
    /// # Arguments
    ///
    /// * `location_label` - Stem of the output file name, e.g. `london_weather`.
    /// * `location_caption` - Text drawn under the x-axis, e.g. `London, UK`.
    pub fn new(location_label: impl Into<String>, location_caption: impl Into<String>) -> Self {
        Self {
            location_label: location_label.into(),
            location_caption: location_caption.into(),
        }
    }

    /// Pixel dimensions of the rendered chart.
    pub fn dimensions() -> (u32, u32) {
        (FIGURE_INCHES.0 * CHART_DPI, FIGURE_INCHES.1 * CHART_DPI)
    }

    /// File name for a chart whose data was collected at `collected_at`, e.g.
    /// `london_weather-2024-03-05.png`. The date is taken in the local time zone.
    pub fn file_name(&self, collection: &ForecastCollection) -> Result<String, RenderError> {
        let collected = collection
            .collected_at_local()
            .ok_or(RenderError::InvalidTimestamp(collection.collected_at))?;
        Ok(output_file_name(
            &self.location_label,
            collected.date_naive(),
        ))
    }

    /// Draws `collection` and writes it to `output_dir`, replacing any chart
    /// of the same name. Returns the absolute path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyCollection`] without touching the file
    /// system if there is nothing to plot.
    pub fn render(
        &self,
        collection: &ForecastCollection,
        output_dir: &Path,
    ) -> Result<PathBuf, RenderError> {
        if collection.is_empty() {
            return Err(RenderError::EmptyCollection);
        }

        let file_name = self.file_name(collection)?;
        let relative = output_dir.join(&file_name);
        let path =
            std::path::absolute(&relative).map_err(|e| RenderError::OutputPath(relative, e))?;

        let series = ChartSeries::from_collection(collection);
        let (width, height) = Self::dimensions();
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_chart(&root, &series, &self.location_caption)
                .and_then(|_| root.present())
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        debug!("Drew {} points per series at {}x{}", series.len(), width, height);

        let image = key_out_background(buffer, (width, height))?;
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(path.clone(), e))?;

        info!("Wrote forecast chart to {}", path.display());
        Ok(path)
    }
}

/// `<location_label>-<YYYY-MM-DD>.png`
pub fn output_file_name(location_label: &str, date: NaiveDate) -> String {
    format!("{}-{}.png", location_label, date.format("%Y-%m-%d"))
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &ChartSeries,
    caption: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&BACKGROUND_KEY)?;

    let (y_min, y_max) = series.value_range().unwrap_or((0.0, 1.0));
    let y_pad = ((y_max - y_min) * 0.05).max(1.0);
    let x_max = series.len() as f64 - 0.5;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(70)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..x_max, (y_min - y_pad)..(y_max + y_pad))?;

    let x_formatter = |x: &f64| category_label(&series.time_labels, *x);
    chart
        .configure_mesh()
        .x_labels(series.len())
        .x_label_formatter(&x_formatter)
        .x_desc(caption)
        .label_style((FONT, AXIS_FONT_PX))
        .axis_desc_style((FONT, AXIS_FONT_PX))
        .bold_line_style(GRID_COLOR.mix(0.5).stroke_width(1))
        .light_line_style(TRANSPARENT)
        .draw()?;

    let points = |values: Vec<f64>| -> Vec<(f64, f64)> {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as f64, v))
            .collect()
    };
    let temperature = points(series.temperature.iter().map(|&t| f64::from(t)).collect());
    let precipitation = points(
        series
            .precipitation_chance
            .iter()
            .map(|&p| f64::from(p))
            .collect(),
    );
    let humidity = points(series.humidity.iter().map(|&h| f64::from(h)).collect());
    let pressure = points(series.pressure_mb.clone());

    chart
        .draw_series(
            LineSeries::new(
                temperature.iter().copied(),
                TEMPERATURE_COLOR.filled().stroke_width(LINE_WIDTH),
            )
            .point_size(MARKER_SIZE),
        )?
        .label("temperature[°C]")
        .legend(|(x, y)| legend_line(x, y, TEMPERATURE_COLOR));

    for (values, label, color) in [
        (&precipitation, "chance of precip.[%]", PRECIPITATION_COLOR),
        (&humidity, "humidity[%]", HUMIDITY_COLOR),
        (&pressure, "pressure[mb]", PRESSURE_COLOR),
    ] {
        chart
            .draw_series(LineSeries::new(
                values.iter().copied(),
                color.stroke_width(LINE_WIDTH),
            ))?
            .label(label)
            .legend(move |(x, y)| legend_line(x, y, color));
    }

    let value_style = (FONT, VALUE_FONT_PX).into_font().color(&BLACK);
    chart.draw_series(
        temperature
            .iter()
            .zip(&series.temperature)
            .map(|(&point, &t)| Text::new(temperature_label(t), point, value_style.clone())),
    )?;
    chart.draw_series(
        pressure
            .iter()
            .map(|&point| Text::new(pressure_label(point.1), point, value_style.clone())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, AXIS_FONT_PX))
        .background_style(BACKGROUND_KEY.mix(0.8))
        .border_style(GRID_COLOR.mix(0.5))
        .draw()?;

    Ok(())
}

fn legend_line(x: i32, y: i32, color: RGBColor) -> PathElement<(i32, i32)> {
    PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(LINE_WIDTH))
}

/// Time label for the x-axis tick at `x`; ticks between categories stay blank.
fn category_label(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Converts the RGB drawing buffer into RGBA, making background-key pixels transparent.
fn key_out_background(buffer: Vec<u8>, (width, height): (u32, u32)) -> Result<RgbaImage, RenderError> {
    let key = [BACKGROUND_KEY.0, BACKGROUND_KEY.1, BACKGROUND_KEY.2];
    let rgba: Vec<u8> = buffer
        .chunks_exact(3)
        .flat_map(|px| {
            let alpha = if px == key { 0 } else { 255 };
            [px[0], px[1], px[2], alpha]
        })
        .collect();
    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        RenderError::Drawing(format!("drawing buffer does not match {width}x{height}"))
    })
}
