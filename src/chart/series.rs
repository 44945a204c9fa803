//! Reshapes a [`ForecastCollection`] into the index-aligned series drawn on the chart.

use crate::types::observation::ForecastCollection;

const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Four plotted series plus their shared categorical x-axis labels.
///
/// Every vector has one entry per observation, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub time_labels: Vec<String>,
    pub temperature: Vec<i32>,
    pub precipitation_chance: Vec<u32>,
    pub humidity: Vec<u32>,
    /// Pressure rescaled from tenths of a millibar to millibars.
    pub pressure_mb: Vec<f64>,
}

impl ChartSeries {
    pub fn from_collection(collection: &ForecastCollection) -> Self {
        let len = collection.len();
        let mut series = Self {
            time_labels: Vec::with_capacity(len),
            temperature: Vec::with_capacity(len),
            precipitation_chance: Vec::with_capacity(len),
            humidity: Vec::with_capacity(len),
            pressure_mb: Vec::with_capacity(len),
        };

        for observation in &collection.observations {
            series
                .time_labels
                .push(observation.time.format(TIME_LABEL_FORMAT).to_string());
            series.temperature.push(observation.temperature);
            series
                .precipitation_chance
                .push(observation.precipitation_chance);
            series.humidity.push(observation.humidity);
            series.pressure_mb.push(observation.pressure_mb());
        }
        series
    }

    pub fn len(&self) -> usize {
        self.time_labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_labels.is_empty()
    }

    /// Smallest and largest value across all four series, or `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values = self
            .temperature
            .iter()
            .map(|&t| f64::from(t))
            .chain(self.precipitation_chance.iter().map(|&p| f64::from(p)))
            .chain(self.humidity.iter().map(|&h| f64::from(h)))
            .chain(self.pressure_mb.iter().copied());

        values.fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Annotation drawn next to each temperature point, e.g. `12°C`.
pub fn temperature_label(temperature: i32) -> String {
    format!("{temperature}°C")
}

/// Annotation drawn next to each pressure point: the plotted millibar value
/// rounded to a whole number.
pub fn pressure_label(pressure_mb: f64) -> String {
    format!("{}", pressure_mb.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::Observation;
    use chrono::NaiveDate;

    fn collection() -> ForecastCollection {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let next = date.succ_opt().unwrap();
        ForecastCollection::new(
            vec![
                Observation {
                    time: date.and_hms_opt(23, 0, 0).unwrap(),
                    temperature: -2,
                    precipitation_chance: 0,
                    humidity: 90,
                    pressure: 10132,
                },
                Observation {
                    time: next.and_hms_opt(0, 30, 0).unwrap(),
                    temperature: 4,
                    precipitation_chance: 35,
                    humidity: 75,
                    pressure: 9998,
                },
            ],
            1_709_640_000,
        )
    }

    #[test]
    fn test_series_are_index_aligned() {
        let series = ChartSeries::from_collection(&collection());

        assert_eq!(series.len(), 2);
        assert_eq!(series.time_labels, vec!["23:00", "00:30"]);
        assert_eq!(series.temperature, vec![-2, 4]);
        assert_eq!(series.precipitation_chance, vec![0, 35]);
        assert_eq!(series.humidity, vec![90, 75]);
        assert_eq!(series.pressure_mb.len(), 2);
        assert!((series.pressure_mb[0] - 1013.2).abs() < 1e-9);
        assert!((series.pressure_mb[1] - 999.8).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_point_label_and_value() {
        let series = ChartSeries::from_collection(&collection());
        assert!((series.pressure_mb[0] - 1013.2).abs() < 1e-9);
        assert_eq!(pressure_label(series.pressure_mb[0]), "1013");
        assert_eq!(pressure_label(series.pressure_mb[1]), "1000");
    }

    #[test]
    fn test_temperature_label_has_degree_suffix() {
        assert_eq!(temperature_label(12), "12°C");
        assert_eq!(temperature_label(-3), "-3°C");
    }

    #[test]
    fn test_value_range_spans_every_series() {
        let series = ChartSeries::from_collection(&collection());
        let (lo, hi) = series.value_range().unwrap();
        assert_eq!(lo, -2.0);
        assert!((hi - 1013.2).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection_has_no_range() {
        let series = ChartSeries::from_collection(&ForecastCollection::new(Vec::new(), 0));
        assert!(series.is_empty());
        assert_eq!(series.value_range(), None);
    }
}
