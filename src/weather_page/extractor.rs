//! Turns the markup of an hourly forecast page into a [`ForecastCollection`].
//!
//! The page renders one `li.wr-time-slot.wr-js-time-slot` element per forecast
//! hour. Inside each slot the extractor reads the time, temperature,
//! precipitation chance and an atmospheric-data list holding humidity and
//! pressure readings. The extractor is tied to this page structure; any slot
//! that does not match it is reported with its index and the offending field.

use crate::types::observation::{ForecastCollection, Observation};
use crate::weather_page::error::{ExtractionError, SlotField};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use log::{debug, info};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

const SLOT_SELECTOR: &str = "li.wr-time-slot.wr-js-time-slot";
const TIME_SELECTOR: &str = "span.wr-time-slot-primary__time";
const TEMPERATURE_SELECTOR: &str = "span.wr-value--temperature--c";
const PRECIPITATION_SELECTOR: &str = "div.wr-u-font-weight-500";
const ATMOSPHERIC_SELECTOR: &str = "dl.wr-time-slot-secondary__list";

const TIME_FORMAT: &str = "%H:%M";
const HUMIDITY_LABEL: &str = "Humidity";
const PRESSURE_LABEL: &str = "Pressure";

/// Length of the "%Chance of precipitation" text trailing the percentage.
const PRECIPITATION_SUFFIX_LEN: usize = 24;

/// A time slot as read from the page, before its time is anchored to a date.
struct RawSlot {
    time: NaiveTime,
    temperature: i32,
    precipitation_chance: u32,
    humidity: u32,
    pressure: u32,
}

/// Holds the compiled selectors and patterns used to read forecast slots.
///
/// Building one is cheap but not free, so callers extracting many pages (the
/// benchmark, for instance) should reuse a single instance.
pub struct ForecastExtractor {
    slot: Selector,
    time: Selector,
    temperature: Selector,
    precipitation: Selector,
    atmospheric: Selector,
    humidity: Regex,
    pressure: Regex,
}

impl ForecastExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            slot: selector(SLOT_SELECTOR)?,
            time: selector(TIME_SELECTOR)?,
            temperature: selector(TEMPERATURE_SELECTOR)?,
            precipitation: selector(PRECIPITATION_SELECTOR)?,
            atmospheric: selector(ATMOSPHERIC_SELECTOR)?,
            humidity: labeled_number(HUMIDITY_LABEL)?,
            pressure: labeled_number(PRESSURE_LABEL)?,
        })
    }

    /// Extracts every time slot in `markup`.
    ///
    /// Slot times are anchored to `reference_date`; any slot whose time of day
    /// is earlier than the first slot's is moved to the following day.
    /// `collected_at` is attached to the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::NoTimeSlots`] if the page holds no slots, or a
    /// slot-specific variant naming the first field that could not be read.
    pub fn extract(
        &self,
        markup: &str,
        reference_date: NaiveDate,
        collected_at: i64,
    ) -> Result<ForecastCollection, ExtractionError> {
        let document = Html::parse_document(markup);

        let raw_slots = document
            .select(&self.slot)
            .enumerate()
            .map(|(index, slot)| self.read_slot(index, slot))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(first_time) = raw_slots.first().map(|s| s.time) else {
            return Err(ExtractionError::NoTimeSlots);
        };

        let observations: Vec<Observation> = raw_slots
            .into_iter()
            .map(|raw| {
                let mut time = reference_date.and_time(raw.time);
                if raw.time < first_time {
                    time += TimeDelta::days(1);
                }
                Observation {
                    time,
                    temperature: raw.temperature,
                    precipitation_chance: raw.precipitation_chance,
                    humidity: raw.humidity,
                    pressure: raw.pressure,
                }
            })
            .collect();

        info!(
            "Extracted {} forecast slots starting at {}",
            observations.len(),
            first_time.format(TIME_FORMAT)
        );
        Ok(ForecastCollection::new(observations, collected_at))
    }

    fn read_slot(&self, index: usize, slot: ElementRef) -> Result<RawSlot, ExtractionError> {
        let time_text = field_text(slot, &self.time, index, SlotField::Time)?;
        let time = NaiveTime::parse_from_str(&time_text, TIME_FORMAT)
            .map_err(|_| invalid(index, SlotField::Time, &time_text))?;

        let temperature_text =
            field_text(slot, &self.temperature, index, SlotField::Temperature)?;
        let temperature = strip_trailing_chars(&temperature_text, 1)
            .and_then(|t| t.trim().parse::<i32>().ok())
            .ok_or_else(|| invalid(index, SlotField::Temperature, &temperature_text))?;

        let precipitation_text = field_text(
            slot,
            &self.precipitation,
            index,
            SlotField::PrecipitationChance,
        )?;
        let precipitation_chance =
            strip_trailing_chars(&precipitation_text, PRECIPITATION_SUFFIX_LEN)
                .and_then(|p| p.trim().parse::<u32>().ok())
                .ok_or_else(|| {
                    invalid(index, SlotField::PrecipitationChance, &precipitation_text)
                })?;

        let atmospheric_text =
            field_text(slot, &self.atmospheric, index, SlotField::AtmosphericData)?;
        let humidity = read_labeled(
            &self.humidity,
            &atmospheric_text,
            index,
            HUMIDITY_LABEL,
            SlotField::Humidity,
        )?;
        let pressure = read_labeled(
            &self.pressure,
            &atmospheric_text,
            index,
            PRESSURE_LABEL,
            SlotField::Pressure,
        )?;

        debug!(
            "Slot {}: {} {}°C {}% rain {}% humidity {} pressure",
            index,
            time.format(TIME_FORMAT),
            temperature,
            precipitation_chance,
            humidity,
            pressure
        );

        Ok(RawSlot {
            time,
            temperature,
            precipitation_chance,
            humidity,
            pressure,
        })
    }
}

/// Extracts a [`ForecastCollection`] from `markup` with a freshly built [`ForecastExtractor`].
pub fn extract(
    markup: &str,
    reference_date: NaiveDate,
    collected_at: i64,
) -> Result<ForecastCollection, ExtractionError> {
    ForecastExtractor::new()?.extract(markup, reference_date, collected_at)
}

fn selector(css: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector(format!("{css}: {e}")))
}

/// Matches `label` immediately followed by digits, e.g. `Humidity85`.
fn labeled_number(label: &str) -> Result<Regex, ExtractionError> {
    let pattern = format!(r"{}(\d+)", regex::escape(label));
    Regex::new(&pattern).map_err(|e| ExtractionError::InvalidSelector(e.to_string()))
}

/// Concatenated, trimmed text of the first element under `slot` matching `selector`.
fn field_text(
    slot: ElementRef,
    selector: &Selector,
    index: usize,
    field: SlotField,
) -> Result<String, ExtractionError> {
    slot.select(selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .ok_or(ExtractionError::MissingField { slot: index, field })
}

fn read_labeled(
    pattern: &Regex,
    text: &str,
    index: usize,
    label: &'static str,
    field: SlotField,
) -> Result<u32, ExtractionError> {
    let digits = pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .ok_or(ExtractionError::MissingLabel { slot: index, label })?
        .as_str();
    digits.parse().map_err(|_| invalid(index, field, digits))
}

/// Drops the last `n` characters of `text`, or `None` if nothing would remain.
fn strip_trailing_chars(text: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return Some(text);
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((0, _)) | None => None,
        Some((end, _)) => Some(&text[..end]),
    }
}

fn invalid(slot: usize, field: SlotField, value: &str) -> ExtractionError {
    ExtractionError::InvalidField {
        slot,
        field,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDateTime};

    const FIXTURE: &str = include_str!("../../testdata/forecast_page.html");

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    fn slot(time: &str, temp: &str, chance: &str, atmospheric: &str) -> String {
        format!(
            r#"<li class="wr-time-slot wr-js-time-slot">
                 <span class="wr-time-slot-primary__time">{time}</span>
                 <span class="wr-value--temperature--c">{temp}</span>
                 <div class="wr-u-font-weight-500">{chance}<span class="wr-hide-visually">Chance of precipitation</span></div>
                 <dl class="wr-time-slot-secondary__list">{atmospheric}</dl>
               </li>"#
        )
    }

    fn page(slots: &[String]) -> String {
        format!(
            "<html><body><ol class=\"wr-time-slot-list\">{}</ol></body></html>",
            slots.concat()
        )
    }

    fn basic_slot(time: &str) -> String {
        slot(
            time,
            "9°",
            "10%",
            "<dt>Humidity</dt><dd>81%</dd><dt>Pressure</dt><dd>10132 mb</dd>",
        )
    }

    fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
        date.and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_extracts_every_slot_of_fixture() -> Result<(), ExtractionError> {
        let collection = extract(FIXTURE, reference_date(), 1_709_640_000)?;

        assert_eq!(collection.len(), 6);
        assert_eq!(collection.collected_at, 1_709_640_000);

        let first = &collection.observations[0];
        assert_eq!(first.time, at(reference_date(), 20, 0));
        assert_eq!(first.temperature, 11);
        assert_eq!(first.precipitation_chance, 5);
        assert_eq!(first.humidity, 78);
        assert_eq!(first.pressure, 10132);

        let below_zero = &collection.observations[5];
        assert_eq!(below_zero.temperature, -1);
        assert_eq!(below_zero.precipitation_chance, 100);
        Ok(())
    }

    #[test]
    fn test_fixture_rolls_over_midnight() -> Result<(), ExtractionError> {
        let collection = extract(FIXTURE, reference_date(), 0)?;
        let next_day = reference_date().succ_opt().unwrap();

        let times: Vec<NaiveDateTime> = collection.observations.iter().map(|o| o.time).collect();
        assert_eq!(
            times,
            vec![
                at(reference_date(), 20, 0),
                at(reference_date(), 21, 0),
                at(reference_date(), 22, 0),
                at(reference_date(), 23, 0),
                at(next_day, 0, 0),
                at(next_day, 1, 0),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_rollover_near_midnight() -> Result<(), ExtractionError> {
        let markup = page(&[basic_slot("23:50"), basic_slot("00:10"), basic_slot("00:40")]);
        let collection = extract(&markup, reference_date(), 0)?;
        let times: Vec<NaiveDateTime> = collection.observations.iter().map(|o| o.time).collect();

        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(times[0].date(), reference_date());
        assert_eq!(times[1].day(), 6);
        assert_eq!(times[2].day(), 6);
        Ok(())
    }

    #[test]
    fn test_rollover_reference_is_first_slot_not_midnight() -> Result<(), ExtractionError> {
        // A first slot just after midnight pushes nothing forward, and a later
        // slot that is earlier still is moved to the next day.
        let markup = page(&[basic_slot("00:30"), basic_slot("01:00"), basic_slot("00:15")]);
        let collection = extract(&markup, reference_date(), 0)?;

        assert_eq!(collection.observations[0].time, at(reference_date(), 0, 30));
        assert_eq!(collection.observations[1].time, at(reference_date(), 1, 0));
        assert_eq!(
            collection.observations[2].time,
            at(reference_date().succ_opt().unwrap(), 0, 15)
        );
        Ok(())
    }

    #[test]
    fn test_no_slots_is_an_error() {
        let markup = "<html><body><p>Forecast unavailable</p></body></html>";
        assert_eq!(
            extract(markup, reference_date(), 0),
            Err(ExtractionError::NoTimeSlots)
        );
    }

    #[test]
    fn test_missing_pressure_label_names_slot() {
        let markup = page(&[
            basic_slot("10:00"),
            slot("11:00", "9°", "10%", "<dt>Humidity</dt><dd>81%</dd>"),
        ]);
        assert_eq!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::MissingLabel {
                slot: 1,
                label: "Pressure"
            })
        );
    }

    #[test]
    fn test_missing_humidity_label() {
        let markup = page(&[slot(
            "10:00",
            "9°",
            "10%",
            "<dt>Pressure</dt><dd>10132 mb</dd>",
        )]);
        assert_eq!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::MissingLabel {
                slot: 0,
                label: "Humidity"
            })
        );
    }

    #[test]
    fn test_label_must_be_followed_directly_by_digits() {
        let markup = page(&[slot(
            "10:00",
            "9°",
            "10%",
            "<dt>Humidity</dt> <dd>81%</dd><dt>Pressure</dt><dd>10132 mb</dd>",
        )]);
        assert!(matches!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::MissingLabel { label: "Humidity", .. })
        ));
    }

    #[test]
    fn test_missing_temperature_element() {
        let markup = page(&[
            r#"<li class="wr-time-slot wr-js-time-slot">
                 <span class="wr-time-slot-primary__time">10:00</span>
                 <div class="wr-u-font-weight-500">10%<span>Chance of precipitation</span></div>
                 <dl class="wr-time-slot-secondary__list"><dt>Humidity</dt><dd>81%</dd><dt>Pressure</dt><dd>10132 mb</dd></dl>
               </li>"#
                .to_string(),
        ]);
        assert_eq!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::MissingField {
                slot: 0,
                field: SlotField::Temperature
            })
        );
    }

    #[test]
    fn test_unparseable_time() {
        let markup = page(&[basic_slot("noon")]);
        assert_eq!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::InvalidField {
                slot: 0,
                field: SlotField::Time,
                value: "noon".to_string()
            })
        );
    }

    #[test]
    fn test_truncated_precipitation_text() {
        let markup = page(&[
            basic_slot("10:00"),
            r#"<li class="wr-time-slot wr-js-time-slot">
                 <span class="wr-time-slot-primary__time">11:00</span>
                 <span class="wr-value--temperature--c">9°</span>
                 <div class="wr-u-font-weight-500">10%</div>
                 <dl class="wr-time-slot-secondary__list"><dt>Humidity</dt><dd>81%</dd><dt>Pressure</dt><dd>10132 mb</dd></dl>
               </li>"#
                .to_string(),
        ]);
        assert!(matches!(
            extract(&markup, reference_date(), 0),
            Err(ExtractionError::InvalidField {
                slot: 1,
                field: SlotField::PrecipitationChance,
                ..
            })
        ));
    }

    #[test]
    fn test_slots_without_both_class_names_are_ignored() {
        let stray = r#"<li class="wr-time-slot"><span class="wr-time-slot-primary__time">05:00</span></li>"#;
        let markup = page(&[stray.to_string(), basic_slot("10:00")]);
        let collection = extract(&markup, reference_date(), 0).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.observations[0].time, at(reference_date(), 10, 0));
    }

    #[test]
    fn test_strip_trailing_chars() {
        assert_eq!(strip_trailing_chars("12°", 1), Some("12"));
        assert_eq!(strip_trailing_chars("-3°", 1), Some("-3"));
        assert_eq!(strip_trailing_chars("°", 1), None);
        assert_eq!(strip_trailing_chars("", 1), None);
        assert_eq!(
            strip_trailing_chars("40%Chance of precipitation", PRECIPITATION_SUFFIX_LEN),
            Some("40")
        );
        assert_eq!(strip_trailing_chars("abc", 0), Some("abc"));
    }
}
