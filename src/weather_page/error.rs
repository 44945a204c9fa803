use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    Body(String, #[source] reqwest::Error),
}

/// The sub-fields read from each time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Time,
    Temperature,
    PrecipitationChance,
    AtmosphericData,
    Humidity,
    Pressure,
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotField::Time => "time",
            SlotField::Temperature => "temperature",
            SlotField::PrecipitationChance => "precipitation chance",
            SlotField::AtmosphericData => "atmospheric data",
            SlotField::Humidity => "humidity",
            SlotField::Pressure => "pressure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No forecast time slots found in page markup")]
    NoTimeSlots,

    #[error("Time slot {slot} has no {field} element")]
    MissingField { slot: usize, field: SlotField },

    #[error("Time slot {slot} has an unparseable {field} value '{value}'")]
    InvalidField {
        slot: usize,
        field: SlotField,
        value: String,
    },

    #[error("Time slot {slot} atmospheric data has no '{label}' reading")]
    MissingLabel { slot: usize, label: &'static str },

    #[error("Invalid slot pattern: {0}")]
    InvalidSelector(String),
}
