use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Forecast collection has no observations to plot")]
    EmptyCollection,

    #[error("Collection timestamp {0} is out of range")]
    InvalidTimestamp(i64),

    #[error("Failed to draw chart: {0}")]
    Drawing(String),

    #[error("Failed to encode chart image '{0}'")]
    Encode(PathBuf, #[source] image::ImageError),

    #[error("Failed to resolve chart output path '{0}'")]
    OutputPath(PathBuf, #[source] std::io::Error),
}
