use crate::chart::error::RenderError;
use crate::desktop::error::DesktopError;
use crate::weather_page::error::{ExtractionError, RetrievalError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Desktop(#[from] DesktopError),
}
