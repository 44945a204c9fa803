use crate::weather_page::error::RetrievalError;
use log::{info, warn};
use reqwest::blocking::Client;

/// Retrieves the raw markup of a forecast page.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> Result<String, RetrievalError>;
}

/// Fetches pages over HTTP with a blocking `reqwest` client.
///
/// No timeout or retry policy is applied beyond `reqwest`'s defaults; a
/// failure is reported to the caller straight away.
pub struct HttpPageFetcher {
    client: Client,
}

impl HttpPageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch(&self, url: &str) -> Result<String, RetrievalError> {
        info!("Downloading forecast page from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| RetrievalError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    RetrievalError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    RetrievalError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let markup = response
            .text()
            .map_err(|e| RetrievalError::Body(url.to_string(), e))?;
        info!("Downloaded {} bytes of markup from {}", markup.len(), url);
        Ok(markup)
    }
}
