use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the primary forecast fetch.
///
/// Secondary enrichment fetches (air quality, marine) never produce this:
/// they collapse to absent values inside the provider. Callers are expected
/// to fall back to cached or static content; no retries happen here.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("weather service returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to reach weather service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse weather service response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather service response contained no {0}")]
    MissingData(&'static str),
}
