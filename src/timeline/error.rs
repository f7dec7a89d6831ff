use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Invalid timeline base URL '{0}'")]
    InvalidBaseUrl(String, #[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Timeline base URL '{0}' cannot have path segments appended")]
    BaseUrlNotHierarchical(String),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode timeline response from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}
