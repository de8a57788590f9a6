//! Error types shared by both pipelines.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a pipeline run.
///
/// Outcomes that are not failures (an empty catalog body, a Horizons reply
/// without a `result` payload, a value that fails numeric coercion) are not
/// represented here; they are reported through the pipeline outcome types.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The blocking HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the response body could not be read.
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with an HTTP error status.
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body is not the JSON shape the pipeline expects.
    #[error("Error during JSON processing: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing an output file failed.
    #[error("File error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// True for failures that happened on the wire rather than in decoding or
    /// file output.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FetchError::Client(_) | FetchError::Request { .. } | FetchError::Status { .. }
        )
    }
}

/// Result type for pipeline operations.
pub type FetchResult<T> = Result<T, FetchError>;
