//! Client error types.

use thiserror::Error;

/// Client error type.
///
/// Every failure mode of a send, transport errors and non-success HTTP
/// statuses alike, surfaces as [`Error::RequestFailed`] with the underlying
/// message wrapped in a `Request failed:` prefix. A failed send leaves
/// session state (a previously captured run id) untouched, so retrying is
/// just calling `send` again.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be completed.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl Error {
    /// Error for a response with a non-success status code.
    pub(crate) fn status(code: u16) -> Self {
        Error::RequestFailed(format!("HTTP error! status: {}", code))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RequestFailed(err.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
