//! Request derivation from session state.

use reqwest::Method;

/// Target URL and method for one outbound request.
///
/// Derived fresh from session state immediately before each request is
/// issued (never cached), since the run id may be set between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestConfig {
    /// Fully formed target URL, query string included.
    pub(crate) url: String,
    /// `POST` for the first message of a conversation, `PUT` after a run id
    /// is known.
    pub(crate) method: Method,
}

impl RequestConfig {
    /// Create-mode request: no run id is known yet.
    pub(crate) fn create(url: String) -> Self {
        Self {
            url,
            method: Method::POST,
        }
    }

    /// Continue-mode request: the conversation already has a run id.
    pub(crate) fn resume(url: String) -> Self {
        Self {
            url,
            method: Method::PUT,
        }
    }
}

/// JSON request body for the agent endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct MessageBody {
    pub(crate) message: String,
}
