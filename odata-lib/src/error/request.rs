//! HTTP request error type

/// A completed HTTP exchange whose response was classified as an error.
///
/// Carries the raw status and body exactly as received so callers can
/// inspect service-specific error payloads themselves.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request failed with status {status} - {status_text}: {body:?}")]
pub struct RequestError {
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status (e.g. `Not Found`).
    pub status_text: String,
    /// Raw response body.
    pub body: String,
}

impl RequestError {
    /// Creates a new request error.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }
}
