//! Error types

mod auth;
mod request;

pub use auth::*;
pub use request::*;

/// Errors returned by query terminal operations and request providers.
///
/// [`Error::Request`] means the exchange completed but the server answered
/// with a non-success status. Every other variant means the exchange could
/// not complete.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with a non-success HTTP status.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Network error while sending the request or reading the response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to deserialize the response body.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// The token provider failed to supply credentials.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// A custom request provider failed to produce a request.
    #[error("Request provider error: {0}")]
    Provider(String),

    /// Pagination stopped after the configured maximum number of pages.
    #[error("Page limit of {0} reached with more pages remaining")]
    PageLimit(usize),
}

impl Error {
    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns `true` if the server answered with an error status.
    pub fn is_request_error(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    /// Returns the request error if the server answered with an error status.
    pub fn as_request_error(&self) -> Option<&RequestError> {
        match self {
            Self::Request(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the HTTP status code if this is a request error.
    pub fn status_code(&self) -> Option<u16> {
        self.as_request_error().map(|err| err.status)
    }
}
