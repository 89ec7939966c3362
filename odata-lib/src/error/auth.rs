//! Authentication error types

/// Errors a [`TokenProvider`](crate::auth::TokenProvider) can report.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No token is available for the request.
    #[error("No access token available")]
    MissingToken,

    /// The token provider failed for a provider-specific reason.
    #[error("Token provider failed: {0}")]
    Provider(String),
}
