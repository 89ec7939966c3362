//! TokenProvider trait and AccessToken

use async_trait::async_trait;

use crate::error::AuthError;

/// A bearer access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The bearer token used for API authentication.
    pub access_token: String,
}

impl AccessToken {
    /// Creates a new access token with just the token string.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Trait for providing access tokens to an
/// [`HttpRequestProvider`](crate::HttpRequestProvider).
///
/// The provider calls `get_token` once for every request it produces,
/// including each page fetched while following next-links. Caching and
/// refreshing tokens is up to the implementation.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use odata_lib::auth::{AccessToken, TokenProvider};
/// use odata_lib::error::AuthError;
///
/// struct EnvTokenProvider;
///
/// #[async_trait]
/// impl TokenProvider for EnvTokenProvider {
///     async fn get_token(&self) -> Result<AccessToken, AuthError> {
///         std::env::var("ODATA_TOKEN")
///             .map(AccessToken::new)
///             .map_err(|_| AuthError::MissingToken)
///     }
/// }
/// ```
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets an access token for the next request.
    async fn get_token(&self) -> Result<AccessToken, AuthError>;
}

/// A simple token provider that always returns the same static token.
///
/// Useful for testing or when you have a long-lived token that doesn't
/// need refresh logic.
///
/// # Example
///
/// ```
/// use odata_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("my-access-token");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a new static token provider with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a new static token provider from an existing AccessToken.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> Result<AccessToken, AuthError> {
        Ok(self.token.clone())
    }
}
