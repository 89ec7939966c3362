//! Stock reqwest-backed `RequestProvider`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::header::ACCEPT;
use reqwest::Client;

use crate::auth::TokenProvider;
use crate::error::Error;
use crate::request::Request;
use crate::request::RequestProvider;

/// A [`RequestProvider`] that sends requests with a shared `reqwest` client.
///
/// This provider is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely. Every request it produces carries the base URL, the
/// OData version headers and, when a [`TokenProvider`] is configured, a
/// freshly fetched bearer token.
///
/// # Example
///
/// ```ignore
/// use odata_lib::{HttpRequestProvider, auth::StaticTokenProvider};
///
/// let provider = HttpRequestProvider::builder()
///     .base_url("https://graph.example.com/v1.0")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct HttpRequestProvider {
    inner: Arc<HttpRequestProviderInner>,
}

struct HttpRequestProviderInner {
    base_url: String,
    token_provider: Option<Arc<dyn TokenProvider>>,
    http_client: Client,
    headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HttpRequestProvider {
    /// Creates a new builder for constructing a provider.
    pub fn builder() -> HttpRequestProviderBuilder<Missing> {
        HttpRequestProviderBuilder::new()
    }

    /// Returns the base URL relative query URLs are resolved against.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }
}

#[async_trait]
impl RequestProvider for HttpRequestProvider {
    async fn new_request(&self) -> Result<Request, Error> {
        let mut request = Request::new(self.inner.http_client.clone())
            .base_url(self.inner.base_url.clone())
            .headers(self.inner.headers.clone());

        if let Some(provider) = &self.inner.token_provider {
            let token = provider.get_token().await?;
            request = request.bearer_auth(token.access_token);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        Ok(request)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("OData-MaxVersion", HeaderValue::from_static("4.0"));
    headers.insert("OData-Version", HeaderValue::from_static("4.0"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`HttpRequestProvider`].
///
/// Uses the typestate pattern so `build` is only available once the base URL
/// has been set.
///
/// # Example
///
/// ```ignore
/// let provider = HttpRequestProvider::builder()
///     .base_url("https://services.odata.org/V4/TripPinServiceRW")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct HttpRequestProviderBuilder<Url> {
    base_url: Url,
    token_provider: Option<Arc<dyn TokenProvider>>,
    headers: HeaderMap,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl HttpRequestProviderBuilder<Missing> {
    /// Creates a new builder with the default OData headers.
    pub fn new() -> Self {
        Self {
            base_url: Missing,
            token_provider: None,
            headers: default_headers(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the service root URL.
    pub fn base_url(self, url: impl Into<String>) -> HttpRequestProviderBuilder<Set<String>> {
        HttpRequestProviderBuilder {
            base_url: Set(url.into()),
            token_provider: self.token_provider,
            headers: self.headers,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for HttpRequestProviderBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> HttpRequestProviderBuilder<U> {
    /// Sets the token provider used to authenticate every request.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Some(Arc::new(provider));
        self
    }

    /// Adds a header sent with every request, replacing defaults of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client and ignored when a
    /// custom client is supplied.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl HttpRequestProviderBuilder<Set<String>> {
    /// Builds the [`HttpRequestProvider`].
    pub fn build(self) -> Result<HttpRequestProvider, Error> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(HttpRequestProvider {
            inner: Arc::new(HttpRequestProviderInner {
                base_url: self.base_url.0,
                token_provider: self.token_provider,
                http_client,
                headers: self.headers,
                timeout: self.timeout,
            }),
        })
    }
}
