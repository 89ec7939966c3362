//! Request objects and the `RequestProvider` capability.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::Error;
use crate::error::RequestError;

/// Produces ready-to-send requests for an OData service.
///
/// A provider hands out a fresh [`Request`] that already carries the base URL,
/// authentication and transport settings. Queries call
/// [`new_request`](Self::new_request) once per HTTP exchange, including once
/// for every page fetched while following next-links, and never reuse a
/// returned request.
///
/// [`HttpRequestProvider`](crate::HttpRequestProvider) is the stock
/// implementation; tests and custom transports can implement this directly.
#[async_trait]
pub trait RequestProvider: Send + Sync {
    /// Creates a new authenticated, base-URL-scoped request.
    async fn new_request(&self) -> Result<Request, Error>;
}

#[async_trait]
impl<T: RequestProvider + ?Sized> RequestProvider for &T {
    async fn new_request(&self) -> Result<Request, Error> {
        (**self).new_request().await
    }
}

#[async_trait]
impl<T: RequestProvider + ?Sized> RequestProvider for Box<T> {
    async fn new_request(&self) -> Result<Request, Error> {
        (**self).new_request().await
    }
}

#[async_trait]
impl<T: RequestProvider + ?Sized> RequestProvider for Arc<T> {
    async fn new_request(&self) -> Result<Request, Error> {
        (**self).new_request().await
    }
}

/// A single HTTP request under construction.
///
/// Requests are built by a [`RequestProvider`], decorated with query and path
/// parameters by a query, and consumed by [`get`](Self::get).
#[derive(Debug, Clone)]
pub struct Request {
    client: Client,
    base_url: Option<String>,
    headers: HeaderMap,
    bearer_token: Option<String>,
    timeout: Option<Duration>,
    query: Vec<(String, String)>,
    path_params: HashMap<String, String>,
}

impl Request {
    /// Creates an empty request sent through `client`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            headers: HeaderMap::new(),
            bearer_token: None,
            timeout: None,
            query: Vec::new(),
            path_params: HashMap::new(),
        }
    }

    /// Sets the base URL relative request URLs are resolved against.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Merges a set of headers into the request.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Authenticates the request with a bearer token.
    pub fn bearer_auth(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Sets the timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets a query parameter. Setting the same name twice keeps the last value.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.query.push((name, value)),
        }
        self
    }

    /// Sets a `{name}` path template substitution.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Sets several path template substitutions at once.
    pub fn path_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.path_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the query parameters in the order they were first set.
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Resolves `url` into the final request URL.
    ///
    /// Path parameters are substituted first. Absolute `http`/`https` URLs
    /// (such as `@odata.nextLink` values) are used verbatim; anything else,
    /// including paths like `root:/Documents:/children`, is joined onto the
    /// base URL. Query parameters are appended form-urlencoded.
    pub fn resolve_url(&self, url: &str) -> Result<Url, Error> {
        let mut path = url.to_string();
        for (name, value) in &self.path_params {
            path = path.replace(&format!("{{{}}}", name), &urlencoding::encode(value));
        }

        let absolute = match Url::parse(&path) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(parsed),
            Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => None,
            Err(e) => return Err(Error::InvalidUrl(format!("{}: {}", path, e))),
        };

        let mut resolved = match absolute {
            Some(absolute) => absolute,
            None => {
                let base = self.base_url.as_deref().ok_or_else(|| {
                    Error::InvalidUrl(format!("relative URL without a base URL: {}", path))
                })?;
                let joined = format!(
                    "{}/{}",
                    base.trim_end_matches('/'),
                    path.trim_start_matches('/')
                );
                Url::parse(&joined).map_err(|e| Error::InvalidUrl(format!("{}: {}", joined, e)))?
            }
        };

        if !self.query.is_empty() {
            let mut pairs = resolved.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }

        Ok(resolved)
    }

    /// Sends a GET request to `url`.
    ///
    /// The response status is not classified here; see
    /// [`RawResponse::error_for_status`].
    pub async fn get(self, url: &str) -> Result<RawResponse, Error> {
        let url = self.resolve_url(url)?;
        log::debug!("GET {}", url);

        let mut request = self.client.get(url).headers(self.headers);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        log::debug!("Response {} ({} bytes)", status, body.len());

        Ok(RawResponse { status, body })
    }

    /// Sends a GET request to `url` and deserializes a successful JSON body.
    ///
    /// Non-2xx responses fail with [`Error::Request`].
    pub async fn get_json<T: DeserializeOwned>(self, url: &str) -> Result<T, Error> {
        let response = self.get(url).await?.error_for_status()?;
        response.json()
    }
}

/// A received HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: String,
}

impl RawResponse {
    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the raw body text.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns `true` for any non-2xx status.
    pub fn is_error(&self) -> bool {
        !self.status.is_success()
    }

    /// Converts a non-2xx response into a [`RequestError`].
    pub fn error_for_status(self) -> Result<Self, RequestError> {
        if self.is_error() {
            return Err(RequestError::new(
                self.status.as_u16(),
                self.status.canonical_reason().unwrap_or_default(),
                self.body,
            ));
        }
        Ok(self)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::parse_with_body(e.to_string(), self.body.clone()))
    }
}
