//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use odata_lib::auth::StaticTokenProvider;
use odata_lib::error::Error;
use odata_lib::HttpRequestProvider;
use odata_lib::Request;
use odata_lib::RequestProvider;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Person {
    #[serde(rename = "UserName")]
    pub user_name: String,
}

pub fn person(name: &str) -> Person {
    Person {
        user_name: name.to_string(),
    }
}

pub fn provider(base_url: &str) -> HttpRequestProvider {
    HttpRequestProvider::builder()
        .base_url(base_url)
        .token_provider(StaticTokenProvider::new("test-token"))
        .build()
        .expect("provider should build")
}

/// Wraps an [`HttpRequestProvider`], counting calls and optionally failing
/// from a given call onwards.
pub struct CountingProvider {
    inner: HttpRequestProvider,
    calls: AtomicUsize,
    fail_from: Option<usize>,
}

impl CountingProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: provider(base_url),
            calls: AtomicUsize::new(0),
            fail_from: None,
        }
    }

    /// Fails every call starting with the `call`-th (1-based).
    pub fn failing_from(base_url: &str, call: usize) -> Self {
        Self {
            fail_from: Some(call),
            ..Self::new(base_url)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestProvider for CountingProvider {
    async fn new_request(&self) -> Result<Request, Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_from.is_some_and(|from| call >= from) {
            return Err(Error::Provider(format!("call {} refused", call)));
        }
        self.inner.new_request().await
    }
}
