//! Async iterator for OData query pagination.

use serde::de::DeserializeOwned;

use crate::error::Error;

use super::builder::Query;
use super::page::ODataResponse;

/// Async iterator that yields pages of OData query results.
///
/// Automatically follows `@odata.nextLink` for pagination. Iteration ends
/// after the last page or after the first error.
///
/// # Example
///
/// ```ignore
/// let query = Query::<Person>::new(&provider, "People").select(&["UserName"]);
/// let mut pages = query.pages();
///
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     for person in page.result() {
///         println!("{:?}", person);
///     }
/// }
/// ```
pub struct Pages<'q, V> {
    query: &'q Query<'q, V>,
    /// The next URL to fetch (from @odata.nextLink).
    next_url: Option<String>,
    /// Number of pages fetched so far.
    fetched: usize,
    /// Whether we've exhausted all pages.
    done: bool,
}

impl<'q, V: DeserializeOwned> Pages<'q, V> {
    pub(crate) fn new(query: &'q Query<'q, V>) -> Self {
        Self {
            query,
            next_url: None,
            fetched: 0,
            done: false,
        }
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed.
    pub async fn next(&mut self) -> Option<Result<ODataResponse<V>, Error>> {
        if self.done {
            return None;
        }

        let result = if self.fetched == 0 {
            self.query.get_page().await
        } else if let Some(url) = self.next_url.take() {
            let fetched = self.fetched;
            if let Some(max) = self.query.max_pages_value().filter(|max| fetched >= *max) {
                log::warn!(
                    "Stopping pagination after {} pages, next link {}",
                    fetched,
                    url
                );
                self.done = true;
                return Some(Err(Error::PageLimit(max)));
            }
            log::debug!("Following next link {}", url);
            match self.query.provider().new_request().await {
                Ok(request) => request.get_json(&url).await,
                Err(e) => Err(e),
            }
        } else {
            self.done = true;
            return None;
        };

        match result {
            Ok(page) => {
                self.fetched += 1;
                match page.next_link() {
                    Some(link) => self.next_url = Some(link.to_string()),
                    None => self.done = true,
                }
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    /// Returns the number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.fetched
    }
}
