//! Collection response envelope and next-link collection.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::Error;
use crate::request::RequestProvider;

/// One page of an OData collection response.
///
/// Deserializes the standard envelope:
///
/// ```json
/// {
///   "@odata.context": "https://host/service/$metadata#People",
///   "@odata.count": 42,
///   "@odata.nextLink": "https://host/service/People?$skiptoken=8",
///   "value": [ ... ]
/// }
/// ```
///
/// # Example
///
/// ```ignore
/// let mut page = Query::<Person>::new(&provider, "People").count().get_page().await?;
/// println!("{:?} people in total", page.count());
///
/// page.collect(&provider).await?;
/// for person in page.result() {
///     println!("{}", person.name);
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ODataResponse<V> {
    #[serde(rename = "@odata.context", default)]
    context: Option<String>,
    /// Total item count (when `$count=true`).
    #[serde(rename = "@odata.count", default)]
    count: Option<u64>,
    /// Link to the next page.
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
    #[serde(default = "Vec::new")]
    value: Vec<V>,
}

impl<V> ODataResponse<V> {
    /// Creates a page holding `value` with no metadata.
    pub fn new(value: Vec<V>) -> Self {
        Self {
            context: None,
            count: None,
            next_link: None,
            value,
        }
    }

    /// Sets the `@odata.context` metadata.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the total item count.
    pub fn with_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Sets the next link for pagination.
    pub fn with_next_link(mut self, next_link: impl Into<String>) -> Self {
        self.next_link = Some(next_link.into());
        self
    }

    /// Returns the `@odata.context` metadata, if present.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Returns the total item count, if it was requested.
    pub fn count(&self) -> Option<u64> {
        self.count
    }

    /// Returns the link to the next page.
    ///
    /// An empty `@odata.nextLink` is treated the same as a missing one.
    pub fn next_link(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|link| !link.is_empty())
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link().is_some()
    }

    /// Returns the items of this page, in the order received.
    pub fn result(&self) -> &[V] {
        &self.value
    }

    /// Consumes the page and returns its items.
    pub fn into_result(self) -> Vec<V> {
        self.value
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<V: DeserializeOwned> ODataResponse<V> {
    /// Follows the next-link chain and appends every page's items to this one.
    ///
    /// Each page is fetched with a new request from `provider`; the next-link
    /// is requested verbatim, without the original query parameters. On
    /// success the next link is cleared. On error the items collected so far
    /// stay in `self`.
    pub async fn collect<P>(&mut self, provider: &P) -> Result<(), Error>
    where
        P: RequestProvider + ?Sized,
    {
        self.collect_limited(provider, None).await
    }

    /// Like [`collect`](Self::collect), but fails with
    /// `Error::PageLimit(max_pages)` once `max_pages` pages (this one
    /// included) have been seen and the server still reports a next link.
    pub async fn collect_limited<P>(
        &mut self,
        provider: &P,
        max_pages: Option<usize>,
    ) -> Result<(), Error>
    where
        P: RequestProvider + ?Sized,
    {
        let mut pages = 1;
        while let Some(link) = self.next_link().map(str::to_owned) {
            if let Some(max) = max_pages.filter(|max| pages >= *max) {
                log::warn!(
                    "Stopping pagination after {} pages, next link {}",
                    pages,
                    link
                );
                return Err(Error::PageLimit(max));
            }

            log::debug!("Following next link {}", link);
            let request = provider.new_request().await?;
            let page: ODataResponse<V> = request.get_json(&link).await?;

            pages += 1;
            self.next_link = page.next_link;
            self.value.extend(page.value);
        }
        self.next_link = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        name: String,
    }

    #[test]
    fn test_deserialize_envelope() {
        let body = r#"{
            "@odata.context": "https://host/$metadata#People",
            "@odata.count": 3,
            "@odata.nextLink": "https://host/People?$skiptoken=2",
            "value": [{"name": "a"}, {"name": "b"}]
        }"#;
        let page: ODataResponse<Person> = serde_json::from_str(body).unwrap();
        assert_eq!(page.context(), Some("https://host/$metadata#People"));
        assert_eq!(page.count(), Some(3));
        assert_eq!(page.next_link(), Some("https://host/People?$skiptoken=2"));
        assert_eq!(
            page.result(),
            &[
                Person { name: "a".to_string() },
                Person { name: "b".to_string() },
            ]
        );
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let page: ODataResponse<Person> = serde_json::from_str("{}").unwrap();
        assert_eq!(page.context(), None);
        assert_eq!(page.count(), None);
        assert!(!page.has_more());
        assert!(page.is_empty());
    }

    #[test]
    fn test_empty_next_link_means_no_more_pages() {
        let page: ODataResponse<Person> =
            serde_json::from_str(r#"{"@odata.nextLink": "", "value": []}"#).unwrap();
        assert_eq!(page.next_link(), None);
        assert!(!page.has_more());
    }

    #[test]
    fn test_builder_helpers() {
        let page = ODataResponse::new(vec![1, 2])
            .with_context("ctx")
            .with_count(10)
            .with_next_link("next");
        assert_eq!(page.len(), 2);
        assert_eq!(page.count(), Some(10));
        assert!(page.has_more());
        assert_eq!(page.into_result(), vec![1, 2]);
    }
}
