//! OData query builder.

use std::collections::HashMap;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::request::Request;
use crate::request::RequestProvider;

use super::order::Direction;
use super::order::Order;
use super::page::ODataResponse;
use super::pages::Pages;

/// Builder for an OData query against one endpoint, yielding items of type `V`.
///
/// Options are accumulated by the chaining setters and serialized into
/// `$`-prefixed query parameters when a terminal operation runs. Each
/// terminal operation asks the [`RequestProvider`] for a fresh request.
///
/// # Example
///
/// ```ignore
/// let people: Vec<Person> = Query::new(&provider, "People")
///     .select(&["UserName", "FirstName"])
///     .filter("FirstName eq 'Scott'")
///     .order_by("UserName", Direction::Ascending)
///     .get_all()
///     .await?;
///
/// let person: Person = Query::new(&provider, "People/{user}")
///     .path_param("user", "russellwhyte")
///     .get()
///     .await?;
/// ```
pub struct Query<'a, V> {
    provider: &'a dyn RequestProvider,
    url: String,
    count: bool,
    expand: Vec<String>,
    filter: String,
    order_by: Order,
    search: String,
    select: Vec<String>,
    skip: Option<u64>,
    top: Option<u64>,
    path_params: HashMap<String, String>,
    max_pages: Option<usize>,
    _item: PhantomData<fn() -> V>,
}

impl<'a, V> Query<'a, V> {
    /// Creates a query for `url`, resolved and sent through `provider`.
    ///
    /// `url` may be relative to the provider's base URL and may contain
    /// `{name}` path templates.
    pub fn new(provider: &'a dyn RequestProvider, url: impl Into<String>) -> Self {
        Self {
            provider,
            url: url.into(),
            count: false,
            expand: Vec::new(),
            filter: String::new(),
            order_by: Order::new(),
            search: String::new(),
            select: Vec::new(),
            skip: None,
            top: None,
            path_params: HashMap::new(),
            max_pages: None,
            _item: PhantomData,
        }
    }

    /// Requests the total item count (`$count=true`).
    pub fn count(mut self) -> Self {
        self.count = true;
        self
    }

    /// Specifies which related fields to expand.
    ///
    /// Replaces any previous list; an empty list disables expansion.
    pub fn expand(mut self, fields: &[&str]) -> Self {
        self.expand = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Sets a raw `$filter` expression.
    ///
    /// The expression is sent as-is, apart from URL encoding.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Orders results by `key`.
    ///
    /// Passing `None` as the direction leaves the choice to the server.
    /// Ordering by the same key again overwrites its direction.
    pub fn order_by(
        mut self,
        key: impl Into<String>,
        direction: impl Into<Option<Direction>>,
    ) -> Self {
        self.order_by.set(key, direction);
        self
    }

    /// Sets a free-text `$search` term.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Specifies which fields to select.
    ///
    /// If not called, all fields are returned.
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select = fields.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Skips the first `n` results.
    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Limits the number of results.
    pub fn top(mut self, n: u64) -> Self {
        self.top = Some(n);
        self
    }

    /// Sets a `{name}` path template substitution.
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Caps the number of pages followed by [`get_all`](Self::get_all) and
    /// [`pages`](Self::pages).
    ///
    /// Without a cap, pagination continues until the server stops sending a
    /// next link.
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Returns the serialized query parameters.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if self.count {
            params.push(("$count", "true".to_string()));
        }
        if !self.expand.is_empty() {
            params.push(("$expand", self.expand.join(",")));
        }
        if !self.filter.is_empty() {
            params.push(("$filter", self.filter.clone()));
        }
        if !self.order_by.is_empty() {
            params.push(("$orderby", self.order_by.to_string()));
        }
        if !self.search.is_empty() {
            params.push(("$search", self.search.clone()));
        }
        if !self.select.is_empty() {
            params.push(("$select", self.select.join(",")));
        }
        if let Some(skip) = self.skip {
            params.push(("$skip", skip.to_string()));
        }
        if let Some(top) = self.top {
            params.push(("$top", top.to_string()));
        }

        params
    }

    pub(crate) fn provider(&self) -> &'a dyn RequestProvider {
        self.provider
    }

    pub(crate) fn max_pages_value(&self) -> Option<usize> {
        self.max_pages
    }

    async fn prepare(&self) -> Result<Request, Error> {
        let mut request = self.provider.new_request().await?;

        let params = self.query_params();
        log::trace!("Query parameters for {}: {:?}", self.url, params);
        for (name, value) in params {
            request = request.query_param(name, value);
        }

        Ok(request.path_params(self.path_params.clone()))
    }
}

impl<'a, V: DeserializeOwned> Query<'a, V> {
    /// Fetches a single resource.
    ///
    /// The response body is deserialized directly into `V`, without an
    /// envelope.
    pub async fn get(&self) -> Result<V, Error> {
        self.prepare().await?.get_json(&self.url).await
    }

    /// Fetches only the first page of a collection.
    ///
    /// Useful for reading `@odata.count` or for paging manually with
    /// [`ODataResponse::collect`].
    pub async fn get_page(&self) -> Result<ODataResponse<V>, Error> {
        self.prepare().await?.get_json(&self.url).await
    }

    /// Fetches every page of a collection and returns all items in order.
    ///
    /// If any page fails, the error is returned and the items fetched so far
    /// are discarded.
    pub async fn get_all(&self) -> Result<Vec<V>, Error> {
        let mut page = self.get_page().await?;
        page.collect_limited(self.provider, self.max_pages).await?;
        Ok(page.into_result())
    }

    /// Returns an async iterator over the pages of a collection.
    pub fn pages(&self) -> Pages<'_, V> {
        Pages::new(self)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct NoProvider;

    #[async_trait]
    impl RequestProvider for NoProvider {
        async fn new_request(&self) -> Result<Request, Error> {
            Err(Error::Provider("not used".to_string()))
        }
    }

    fn query() -> Query<'static, serde_json::Value> {
        Query::new(&NoProvider, "People")
    }

    #[test]
    fn test_empty_query_has_no_params() {
        assert!(query().query_params().is_empty());
    }

    #[test]
    fn test_all_options_in_fixed_order() {
        let q = query()
            .top(10)
            .select(&["a", "b"])
            .search("blue")
            .order_by("name", Direction::Descending)
            .filter("age gt 3")
            .expand(&["Friends", "Trips"])
            .skip(20)
            .count();
        assert_eq!(
            q.query_params(),
            vec![
                ("$count", "true".to_string()),
                ("$expand", "Friends,Trips".to_string()),
                ("$filter", "age gt 3".to_string()),
                ("$orderby", "name desc".to_string()),
                ("$search", "blue".to_string()),
                ("$select", "a,b".to_string()),
                ("$skip", "20".to_string()),
                ("$top", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_replaces_previous_selection() {
        let q = query().select(&["a"]).select(&["b"]);
        assert_eq!(q.query_params(), vec![("$select", "b".to_string())]);
    }

    #[test]
    fn test_empty_expand_clears() {
        let q = query().expand(&["Friends"]).expand(&[]);
        assert!(q.query_params().is_empty());
    }

    #[test]
    fn test_order_by_last_write_wins() {
        let q = query()
            .order_by("x", Direction::Ascending)
            .order_by("x", Direction::Descending);
        assert_eq!(q.query_params(), vec![("$orderby", "x desc".to_string())]);
    }

    #[test]
    fn test_order_by_without_direction() {
        let q = query()
            .order_by("x", None)
            .order_by("y", Direction::Ascending);
        assert_eq!(q.query_params(), vec![("$orderby", "x,y asc".to_string())]);
    }

    #[test]
    fn test_skip_and_top_are_serialized() {
        let q = query().skip(0).top(5);
        assert_eq!(
            q.query_params(),
            vec![("$skip", "0".to_string()), ("$top", "5".to_string())]
        );
    }

    #[test]
    fn test_filter_and_search_are_independent() {
        let q = query().filter("a eq 1").search("term");
        assert_eq!(
            q.query_params(),
            vec![
                ("$filter", "a eq 1".to_string()),
                ("$search", "term".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filter_and_search_clear_previous_values() {
        let q = query()
            .filter("a eq 1")
            .filter("")
            .search("x")
            .search("");
        assert!(q.query_params().is_empty());
    }

    #[test]
    fn test_path_params_are_not_query_params() {
        let q = query().path_param("id", "42");
        assert!(q.query_params().is_empty());
    }
}
