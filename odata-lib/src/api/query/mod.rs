//! OData query builder and pagination.
//!
//! - [`Query`] - Fluent builder serializing `$count`, `$expand`, `$filter`,
//!   `$orderby`, `$search`, `$select`, `$skip` and `$top`
//! - [`Order`] - Ordering specification for query results
//! - [`ODataResponse`] - A page of collection results with pagination info
//! - [`Pages`] - Async iterator following `@odata.nextLink`

mod builder;
mod order;
mod page;
mod pages;

pub use builder::Query;
pub use order::Direction;
pub use order::Order;
pub use page::ODataResponse;
pub use pages::Pages;
