//! OData API operations

pub mod query;

pub use query::ODataResponse;
pub use query::Query;
