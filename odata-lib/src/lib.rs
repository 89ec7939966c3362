//! OData client library
//!
//! A Rust async client for paginated, filterable OData-style collections.
//! Build a [`Query`](api::Query) against an endpoint, send it through a
//! [`RequestProvider`] and either fetch a single resource or collect every
//! page of a collection.

pub mod api;
pub mod auth;
pub mod error;

mod provider;
mod request;

pub use provider::*;
pub use request::*;
