//! Lists every item of an OData collection.
//!
//! Run with: cargo run --example list_all
//!
//! Reads from the environment (or a .env file):
//! - ODATA_URL (e.g. https://services.odata.org/V4/TripPinServiceRW)
//! - ODATA_COLLECTION (defaults to People)
//! - ODATA_TOKEN (optional bearer token)
//! - ODATA_ORDER_BY (optional field to sort ascending by)

use std::env;

use odata_lib::api::query::Direction;
use odata_lib::api::Query;
use odata_lib::auth::StaticTokenProvider;
use odata_lib::HttpRequestProvider;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    let url = env::var("ODATA_URL").expect("ODATA_URL not set");
    let collection = env::var("ODATA_COLLECTION").unwrap_or_else(|_| "People".to_string());

    let mut builder = HttpRequestProvider::builder().base_url(url);
    if let Ok(token) = env::var("ODATA_TOKEN") {
        builder = builder.token_provider(StaticTokenProvider::new(token));
    }
    let provider = builder.build()?;

    let mut query = Query::<serde_json::Value>::new(&provider, collection.as_str()).count();
    if let Ok(field) = env::var("ODATA_ORDER_BY") {
        query = query.order_by(field, Direction::Ascending);
    }

    let first = query.get_page().await?;
    println!("Server reports {:?} items", first.count());

    let items = query.get_all().await?;
    for item in &items {
        println!("{}", item);
    }
    println!("\nFetched {} items", items.len());

    Ok(())
}
