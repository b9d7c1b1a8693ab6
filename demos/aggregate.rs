//! Fetch listings from every configured source and print the JSON response.
//!
//! Uses the plain-HTTP renderer, so boards that hydrate their listings
//! client-side will come back sparse; plug a headless-browser renderer into
//! the same traits for full coverage.
//!
//! ```sh
//! cargo run --example aggregate -- "développeur rust" Paris
//! ```

use std::sync::Arc;

use jobscout::{Aggregator, ErrorResponse, HttpRenderer, ListingsResponse};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_else(|| "développeur".to_string());
    let location = args.next().unwrap_or_else(|| "Paris".to_string());

    let aggregator = Aggregator::new(Arc::new(HttpRenderer::new()));

    let body = match aggregator.fetch_all_listings(&query, &location, 2).await {
        Ok(result) => serde_json::to_string_pretty(&ListingsResponse::from(result)),
        Err(e) => serde_json::to_string_pretty(&ErrorResponse::new(e)),
    };

    println!("{}", body.expect("response serializes"));
}
