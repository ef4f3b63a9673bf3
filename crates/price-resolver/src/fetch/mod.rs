//! Fetch Collaborator
//!
//! Abstraction over "GET a URL, give me JSON". The resolver only ever
//! talks to exchanges through this trait, so tests swap in
//! [`MockFetchClient`] and never touch the network.

mod mock;

pub use mock::MockFetchClient;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{PriceError, Result};

/// JSON fetch capability (Strategy pattern)
///
/// Implement this for each transport: reqwest, a caching wrapper, a
/// test double.
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// GET the URL and return the response body as JSON
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// Decode a fetched JSON value into a typed response at the boundary
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(PriceError::from)
}

/// HTTP fetch client backed by `reqwest`
pub struct HttpFetchClient {
    client: reqwest::Client,
}

impl HttpFetchClient {
    /// Create a client with the default request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchClient for HttpFetchClient {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        debug!(url, "fetching");
        let response = self.client.get(url).send().await?.error_for_status()?;
        let value = response
            .json::<Value>()
            .await
            .map_err(|e| PriceError::Decode(e.to_string()))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(serde::Deserialize)]
    struct Point {
        x: i64,
        y: i64,
    }

    #[test]
    fn test_decode_typed() {
        let point: Point = decode(json!({"x": 1, "y": 2})).unwrap();
        assert_eq!(point.x, 1);
        assert_eq!(point.y, 2);
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let result: Result<Point> = decode(json!([1, 2]));
        assert!(matches!(result, Err(PriceError::Decode(_))));
    }
}
