//! Mock Fetch Client
//!
//! For testing. Serves canned JSON bodies keyed by exact URL and
//! records every URL requested.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::FetchClient;
use crate::error::{PriceError, Result};

/// Mock fetch client with canned responses
#[derive(Default)]
pub struct MockFetchClient {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<String>>,
}

impl MockFetchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a canned response for an exact URL
    pub fn with_response(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    /// URLs requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl FetchClient for MockFetchClient {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| PriceError::Decode(format!("no canned response for {url}")))
    }
}
