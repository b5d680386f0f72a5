//! SerpApi transport shared by the flight and hotel adapters.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PlannerError, PlannerResult};

/// Remote search engine returning structured JSON.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one search. `params` carries the engine selector and query fields;
    /// credentials are added by the implementation.
    async fn search(&self, params: &[(&'static str, String)]) -> PlannerResult<Value>;
}

pub struct SerpApiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> PlannerResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PlannerError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, params: &[(&'static str, String)]) -> PlannerResult<Value> {
        let mut query: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        query.push(("api_key", self.api_key.as_str()));

        let engine = params
            .iter()
            .find(|(k, _)| *k == "engine")
            .map(|(_, v)| v.as_str())
            .unwrap_or("unknown");
        tracing::debug!(engine, "Querying search provider");

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| PlannerError::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PlannerError::Provider(format!("Invalid response (HTTP {}): {}", status, e)))?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            return Err(PlannerError::Provider(format!("HTTP {}: {}", status, message)));
        }

        Ok(body)
    }
}
