use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemandClientError {
    #[error("request to demand service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("demand service returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),
}

/// Outbound seam to the demand estimator. The raw payload is passed through
/// to pricing responses, so this returns untyped JSON.
#[async_trait]
pub trait DemandFetcher: Send + Sync + 'static {
    async fn fetch_demand(&self) -> Result<Value, DemandClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpDemandClient {
    client: reqwest::Client,
    url: String,
}

impl HttpDemandClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DemandClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl DemandFetcher for HttpDemandClient {
    async fn fetch_demand(&self) -> Result<Value, DemandClientError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(DemandClientError::UpstreamStatus(response.status()));
        }

        response.json::<Value>().await.map_err(DemandClientError::from)
    }
}
