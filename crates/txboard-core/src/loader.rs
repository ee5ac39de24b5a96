//! Upstream dataset loading
//!
//! Fetches the fixed JSON array of transaction records and replaces the
//! whole record store with it.

use std::time::Duration;
use txboard_config::DatasetConfig;

use crate::error::{CoreError, CoreResult};
use crate::models::TransactionRecord;
use crate::store::TransactionStore;

/// Client for the upstream dataset
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: reqwest::Client,
    url: String,
}

impl DatasetLoader {
    pub fn new(config: &DatasetConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and decode the dataset
    pub async fn fetch(&self) -> CoreResult<Vec<TransactionRecord>> {
        log::info!("Fetching dataset from {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::UpstreamFetch {
                message: format!("{} returned HTTP {}", self.url, status),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<TransactionRecord> =
            serde_json::from_slice(&body).map_err(|e| CoreError::UpstreamFetch {
                message: format!("invalid dataset: {}", e),
            })?;

        log::debug!("Fetched {} records", records.len());
        Ok(records)
    }

    /// Replace the store contents with a fresh copy of the dataset
    ///
    /// Nothing is written unless the fetch succeeds.
    pub async fn initialize(&self, store: &dyn TransactionStore) -> CoreResult<usize> {
        let records = self.fetch().await?;
        let count = store.replace_all(records).await?;
        log::info!("Record store initialized with {} records", count);
        Ok(count)
    }
}
