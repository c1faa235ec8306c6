// Remote documents via reqwest: the live status feed and the capacity config.
// Gzip content-encoding is decoded by the client; every request carries a timeout.

mod decode;

pub use decode::{parse_capacity, parse_status};

use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::instrument;
use url::Url;

use crate::config::{CapacitySourceConfig, FeedConfig};
use crate::error::{AggregationError, FetchError};
use crate::models::{CapacityConfig, StatusDocument};
use crate::version::USER_AGENT;

pub struct FeedRepo {
    client: Client,
    status_url: String,
    status_timeout: Duration,
    capacity_url: Option<String>,
    timeout: Duration,
}

impl FeedRepo {
    pub fn new(feed: &FeedConfig, capacity: &CapacitySourceConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            status_url: feed.status_url.clone(),
            status_timeout: Duration::from_secs(feed.status_timeout_secs),
            capacity_url: capacity.config_url.clone(),
            timeout: Duration::from_secs(feed.timeout_secs),
        })
    }

    /// GET `address`, failing on timeout, transport error or non-2xx status.
    #[instrument(skip(self), fields(repo = "feed", operation = "fetch_document"))]
    pub async fn fetch_document(
        &self,
        address: &str,
        timeout: Duration,
    ) -> Result<Bytes, FetchError> {
        let url = Url::parse(address).map_err(|e| FetchError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| transport_error(address, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                address: address.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .bytes()
            .await
            .map_err(|e| transport_error(address, timeout, e))
    }

    pub async fn fetch_status(&self) -> Result<StatusDocument, AggregationError> {
        let bytes = self
            .fetch_document(&self.status_url, self.status_timeout)
            .await?;
        let doc = parse_status(&bytes)?;
        tracing::debug!(
            operation = "fetch_status",
            bytes = bytes.len(),
            pipelines = doc.pipelines.as_ref().map_or(0, Vec::len),
            "status feed fetched"
        );
        Ok(doc)
    }

    /// `Ok(None)` when no capacity document is configured.
    pub async fn fetch_capacity(&self) -> Result<Option<CapacityConfig>, AggregationError> {
        let Some(address) = &self.capacity_url else {
            return Ok(None);
        };
        let bytes = self.fetch_document(address, self.timeout).await?;
        Ok(Some(parse_capacity(&bytes)?))
    }
}

fn transport_error(address: &str, timeout: Duration, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            address: address.to_string(),
            timeout,
        }
    } else {
        FetchError::Transport {
            address: address.to_string(),
            source: e,
        }
    }
}
