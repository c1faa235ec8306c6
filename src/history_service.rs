// Shared history sampler behind an async lock, with the feed fetch on the stale path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::clock::Clock;
use crate::config::HistoryConfig;
use crate::error::{AggregationError, MalformedSnapshot};
use crate::feed_repo::FeedRepo;
use crate::history_repo::sampler::HistorySampler;
use crate::models::{HistorySample, StatusDocument};
use crate::status::EngineSettings;

pub struct HistoryService {
    feed: Arc<FeedRepo>,
    clock: Arc<dyn Clock>,
    settings: Arc<EngineSettings>,
    sampler: Mutex<HistorySampler>,
    samples_taken_total: AtomicU64,
    refresh_failures_total: AtomicU64,
}

impl HistoryService {
    pub fn new(
        feed: Arc<FeedRepo>,
        clock: Arc<dyn Clock>,
        settings: Arc<EngineSettings>,
        config: &HistoryConfig,
    ) -> Self {
        let queues = settings
            .known_queues
            .iter()
            .take(config.sampled_queues)
            .cloned()
            .collect();
        let window_ms = (config.throttle_secs as i64).saturating_mul(1000);
        Self {
            feed,
            clock,
            settings,
            sampler: Mutex::new(HistorySampler::new(queues, config.capacity, window_ms)),
            samples_taken_total: AtomicU64::new(0),
            refresh_failures_total: AtomicU64::new(0),
        }
    }

    /// Samples from the feed if stale, then returns the series.
    /// A failed fetch is only an error while the series is still empty.
    #[instrument(skip(self), fields(operation = "history_refresh"))]
    pub async fn refresh(&self) -> Result<Vec<HistorySample>, AggregationError> {
        let mut sampler = self.sampler.lock().await;
        let now = self.clock.now_utc();
        if !sampler.is_stale(now.timestamp_millis()) {
            return Ok(sampler.series());
        }

        let result = match self.feed.fetch_status().await {
            Ok(doc) => sampler
                .record(&doc, now, &self.settings)
                .map_err(AggregationError::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(taken) => {
                if taken {
                    self.samples_taken_total.fetch_add(1, Ordering::Relaxed);
                    debug!(samples = sampler.repo().len(), "history sample recorded");
                }
            }
            Err(e) => {
                self.refresh_failures_total.fetch_add(1, Ordering::Relaxed);
                if sampler.repo().is_empty() {
                    return Err(e);
                }
                warn!(error = %e, "history refresh failed; serving existing samples");
            }
        }
        Ok(sampler.series())
    }

    /// Records from an already-fetched document (e.g. the one a status request just pulled).
    pub async fn record_snapshot(&self, doc: &StatusDocument) -> Result<bool, MalformedSnapshot> {
        let mut sampler = self.sampler.lock().await;
        let taken = sampler.record(doc, self.clock.now_utc(), &self.settings)?;
        if taken {
            self.samples_taken_total.fetch_add(1, Ordering::Relaxed);
        }
        Ok(taken)
    }

    /// Current buffer contents, oldest first. Never fetches.
    pub async fn series(&self) -> Vec<HistorySample> {
        self.sampler.lock().await.series()
    }

    pub fn samples_taken_total(&self) -> u64 {
        self.samples_taken_total.load(Ordering::Relaxed)
    }

    pub fn refresh_failures_total(&self) -> u64 {
        self.refresh_failures_total.load(Ordering::Relaxed)
    }
}
