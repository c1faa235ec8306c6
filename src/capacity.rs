// Worker-pool capacity for the rate-based queue, refreshed at most once per window.
// A failed refresh keeps serving the last good value; with nothing cached the error propagates.

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::cache::TimedCache;
use crate::clock::Clock;
use crate::config::CapacitySourceConfig;
use crate::error::AggregationError;
use crate::feed_repo::FeedRepo;

pub struct CapacityService {
    feed: Arc<FeedRepo>,
    clock: Arc<dyn Clock>,
    default_max: Option<u32>,
    cache: Mutex<TimedCache<u32>>,
}

impl CapacityService {
    pub fn new(feed: Arc<FeedRepo>, clock: Arc<dyn Clock>, config: &CapacitySourceConfig) -> Self {
        let window_ms = (config.refresh_secs as i64).saturating_mul(1000);
        Self {
            feed,
            clock,
            default_max: config.default_max,
            cache: Mutex::new(TimedCache::new(window_ms)),
        }
    }

    /// Current max capacity. `Ok(None)` when no source and no default are configured.
    #[instrument(skip(self), fields(operation = "max_capacity"))]
    pub async fn max_capacity(&self) -> Result<Option<u32>, AggregationError> {
        // Held across the fetch so concurrent callers never refresh twice.
        let mut cache = self.cache.lock().await;
        let now_ms = self.clock.now_millis();
        if !cache.is_stale(now_ms) {
            return Ok(cache.value().copied());
        }

        match self.feed.fetch_capacity().await {
            Ok(Some(config)) => {
                let max = config.max_capacity();
                cache.refresh(max, now_ms);
                info!(
                    max_capacity = max,
                    providers = config.providers.len(),
                    "capacity refreshed"
                );
                Ok(Some(max))
            }
            // No capacity document configured; the cache stays empty.
            Ok(None) => Ok(self.default_max),
            Err(e) => match cache.value() {
                Some(last) => {
                    warn!(error = %e, max_capacity = *last, "capacity refresh failed; serving last value");
                    Ok(Some(*last))
                }
                None => Err(e),
            },
        }
    }
}
