// Throttled sampler: Stale -> (record) -> Fresh -> (window elapses) -> Stale.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::HistoryRepo;
use crate::cache;
use crate::error::MalformedSnapshot;
use crate::models::{HistorySample, StatusDocument};
use crate::status::{self, EngineSettings};

pub struct HistorySampler {
    repo: HistoryRepo,
    queues: Vec<String>,
    window_ms: i64,
    last_update_ms: Option<i64>,
}

impl HistorySampler {
    /// `queues` are the sampled queue names, usually the head of the registry.
    pub fn new(queues: Vec<String>, capacity: usize, window_ms: i64) -> Self {
        Self {
            repo: HistoryRepo::new(capacity),
            queues,
            window_ms,
            last_update_ms: None,
        }
    }

    pub fn is_stale(&self, now_ms: i64) -> bool {
        cache::is_stale(self.last_update_ms, now_ms, self.window_ms)
    }

    /// Appends one sample if the window has elapsed. Returns whether a sample was taken.
    /// On error the sampler stays stale and the buffer is untouched.
    pub fn record(
        &mut self,
        doc: &StatusDocument,
        now: DateTime<Utc>,
        settings: &EngineSettings,
    ) -> Result<bool, MalformedSnapshot> {
        let now_ms = now.timestamp_millis();
        if !self.is_stale(now_ms) {
            return Ok(false);
        }
        let mut per_queue = BTreeMap::new();
        for queue in &self.queues {
            let counts = status::queue_counts(doc, queue, settings)?;
            per_queue.insert(queue.clone(), counts.into());
        }
        self.repo.push(HistorySample {
            timestamp: now,
            per_queue,
        });
        self.last_update_ms = Some(now_ms);
        Ok(true)
    }

    pub fn series(&self) -> Vec<HistorySample> {
        self.repo.series()
    }

    pub fn repo(&self) -> &HistoryRepo {
        &self.repo
    }
}
