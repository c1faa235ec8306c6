// History samples kept in memory for the queue chart.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AggregateCounts;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueCounts {
    pub running: u64,
    pub queued: u64,
    pub complete: u64,
}

impl From<AggregateCounts> for QueueCounts {
    fn from(c: AggregateCounts) -> Self {
        Self {
            running: c.running,
            queued: c.queued,
            complete: c.complete,
        }
    }
}

/// One point of the time series. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySample {
    pub timestamp: DateTime<Utc>,
    pub per_queue: BTreeMap<String, QueueCounts>,
}
