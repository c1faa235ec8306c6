// Status aggregation and estimation engine.
// Pure: a fetched document goes in, a view model comes out. No I/O, no clock reads.

pub mod aggregator;
pub mod estimator;
pub mod format;
pub mod parser;

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{AggregationError, MalformedSnapshot};
use crate::models::{AggregateCounts, StatusDocument, ViewModel};

pub use estimator::{Etc, EtcPolicy};
pub use parser::{ALL_QUEUES, QueueSelector};

/// Engine knobs that come from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Known queue registry, in display order.
    pub known_queues: Vec<String>,
    /// The one queue estimated with the rate-based policy.
    pub rate_based_queue: Option<String>,
    pub job_duration_hours: f64,
    pub base_server_url: Url,
    /// Name infixes stripped from job names for display, e.g. `centos-7-`.
    pub platform_labels: Vec<String>,
}

impl EngineSettings {
    pub fn policy_for(&self, queue: &str, max_capacity: Option<u32>) -> EtcPolicy {
        if self.rate_based_queue.as_deref() == Some(queue) {
            EtcPolicy::RateBased {
                max_capacity,
                job_duration_hours: self.job_duration_hours,
            }
        } else {
            EtcPolicy::EstimateBased
        }
    }
}

/// One status request.
#[derive(Debug, Clone)]
pub struct StatusQuery<'a> {
    pub selector: &'a QueueSelector,
    /// Empty string disables filtering.
    pub filter: &'a str,
    /// Worker pool size for the rate-based queue, if known.
    pub capacity: Option<u32>,
    pub now: DateTime<Utc>,
}

/// Builds the full view for a request. Fails without producing any partial view.
pub fn compute_status_view(
    doc: &StatusDocument,
    query: &StatusQuery<'_>,
    settings: &EngineSettings,
) -> Result<ViewModel, AggregationError> {
    let changes = parser::select_changes(doc, query.selector, &settings.known_queues)?;
    let aggregated = aggregator::aggregate(&changes, query, settings);
    Ok(ViewModel {
        queue_name: query.selector.label().to_string(),
        changes: aggregated.changes,
        counts: aggregated.counts,
        drain_display: format::format_optional(aggregated.drain_ms),
        generated_at: query.now,
    })
}

/// Unfiltered counts for one queue. A queue missing from the document counts as empty.
pub fn queue_counts(
    doc: &StatusDocument,
    queue: &str,
    settings: &EngineSettings,
) -> Result<AggregateCounts, MalformedSnapshot> {
    let selector = QueueSelector::Named(queue.to_string());
    match parser::select_changes(doc, &selector, &settings.known_queues) {
        Ok(changes) => Ok(aggregator::count_jobs(&changes)),
        Err(MalformedSnapshot::UnknownQueue(_)) => Ok(AggregateCounts::default()),
        Err(e) => Err(e),
    }
}
