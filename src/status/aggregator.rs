// Aggregator: validated changes -> change/job views, counts and ETC per job.

use std::collections::HashMap;

use url::Url;

use crate::models::{
    AggregateCounts, Change, ChangeView, FontWeight, Job, JobColor, JobState, JobStyle, JobView,
    QueuedChange,
};

use super::estimator::{self, Etc, EtcPolicy, QueueProgress};
use super::format::{format_duration, format_optional};
use super::{EngineSettings, StatusQuery};

/// Result that marks a finished job as failed (red).
const FAILURE_RESULT: &str = "FAILURE";

pub(super) struct Aggregated {
    pub changes: Vec<ChangeView>,
    pub counts: AggregateCounts,
    pub drain_ms: Option<i64>,
}

pub(super) fn aggregate(
    changes: &[QueuedChange],
    query: &StatusQuery<'_>,
    settings: &EngineSettings,
) -> Aggregated {
    let now_ms = query.now.timestamp_millis();
    let mut counts = AggregateCounts::default();
    let mut progress: HashMap<&str, QueueProgress> = HashMap::new();
    let mut job_sequence = 0usize;
    let mut drain_ms: Option<i64> = None;
    let mut views = Vec::with_capacity(changes.len());

    for queued in changes {
        let policy = settings.policy_for(&queued.queue, query.capacity);
        let queue_progress = progress.entry(queued.queue.as_str()).or_default();
        let change = &queued.change;
        let mut jobs = Vec::new();

        for job in &change.jobs {
            let etc = estimator::estimate(job, *queue_progress, &policy);
            queue_progress.advance(&job.state);

            if !matches_filter(query.filter, change, job) {
                continue;
            }
            match job.state {
                JobState::Queued => counts.add_queued(),
                JobState::Running => counts.add_running(),
                JobState::Complete(_) => counts.add_complete(),
            }
            if let Some(ms) = etc.clamped() {
                drain_ms = Some(drain_ms.map_or(ms, |d| d.max(ms)));
            }
            job_sequence += 1;
            jobs.push(job_view(job, etc, job_sequence, settings));
        }

        views.push(ChangeView {
            sequence_number: queued.queue_sequence,
            queue_position: queued.queue_position,
            total_wait_display: format_duration(total_wait_ms(change, now_ms)),
            id: change.id.clone(),
            url: change.url.clone(),
            project: change.project.clone(),
            user_display: change.user.clone(),
            jobs,
        });
    }

    Aggregated {
        changes: views,
        counts,
        drain_ms,
    }
}

/// Unfiltered job-state counts over a set of changes.
pub fn count_jobs(changes: &[QueuedChange]) -> AggregateCounts {
    let mut counts = AggregateCounts::default();
    for job in changes.iter().flat_map(|c| c.change.jobs.iter()) {
        match job.state {
            JobState::Queued => counts.add_queued(),
            JobState::Running => counts.add_running(),
            JobState::Complete(_) => counts.add_complete(),
        }
    }
    counts
}

/// Case-sensitive substring match on job name, change id, project or user label.
pub fn matches_filter(filter: &str, change: &Change, job: &Job) -> bool {
    filter.is_empty()
        || job.name.contains(filter)
        || change.id.contains(filter)
        || change.project.contains(filter)
        || change.user.contains(filter)
}

/// Joins relative links onto `base`; absolute (scheme-prefixed) and empty links pass through.
pub fn normalize_link(link: &str, base: &Url) -> String {
    if link.is_empty() || Url::parse(link).is_ok() {
        return link.to_string();
    }
    base.join(link)
        .map(String::from)
        .unwrap_or_else(|_| link.to_string())
}

/// Drops everything up to and including the first platform label found in the name.
pub fn short_name(name: &str, platform_labels: &[String]) -> String {
    platform_labels
        .iter()
        .filter(|label| !label.is_empty())
        .find_map(|label| name.split_once(label.as_str()).map(|(_, suffix)| suffix))
        .filter(|suffix| !suffix.is_empty())
        .unwrap_or(name)
        .to_string()
}

pub fn job_style(state: &JobState) -> JobStyle {
    match state {
        JobState::Queued => JobStyle {
            color: JobColor::Blue,
            weight: FontWeight::Normal,
        },
        JobState::Running => JobStyle {
            color: JobColor::Green,
            weight: FontWeight::Normal,
        },
        JobState::Complete(result) => JobStyle {
            color: if result == FAILURE_RESULT {
                JobColor::Red
            } else {
                JobColor::Green
            },
            weight: FontWeight::Bold,
        },
    }
}

fn job_view(job: &Job, etc: Etc, sequence_number: usize, settings: &EngineSettings) -> JobView {
    // Finished jobs point at their logs; the others at the live stream.
    let link = match job.state {
        JobState::Complete(_) => job.report_url.as_deref().or(job.url.as_deref()),
        _ => job.url.as_deref(),
    }
    .unwrap_or("");

    JobView {
        sequence_number,
        elapsed_display: format_optional(job.elapsed_ms),
        etc_display: etc.display(),
        short_name: short_name(&job.name, &settings.platform_labels),
        link: normalize_link(link, &settings.base_server_url),
        style: job_style(&job.state),
    }
}

/// Time since the change was enqueued, or since its first job launched; zero if neither is known.
fn total_wait_ms(change: &Change, now_ms: i64) -> i64 {
    change
        .enqueue_time_ms
        .or_else(|| change.jobs.first().and_then(|j| j.launch_time_ms))
        .map_or(0, |start| now_ms.saturating_sub(start).max(0))
}
