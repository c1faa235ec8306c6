// ETC estimator: remaining time for one job under its queue's policy.

use crate::models::{Job, JobState};

use super::format::{UNKNOWN_DISPLAY, format_duration};

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Estimated time to completion. May be negative until rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Etc {
    Millis(i64),
    Unknown,
}

impl Etc {
    /// Milliseconds clamped at zero; `None` when unknown.
    pub fn clamped(self) -> Option<i64> {
        match self {
            Etc::Millis(ms) => Some(ms.max(0)),
            Etc::Unknown => None,
        }
    }

    pub fn display(self) -> String {
        match self.clamped() {
            Some(ms) => format_duration(ms),
            None => UNKNOWN_DISPLAY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EtcPolicy {
    /// FIFO drain through a fixed pool of `max_capacity` workers, each job taking
    /// `job_duration_hours`. `None` capacity means the capacity source is unavailable.
    RateBased {
        max_capacity: Option<u32>,
        job_duration_hours: f64,
    },
    /// Trust the feed's own per-job `estimated_time`.
    EstimateBased,
}

/// Position of a job within its queue at the moment it is estimated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueProgress {
    /// Jobs of this queue seen before this one (0-based index).
    pub job_index: u64,
    /// Completed jobs of this queue seen before this one.
    pub complete_so_far: u64,
}

impl QueueProgress {
    pub fn advance(&mut self, state: &JobState) {
        self.job_index += 1;
        if state.is_complete() {
            self.complete_so_far += 1;
        }
    }
}

pub fn estimate(job: &Job, progress: QueueProgress, policy: &EtcPolicy) -> Etc {
    if job.state.is_complete() {
        return Etc::Millis(0);
    }
    match *policy {
        EtcPolicy::RateBased {
            max_capacity,
            job_duration_hours,
        } => match job.elapsed_ms {
            None => match completion_rate_minutes(max_capacity, job_duration_hours) {
                Some(rate_minutes) => {
                    let ahead = progress.job_index as f64 - progress.complete_so_far as f64;
                    Etc::Millis((ahead * rate_minutes * MS_PER_MINUTE) as i64)
                }
                None => Etc::Unknown,
            },
            Some(elapsed) => {
                Etc::Millis(((job_duration_hours * MS_PER_HOUR) as i64).saturating_sub(elapsed))
            }
        },
        EtcPolicy::EstimateBased => match (job.estimated_secs, job.elapsed_ms) {
            (Some(estimated), Some(elapsed)) => {
                Etc::Millis(((estimated * 1000.0) as i64).saturating_sub(elapsed))
            }
            _ => Etc::Unknown,
        },
    }
}

/// Minutes between two job completions: `60 / (capacity / duration_hours)`.
fn completion_rate_minutes(max_capacity: Option<u32>, job_duration_hours: f64) -> Option<f64> {
    let capacity = max_capacity.filter(|c| *c > 0)? as f64;
    if job_duration_hours <= 0.0 {
        return None;
    }
    Some(60.0 / (capacity / job_duration_hours))
}
