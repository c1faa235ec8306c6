// Validated change and job records produced by the parser.

/// Label used when a change has no owner (or an owner with no names).
pub const UNKNOWN_USER: &str = "unknown";

/// Job state, derived once from `(elapsed_time, result)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Queued,
    Running,
    Complete(String),
}

impl JobState {
    /// Total over both nullable inputs: no elapsed time means queued, whatever the result says.
    pub fn classify(elapsed_ms: Option<i64>, result: Option<&str>) -> Self {
        match (elapsed_ms, result) {
            (None, _) => JobState::Queued,
            (Some(_), None) => JobState::Running,
            (Some(_), Some(result)) => JobState::Complete(result.to_string()),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, JobState::Complete(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub name: String,
    pub url: Option<String>,
    pub elapsed_ms: Option<i64>,
    pub estimated_secs: Option<f64>,
    pub report_url: Option<String>,
    pub launch_time_ms: Option<i64>,
    pub state: JobState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub id: String,
    pub url: Option<String>,
    pub project: String,
    /// Resolved owner label: username, else name, else [`UNKNOWN_USER`].
    pub user: String,
    pub enqueue_time_ms: Option<i64>,
    pub jobs: Vec<Job>,
}

/// One change in traversal order, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedChange {
    /// Pipeline name.
    pub queue: String,
    /// 1-based counter over non-empty change queues, across the whole traversal.
    pub queue_sequence: usize,
    /// 1-based slot within a head group; `None` when the group holds a single change.
    pub queue_position: Option<usize>,
    pub change: Change,
}
