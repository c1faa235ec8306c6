// Parser: loose status document -> ordered, validated change records for the selected queues.

use crate::error::MalformedSnapshot;
use crate::models::{
    Change, Job, JobState, QueuedChange, RawChange, RawJob, RawOwner, RawPipeline, StatusDocument,
    UNKNOWN_USER,
};

/// Selector value that means "every queue in the registry".
pub const ALL_QUEUES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSelector {
    All,
    Named(String),
}

impl QueueSelector {
    /// `"all"` selects the registry; anything else is a pipeline name.
    pub fn from_param(s: &str) -> Self {
        if s == ALL_QUEUES {
            QueueSelector::All
        } else {
            QueueSelector::Named(s.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            QueueSelector::All => ALL_QUEUES,
            QueueSelector::Named(name) => name,
        }
    }
}

/// Walks pipeline -> change queue -> head group -> change and validates each change.
/// Change queues without head groups are skipped and do not consume a sequence number.
pub fn select_changes(
    doc: &StatusDocument,
    selector: &QueueSelector,
    known_queues: &[String],
) -> Result<Vec<QueuedChange>, MalformedSnapshot> {
    let pipelines = doc
        .pipelines
        .as_ref()
        .ok_or(MalformedSnapshot::MissingPipelines)?;

    let selected: Vec<&RawPipeline> = match selector {
        QueueSelector::Named(name) => {
            let matching: Vec<&RawPipeline> = pipelines
                .iter()
                .filter(|p| p.name.as_deref() == Some(name.as_str()))
                .collect();
            if matching.is_empty() {
                return Err(MalformedSnapshot::UnknownQueue(name.clone()));
            }
            matching
        }
        QueueSelector::All => known_queues
            .iter()
            .flat_map(|known| {
                pipelines
                    .iter()
                    .filter(move |p| p.name.as_deref() == Some(known.as_str()))
            })
            .collect(),
    };

    let mut out = Vec::new();
    let mut queue_sequence = 0usize;
    for pipeline in selected {
        let queue = pipeline.name.clone().unwrap_or_default();
        for change_queue in &pipeline.change_queues {
            if change_queue.heads.is_empty() {
                continue;
            }
            queue_sequence += 1;
            for head in &change_queue.heads {
                let numbered = head.len() > 1;
                for (i, raw) in head.iter().enumerate() {
                    out.push(QueuedChange {
                        queue: queue.clone(),
                        queue_sequence,
                        queue_position: numbered.then_some(i + 1),
                        change: parse_change(raw, &queue)?,
                    });
                }
            }
        }
    }
    Ok(out)
}

fn parse_change(raw: &RawChange, pipeline: &str) -> Result<Change, MalformedSnapshot> {
    let missing = |field| MalformedSnapshot::MissingField {
        pipeline: pipeline.to_string(),
        entity: "change",
        field,
    };

    let id = match &raw.id {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => return Err(missing("id")),
    };
    let project = raw.project.clone().ok_or_else(|| missing("project"))?;
    let raw_jobs = raw.jobs.as_ref().ok_or_else(|| missing("jobs"))?;
    let jobs = raw_jobs
        .iter()
        .map(|j| parse_job(j, pipeline))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Change {
        id,
        url: raw.url.clone(),
        project,
        user: user_label(raw.owner.as_ref()),
        enqueue_time_ms: raw.enqueue_time.map(|t| t as i64),
        jobs,
    })
}

fn parse_job(raw: &RawJob, pipeline: &str) -> Result<Job, MalformedSnapshot> {
    let name = raw.name.clone().ok_or_else(|| MalformedSnapshot::MissingField {
        pipeline: pipeline.to_string(),
        entity: "job",
        field: "name",
    })?;
    let elapsed_ms = raw.elapsed_time.map(|t| t as i64);
    Ok(Job {
        name,
        url: raw.url.clone(),
        elapsed_ms,
        estimated_secs: raw.estimated_time,
        report_url: raw.report_url.clone(),
        launch_time_ms: raw.launch_time.map(|t| t as i64),
        state: JobState::classify(elapsed_ms, raw.result.as_deref()),
    })
}

fn user_label(owner: Option<&RawOwner>) -> String {
    owner
        .and_then(|o| {
            o.username
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(o.name.as_deref().filter(|s| !s.is_empty()))
        })
        .unwrap_or(UNKNOWN_USER)
        .to_string()
}
