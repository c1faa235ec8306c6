// Loose shape of the remote status feed. Every field is optional here;
// the parser turns this into the strict records in `change.rs`.

use serde::{Deserialize, Serialize};

/// Raw status document: `{pipelines: [...]}`. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub pipelines: Option<Vec<RawPipeline>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPipeline {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub change_queues: Vec<RawChangeQueue>,
}

/// One change queue; `heads` is a list of head groups, each a list of changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChangeQueue {
    #[serde(default)]
    pub heads: Vec<Vec<RawChange>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawChange {
    /// Usually a string like "12345,6"; some feeds send a bare number.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub owner: Option<RawOwner>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub enqueue_time: Option<f64>,
    #[serde(default)]
    pub jobs: Option<Vec<RawJob>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawOwner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawJob {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Milliseconds.
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    /// Seconds.
    #[serde(default)]
    pub estimated_time: Option<f64>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub report_url: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub launch_time: Option<f64>,
}
