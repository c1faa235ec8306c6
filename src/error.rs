// Error taxonomy for the status feed, the capacity document and the engine.

use std::time::Duration;
use thiserror::Error;

/// Transport failure while fetching a remote document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("request to {address} timed out after {timeout:?}")]
    Timeout { address: String, timeout: Duration },

    #[error("request to {address} returned status {status}")]
    Status { address: String, status: u16 },

    #[error("request to {address} failed: {source}")]
    Transport {
        address: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The fetched bytes were not valid JSON / YAML for the expected shape.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid status JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid capacity YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// The status document parsed but does not match the schema the engine needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedSnapshot {
    #[error("status document has no `pipelines` key")]
    MissingPipelines,

    #[error("no pipeline named {0:?} in the status document")]
    UnknownQueue(String),

    #[error("{entity} in pipeline {pipeline:?} is missing required field `{field}`")]
    MissingField {
        pipeline: String,
        entity: &'static str,
        field: &'static str,
    },
}

/// Anything that can abort a status view computation.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Malformed(#[from] MalformedSnapshot),
}
