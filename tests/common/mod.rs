// Shared test helpers
#![allow(dead_code)]

use queueboard::config::AppConfig;
use queueboard::models::StatusDocument;
use queueboard::status::EngineSettings;
use serde_json::{Value, json};
use url::Url;

pub const BASE_SERVER: &str = "http://ci.example.org/";

pub fn settings() -> EngineSettings {
    EngineSettings {
        known_queues: vec!["check".into(), "gate".into(), "post".into(), "periodic".into()],
        rate_based_queue: Some("check".into()),
        job_duration_hours: 2.0,
        base_server_url: Url::parse(BASE_SERVER).unwrap(),
        platform_labels: vec!["centos-7-".into()],
    }
}

pub fn job(name: &str, elapsed: Option<i64>, result: Option<&str>) -> Value {
    json!({
        "name": name,
        "url": format!("/stream/{}", name),
        "elapsed_time": elapsed,
        "estimated_time": null,
        "result": result,
        "report_url": format!("http://logs.example.org/{}", name),
        "launch_time": null,
    })
}

pub fn change(id: &str, project: &str, user: &str, jobs: Vec<Value>) -> Value {
    json!({
        "id": id,
        "url": format!("https://review.example.org/{}", id),
        "project": project,
        "owner": {"name": user.to_uppercase(), "username": user},
        "enqueue_time": 1_000_000,
        "jobs": jobs,
    })
}

/// gate: one change (queued job A, SUCCESS job B).
/// check: two change queues, the second with a two-entry head group and a running job.
pub fn status_json() -> Value {
    json!({
        "zuul_version": "2.5.2",
        "pipelines": [
            {
                "name": "gate",
                "change_queues": [
                    {"heads": [[change("100,1", "openstack/nova", "ann", vec![
                        job("gate-tempest-dsvm", None, None),
                        job("gate-pep8", Some(5_000), Some("SUCCESS")),
                    ])]]}
                ]
            },
            {
                "name": "check",
                "change_queues": [
                    {"heads": []},
                    {"heads": [[change("200,3", "openstack/tripleo-ci", "bob", vec![
                        job("gate-tripleo-ci-centos-7-ovb-ha", Some(600_000), None),
                        job("gate-tripleo-ci-centos-7-nonha", None, None),
                    ])]]},
                    {"heads": [[
                        change("300,1", "openstack/neutron", "cid", vec![
                            job("gate-neutron-unit", Some(90_000), Some("FAILURE")),
                        ]),
                        change("301,2", "openstack/neutron", "cid", vec![
                            job("gate-neutron-functional", None, None),
                        ]),
                    ]]}
                ]
            },
            {
                "name": "release",
                "change_queues": [
                    {"heads": [[change("900,1", "openstack/releases", "dee", vec![
                        job("release-notes", None, None),
                    ])]]}
                ]
            }
        ]
    })
}

pub fn status_doc() -> StatusDocument {
    serde_json::from_value(status_json()).unwrap()
}

pub fn test_config_str(feed_base: &str) -> String {
    format!(
        r#"
[server]
port = 8080
host = "127.0.0.1"

[feed]
status_url = "{feed_base}/status.json"
base_server_url = "{BASE_SERVER}"
status_timeout_secs = 5
timeout_secs = 5

[queues]
known = ["check", "gate", "post"]
default = "gate"
rate_based = "check"
job_duration_hours = 2.0

[capacity]
config_url = "{feed_base}/capacity.yaml"
refresh_secs = 1800

[history]
capacity = 3
throttle_secs = 240
sampled_queues = 3
worker_interval_secs = 60
"#
    )
}

pub fn test_config(feed_base: &str) -> AppConfig {
    AppConfig::load_from_str(&test_config_str(feed_base)).unwrap()
}

pub const CAPACITY_YAML: &str = "providers:\n  - name: rax\n    max-servers: 40\n  - name: ovh\n    max-servers: 20\n";
