// History tests: bounded buffer, throttled sampler, service refresh against a mock feed

mod common;

use chrono::{TimeZone, Utc};
use queueboard::clock::{Clock, ManualClock};
use queueboard::feed_repo::FeedRepo;
use queueboard::history_repo::HistoryRepo;
use queueboard::history_repo::sampler::HistorySampler;
use queueboard::history_service::HistoryService;
use queueboard::models::{HistorySample, QueueCounts, StatusDocument};
use std::collections::BTreeMap;
use std::sync::Arc;

const WINDOW_MS: i64 = 240_000;

fn sample(ts_secs: i64) -> HistorySample {
    HistorySample {
        timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
        per_queue: BTreeMap::new(),
    }
}

fn sampler() -> HistorySampler {
    HistorySampler::new(vec!["check".into(), "gate".into(), "post".into()], 3, WINDOW_MS)
}

fn at(ms: i64) -> chrono::DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

#[test]
fn test_repo_evicts_oldest_when_full() {
    let mut repo = HistoryRepo::new(3);
    assert!(repo.is_empty());
    for ts in 1..=5 {
        repo.push(sample(ts));
    }
    assert_eq!(repo.len(), 3);
    let stamps: Vec<i64> = repo.series().iter().map(|s| s.timestamp.timestamp()).collect();
    assert_eq!(stamps, vec![3, 4, 5]);
    assert_eq!(repo.latest().unwrap().timestamp.timestamp(), 5);
}

#[test]
fn test_repo_capacity_is_at_least_one() {
    let mut repo = HistoryRepo::new(0);
    assert_eq!(repo.capacity(), 1);
    repo.push(sample(1));
    repo.push(sample(2));
    assert_eq!(repo.len(), 1);
}

#[test]
fn test_sampler_records_per_queue_counts() {
    let mut s = sampler();
    assert!(s.is_stale(0));
    let taken = s.record(&common::status_doc(), at(1_000), &common::settings()).unwrap();
    assert!(taken);

    let series = s.series();
    assert_eq!(series.len(), 1);
    let per_queue = &series[0].per_queue;
    assert_eq!(
        per_queue["check"],
        QueueCounts {
            running: 1,
            queued: 2,
            complete: 1
        }
    );
    assert_eq!(
        per_queue["gate"],
        QueueCounts {
            running: 0,
            queued: 1,
            complete: 1
        }
    );
    // Absent from the document: sampled as empty rather than failing.
    assert_eq!(per_queue["post"], QueueCounts::default());
}

#[test]
fn test_sampler_takes_at_most_one_sample_per_window() {
    let mut s = sampler();
    let doc = common::status_doc();
    let settings = common::settings();

    assert!(s.record(&doc, at(0), &settings).unwrap());
    assert!(!s.record(&doc, at(1_000), &settings).unwrap());
    assert!(!s.record(&doc, at(WINDOW_MS - 1), &settings).unwrap());
    assert_eq!(s.repo().len(), 1);

    assert!(s.record(&doc, at(WINDOW_MS), &settings).unwrap());
    assert_eq!(s.repo().len(), 2);
}

#[test]
fn test_sampler_ring_keeps_most_recent_samples() {
    let mut s = sampler();
    let doc = common::status_doc();
    let settings = common::settings();
    for i in 0..5 {
        assert!(s.record(&doc, at(i * WINDOW_MS), &settings).unwrap());
    }
    let stamps: Vec<i64> = s.series().iter().map(|x| x.timestamp.timestamp_millis()).collect();
    assert_eq!(stamps, vec![2 * WINDOW_MS, 3 * WINDOW_MS, 4 * WINDOW_MS]);
}

#[test]
fn test_sampler_error_leaves_state_untouched() {
    let mut s = sampler();
    let broken: StatusDocument = serde_json::from_str("{}").unwrap();
    assert!(s.record(&broken, at(0), &common::settings()).is_err());
    assert!(s.repo().is_empty());
    assert!(s.is_stale(1));
}

fn service(feed_base: &str, clock: Arc<ManualClock>) -> HistoryService {
    let config = common::test_config(feed_base);
    let feed = Arc::new(FeedRepo::new(&config.feed, &config.capacity).unwrap());
    let settings = Arc::new(config.engine_settings().unwrap());
    HistoryService::new(feed, clock, settings, &config.history)
}

#[tokio::test]
async fn test_service_refresh_fetches_once_per_window() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::status_json().to_string())
        .expect(2)
        .create_async()
        .await;

    let clock = Arc::new(ManualClock::new(1_000_000));
    let history = service(&server.url(), clock.clone());

    assert_eq!(history.refresh().await.unwrap().len(), 1);
    clock.advance_millis(60_000);
    assert_eq!(history.refresh().await.unwrap().len(), 1);
    clock.advance_millis(180_000);
    let series = history.refresh().await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].timestamp, clock.now_utc());
    assert_eq!(history.samples_taken_total(), 2);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_refresh_error_only_when_series_empty() {
    let mut server = mockito::Server::new_async().await;
    let ok = server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body(common::status_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let clock = Arc::new(ManualClock::new(0));
    let history = service(&server.url(), clock.clone());
    assert_eq!(history.refresh().await.unwrap().len(), 1);
    ok.assert_async().await;
    ok.remove_async().await;

    server
        .mock("GET", "/status.json")
        .with_status(503)
        .create_async()
        .await;
    clock.advance_millis(WINDOW_MS);
    let series = history.refresh().await.expect("stale samples are still served");
    assert_eq!(series.len(), 1);
    assert_eq!(history.refresh_failures_total(), 1);
}

#[tokio::test]
async fn test_service_refresh_fails_with_no_samples() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/status.json")
        .with_status(500)
        .create_async()
        .await;

    let history = service(&server.url(), Arc::new(ManualClock::new(0)));
    assert!(history.refresh().await.is_err());
    assert!(history.series().await.is_empty());
    assert_eq!(history.refresh_failures_total(), 1);
}

#[tokio::test]
async fn test_record_snapshot_shares_the_throttle() {
    // Nothing listens here; record_snapshot never touches the feed.
    let clock = Arc::new(ManualClock::new(0));
    let history = service("http://127.0.0.1:9", clock.clone());
    let doc = common::status_doc();

    assert!(history.record_snapshot(&doc).await.unwrap());
    assert!(!history.record_snapshot(&doc).await.unwrap());
    clock.advance_millis(10_000);
    // Still inside the window, so refresh serves the buffer without fetching.
    assert_eq!(history.refresh().await.unwrap().len(), 1);
    assert_eq!(history.samples_taken_total(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refreshes_fetch_once() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body(common::status_json().to_string())
        .expect(1)
        .create_async()
        .await;

    let history = Arc::new(service(&server.url(), Arc::new(ManualClock::new(0))));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let history = history.clone();
            tokio::spawn(async move { history.refresh().await })
        })
        .collect();
    for handle in handles {
        let series = handle.await.unwrap().unwrap();
        assert_eq!(series.len(), 1);
    }

    assert_eq!(history.samples_taken_total(), 1);
    mock.assert_async().await;
}
