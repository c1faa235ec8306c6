// Worker integration test: spawn, tick against a mock feed, shutdown

mod common;

use queueboard::clock::SystemClock;
use queueboard::feed_repo::FeedRepo;
use queueboard::history_service::HistoryService;
use queueboard::worker::{WorkerConfig, WorkerDeps, spawn};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn worker_spawn_ticks_and_shuts_down() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/status.json")
        .with_status(200)
        .with_body(common::status_json().to_string())
        .create_async()
        .await;

    let config = common::test_config(&server.url());
    let feed = Arc::new(FeedRepo::new(&config.feed, &config.capacity).unwrap());
    let settings = Arc::new(config.engine_settings().unwrap());
    let history = Arc::new(HistoryService::new(
        feed,
        Arc::new(SystemClock),
        settings,
        &config.history,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = spawn(
        WorkerDeps {
            history: history.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            tick_interval_ms: 20,
            stats_log_interval_secs: 60,
        },
    );

    // First tick fires immediately; later ticks fall inside the throttle window.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let _ = shutdown_tx.send(());
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("worker did not stop")
        .unwrap();

    let series = history.series().await;
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].per_queue["check"].running, 1);
    assert_eq!(history.samples_taken_total(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn worker_survives_feed_outage() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/status.json")
        .with_status(503)
        .create_async()
        .await;

    let config = common::test_config(&server.url());
    let feed = Arc::new(FeedRepo::new(&config.feed, &config.capacity).unwrap());
    let settings = Arc::new(config.engine_settings().unwrap());
    let history = Arc::new(HistoryService::new(
        feed,
        Arc::new(SystemClock),
        settings,
        &config.history,
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = spawn(
        WorkerDeps {
            history: history.clone(),
            shutdown_rx,
        },
        WorkerConfig {
            tick_interval_ms: 20,
            stats_log_interval_secs: 60,
        },
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = shutdown_tx.send(());
    handle.await.unwrap();

    assert!(history.series().await.is_empty());
    assert!(history.refresh_failures_total() >= 1);
}
